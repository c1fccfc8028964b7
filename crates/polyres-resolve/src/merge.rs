//! JSON merge semantics for partial candidates.

use serde_json::Value;

/// How arrays combine when merging candidate payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayMergePolicy {
    /// The overlay array replaces the base array wholesale.
    #[default]
    Replace,
    /// The overlay array's elements are appended to the base array.
    Append,
}

/// Merges `overlay` onto `base`: objects merge recursively with overlay
/// keys overwriting, arrays follow `policy`, anything else is replaced by
/// the overlay value.
///
/// # Example
///
/// ```
/// use polyres_resolve::{merge_values, ArrayMergePolicy};
/// use serde_json::json;
///
/// let mut base = json!({ "greeting": "hello", "menu": { "size": 3 } });
/// merge_values(&mut base, &json!({ "menu": { "theme": "dark" } }), ArrayMergePolicy::Replace);
/// assert_eq!(base, json!({ "greeting": "hello", "menu": { "size": 3, "theme": "dark" } }));
/// ```
pub fn merge_values(base: &mut Value, overlay: &Value, policy: ArrayMergePolicy) {
    match (base, overlay) {
        (Value::Object(base_map), Value::Object(overlay_map)) => {
            for (key, overlay_value) in overlay_map {
                match base_map.get_mut(key) {
                    Some(base_value) => merge_values(base_value, overlay_value, policy),
                    None => {
                        base_map.insert(key.clone(), overlay_value.clone());
                    }
                }
            }
        }
        (Value::Array(base_items), Value::Array(overlay_items))
            if policy == ArrayMergePolicy::Append =>
        {
            base_items.extend(overlay_items.iter().cloned());
        }
        (base, overlay) => *base = overlay.clone(),
    }
}
