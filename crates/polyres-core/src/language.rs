//! Structural BCP-47 language tags and distance scoring.
//!
//! This is deliberately a structural subset: enough of the tag grammar to
//! split `primary-script-region-variant` subtags and score how closely two
//! tags agree. IANA registry validation and extension/private-use subtags
//! are outside this engine.

use crate::error::{PolyresError, Result};
use crate::score::MatchScore;

const WEIGHT_PRIMARY: f64 = 0.4;
const WEIGHT_SCRIPT: f64 = 0.25;
const WEIGHT_REGION: f64 = 0.25;
const WEIGHT_VARIANTS: f64 = 0.1;

/// A parsed language tag: primary subtag plus optional script, region,
/// and variant subtags, case-normalized per BCP-47 convention
/// (`zh-Hant-TW`, `de-CH-1996`).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LanguageTag {
    /// Primary language subtag, lowercase (`en`, `zh`).
    pub primary: String,
    /// Script subtag, titlecase (`Hant`, `Latn`).
    pub script: Option<String>,
    /// Region subtag, uppercase alpha or 3-digit (`US`, `419`).
    pub region: Option<String>,
    /// Variant subtags, lowercase, in source order.
    pub variants: Vec<String>,
}

impl LanguageTag {
    /// Parses a tag, normalizing subtag case.
    ///
    /// # Example
    ///
    /// ```
    /// use polyres_core::LanguageTag;
    ///
    /// let tag = LanguageTag::parse("ZH-hant-tw").unwrap();
    /// assert_eq!(tag.primary, "zh");
    /// assert_eq!(tag.script.as_deref(), Some("Hant"));
    /// assert_eq!(tag.region.as_deref(), Some("TW"));
    /// ```
    pub fn parse(tag: &str) -> Result<LanguageTag> {
        let invalid = || PolyresError::validation(format!("'{tag}' is not a valid language tag"));

        let mut parts = tag.split('-');
        let primary = parts.next().ok_or_else(invalid)?;
        if primary.len() < 2 || primary.len() > 8 || !primary.chars().all(|c| c.is_ascii_alphabetic())
        {
            return Err(invalid());
        }

        let mut script = None;
        let mut region = None;
        let mut variants = Vec::new();
        for part in parts {
            if is_script(part) && script.is_none() && region.is_none() && variants.is_empty() {
                script = Some(titlecase(part));
            } else if is_region(part) && region.is_none() && variants.is_empty() {
                region = Some(part.to_ascii_uppercase());
            } else if is_variant(part) {
                variants.push(part.to_ascii_lowercase());
            } else {
                return Err(invalid());
            }
        }

        Ok(LanguageTag {
            primary: primary.to_ascii_lowercase(),
            script,
            region,
            variants,
        })
    }

    /// Scores how closely `other` agrees with this tag.
    ///
    /// A mismatch on the primary subtag is `NO_MATCH` regardless of any
    /// other agreement. With matching primaries, script, region, and
    /// variants each contribute a fixed weight: full weight when both
    /// sides agree (including both-absent), half weight when one side is
    /// silent, nothing on an outright mismatch. Two identical tags score
    /// `PERFECT`.
    pub fn similarity(&self, other: &LanguageTag) -> MatchScore {
        if self.primary != other.primary {
            return MatchScore::NO_MATCH;
        }
        let mut score = WEIGHT_PRIMARY;
        score += WEIGHT_SCRIPT * subtag_agreement(self.script.as_deref(), other.script.as_deref());
        score += WEIGHT_REGION * subtag_agreement(self.region.as_deref(), other.region.as_deref());
        score += WEIGHT_VARIANTS * variants_agreement(&self.variants, &other.variants);

        if score >= 1.0 {
            MatchScore::PERFECT
        } else {
            // Primary agreement alone keeps the score above zero.
            MatchScore::partial(score).unwrap_or(MatchScore::NO_MATCH)
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.primary)?;
        if let Some(script) = &self.script {
            write!(f, "-{script}")?;
        }
        if let Some(region) = &self.region {
            write!(f, "-{region}")?;
        }
        for variant in &self.variants {
            write!(f, "-{variant}")?;
        }
        Ok(())
    }
}

fn is_script(s: &str) -> bool {
    s.len() == 4 && s.chars().all(|c| c.is_ascii_alphabetic())
}

fn is_region(s: &str) -> bool {
    (s.len() == 2 && s.chars().all(|c| c.is_ascii_alphabetic()))
        || (s.len() == 3 && s.chars().all(|c| c.is_ascii_digit()))
}

fn is_variant(s: &str) -> bool {
    (s.len() >= 5 && s.len() <= 8 && s.chars().all(|c| c.is_ascii_alphanumeric()))
        || (s.len() == 4
            && s.starts_with(|c: char| c.is_ascii_digit())
            && s.chars().all(|c| c.is_ascii_alphanumeric()))
}

fn titlecase(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for (i, c) in s.chars().enumerate() {
        if i == 0 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c.to_ascii_lowercase());
        }
    }
    out
}

fn subtag_agreement(a: Option<&str>, b: Option<&str>) -> f64 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => 1.0,
        (Some(_), Some(_)) => 0.0,
        (None, None) => 1.0,
        _ => 0.5,
    }
}

fn variants_agreement(a: &[String], b: &[String]) -> f64 {
    if a == b {
        1.0
    } else if a.is_empty() || b.is_empty() {
        0.5
    } else {
        0.0
    }
}
