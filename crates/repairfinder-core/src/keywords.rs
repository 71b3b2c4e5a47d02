//! Keyword sets driving the shop relevance heuristic.
//!
//! The sets are plain lower-cased substrings: a name is relevant when it
//! contains a positive term and no negative term. They are loaded once at
//! startup and never mutated.

use std::path::Path;

use serde::Deserialize;

use crate::ConfigError;

/// Brand names and generic repair/service words.
const DEFAULT_POSITIVE: &[&str] = &[
    "mobile", "phone", "cell", "smart", "iphone", "samsung", "mi", "redmi", "oppo", "vivo",
    "realme", "oneplus", "service", "care", "repair",
];

/// Unrelated trades that share tags with phone repair shops.
const DEFAULT_NEGATIVE: &[&str] = &[
    "borewell",
    "pump",
    "weld",
    "welding",
    "fabrication",
    "steel",
    "hardware",
    "cement",
    "tiles",
    "plywood",
    "furniture",
    "car",
    "bike",
    "tyre",
];

/// Immutable positive/negative keyword sets, lower-cased and trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelevanceKeywords {
    positive: Vec<String>,
    negative: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct KeywordsFile {
    positive: Vec<String>,
    negative: Vec<String>,
}

impl RelevanceKeywords {
    /// Build keyword sets from arbitrary terms.
    ///
    /// Terms are trimmed and lower-cased; blanks and duplicates are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if either set ends up empty.
    pub fn new<P, N>(positive: P, negative: N) -> Result<Self, ConfigError>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        N: IntoIterator,
        N::Item: AsRef<str>,
    {
        let positive = normalize_terms(positive);
        let negative = normalize_terms(negative);

        if positive.is_empty() {
            return Err(ConfigError::Validation(
                "positive keyword list must be non-empty".to_string(),
            ));
        }
        if negative.is_empty() {
            return Err(ConfigError::Validation(
                "negative keyword list must be non-empty".to_string(),
            ));
        }

        Ok(Self { positive, negative })
    }

    #[must_use]
    pub fn positive(&self) -> &[String] {
        &self.positive
    }

    #[must_use]
    pub fn negative(&self) -> &[String] {
        &self.negative
    }
}

impl Default for RelevanceKeywords {
    fn default() -> Self {
        Self {
            positive: DEFAULT_POSITIVE.iter().map(|s| (*s).to_string()).collect(),
            negative: DEFAULT_NEGATIVE.iter().map(|s| (*s).to_string()).collect(),
        }
    }
}

fn normalize_terms<I>(terms: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for term in terms {
        let term = term.as_ref().trim().to_lowercase();
        if !term.is_empty() && !out.contains(&term) {
            out.push(term);
        }
    }
    out
}

/// Load and validate keyword sets from a YAML file.
///
/// ```yaml
/// positive: [mobile, phone, repair]
/// negative: [tyre, welding]
/// ```
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_keywords(path: &Path) -> Result<RelevanceKeywords, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::KeywordsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let file: KeywordsFile =
        serde_yaml::from_str(&content).map_err(ConfigError::KeywordsFileParse)?;

    RelevanceKeywords::new(file.positive, file.negative)
}
