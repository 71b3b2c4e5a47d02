//! Keyword heuristic deciding whether a shop name looks like phone repair.
//!
//! Substring matching is deliberately crude. Known misses: generic names
//! ("Sri Ganesh Electronics") are dropped, and short terms such as "mi"
//! match unrelated words ("Family Store"). Tune the keyword file rather
//! than special-casing names here.

use repairfinder_core::RelevanceKeywords;

use crate::normalize::{ShopCandidate, UNNAMED_SHOP};

#[derive(Debug, Clone, Default)]
pub struct RelevanceFilter {
    keywords: RelevanceKeywords,
}

impl RelevanceFilter {
    #[must_use]
    pub fn new(keywords: RelevanceKeywords) -> Self {
        Self { keywords }
    }

    /// `true` when `name` contains a positive keyword, no negative keyword,
    /// and is not the unnamed sentinel.
    #[must_use]
    pub fn is_relevant(&self, name: &str) -> bool {
        if name == UNNAMED_SHOP {
            return false;
        }
        let lowered = name.to_lowercase();
        let good = self
            .keywords
            .positive()
            .iter()
            .any(|w| lowered.contains(w.as_str()));
        let bad = self
            .keywords
            .negative()
            .iter()
            .any(|w| lowered.contains(w.as_str()));
        good && !bad
    }

    /// Keep relevant candidates, preserving order.
    #[must_use]
    pub fn apply(&self, candidates: Vec<ShopCandidate>) -> Vec<ShopCandidate> {
        candidates
            .into_iter()
            .filter(|c| self.is_relevant(&c.name))
            .collect()
    }
}
