//! User-supplied term search.
//!
//! Terms are looked up case-insensitively through the backend's page
//! search; every occurrence becomes a `Term` candidate and is always
//! included in the plan. A failed lookup for one term is reported as a
//! warning and does not stop the remaining terms or the page.

use super::{CandidateRegion, RegionSource};
use crate::backend::PageOps;
use crate::geometry::Rect;

/// Matcher for explicit user terms.
#[derive(Debug, Clone, Default)]
pub struct TermMatcher;

impl TermMatcher {
    /// Creates a new term matcher.
    pub fn new() -> Self {
        Self
    }

    /// Searches all terms on one page.
    ///
    /// Returns the candidate regions plus warnings for term lookups that
    /// failed. Empty and whitespace-only terms are skipped.
    pub fn detect(
        &self,
        page: &dyn PageOps,
        terms: &[String],
    ) -> (Vec<CandidateRegion>, Vec<String>) {
        let mut candidates = Vec::new();
        let mut warnings = Vec::new();

        for term in terms {
            let term = term.trim();
            if term.is_empty() {
                continue;
            }
            match page.search(term, true) {
                Ok(hits) => {
                    for rect in hits {
                        if !rect.is_valid() || rect.is_empty() {
                            continue;
                        }
                        candidates.push(
                            CandidateRegion::new(rect, RegionSource::Term, 0).with_label(term),
                        );
                    }
                }
                Err(err) => {
                    warnings.push(format!("term lookup failed for '{}': {}", term, err));
                }
            }
        }
        (candidates, warnings)
    }

    /// Replacement text for a term hit: a run of `X` sized from the width.
    pub fn replacement_for(rect: &Rect) -> String {
        let count = ((rect.width() / 5.0).round() as usize).max(3);
        "X".repeat(count)
    }
}
