//! Detection logic for sensitive page content.
//!
//! Each detector inspects one page's raw content and proposes
//! [`CandidateRegion`]s; the consolidator reduces those proposals to a
//! minimal, duplicate-free cover before the pipeline turns them into a
//! redaction plan.

pub mod consolidate;
pub mod currency;
pub mod logo;
pub mod terms;

pub use consolidate::{merge_by_proximity, remove_duplicate_overlaps};
pub use currency::CurrencyDetector;
pub use logo::LogoDetector;
pub use terms::TermMatcher;

use crate::geometry::Rect;

/// Which detection strategy produced a candidate region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionSource {
    /// Image placement in the header zone.
    Image,
    /// Vector drawing box in the header zone.
    Vector,
    /// Header text matching a corporate/brand token.
    TextPattern,
    /// Header text accepted by the weighted style score.
    StyleScore,
    /// Occurrence of a user-supplied term.
    Term,
    /// Currency or amount pattern match.
    Currency,
}

impl RegionSource {
    /// True for the logo family of sources (light fill + placeholder).
    pub fn is_logo(&self) -> bool {
        matches!(
            self,
            Self::Image | Self::Vector | Self::TextPattern | Self::StyleScore
        )
    }

    /// Short tag used in audit log entries.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Image => "image",
            Self::Vector => "vector",
            Self::TextPattern => "text-pattern",
            Self::StyleScore => "style-score",
            Self::Term => "term",
            Self::Currency => "currency",
        }
    }
}

/// A rectangle proposed for redaction by one detection strategy.
#[derive(Debug, Clone)]
pub struct CandidateRegion {
    pub rect: Rect,
    pub source: RegionSource,
    /// Lower value sorts first when placements compete (images/vectors 1,
    /// text strategies 2, direct matches 0).
    pub priority: i32,
    /// Matched token or term, where one exists.
    pub label: Option<String>,
    /// Acceptance score, set only by the weighted-score policy.
    pub score: Option<i32>,
}

impl CandidateRegion {
    /// Creates a candidate with no label or score.
    pub fn new(rect: Rect, source: RegionSource, priority: i32) -> Self {
        Self {
            rect,
            source,
            priority,
            label: None,
            score: None,
        }
    }

    /// Attaches the matched token or term.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_classification() {
        assert!(RegionSource::Image.is_logo());
        assert!(RegionSource::StyleScore.is_logo());
        assert!(!RegionSource::Term.is_logo());
        assert!(!RegionSource::Currency.is_logo());
        assert_eq!(RegionSource::TextPattern.tag(), "text-pattern");
    }

    #[test]
    fn test_candidate_builder() {
        let c = CandidateRegion::new(Rect::new(0.0, 0.0, 10.0, 10.0), RegionSource::Term, 0)
            .with_label("Acme");
        assert_eq!(c.label.as_deref(), Some("Acme"));
        assert!(c.score.is_none());
    }
}
