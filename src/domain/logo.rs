//! Logo detection: images, vector marks and company-name text.
//!
//! Three strategies run over one page and their results are unioned before
//! consolidation. Images and vector drawings are accepted on geometry
//! alone (header-zone position plus an empirical size window); text spans
//! are accepted by one of two policies, selected in [`LogoConfig`]:
//! a corporate-token pattern match or a weighted style score.
//!
//! User-supplied terms always win over logo heuristics: a header span whose
//! text matches an exclusion term in either containment direction is never
//! proposed as a logo, so it cannot shadow the term redaction applied to
//! the same region.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CandidateRegion, RegionSource};
use crate::config::{LogoConfig, TextLogoPolicy};
use crate::content::{PageContent, TextSpan};
use crate::geometry::Rect;

/// Corporate-entity suffixes and brand tokens marking letterhead text.
const COMPANY_TOKENS: &[&str] = &[
    "Ltd", "Inc", "GmbH", "LLC", "Corp", "Limited", "S.A.", "B.V.", "AG", "Co.", "Group", "Tech",
    "Solutions", "Software", "Intl", "Holdings",
];

static COMPANY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    let alternation = COMPANY_TOKENS
        .iter()
        .map(|t| format!(r"\b{}\b", regex::escape(t)))
        .collect::<Vec<_>>()
        .join("|");
    Regex::new(&format!("(?i)(?:{})", alternation)).expect("valid company token regex")
});

/// Table/invoice vocabulary, contact patterns, dates and digit runs that
/// disqualify a span under the weighted-score policy.
static SCORE_DENYLIST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?ix)
        \b(?:invoice|date|total|amount|qty|quantity|description|unit|price|vat|tax|
            subtotal|balance|due|page|tel|fax|phone|email|street|iban|bic|account|
            ltd|inc|gmbh|llc|corp|limited|ag|holdings)\b
        | \d{1,2}[./]\d{1,2}[./]\d{2,4}
        | \d{6}
        ",
    )
    .expect("valid denylist regex")
});

/// Common words that do not count as a distinctive single-word brand.
const STOP_WORDS: &[&str] = &[
    "the", "and", "for", "with", "from", "your", "this", "that", "page", "offer", "order",
    "dear", "regards",
];

/// Multi-strategy logo classifier for one page.
#[derive(Debug, Clone)]
pub struct LogoDetector {
    config: LogoConfig,
}

impl LogoDetector {
    /// Creates a detector with the given geometry gates and text policy.
    pub fn new(config: LogoConfig) -> Self {
        Self { config }
    }

    /// Runs all three strategies and returns the raw candidate union.
    ///
    /// `exclude_terms` are the user's redaction terms; spans matching one
    /// are removed before any text-strategy decision. The result is not
    /// yet consolidated.
    pub fn detect(&self, content: &PageContent, exclude_terms: &[String]) -> Vec<CandidateRegion> {
        let exclusions: Vec<String> = exclude_terms
            .iter()
            .map(|t| t.trim().to_lowercase())
            .filter(|t| !t.is_empty())
            .collect();

        let mut candidates = self.detect_images(content);
        candidates.extend(self.detect_vectors(content));
        candidates.extend(self.detect_text(content, &exclusions));
        candidates
    }

    fn header_limit(&self, content: &PageContent) -> f32 {
        content.height * self.config.header_fraction
    }

    /// Geometric gate shared by the image and vector strategies.
    fn box_gate(&self, rect: &Rect, content: &PageContent, min_w: f32, min_h: f32) -> bool {
        let max_width = self.config.max_dim.min(content.width * self.config.max_width_fraction);
        rect.is_valid()
            && !rect.is_empty()
            && rect.y0 < self.header_limit(content)
            && rect.x0 <= content.width * self.config.left_fraction
            && rect.width() > min_w
            && rect.width() < max_width
            && rect.height() > min_h
            && rect.height() < self.config.max_dim
    }

    fn detect_images(&self, content: &PageContent) -> Vec<CandidateRegion> {
        let margin = self.config.box_margin;
        content
            .images
            .iter()
            .filter(|img| {
                self.box_gate(&img.bbox, content, self.config.min_width, self.config.min_height)
            })
            .filter_map(|img| {
                let rect = img.bbox.expand(-margin, -margin, margin, margin).normalize();
                if !rect.is_valid() || rect.is_empty() {
                    return None;
                }
                Some(CandidateRegion::new(rect, RegionSource::Image, 1))
            })
            .collect()
    }

    fn detect_vectors(&self, content: &PageContent) -> Vec<CandidateRegion> {
        let min_dim = self.config.vector_min_dim;
        content
            .drawings
            .iter()
            .filter(|d| self.box_gate(&d.bbox, content, min_dim, min_dim))
            .map(|d| CandidateRegion::new(d.bbox, RegionSource::Vector, 1))
            .collect()
    }

    fn detect_text(&self, content: &PageContent, exclusions: &[String]) -> Vec<CandidateRegion> {
        let header_limit = self.header_limit(content);
        let mut candidates = Vec::new();

        for span in &content.spans {
            let text = span.text.trim();
            if text.is_empty() || span.bbox.y0 >= header_limit {
                continue;
            }
            if Self::matches_exclusion(text, exclusions) {
                continue;
            }

            let accepted = match self.config.text_policy {
                TextLogoPolicy::PatternMatch => COMPANY_PATTERN
                    .find(text)
                    .map(|m| (RegionSource::TextPattern, Some(m.as_str().to_string()), None)),
                TextLogoPolicy::WeightedScore => self
                    .score_span(span, content.height)
                    .filter(|&score| score > self.config.score.threshold)
                    .map(|score| (RegionSource::StyleScore, None, Some(score))),
            };

            let Some((source, label, score)) = accepted else {
                continue;
            };
            let rect = span
                .bbox
                .expand(
                    -self.config.text_margin_x,
                    -self.config.text_margin_y,
                    self.config.text_margin_x,
                    self.config.text_margin_y,
                )
                .normalize();
            if !rect.is_valid() || rect.is_empty() {
                continue;
            }

            let mut candidate = CandidateRegion::new(rect, source, 2);
            candidate.label = label;
            candidate.score = score;
            candidates.push(candidate);
        }
        candidates
    }

    /// User-term precedence: equality or containment in either direction.
    fn matches_exclusion(text: &str, exclusions: &[String]) -> bool {
        let normalized = text.to_lowercase();
        exclusions
            .iter()
            .any(|term| normalized.contains(term.as_str()) || term.contains(&normalized))
    }

    /// Weighted style score; `None` short-circuits on a denylist hit.
    fn score_span(&self, span: &TextSpan, page_height: f32) -> Option<i32> {
        let weights = &self.config.score;
        let text = span.text.trim();
        if SCORE_DENYLIST.is_match(text) {
            return None;
        }

        let mut score = if span.bbox.y0 < page_height * weights.strict_header_fraction {
            weights.zone_bonus
        } else {
            weights.zone_penalty
        };

        if span.has_non_default_color() || span.is_bold() {
            score += weights.style_bonus;
        }

        if span.font_size >= weights.large_font_size {
            score += weights.large_font_bonus;
        } else if span.font_size >= weights.mid_font_size {
            score += weights.mid_font_bonus;
        } else if span.font_size < weights.small_font_size {
            score += weights.small_font_penalty;
        }

        let len = text.chars().count();
        if len <= weights.short_text_len {
            score += weights.short_text_bonus;
        } else if len > weights.long_text_len {
            score += weights.long_text_penalty;
        }

        let digits = text.chars().filter(char::is_ascii_digit).count();
        if (digits as f32) < len as f32 * weights.digit_sparse_ratio {
            score += weights.digit_sparse_bonus;
        }

        if len >= 2 && text.chars().any(char::is_alphabetic) && text == text.to_uppercase() {
            score += weights.uppercase_bonus;
        }

        let mut words = text.split_whitespace();
        if let (Some(word), None) = (words.next(), words.next()) {
            if !STOP_WORDS.contains(&word.to_lowercase().as_str()) {
                score += weights.distinctive_word_bonus;
            }
        }

        Some(score)
    }
}
