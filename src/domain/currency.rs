//! Currency and amount detection in text spans.
//!
//! Spans are screened against an exclusion pattern first: dates, long digit
//! runs and address/contact vocabulary mark a span as non-financial and
//! suppress all matching in it. Surviving spans are scanned with an ordered
//! set of amount patterns; the bounding box of each match is interpolated
//! from the span box by character position.

use once_cell::sync::Lazy;
use regex::Regex;

use super::{CandidateRegion, RegionSource};
use crate::content::{PageContent, TextSpan};
use crate::geometry::Rect;

/// Spans matching this are skipped entirely: date tokens, 6+ digit runs
/// (reference numbers, postal codes) and address/contact keywords.
static EXCLUSION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\d{1,2}[./]\d{1,2}[./]\d{4}|\d{6}|street|phone|email")
        .expect("valid exclusion regex")
});

/// Amount patterns in fixed priority order. Symbol-prefixed forms come
/// first so that `€1.234,56` is claimed as one region before the generic
/// decimal patterns can take a partial bite out of it.
static AMOUNT_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"€\s*\d{1,3}(?:[.,]\d{3})*[.,]\d{2}",
        r"\$\s*\d{1,3}(?:[.,]\d{3})*[.,]\d{2}",
        r"£\s*\d{1,3}(?:[.,]\d{3})*[.,]\d{2}",
        r"CHF\s*\d{1,3}(?:[.,]\d{3})*[.,]\d{2}",
        r"\b\d{1,4}[.,]\d{2}\b",
        r"\b\d+[.,]0{1,2}\b",
        r"\b[1-9]\d{0,2}[.,]\d{1,2}\b",
    ]
    .iter()
    .map(|p| Regex::new(p).expect("valid amount regex"))
    .collect()
});

/// Detector for monetary amounts in page text.
#[derive(Debug, Clone, Default)]
pub struct CurrencyDetector;

impl CurrencyDetector {
    /// Creates a new currency detector.
    pub fn new() -> Self {
        Self
    }

    /// Scans all spans of a page and returns `Currency` candidates.
    pub fn detect(&self, content: &PageContent) -> Vec<CandidateRegion> {
        let mut candidates = Vec::new();
        for span in &content.spans {
            candidates.extend(Self::scan_span(span));
        }
        candidates
    }

    /// Scans one span, yielding at most one candidate per character range.
    fn scan_span(span: &TextSpan) -> Vec<CandidateRegion> {
        let text = span.text.trim();
        if text.is_empty() || EXCLUSION.is_match(text) {
            return Vec::new();
        }

        let char_len = text.chars().count();
        if char_len == 0 || !span.bbox.is_valid() || span.bbox.is_empty() {
            return Vec::new();
        }
        let char_width = span.bbox.width() / char_len as f32;

        let mut claimed: Vec<(usize, usize)> = Vec::new();
        let mut candidates = Vec::new();
        for pattern in AMOUNT_PATTERNS.iter() {
            for m in pattern.find_iter(text) {
                let start = text[..m.start()].chars().count();
                let end = start + m.as_str().chars().count();
                if claimed.iter().any(|&(s, e)| start < e && end > s) {
                    continue;
                }

                let rect = Rect::new(
                    span.bbox.x0 + start as f32 * char_width,
                    span.bbox.y0,
                    span.bbox.x0 + end as f32 * char_width,
                    span.bbox.y1,
                );
                if !rect.is_valid() || rect.is_empty() {
                    continue;
                }

                claimed.push((start, end));
                candidates.push(
                    CandidateRegion::new(rect, RegionSource::Currency, 0).with_label(m.as_str()),
                );
            }
        }
        candidates
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, bbox: Rect) -> TextSpan {
        TextSpan {
            text: text.to_string(),
            bbox,
            font_size: 10.0,
            color: 0,
            flags: 0,
            font_name: "Helvetica".to_string(),
        }
    }

    fn page_with(text: &str, bbox: Rect) -> PageContent {
        let mut content = PageContent::new(595.0, 842.0);
        content.spans.push(span(text, bbox));
        content
    }

    #[test]
    fn test_euro_amount_detected_as_single_region() {
        let bbox = Rect::new(100.0, 700.0, 220.0, 712.0);
        let content = page_with("Invoice Total: €1.234,56", bbox);
        let found = CurrencyDetector::new().detect(&content);

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label.as_deref(), Some("€1.234,56"));
        assert_eq!(found[0].source, RegionSource::Currency);

        // "Invoice Total: " is 15 characters of 24; the match rect starts
        // at the interpolated x of the euro sign and ends at the span edge.
        let char_width = bbox.width() / 24.0;
        let rect = found[0].rect;
        assert!((rect.x0 - (bbox.x0 + 15.0 * char_width)).abs() < 0.01);
        assert!((rect.x1 - bbox.x1).abs() < 0.01);
        assert_eq!(rect.y0, bbox.y0);
        assert_eq!(rect.y1, bbox.y1);
    }

    #[test]
    fn test_date_span_yields_nothing() {
        let bbox = Rect::new(0.0, 0.0, 100.0, 12.0);
        for text in ["Due 15.03.2024 amount 123.45", "12/31/2024 total 99.99"] {
            let found = CurrencyDetector::new().detect(&page_with(text, bbox));
            assert!(found.is_empty(), "span '{}' should be excluded", text);
        }
    }

    #[test]
    fn test_long_digit_run_and_contact_words_excluded() {
        let bbox = Rect::new(0.0, 0.0, 100.0, 12.0);
        for text in [
            "Ref 123456 total 50.00",
            "Main Street 4, 12.50",
            "Phone: 12.99",
            "EMAIL billing 7.50",
        ] {
            let found = CurrencyDetector::new().detect(&page_with(text, bbox));
            assert!(found.is_empty(), "span '{}' should be excluded", text);
        }
    }

    #[test]
    fn test_symbol_prefixed_variants() {
        let bbox = Rect::new(0.0, 0.0, 200.0, 12.0);
        for (text, expected) in [
            ("Paid $99.95 today", "$99.95"),
            ("Fee CHF 1.200,00 net", "CHF 1.200,00"),
            ("Charge £15,00 due", "£15,00"),
        ] {
            let found = CurrencyDetector::new().detect(&page_with(text, bbox));
            assert_eq!(found.len(), 1, "text '{}'", text);
            assert_eq!(found[0].label.as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_generic_decimal_amounts() {
        let bbox = Rect::new(0.0, 0.0, 200.0, 12.0);
        let found = CurrencyDetector::new().detect(&page_with("Items 12,50 and 3.99", bbox));
        let labels: Vec<_> = found.iter().filter_map(|c| c.label.as_deref()).collect();
        assert_eq!(labels, vec!["12,50", "3.99"]);
    }

    #[test]
    fn test_overlapping_matches_claimed_once() {
        // The euro pattern claims the full amount; the generic decimal
        // pattern must not re-match inside it.
        let bbox = Rect::new(0.0, 0.0, 100.0, 12.0);
        let found = CurrencyDetector::new().detect(&page_with("€123,45", bbox));
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].label.as_deref(), Some("€123,45"));
    }

    #[test]
    fn test_degenerate_span_bbox_ignored() {
        let content = page_with("€123,45", Rect::new(10.0, 10.0, 10.0, 22.0));
        assert!(CurrencyDetector::new().detect(&content).is_empty());
    }
}
