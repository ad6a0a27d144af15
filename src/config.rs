//! Tuning configuration for the detection engine.
//!
//! Every empirically calibrated constant (header-zone fractions, logo size
//! windows, score weights, merge tolerance, fill colors) lives here with a
//! documented default instead of being embedded at its point of use. The
//! `inspect-header` entry point exists to recalibrate these against real
//! documents.

/// Policy used by the logo detector's text strategy.
///
/// Both heuristics are retained from observed implementations and differ
/// meaningfully: under [`PatternMatch`](TextLogoPolicy::PatternMatch) a
/// corporate-entity suffix is a positive logo signal, while under
/// [`WeightedScore`](TextLogoPolicy::WeightedScore) the same suffix is part
/// of the denylist. An engine instance uses exactly one policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextLogoPolicy {
    /// Whole-word match against a fixed corporate/brand token list.
    #[default]
    PatternMatch,
    /// Signed score accumulated from position, style, size and vocabulary
    /// signals; a span qualifies when the score exceeds the threshold.
    WeightedScore,
}

/// Weights and thresholds for [`TextLogoPolicy::WeightedScore`].
#[derive(Debug, Clone)]
pub struct ScoreWeights {
    /// Stricter header sub-zone as a fraction of page height.
    pub strict_header_fraction: f32,
    /// Bonus for spans inside the strict sub-zone.
    pub zone_bonus: i32,
    /// Penalty for header spans outside the strict sub-zone.
    pub zone_penalty: i32,
    /// Bonus when the span has a non-default color or a bold style flag.
    pub style_bonus: i32,
    pub large_font_size: f32,
    pub large_font_bonus: i32,
    pub mid_font_size: f32,
    pub mid_font_bonus: i32,
    pub small_font_size: f32,
    pub small_font_penalty: i32,
    pub short_text_len: usize,
    pub short_text_bonus: i32,
    pub long_text_len: usize,
    pub long_text_penalty: i32,
    /// Maximum digit fraction for the digit-sparse bonus.
    pub digit_sparse_ratio: f32,
    pub digit_sparse_bonus: i32,
    pub uppercase_bonus: i32,
    /// Bonus for a single word not found in the stop-list.
    pub distinctive_word_bonus: i32,
    /// Minimum accepted score (exclusive).
    pub threshold: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            strict_header_fraction: 0.10,
            zone_bonus: 30,
            zone_penalty: -10,
            style_bonus: 40,
            large_font_size: 16.0,
            large_font_bonus: 25,
            mid_font_size: 12.0,
            mid_font_bonus: 10,
            small_font_size: 8.0,
            small_font_penalty: -15,
            short_text_len: 20,
            short_text_bonus: 15,
            long_text_len: 40,
            long_text_penalty: -20,
            digit_sparse_ratio: 0.2,
            digit_sparse_bonus: 10,
            uppercase_bonus: 15,
            distinctive_word_bonus: 20,
            threshold: 50,
        }
    }
}

/// Geometric gates and policy selection for the logo detector.
#[derive(Debug, Clone)]
pub struct LogoConfig {
    /// Header zone as a fraction of page height; elements must start above it.
    pub header_fraction: f32,
    /// Left portion of the page, as a fraction of page width, in which an
    /// image/vector logo's left edge must lie.
    pub left_fraction: f32,
    /// Maximum logo width as a fraction of page width.
    pub max_width_fraction: f32,
    /// Absolute size window for image placements, in page units.
    pub min_width: f32,
    pub min_height: f32,
    pub max_dim: f32,
    /// Tighter minimum for vector drawing boxes.
    pub vector_min_dim: f32,
    /// Outward expansion applied to accepted image/vector boxes.
    pub box_margin: f32,
    /// Outward expansion applied to accepted text spans.
    pub text_margin_x: f32,
    pub text_margin_y: f32,
    pub text_policy: TextLogoPolicy,
    pub score: ScoreWeights,
}

impl Default for LogoConfig {
    fn default() -> Self {
        Self {
            header_fraction: 0.15,
            left_fraction: 0.5,
            max_width_fraction: 0.40,
            min_width: 15.0,
            min_height: 10.0,
            max_dim: 200.0,
            vector_min_dim: 20.0,
            box_margin: 2.0,
            text_margin_x: 5.0,
            text_margin_y: 3.0,
            text_policy: TextLogoPolicy::default(),
            score: ScoreWeights::default(),
        }
    }
}

/// Visual style of the marker drawn where a logo was removed.
#[derive(Debug, Clone)]
pub struct PlaceholderStyle {
    pub label: String,
    pub border_color: [f32; 3],
    pub max_font_size: f32,
}

impl Default for PlaceholderStyle {
    fn default() -> Self {
        Self {
            label: "LOGO".to_string(),
            border_color: [0.5, 0.5, 0.5],
            max_font_size: 10.0,
        }
    }
}

/// Top-level engine configuration.
#[derive(Debug, Clone)]
pub struct RedactionConfig {
    pub logo: LogoConfig,
    /// Proximity tolerance for merge-by-proximity consolidation.
    pub merge_tolerance: f32,
    /// Fill for term and currency regions.
    pub text_fill: [f32; 3],
    /// Fill for logo regions.
    pub logo_fill: [f32; 3],
    /// Replacement text placed over currency regions.
    pub currency_replacement: String,
    /// Whether to draw placeholders over removed logos.
    pub draw_placeholders: bool,
    pub placeholder: PlaceholderStyle,
}

impl Default for RedactionConfig {
    fn default() -> Self {
        Self {
            logo: LogoConfig::default(),
            merge_tolerance: 5.0,
            text_fill: [0.0, 0.0, 0.0],
            logo_fill: [1.0, 1.0, 1.0],
            currency_replacement: "XXXX".to_string(),
            draw_placeholders: true,
            placeholder: PlaceholderStyle::default(),
        }
    }
}

impl RedactionConfig {
    /// Selects the text-logo policy.
    pub fn with_text_policy(mut self, policy: TextLogoPolicy) -> Self {
        self.logo.text_policy = policy;
        self
    }

    /// Sets the consolidation merge tolerance.
    pub fn with_merge_tolerance(mut self, tolerance: f32) -> Self {
        self.merge_tolerance = tolerance;
        self
    }

    /// Disables placeholder drawing over removed logos.
    pub fn without_placeholders(mut self) -> Self {
        self.draw_placeholders = false;
        self
    }
}
