//! Raw page content primitives supplied by the document backend.
//!
//! The extractor adapter produces one [`PageContent`] snapshot per page;
//! detectors read it and never mutate it. All geometry is in page
//! coordinates with the origin at the top-left corner.

use crate::geometry::Rect;

/// Style bit set on [`TextSpan::flags`] when the span is rendered bold.
pub const STYLE_BOLD: u32 = 1 << 0;

/// Style bit set on [`TextSpan::flags`] when the span is rendered italic.
pub const STYLE_ITALIC: u32 = 1 << 1;

/// A run of text sharing one style, as reported by the backend.
#[derive(Debug, Clone)]
pub struct TextSpan {
    pub text: String,
    pub bbox: Rect,
    pub font_size: f32,
    /// Packed RGB color; `0` is the default (black) text color.
    pub color: u32,
    /// Style bits, see [`STYLE_BOLD`] and [`STYLE_ITALIC`].
    pub flags: u32,
    pub font_name: String,
}

impl TextSpan {
    /// True when the span carries a bold style flag.
    pub fn is_bold(&self) -> bool {
        self.flags & STYLE_BOLD != 0
    }

    /// True when the span's color differs from the default text color.
    pub fn has_non_default_color(&self) -> bool {
        self.color != 0
    }
}

/// One placement of an image resource on a page.
///
/// A single image resource may be placed several times; each placement is
/// reported separately with its own bounding box.
#[derive(Debug, Clone, Copy)]
pub struct ImagePlacement {
    pub image_id: u32,
    pub bbox: Rect,
}

/// Bounding box of one vector drawing (path, fill or stroke group).
#[derive(Debug, Clone, Copy)]
pub struct VectorDrawing {
    pub bbox: Rect,
}

/// Everything the detectors need to know about one page.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
    pub images: Vec<ImagePlacement>,
    pub drawings: Vec<VectorDrawing>,
}

impl PageContent {
    /// Creates empty content for a page of the given size.
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }
}
