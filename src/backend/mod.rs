//! Document backend boundary.
//!
//! The engine never parses or serializes document bytes itself; everything
//! touching the file format goes through these traits. The crate ships one
//! production implementation over MuPDF ([`mupdf_backend::MuPdfBackend`])
//! and the test suite drives the engine through scripted in-memory
//! implementations.

pub mod mupdf_backend;

pub use mupdf_backend::MuPdfBackend;

use crate::config::PlaceholderStyle;
use crate::content::{ImagePlacement, TextSpan, VectorDrawing};
use crate::error::ShieldResult;
use crate::geometry::Rect;

/// One region of a page redaction request.
#[derive(Debug, Clone)]
pub struct RedactionRegion {
    pub rect: Rect,
    /// RGB fill painted over the region after content removal.
    pub fill: [f32; 3],
    /// Text rendered in place of the removed content, where wanted.
    pub replacement: Option<String>,
}

/// Factory opening documents from raw bytes.
pub trait DocumentBackend: Send + Sync {
    /// Backend name used in error and audit messages.
    fn name(&self) -> &str;

    /// Opens a document; fails with `DocumentOpen` for unreadable input.
    fn open(&self, bytes: &[u8]) -> ShieldResult<Box<dyn DocumentOps + '_>>;
}

/// An open document.
pub trait DocumentOps {
    fn page_count(&self) -> ShieldResult<usize>;

    /// Loads one page for reading and annotation. Pages are processed
    /// strictly in index order, one at a time.
    fn page(&mut self, index: usize) -> ShieldResult<Box<dyn PageOps + '_>>;

    /// Produces the final output bytes after all pages are processed.
    fn serialize(&mut self) -> ShieldResult<Vec<u8>>;
}

/// One page of an open document.
pub trait PageOps {
    /// Page width and height in page units.
    fn dimensions(&self) -> ShieldResult<(f32, f32)>;

    /// Text spans with style metadata, optionally clipped.
    fn text_spans(&self, clip: Option<Rect>) -> ShieldResult<Vec<TextSpan>>;

    /// All image placements on the page.
    fn images(&self) -> ShieldResult<Vec<ImagePlacement>>;

    /// Vector drawing bounding boxes, optionally clipped.
    fn vector_drawings(&self, clip: Option<Rect>) -> ShieldResult<Vec<VectorDrawing>>;

    /// All occurrences of a term on the page.
    fn search(&self, term: &str, case_insensitive: bool) -> ShieldResult<Vec<Rect>>;

    /// Physically applies the given redactions; returns the applied count.
    fn apply_redactions(&mut self, regions: &[RedactionRegion]) -> ShieldResult<usize>;

    /// Draws a removal marker (border plus label) over a redacted region.
    fn draw_placeholder(&mut self, rect: Rect, label: &str, style: &PlaceholderStyle)
        -> ShieldResult<()>;
}
