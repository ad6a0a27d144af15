//! MuPDF implementation of the document backend traits.
//!
//! Drives MuPDF's PDF machinery: structured text extraction feeds the
//! detectors, page search feeds the term matcher, and redaction
//! annotations plus `pdf_redact_page` physically remove content. Gaps in
//! the safe wrapper (annotation rectangles, colors, contents) are bridged
//! by the [`ffi`] helper module.
//!
//! Known wrapper limits, reflected in the extracted content rather than
//! papered over: per-span color and style flags are not exposed (reported
//! as defaults), vector drawing boxes are not enumerable (reported as
//! none), and redaction replacement text is not supported (fill only).

use std::sync::atomic::{AtomicU64, Ordering};

use mupdf::pdf::{PdfAnnotationType, PdfDocument, PdfPage};
use mupdf::{Document, Page, Rect as MuRect, TextPageOptions};

use super::{DocumentBackend, DocumentOps, PageOps, RedactionRegion};
use crate::config::PlaceholderStyle;
use crate::content::{ImagePlacement, TextSpan, VectorDrawing};
use crate::error::{ShieldError, ShieldResult};
use crate::geometry::Rect;

const BACKEND_NAME: &str = "MuPDF";

/// Maximum search hits per term on one page.
const MAX_SEARCH_HITS: u32 = 500;

static SERIALIZE_COUNTER: AtomicU64 = AtomicU64::new(0);

fn to_rect(r: MuRect) -> Rect {
    Rect::new(r.x0, r.y0, r.x1, r.y1)
}

/// MuPDF-backed [`DocumentBackend`].
#[derive(Debug, Clone, Default)]
pub struct MuPdfBackend;

impl MuPdfBackend {
    /// Creates a new MuPDF backend.
    pub fn new() -> Self {
        Self
    }
}

impl DocumentBackend for MuPdfBackend {
    fn name(&self) -> &str {
        BACKEND_NAME
    }

    fn open(&self, bytes: &[u8]) -> ShieldResult<Box<dyn DocumentOps + '_>> {
        let doc = Document::from_bytes(bytes, "application/pdf").map_err(|e| {
            ShieldError::DocumentOpen {
                message: "input bytes are not a readable PDF".to_string(),
                source: Some(Box::new(e)),
            }
        })?;
        let pdf = PdfDocument::try_from(doc).map_err(|e| ShieldError::DocumentOpen {
            message: "document is not a PDF".to_string(),
            source: Some(Box::new(e)),
        })?;
        Ok(Box::new(MuPdfDocument { pdf }))
    }
}

struct MuPdfDocument {
    pdf: PdfDocument,
}

impl DocumentOps for MuPdfDocument {
    fn page_count(&self) -> ShieldResult<usize> {
        self.pdf
            .page_count()
            .map(|count| count as usize)
            .map_err(|e| ShieldError::backend(BACKEND_NAME, "failed to get page count", e))
    }

    fn page(&mut self, index: usize) -> ShieldResult<Box<dyn PageOps + '_>> {
        let page = self
            .pdf
            .load_page(index as i32)
            .map_err(|e| ShieldError::backend(BACKEND_NAME, format!("failed to load page {}", index + 1), e))?;
        let pdf_page = PdfPage::try_from(page.clone()).map_err(|e| {
            ShieldError::backend(
                BACKEND_NAME,
                format!("page {} is not a PDF page", index + 1),
                e,
            )
        })?;
        Ok(Box::new(MuPdfPage { page, pdf_page }))
    }

    fn serialize(&mut self) -> ShieldResult<Vec<u8>> {
        // The wrapper only exposes path-based saving; round-trip through a
        // uniquely named temp file.
        let path = std::env::temp_dir().join(format!(
            "docshield-{}-{}.pdf",
            std::process::id(),
            SERIALIZE_COUNTER.fetch_add(1, Ordering::SeqCst)
        ));
        let path_str = path.to_str().ok_or_else(|| ShieldError::Serialization {
            message: "temp path contains invalid UTF-8".to_string(),
            source: None,
        })?;

        self.pdf.save(path_str).map_err(|e| ShieldError::Serialization {
            message: "failed to save redacted PDF".to_string(),
            source: Some(Box::new(e)),
        })?;
        let bytes = std::fs::read(&path).map_err(|e| ShieldError::Serialization {
            message: "failed to read back serialized PDF".to_string(),
            source: Some(Box::new(e)),
        })?;
        let _ = std::fs::remove_file(&path);
        Ok(bytes)
    }
}

struct MuPdfPage {
    page: Page,
    pdf_page: PdfPage,
}

impl MuPdfPage {
    fn text_page(&self, options: TextPageOptions) -> ShieldResult<mupdf::TextPage> {
        self.page
            .to_text_page(options)
            .map_err(|e| ShieldError::backend(BACKEND_NAME, "structured text extraction failed", e))
    }
}

impl PageOps for MuPdfPage {
    fn dimensions(&self) -> ShieldResult<(f32, f32)> {
        let bounds = self
            .page
            .bounds()
            .map_err(|e| ShieldError::backend(BACKEND_NAME, "failed to get page bounds", e))?;
        Ok((bounds.x1 - bounds.x0, bounds.y1 - bounds.y0))
    }

    fn text_spans(&self, clip: Option<Rect>) -> ShieldResult<Vec<TextSpan>> {
        let text_page = self.text_page(TextPageOptions::PRESERVE_LIGATURES)?;

        let mut spans = Vec::new();
        for block in text_page.blocks() {
            for line in block.lines() {
                let bbox = to_rect(line.bounds());
                if !bbox.is_valid() || bbox.is_empty() {
                    continue;
                }
                if let Some(clip) = clip {
                    if clip.intersect(&bbox).is_empty() {
                        continue;
                    }
                }

                let mut text = String::new();
                let mut font_size = 0.0_f32;
                for ch in line.chars() {
                    if let Some(c) = ch.char() {
                        text.push(c);
                    }
                    if font_size == 0.0 {
                        font_size = ch.size();
                    }
                }
                if text.trim().is_empty() {
                    continue;
                }

                // Color and style flags are not exposed by the wrapper;
                // spans carry the default color and no style bits.
                spans.push(TextSpan {
                    text,
                    bbox,
                    font_size,
                    color: 0,
                    flags: 0,
                    font_name: String::new(),
                });
            }
        }
        Ok(spans)
    }

    fn images(&self) -> ShieldResult<Vec<ImagePlacement>> {
        // Image placements surface as line-less blocks when the text page
        // is built with image preservation.
        let text_page = self.text_page(TextPageOptions::PRESERVE_IMAGES)?;

        let mut placements = Vec::new();
        for (index, block) in text_page.blocks().enumerate() {
            if block.lines().next().is_some() {
                continue;
            }
            let bbox = to_rect(block.bounds());
            if bbox.is_valid() && !bbox.is_empty() {
                placements.push(ImagePlacement {
                    image_id: index as u32,
                    bbox,
                });
            }
        }
        Ok(placements)
    }

    fn vector_drawings(&self, _clip: Option<Rect>) -> ShieldResult<Vec<VectorDrawing>> {
        // The safe wrapper has no display-list walker, so vector boxes
        // cannot be enumerated; the logo detector's vector strategy sees
        // an empty set on this backend.
        log::debug!("MuPDF backend does not report vector drawings");
        Ok(Vec::new())
    }

    fn search(&self, term: &str, _case_insensitive: bool) -> ShieldResult<Vec<Rect>> {
        // MuPDF page search is case-insensitive by construction.
        let hits = self.page.search(term, MAX_SEARCH_HITS).map_err(|e| {
            ShieldError::backend(BACKEND_NAME, format!("search failed for term: {}", term), e)
        })?;

        let rects = hits
            .into_iter()
            .map(|quad| {
                Rect::new(
                    quad.ul.x.min(quad.ll.x).min(quad.ur.x).min(quad.lr.x),
                    quad.ul.y.min(quad.ll.y).min(quad.ur.y).min(quad.lr.y),
                    quad.ul.x.max(quad.ll.x).max(quad.ur.x).max(quad.lr.x),
                    quad.ul.y.max(quad.ll.y).max(quad.ur.y).max(quad.lr.y),
                )
            })
            .filter(|r| r.is_valid() && !r.is_empty())
            .collect();
        Ok(rects)
    }

    fn apply_redactions(&mut self, regions: &[RedactionRegion]) -> ShieldResult<usize> {
        if regions.is_empty() {
            return Ok(0);
        }

        for region in regions {
            let annot = self
                .pdf_page
                .create_annotation(PdfAnnotationType::Redact)
                .map_err(|e| {
                    ShieldError::backend(BACKEND_NAME, "failed to create redaction annotation", e)
                })?;

            let rect = MuRect {
                x0: region.rect.x0,
                y0: region.rect.y0,
                x1: region.rect.x1,
                y1: region.rect.y1,
            };
            unsafe {
                ffi::set_annotation_rect(&annot, rect);
                ffi::set_annotation_interior_color(&annot, region.fill);
            }
            if region.replacement.is_some() {
                // Overlay text is not supported by this backend; the
                // region is removed and filled without replacement.
                log::debug!("dropping replacement text for region at {:?}", region.rect);
            }
        }

        self.pdf_page
            .redact()
            .map_err(|e| ShieldError::backend(BACKEND_NAME, "failed to apply redactions", e))?;
        Ok(regions.len())
    }

    fn draw_placeholder(
        &mut self,
        rect: Rect,
        label: &str,
        style: &PlaceholderStyle,
    ) -> ShieldResult<()> {
        let annot = self
            .pdf_page
            .create_annotation(PdfAnnotationType::FreeText)
            .map_err(|e| {
                ShieldError::backend(BACKEND_NAME, "failed to create placeholder annotation", e)
            })?;

        let mu_rect = MuRect {
            x0: rect.x0,
            y0: rect.y0,
            x1: rect.x1,
            y1: rect.y1,
        };
        unsafe {
            ffi::set_annotation_rect(&annot, mu_rect);
            ffi::set_annotation_color(&annot, style.border_color);
            ffi::set_annotation_contents(&annot, label)?;
        }
        Ok(())
    }
}

/// FFI helpers for MuPDF annotation operations.
mod ffi {
    use mupdf::pdf::PdfAnnotation;
    use mupdf::Rect;

    use crate::error::{ShieldError, ShieldResult};

    #[repr(C)]
    struct PdfAnnotRaw {
        inner: *mut mupdf_sys::pdf_annot,
    }

    /// Runs `f` with a fresh base context and the annotation's raw pointer.
    ///
    /// # Safety
    /// The annotation must be alive and belong to a properly initialized
    /// MuPDF document.
    unsafe fn with_annot_context<F>(annot: &PdfAnnotation, f: F)
    where
        F: FnOnce(*mut mupdf_sys::fz_context, *mut mupdf_sys::pdf_annot),
    {
        let annot_raw = std::mem::transmute::<&PdfAnnotation, &PdfAnnotRaw>(annot);
        let ctx = mupdf_sys::mupdf_new_base_context();
        if !ctx.is_null() {
            f(ctx, annot_raw.inner);
            mupdf_sys::mupdf_drop_base_context(ctx);
        }
    }

    /// Sets the rectangle for a PDF annotation via FFI.
    ///
    /// # Safety
    /// See [`with_annot_context`].
    pub unsafe fn set_annotation_rect(annot: &PdfAnnotation, rect: Rect) {
        with_annot_context(annot, |ctx, raw| {
            let fz_rect = mupdf_sys::fz_rect {
                x0: rect.x0,
                y0: rect.y0,
                x1: rect.x1,
                y1: rect.y1,
            };
            mupdf_sys::pdf_set_annot_rect(ctx, raw, fz_rect);
        });
    }

    /// Sets the annotation fill (interior) color.
    ///
    /// # Safety
    /// See [`with_annot_context`].
    pub unsafe fn set_annotation_interior_color(annot: &PdfAnnotation, rgb: [f32; 3]) {
        with_annot_context(annot, |ctx, raw| {
            mupdf_sys::pdf_set_annot_interior_color(ctx, raw, 3, rgb.as_ptr());
        });
    }

    /// Sets the annotation stroke color.
    ///
    /// # Safety
    /// See [`with_annot_context`].
    pub unsafe fn set_annotation_color(annot: &PdfAnnotation, rgb: [f32; 3]) {
        with_annot_context(annot, |ctx, raw| {
            mupdf_sys::pdf_set_annot_color(ctx, raw, 3, rgb.as_ptr());
        });
    }

    /// Sets the annotation contents string.
    ///
    /// # Safety
    /// See [`with_annot_context`].
    pub unsafe fn set_annotation_contents(annot: &PdfAnnotation, text: &str) -> ShieldResult<()> {
        let contents = std::ffi::CString::new(text).map_err(|_| ShieldError::InvalidInput {
            parameter: "label".to_string(),
            reason: "contains interior NUL byte".to_string(),
        })?;
        with_annot_context(annot, |ctx, raw| {
            mupdf_sys::pdf_set_annot_contents(ctx, raw, contents.as_ptr());
        });
        Ok(())
    }
}
