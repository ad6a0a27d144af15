//! In-memory document backend for engine tests.
//!
//! Implements the backend traits over a scripted document model. Unlike a
//! simple stub, `apply_redactions` actually mutates the model: covered
//! text is blanked character-by-character and covered images/drawings are
//! removed, and `serialize` registers the mutated model under fresh bytes
//! so a second redaction run can reopen the output. This makes the
//! idempotence property testable end to end without a PDF library.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use docshield::backend::{DocumentBackend, DocumentOps, PageOps, RedactionRegion};
use docshield::config::PlaceholderStyle;
use docshield::content::{ImagePlacement, TextSpan, VectorDrawing};
use docshield::error::{ShieldError, ShieldResult};
use docshield::geometry::Rect;

/// One scripted page.
#[derive(Debug, Clone, Default)]
pub struct MockPageModel {
    pub width: f32,
    pub height: f32,
    pub spans: Vec<TextSpan>,
    pub images: Vec<ImagePlacement>,
    pub drawings: Vec<VectorDrawing>,
    /// Regions passed to `apply_redactions`, in order.
    pub applied: Vec<RedactionRegion>,
    /// Placeholder rects and labels drawn on the page.
    pub placeholders: Vec<(Rect, String)>,
}

impl MockPageModel {
    /// An empty A4-sized page.
    pub fn a4() -> Self {
        Self {
            width: 595.0,
            height: 842.0,
            ..Default::default()
        }
    }

    pub fn with_span(mut self, text: &str, bbox: Rect) -> Self {
        self.spans.push(TextSpan {
            text: text.to_string(),
            bbox,
            font_size: 11.0,
            color: 0,
            flags: 0,
            font_name: "Helvetica".to_string(),
        });
        self
    }

    pub fn with_image(mut self, image_id: u32, bbox: Rect) -> Self {
        self.images.push(ImagePlacement { image_id, bbox });
        self
    }

    pub fn with_drawing(mut self, bbox: Rect) -> Self {
        self.drawings.push(VectorDrawing { bbox });
        self
    }
}

/// One scripted document.
#[derive(Debug, Clone, Default)]
pub struct MockDocModel {
    pub pages: Vec<MockPageModel>,
}

impl MockDocModel {
    pub fn with_pages(pages: Vec<MockPageModel>) -> Self {
        Self { pages }
    }
}

type Store = Arc<Mutex<HashMap<Vec<u8>, MockDocModel>>>;

/// Backend serving registered document models.
#[derive(Clone, Default)]
pub struct MockBackend {
    store: Store,
    counter: Arc<AtomicU64>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a model and returns the bytes that open it.
    pub fn register(&self, model: MockDocModel) -> Vec<u8> {
        let key = format!("mockdoc-{}", self.counter.fetch_add(1, Ordering::SeqCst)).into_bytes();
        self.store
            .lock()
            .expect("mock store poisoned")
            .insert(key.clone(), model);
        key
    }

    /// Looks up the (possibly mutated) model behind serialized bytes.
    pub fn model_for(&self, bytes: &[u8]) -> Option<MockDocModel> {
        self.store
            .lock()
            .expect("mock store poisoned")
            .get(bytes)
            .cloned()
    }
}

impl DocumentBackend for MockBackend {
    fn name(&self) -> &str {
        "mock"
    }

    fn open(&self, bytes: &[u8]) -> ShieldResult<Box<dyn DocumentOps + '_>> {
        let model = self
            .model_for(bytes)
            .ok_or_else(|| ShieldError::DocumentOpen {
                message: "unknown mock document".to_string(),
                source: None,
            })?;
        Ok(Box::new(MockDocument {
            model,
            store: self.store.clone(),
            counter: self.counter.clone(),
        }))
    }
}

struct MockDocument {
    model: MockDocModel,
    store: Store,
    counter: Arc<AtomicU64>,
}

impl DocumentOps for MockDocument {
    fn page_count(&self) -> ShieldResult<usize> {
        Ok(self.model.pages.len())
    }

    fn page(&mut self, index: usize) -> ShieldResult<Box<dyn PageOps + '_>> {
        let page = self
            .model
            .pages
            .get_mut(index)
            .ok_or_else(|| ShieldError::Backend {
                backend: "mock".to_string(),
                message: format!("page {} out of range", index),
                source: None,
            })?;
        Ok(Box::new(MockPage { page }))
    }

    fn serialize(&mut self) -> ShieldResult<Vec<u8>> {
        let key = format!("mockout-{}", self.counter.fetch_add(1, Ordering::SeqCst)).into_bytes();
        self.store
            .lock()
            .expect("mock store poisoned")
            .insert(key.clone(), self.model.clone());
        Ok(key)
    }
}

struct MockPage<'a> {
    page: &'a mut MockPageModel,
}

impl MockPage<'_> {
    /// Character range of a span covered by `region`, by interpolation.
    fn covered_chars(span: &TextSpan, region: &Rect) -> Option<(usize, usize)> {
        let overlap = span.bbox.intersect(region);
        if overlap.is_empty() {
            return None;
        }
        let len = span.text.chars().count();
        if len == 0 {
            return None;
        }
        let char_width = span.bbox.width() / len as f32;
        let start = ((overlap.x0 - span.bbox.x0) / char_width).floor().max(0.0) as usize;
        let end = (((overlap.x1 - span.bbox.x0) / char_width).ceil() as usize).min(len);
        (start < end).then_some((start, end))
    }
}

impl PageOps for MockPage<'_> {
    fn dimensions(&self) -> ShieldResult<(f32, f32)> {
        Ok((self.page.width, self.page.height))
    }

    fn text_spans(&self, clip: Option<Rect>) -> ShieldResult<Vec<TextSpan>> {
        Ok(self
            .page
            .spans
            .iter()
            .filter(|s| match clip {
                Some(clip) => !clip.intersect(&s.bbox).is_empty(),
                None => true,
            })
            .cloned()
            .collect())
    }

    fn images(&self) -> ShieldResult<Vec<ImagePlacement>> {
        Ok(self.page.images.clone())
    }

    fn vector_drawings(&self, clip: Option<Rect>) -> ShieldResult<Vec<VectorDrawing>> {
        Ok(self
            .page
            .drawings
            .iter()
            .filter(|d| match clip {
                Some(clip) => !clip.intersect(&d.bbox).is_empty(),
                None => true,
            })
            .copied()
            .collect())
    }

    fn search(&self, term: &str, _case_insensitive: bool) -> ShieldResult<Vec<Rect>> {
        let needle: Vec<char> = term.to_lowercase().chars().collect();
        if needle.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits = Vec::new();
        for span in &self.page.spans {
            let haystack: Vec<char> = span.text.to_lowercase().chars().collect();
            if haystack.len() < needle.len() {
                continue;
            }
            let char_width = span.bbox.width() / haystack.len() as f32;
            for start in 0..=(haystack.len() - needle.len()) {
                if haystack[start..start + needle.len()] != needle[..] {
                    continue;
                }
                let end = start + needle.len();
                hits.push(Rect::new(
                    span.bbox.x0 + start as f32 * char_width,
                    span.bbox.y0,
                    span.bbox.x0 + end as f32 * char_width,
                    span.bbox.y1,
                ));
            }
        }
        Ok(hits)
    }

    fn apply_redactions(&mut self, regions: &[RedactionRegion]) -> ShieldResult<usize> {
        for region in regions {
            for span in &mut self.page.spans {
                if let Some((start, end)) = Self::covered_chars(span, &region.rect) {
                    span.text = span
                        .text
                        .chars()
                        .enumerate()
                        .map(|(i, c)| if i >= start && i < end { ' ' } else { c })
                        .collect();
                }
            }
            self.page.images.retain(|img| {
                let overlap = img.bbox.intersect(&region.rect).area();
                overlap <= img.bbox.area() * 0.5
            });
            self.page.drawings.retain(|d| {
                let overlap = d.bbox.intersect(&region.rect).area();
                overlap <= d.bbox.area() * 0.5
            });
        }
        self.page.applied.extend(regions.iter().cloned());
        Ok(regions.len())
    }

    fn draw_placeholder(
        &mut self,
        rect: Rect,
        label: &str,
        _style: &PlaceholderStyle,
    ) -> ShieldResult<()> {
        self.page.placeholders.push((rect, label.to_string()));
        Ok(())
    }
}
