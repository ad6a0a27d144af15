//! Caller-facing redaction service.
//!
//! [`Redactor`] binds a document backend to the detection pipeline and
//! exposes the byte-in/byte-out operations: redaction, validation and the
//! header inspection used for tuning detector thresholds.

pub mod audit;
pub mod pipeline;

pub use audit::AuditLog;
pub use pipeline::{PageStage, Pipeline, RunState, RunStats};

use crate::backend::{DocumentBackend, MuPdfBackend};
use crate::config::RedactionConfig;
use crate::domain::{merge_by_proximity, remove_duplicate_overlaps, LogoDetector};
use crate::error::{ShieldError, ShieldResult};
use crate::geometry::Rect;

/// What to redact in one call.
#[derive(Debug, Clone, Default)]
pub struct RedactionRequest {
    /// User terms, matched case-insensitively; always redacted.
    pub terms: Vec<String>,
    pub redact_logos: bool,
    pub redact_numbers: bool,
}

impl RedactionRequest {
    /// True when the request selects nothing to redact.
    pub fn is_empty(&self) -> bool {
        !self.redact_logos
            && !self.redact_numbers
            && self.terms.iter().all(|t| t.trim().is_empty())
    }
}

/// Successful result of one redaction call.
#[derive(Debug)]
pub struct RedactionOutcome {
    /// Serialized output document.
    pub output: Vec<u8>,
    /// Complete audit trail of the run.
    pub audit_log: Vec<String>,
    pub stats: RunStats,
}

/// Terminal failure of one redaction call, carrying the audit entries
/// accumulated before the fatal error.
#[derive(Debug, thiserror::Error)]
#[error("{error}")]
pub struct RedactionFailure {
    #[source]
    pub error: ShieldError,
    pub audit_log: Vec<String>,
}

/// One text span found in the header zone, with the style metadata the
/// scoring policy looks at.
#[derive(Debug, Clone)]
pub struct HeaderSpan {
    pub text: String,
    pub bbox: Rect,
    pub font_size: f32,
    pub color: u32,
    pub flags: u32,
    pub font_name: String,
    /// Position as a percentage of the page dimensions.
    pub x_percent: f32,
    pub y_percent: f32,
}

/// Diagnostic view of a document's first-page header zone.
#[derive(Debug, Clone, Default)]
pub struct HeaderInspection {
    pub page_width: f32,
    pub page_height: f32,
    pub header_spans: Vec<HeaderSpan>,
    pub logo_rects: Vec<Rect>,
}

/// Basic information about a document.
#[derive(Debug, Clone, Copy)]
pub struct DocumentInfo {
    pub page_count: usize,
}

/// Fraction of the page height inspected by [`Redactor::inspect_header`].
const INSPECT_ZONE_FRACTION: f32 = 0.4;

/// Redaction service over a pluggable document backend.
pub struct Redactor {
    backend: Box<dyn DocumentBackend>,
    config: RedactionConfig,
}

impl Redactor {
    /// Creates a service over the given backend and configuration.
    pub fn new(backend: Box<dyn DocumentBackend>, config: RedactionConfig) -> Self {
        Self { backend, config }
    }

    /// Creates a service over the MuPDF backend with default tuning.
    pub fn with_mupdf_backend() -> Self {
        Self::new(Box::new(MuPdfBackend::new()), RedactionConfig::default())
    }

    /// The active configuration.
    pub fn config(&self) -> &RedactionConfig {
        &self.config
    }

    /// Redacts one document.
    ///
    /// Returns the serialized output plus the full audit log, or the fatal
    /// error plus whatever audit entries were accumulated before it.
    pub fn redact(
        &self,
        bytes: &[u8],
        request: &RedactionRequest,
    ) -> Result<RedactionOutcome, RedactionFailure> {
        if request.is_empty() {
            return Err(RedactionFailure {
                error: ShieldError::InvalidInput {
                    parameter: "request".to_string(),
                    reason: "no terms given and no detector enabled".to_string(),
                },
                audit_log: Vec::new(),
            });
        }

        let mut audit = AuditLog::new();
        let result = (|| {
            let mut doc = self.backend.open(bytes)?;
            let mut pipeline = Pipeline::new(&self.config, &mut audit);
            pipeline.run(doc.as_mut(), request)
        })();

        match result {
            Ok((output, stats)) => Ok(RedactionOutcome {
                output,
                audit_log: audit.into_entries(),
                stats,
            }),
            Err(error) => Err(RedactionFailure {
                error,
                audit_log: audit.into_entries(),
            }),
        }
    }

    /// True when the bytes open as a document with at least one page.
    pub fn validate(&self, bytes: &[u8]) -> bool {
        self.document_info(bytes)
            .map(|info| info.page_count > 0)
            .unwrap_or(false)
    }

    /// Opens the document and reports basic information.
    pub fn document_info(&self, bytes: &[u8]) -> ShieldResult<DocumentInfo> {
        let doc = self.backend.open(bytes)?;
        Ok(DocumentInfo {
            page_count: doc.page_count()?,
        })
    }

    /// Inspects the first page's header zone.
    ///
    /// Returns the spans a logo policy would look at together with the
    /// regions the detector currently accepts. Diagnostic only; used to
    /// calibrate [`RedactionConfig`] thresholds against real documents.
    pub fn inspect_header(&self, bytes: &[u8]) -> ShieldResult<HeaderInspection> {
        let mut doc = self.backend.open(bytes)?;
        if doc.page_count()? == 0 {
            return Err(ShieldError::EmptyDocument);
        }
        let page = doc.page(0)?;
        let (width, height) = page.dimensions()?;

        let mut content = crate::content::PageContent::new(width, height);
        content.spans = page.text_spans(None)?;
        content.images = page.images()?;
        let header_clip = Rect::new(0.0, 0.0, width, height * self.config.logo.header_fraction + 10.0);
        content.drawings = page.vector_drawings(Some(header_clip))?;

        let header_spans = content
            .spans
            .iter()
            .filter(|s| s.bbox.y0 <= height * INSPECT_ZONE_FRACTION)
            .map(|s| HeaderSpan {
                text: s.text.clone(),
                bbox: s.bbox,
                font_size: s.font_size,
                color: s.color,
                flags: s.flags,
                font_name: s.font_name.clone(),
                x_percent: s.bbox.x0 / width * 100.0,
                y_percent: s.bbox.y0 / height * 100.0,
            })
            .collect();

        let candidates = LogoDetector::new(self.config.logo.clone()).detect(&content, &[]);
        let deduped = remove_duplicate_overlaps(candidates);
        let rects: Vec<Rect> = deduped.iter().map(|c| c.rect).collect();
        let logo_rects = merge_by_proximity(&rects, self.config.merge_tolerance);

        Ok(HeaderInspection {
            page_width: width,
            page_height: height,
            header_spans,
            logo_rects,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_detection() {
        assert!(RedactionRequest::default().is_empty());
        assert!(RedactionRequest {
            terms: vec!["  ".to_string()],
            ..Default::default()
        }
        .is_empty());
        assert!(!RedactionRequest {
            redact_numbers: true,
            ..Default::default()
        }
        .is_empty());
    }

    #[test]
    fn test_empty_request_rejected_before_opening() {
        let redactor = Redactor::with_mupdf_backend();
        let err = redactor
            .redact(b"not a pdf", &RedactionRequest::default())
            .unwrap_err();
        assert!(matches!(err.error, ShieldError::InvalidInput { .. }));
        assert!(err.audit_log.is_empty());
    }
}
