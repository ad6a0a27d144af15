//! Sensitive-content redaction engine for paginated documents.
//!
//! Given the raw content of each page (text spans with style metadata,
//! image placements, vector drawing boxes), this library decides which
//! regions constitute sensitive content, consolidates overlapping
//! detections and applies a redaction plan through a pluggable document
//! backend. Three detector families are provided:
//!
//! - **Terms**: exact, case-insensitive occurrences of user-supplied terms
//! - **Currency**: monetary amounts, with date/address/contact exclusions
//! - **Logos**: header-zone images, vector marks and company-name text
//!
//! File parsing, rendering and serialization are delegated to the
//! [`backend`] traits; a MuPDF implementation ships with the crate. Every
//! run produces a human-readable audit log alongside the output bytes.
//!
//! # Quick Start
//!
//! ```no_run
//! use docshield::{RedactionRequest, Redactor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let redactor = Redactor::with_mupdf_backend();
//! let input = std::fs::read("invoice.pdf")?;
//!
//! let outcome = redactor.redact(
//!     &input,
//!     &RedactionRequest {
//!         terms: vec!["Acme".to_string()],
//!         redact_logos: true,
//!         redact_numbers: true,
//!     },
//! )?;
//!
//! std::fs::write("invoice_redacted.pdf", &outcome.output)?;
//! for entry in &outcome.audit_log {
//!     println!("{}", entry);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Architecture
//!
//! - [`geometry`]: the [`Rect`](geometry::Rect) value type all detection is
//!   expressed in
//! - [`content`]: raw page primitives supplied by the extractor
//! - [`domain`]: the detectors and the region consolidator
//! - [`config`]: every tuning constant, with documented defaults
//! - [`redaction`]: the per-document pipeline state machine and the
//!   [`Redactor`] facade
//! - [`backend`]: the document backend boundary and the MuPDF adapter
//! - [`error`]: terminal error taxonomy

pub mod backend;
pub mod config;
pub mod content;
pub mod domain;
pub mod error;
pub mod geometry;
pub mod redaction;

// Re-exports for convenient access
pub use backend::{DocumentBackend, DocumentOps, MuPdfBackend, PageOps, RedactionRegion};
pub use config::{LogoConfig, PlaceholderStyle, RedactionConfig, ScoreWeights, TextLogoPolicy};
pub use content::{ImagePlacement, PageContent, TextSpan, VectorDrawing};
pub use domain::{CandidateRegion, CurrencyDetector, LogoDetector, RegionSource, TermMatcher};
pub use error::{ShieldError, ShieldResult};
pub use geometry::Rect;
pub use redaction::{
    AuditLog, DocumentInfo, HeaderInspection, HeaderSpan, RedactionFailure, RedactionOutcome,
    RedactionRequest, Redactor, RunStats,
};
