//! The per-document redaction pipeline.
//!
//! Drives one document through the state machine
//! `Idle → Opened → Page{Extracting → Detecting → Consolidating →
//! Annotating → PlacingPlaceholders} → Saved`, with `Failed` reachable
//! from any state. Failure recovery is expressed as values: every
//! extraction call and detector stage runs through [`Pipeline::recover`],
//! which converts an error into an audit warning plus an empty result, so
//! the only errors that propagate out of [`Pipeline::run`] are the fatal
//! ones (open, empty document, serialization).

use super::audit::AuditLog;
use super::RedactionRequest;
use crate::backend::{DocumentOps, RedactionRegion};
use crate::config::RedactionConfig;
use crate::content::PageContent;
use crate::domain::{
    merge_by_proximity, remove_duplicate_overlaps, CandidateRegion, CurrencyDetector,
    LogoDetector, RegionSource, TermMatcher,
};
use crate::error::{ShieldError, ShieldResult};
use crate::geometry::Rect;

/// Stage of one page's processing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStage {
    Extracting,
    Detecting,
    Consolidating,
    Annotating,
    PlacingPlaceholders,
}

/// Pipeline run state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    Opened,
    Page { index: usize, stage: PageStage },
    Saved,
    Failed,
}

/// Counters accumulated over one run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RunStats {
    pub pages_processed: usize,
    /// Pages where at least one redaction was applied.
    pub pages_modified: usize,
    pub terms_applied: usize,
    pub currency_applied: usize,
    pub logos_applied: usize,
}

impl RunStats {
    /// Total applied regions across all classes.
    pub fn total_applied(&self) -> usize {
        self.terms_applied + self.currency_applied + self.logos_applied
    }

    /// True if any redactions were applied.
    pub fn has_redactions(&self) -> bool {
        self.total_applied() > 0
    }
}

/// One-document orchestrator.
pub struct Pipeline<'a> {
    config: &'a RedactionConfig,
    audit: &'a mut AuditLog,
    state: RunState,
    stats: RunStats,
}

impl<'a> Pipeline<'a> {
    pub fn new(config: &'a RedactionConfig, audit: &'a mut AuditLog) -> Self {
        Self {
            config,
            audit,
            state: RunState::Idle,
            stats: RunStats::default(),
        }
    }

    /// Current state, for inspection after a run.
    pub fn state(&self) -> RunState {
        self.state
    }

    /// Processes every page of an open document and serializes the result.
    pub fn run(
        &mut self,
        doc: &mut dyn DocumentOps,
        request: &RedactionRequest,
    ) -> ShieldResult<(Vec<u8>, RunStats)> {
        let page_count = match doc.page_count() {
            Ok(count) => count,
            Err(err) => {
                self.state = RunState::Failed;
                return Err(err);
            }
        };
        if page_count == 0 {
            self.audit.info("document has no pages; nothing to process");
            self.state = RunState::Failed;
            return Err(ShieldError::EmptyDocument);
        }

        self.state = RunState::Opened;
        self.audit
            .info(format!("processing document with {} page(s)", page_count));

        for index in 0..page_count {
            self.process_page(doc, index, request);
        }

        let bytes = match doc.serialize() {
            Ok(bytes) => bytes,
            Err(err) => {
                self.audit
                    .error(format!("final serialization failed: {}", err));
                self.state = RunState::Failed;
                return Err(err);
            }
        };
        self.state = RunState::Saved;
        self.audit.info(format!(
            "finished: {} redaction(s) across {} of {} page(s)",
            self.stats.total_applied(),
            self.stats.pages_modified,
            self.stats.pages_processed
        ));
        Ok((bytes, self.stats))
    }

    fn enter(&mut self, index: usize, stage: PageStage) {
        log::debug!("page {}: entering {:?}", index + 1, stage);
        self.state = RunState::Page { index, stage };
    }

    /// Converts a stage failure into a warning plus an empty result.
    fn recover<T: Default>(&mut self, page_number: usize, what: &str, result: ShieldResult<T>) -> T {
        match result {
            Ok(value) => value,
            Err(err) => {
                self.audit
                    .warn(format!("{} failed on page {}: {}", what, page_number, err));
                T::default()
            }
        }
    }

    fn process_page(&mut self, doc: &mut dyn DocumentOps, index: usize, request: &RedactionRequest) {
        let page_number = index + 1;
        self.stats.pages_processed += 1;
        self.enter(index, PageStage::Extracting);
        self.audit.page_marker(page_number);

        let mut page = match doc.page(index) {
            Ok(page) => page,
            Err(err) => {
                self.audit
                    .warn(format!("failed to load page {}; skipping: {}", page_number, err));
                return;
            }
        };
        let (width, height) = match page.dimensions() {
            Ok(dims) => dims,
            Err(err) => {
                self.audit.warn(format!(
                    "failed to read dimensions of page {}; skipping: {}",
                    page_number, err
                ));
                return;
            }
        };

        let mut content = PageContent::new(width, height);
        if request.redact_numbers || request.redact_logos {
            let spans = page.text_spans(None);
            content.spans = self.recover(page_number, "text extraction", spans);
        }
        if request.redact_logos {
            let images = page.images();
            content.images = self.recover(page_number, "image enumeration", images);

            let header_clip = Rect::new(
                0.0,
                0.0,
                width,
                height * self.config.logo.header_fraction + 10.0,
            );
            let drawings = page.vector_drawings(Some(header_clip));
            content.drawings = self.recover(page_number, "drawing enumeration", drawings);
        }

        self.enter(index, PageStage::Detecting);
        let (term_candidates, term_warnings) = TermMatcher::new().detect(&*page, &request.terms);
        for warning in term_warnings {
            self.audit.warn(warning);
        }
        if !term_candidates.is_empty() {
            self.audit.info(format!(
                "found {} user term occurrence(s)",
                term_candidates.len()
            ));
        }

        let currency_candidates = if request.redact_numbers {
            CurrencyDetector::new().detect(&content)
        } else {
            Vec::new()
        };
        let logo_candidates = if request.redact_logos {
            let detector = LogoDetector::new(self.config.logo.clone());
            detector.detect(&content, &request.terms)
        } else {
            Vec::new()
        };
        for candidate in &logo_candidates {
            self.audit.info(format!(
                "logo candidate ({}) at ({:.1}, {:.1})-({:.1}, {:.1})",
                candidate.source.tag(),
                candidate.rect.x0,
                candidate.rect.y0,
                candidate.rect.x1,
                candidate.rect.y1
            ));
        }

        self.enter(index, PageStage::Consolidating);
        let currency_regions = remove_duplicate_overlaps(currency_candidates);
        if !currency_regions.is_empty() {
            self.audit.info(format!(
                "found {} currency value(s)",
                currency_regions.len()
            ));
        }
        let logo_regions = self.consolidate_logos(logo_candidates);
        if !logo_regions.is_empty() {
            self.audit.info(format!(
                "consolidated logo candidates into {} region(s)",
                logo_regions.len()
            ));
        }

        self.enter(index, PageStage::Annotating);
        let mut regions = Vec::new();
        let mut term_count = 0usize;
        let mut currency_count = 0usize;
        for candidate in &term_candidates {
            term_count += 1;
            regions.push(RedactionRegion {
                rect: candidate.rect,
                fill: self.config.text_fill,
                replacement: Some(TermMatcher::replacement_for(&candidate.rect)),
            });
        }
        for candidate in &currency_regions {
            currency_count += 1;
            regions.push(RedactionRegion {
                rect: candidate.rect,
                fill: self.config.text_fill,
                replacement: Some(self.config.currency_replacement.clone()),
            });
        }
        for candidate in &logo_regions {
            regions.push(RedactionRegion {
                rect: candidate.rect,
                fill: self.config.logo_fill,
                replacement: None,
            });
        }

        if regions.is_empty() {
            self.audit
                .info(format!("nothing to redact on page {}", page_number));
            return;
        }

        match page.apply_redactions(&regions) {
            Ok(applied) => {
                self.audit.info(format!(
                    "applied {} redaction(s) on page {}",
                    applied, page_number
                ));
                self.stats.pages_modified += 1;
                self.stats.terms_applied += term_count;
                self.stats.currency_applied += currency_count;
                self.stats.logos_applied += logo_regions.len();
            }
            Err(err) => {
                // The page's plan is considered unapplied; the batch goes on.
                self.audit.error(format!(
                    "failed to apply redactions on page {}: {}",
                    page_number, err
                ));
                return;
            }
        }

        if request.redact_logos && self.config.draw_placeholders && !logo_regions.is_empty() {
            self.enter(index, PageStage::PlacingPlaceholders);
            for region in &logo_regions {
                match page.draw_placeholder(
                    region.rect,
                    &self.config.placeholder.label,
                    &self.config.placeholder,
                ) {
                    Ok(()) => self
                        .audit
                        .info(format!("added logo placeholder on page {}", page_number)),
                    Err(err) => self.audit.warn(format!(
                        "placeholder drawing failed on page {}: {}",
                        page_number, err
                    )),
                }
            }
        }
    }

    /// Full consolidation for the logo family: duplicate-overlap removal
    /// across strategies, then proximity merging into covering regions.
    fn consolidate_logos(&self, candidates: Vec<CandidateRegion>) -> Vec<CandidateRegion> {
        if candidates.is_empty() {
            return Vec::new();
        }
        let deduped = remove_duplicate_overlaps(candidates);
        let rects: Vec<Rect> = deduped.iter().map(|c| c.rect).collect();
        let merged = merge_by_proximity(&rects, self.config.merge_tolerance);

        merged
            .into_iter()
            .map(|rect| {
                // Tag the merged region with its strongest contributor.
                let source = deduped
                    .iter()
                    .filter(|c| !rect.intersect(&c.rect).is_empty())
                    .min_by_key(|c| c.priority)
                    .map(|c| c.source)
                    .unwrap_or(RegionSource::Image);
                CandidateRegion::new(rect, source, 1)
            })
            .collect()
    }
}
