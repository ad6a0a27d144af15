//! Document redaction CLI.
//!
//! Command-line interface for the docshield library: redacts user terms,
//! currency values and logo elements from PDF documents, with validation
//! and header-inspection subcommands for diagnostics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use docshield::{RedactionRequest, Redactor, TextLogoPolicy};

/// Document Redaction Tool
///
/// Removes sensitive content from PDF documents: user-specified terms,
/// currency values and logo elements. By default, performs redaction; use
/// the subcommands for validation and header inspection.
#[derive(Parser)]
#[command(name = "docshield")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Input PDF file path
    #[arg(short, long, value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output PDF file path
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Terms to redact (can be specified multiple times)
    #[arg(short, long, value_name = "TERM")]
    term: Vec<String>,

    /// Detect and remove logo elements from page headers
    #[arg(long)]
    logos: bool,

    /// Detect and mask currency/number values
    #[arg(long)]
    numbers: bool,

    /// Use the weighted style score for text logos instead of the
    /// company-token pattern list
    #[arg(long, requires = "logos")]
    score_policy: bool,

    /// Skip drawing placeholders where logos were removed
    #[arg(long, requires = "logos")]
    no_placeholders: bool,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that a file opens as a document with at least one page
    Validate {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },

    /// Show first-page header spans and detected logo regions
    ///
    /// Diagnostic view for tuning detector thresholds.
    InspectHeader {
        /// Input PDF file path
        #[arg(short, long, value_name = "FILE")]
        input: PathBuf,
    },
}

/// Command handler owning the configured redaction service.
struct ShieldHandler {
    redactor: Redactor,
    verbose: bool,
}

impl ShieldHandler {
    fn new(cli: &Cli) -> Self {
        let mut config = docshield::RedactionConfig::default();
        if cli.score_policy {
            config = config.with_text_policy(TextLogoPolicy::WeightedScore);
        }
        if cli.no_placeholders {
            config = config.without_placeholders();
        }
        Self {
            redactor: Redactor::new(Box::new(docshield::MuPdfBackend::new()), config),
            verbose: cli.verbose,
        }
    }

    /// Executes a redaction run and writes the output document.
    fn redact(&self, input: &Path, output: &Path, request: &RedactionRequest) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        if request.is_empty() {
            anyhow::bail!("Nothing to redact. Use --term, --logos, or --numbers.");
        }

        if self.verbose {
            println!("Input:  {}", input.display());
            println!("Output: {}", output.display());
            println!("Terms:  {}", request.terms.len());
            println!("Logos:  {}", request.redact_logos);
            println!("Numbers: {}", request.redact_numbers);
        }

        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let outcome = match self.redactor.redact(&bytes, request) {
            Ok(outcome) => outcome,
            Err(failure) => {
                for entry in &failure.audit_log {
                    eprintln!("{}", entry);
                }
                return Err(failure.error).with_context(|| "Redaction failed");
            }
        };

        std::fs::write(output, &outcome.output)
            .with_context(|| format!("Failed to write {}", output.display()))?;

        if self.verbose {
            println!("\nAudit log:");
            for entry in &outcome.audit_log {
                println!("  {}", entry);
            }
            println!("\nRedaction Summary:");
            println!("  Pages processed: {}", outcome.stats.pages_processed);
            println!("  Pages modified:  {}", outcome.stats.pages_modified);
            println!("  Terms:           {}", outcome.stats.terms_applied);
            println!("  Currency values: {}", outcome.stats.currency_applied);
            println!("  Logo regions:    {}", outcome.stats.logos_applied);
        }

        if outcome.stats.has_redactions() {
            println!(
                "✓ Applied {} redaction(s) → {}",
                outcome.stats.total_applied(),
                output.display()
            );
        } else {
            println!("⚠ No sensitive content found to redact");
        }

        Ok(())
    }

    fn validate(&self, input: &Path) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        if self.redactor.validate(&bytes) {
            let info = self.redactor.document_info(&bytes)?;
            println!("✓ Valid document with {} page(s)", info.page_count);
            Ok(())
        } else {
            anyhow::bail!("Invalid or empty document: {}", input.display());
        }
    }

    fn inspect_header(&self, input: &Path) -> Result<()> {
        if !input.exists() {
            anyhow::bail!("Input file does not exist: {}", input.display());
        }
        let bytes = std::fs::read(input)
            .with_context(|| format!("Failed to read {}", input.display()))?;

        let inspection = self
            .redactor
            .inspect_header(&bytes)
            .with_context(|| "Header inspection failed")?;

        println!(
            "Page: {:.1} x {:.1}",
            inspection.page_width, inspection.page_height
        );
        println!("Header spans ({}):", inspection.header_spans.len());
        for span in &inspection.header_spans {
            println!(
                "  '{}' size {:.1} at ({:.1}%, {:.1}%) bbox ({:.1}, {:.1})-({:.1}, {:.1})",
                span.text,
                span.font_size,
                span.x_percent,
                span.y_percent,
                span.bbox.x0,
                span.bbox.y0,
                span.bbox.x1,
                span.bbox.y1
            );
        }
        println!("Detected logo regions ({}):", inspection.logo_rects.len());
        for rect in &inspection.logo_rects {
            println!(
                "  ({:.1}, {:.1})-({:.1}, {:.1})",
                rect.x0, rect.y0, rect.x1, rect.y1
            );
        }

        Ok(())
    }
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let handler = ShieldHandler::new(&cli);

    match &cli.command {
        Some(Commands::Validate { input }) => {
            handler.validate(input)?;
        }
        Some(Commands::InspectHeader { input }) => {
            handler.inspect_header(input)?;
        }
        None => {
            let input = cli
                .input
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--input is required"))?;
            let output = cli
                .output
                .as_ref()
                .ok_or_else(|| anyhow::anyhow!("--output is required"))?;

            let request = RedactionRequest {
                terms: cli.term.clone(),
                redact_logos: cli.logos,
                redact_numbers: cli.numbers,
            };
            handler.redact(input, output, &request)?;
        }
    }

    Ok(())
}
