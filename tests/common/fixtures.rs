//! Fixture PDFs for CLI integration tests.
//!
//! Builds small invoice-like documents with printpdf: a header line where
//! a letterhead would sit, body lines, and amount rows.

use anyhow::Result;
use printpdf::*;
use std::fs;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

/// Builder for test PDFs with invoice-shaped content.
#[derive(Debug, Clone)]
pub struct TestPdfBuilder {
    title: String,
    header_lines: Vec<String>,
    body_lines: Vec<String>,
    page_width: Mm,
    page_height: Mm,
}

impl TestPdfBuilder {
    pub fn new() -> Self {
        Self {
            title: "Test Document".to_string(),
            header_lines: Vec::new(),
            body_lines: Vec::new(),
            page_width: Mm(210.0),
            page_height: Mm(297.0),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = title.to_string();
        self
    }

    /// Adds a line to the letterhead area at the top of the page.
    pub fn with_header_line(mut self, line: &str) -> Self {
        self.header_lines.push(line.to_string());
        self
    }

    /// Adds a body line (content, amounts, contact details).
    pub fn with_line(mut self, line: &str) -> Self {
        self.body_lines.push(line.to_string());
        self
    }

    /// Builds the PDF and writes it to the specified path.
    pub fn build(self, output_path: &Path) -> Result<PathBuf> {
        let (doc, page1, layer1) =
            PdfDocument::new(&self.title, self.page_width, self.page_height, "Layer 1");
        let current_layer = doc.get_page(page1).get_layer(layer1);
        let font = doc.add_builtin_font(BuiltinFont::Helvetica)?;
        let bold = doc.add_builtin_font(BuiltinFont::HelveticaBold)?;

        // Header lines sit in the top ~10% of the page.
        let mut y = Mm(285.0);
        for line in &self.header_lines {
            current_layer.use_text(line, 16.0, Mm(20.0), y, &bold);
            y = Mm(y.0 - 8.0);
        }

        let mut y = Mm(240.0);
        for line in &self.body_lines {
            current_layer.use_text(line, 11.0, Mm(20.0), y, &font);
            y = Mm(y.0 - 7.0);
        }

        doc.save(&mut BufWriter::new(fs::File::create(output_path)?))?;
        Ok(output_path.to_path_buf())
    }
}

impl Default for TestPdfBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Quick helper: a one-page invoice with a letterhead and amounts.
pub fn create_invoice(path: &Path, company: &str) -> Result<PathBuf> {
    TestPdfBuilder::new()
        .with_title("Invoice")
        .with_header_line(company)
        .with_line("Invoice No 2024-0042")
        .with_line("Consulting services")
        .with_line("Subtotal 1.200,00")
        .with_line("Total: 1.428,00")
        .build(path)
}

/// Structural validity check on a written fixture.
pub fn is_valid_pdf(path: &Path) -> bool {
    ::lopdf::Document::load(path).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invoice_fixture_builds_valid_pdf() -> Result<()> {
        let temp_dir = TempDir::new()?;
        let pdf_path = temp_dir.path().join("invoice.pdf");
        create_invoice(&pdf_path, "Acme Solutions GmbH")?;
        assert!(pdf_path.exists());
        assert!(is_valid_pdf(&pdf_path));
        Ok(())
    }
}
