pub mod error;
pub mod extraction;
pub mod layout;
pub mod model;
pub mod parsing;
pub mod trace;

use error::RosterError;
use extraction::{Document, ExtractionMode, PageContent, PdfExtractor};
use layout::schema::LayoutDef;
use parsing::RosterExtraction;
use std::path::Path;

#[derive(Debug, Clone, Default)]
pub struct ExtractOptions {
    pub mode: ExtractionMode,
}

/// Main API entry point: extract duty assignments from a roster PDF.
///
/// Records come back in document order (table, service row, date column,
/// then person within a cell) together with a trace of every table,
/// service row and cell that was considered.
pub fn extract_pdf(
    pdf_bytes: &[u8],
    extractor: &dyn PdfExtractor,
    layout: &LayoutDef,
    options: &ExtractOptions,
) -> Result<RosterExtraction, RosterError> {
    let pages = extractor.extract_pages(pdf_bytes)?;
    let mut result = extract_pages(&pages, layout, options)?;
    result.trace.backend = extractor.backend_name().to_string();
    Ok(result)
}

/// Same as [`extract_pdf`], reading the PDF from disk.
pub fn extract_file(
    path: &Path,
    extractor: &dyn PdfExtractor,
    layout: &LayoutDef,
    options: &ExtractOptions,
) -> Result<RosterExtraction, RosterError> {
    let bytes = std::fs::read(path)?;
    extract_pdf(&bytes, extractor, layout, options)
}

/// Run the pipeline on pages that were already extracted.
pub fn extract_pages(
    pages: &[PageContent],
    layout: &LayoutDef,
    options: &ExtractOptions,
) -> Result<RosterExtraction, RosterError> {
    let doc = Document::from_pages(pages, options.mode);
    log::debug!(
        "{} page(s), {} unit(s), mode {:?}",
        pages.len(),
        doc.units.len(),
        doc.mode
    );
    parsing::parse_roster(&doc, layout)
}
