pub mod pdftotext;

use crate::error::RosterError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
}

impl BBox {
    pub fn width(&self) -> f32 {
        (self.x_max - self.x_min).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y_max - self.y_min).max(0.0)
    }
}

/// A trimmed line of text. `leading_spaces` keeps the indentation the
/// loader saw, which hints at skipped (empty) cells.
#[derive(Debug, Clone)]
pub struct TextLine {
    pub page_number: usize,
    pub line_index: usize,
    pub text: String,
    pub leading_spaces: usize,
}

impl TextLine {
    pub fn from_raw(page_number: usize, line_index: usize, raw: &str) -> Self {
        let leading_spaces = raw.chars().take_while(|c| *c == ' ').count();
        TextLine {
            page_number,
            line_index,
            text: raw.trim().to_string(),
            leading_spaces,
        }
    }
}

/// A positioned run of text. Coordinates grow rightwards and downwards.
#[derive(Debug, Clone)]
pub struct Fragment {
    pub page_number: usize,
    pub text: String,
    pub bbox: BBox,
    pub font_size: f32,
}

impl Fragment {
    pub fn x(&self) -> f32 {
        self.bbox.x_min
    }

    pub fn y(&self) -> f32 {
        self.bbox.y_min
    }
}

/// Content extracted from a single page of a PDF.
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    pub page_number: usize,
    pub lines: Vec<TextLine>,
    pub fragments: Vec<Fragment>,
}

/// Trait for PDF text extraction backends.
pub trait PdfExtractor: Send + Sync {
    /// Extract content from PDF bytes, returning one PageContent per page.
    fn extract_pages(&self, pdf_bytes: &[u8]) -> Result<Vec<PageContent>, RosterError>;

    /// Name of this extraction backend (for diagnostics).
    fn backend_name(&self) -> &str;
}

/// Which text representation drives column assignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExtractionMode {
    /// Geometric when the loader produced positioned fragments, lines otherwise.
    #[default]
    Auto,
    Lines,
    Geometric,
}

impl std::str::FromStr for ExtractionMode {
    type Err = RosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "auto" => Ok(ExtractionMode::Auto),
            "lines" | "line" => Ok(ExtractionMode::Lines),
            "geometric" | "geo" => Ok(ExtractionMode::Geometric),
            other => Err(RosterError::ParseError(format!(
                "unknown extraction mode '{other}' (expected auto, lines or geometric)"
            ))),
        }
    }
}

/// A single unit of the loader's output, in document order.
#[derive(Debug, Clone)]
pub enum TextUnit {
    Line(TextLine),
    Fragment(Fragment),
}

impl TextUnit {
    pub fn text(&self) -> &str {
        match self {
            TextUnit::Line(l) => &l.text,
            TextUnit::Fragment(f) => &f.text,
        }
    }

    pub fn page_number(&self) -> usize {
        match self {
            TextUnit::Line(l) => l.page_number,
            TextUnit::Fragment(f) => f.page_number,
        }
    }

    pub fn as_fragment(&self) -> Option<&Fragment> {
        match self {
            TextUnit::Fragment(f) => Some(f),
            TextUnit::Line(_) => None,
        }
    }

    pub fn as_line(&self) -> Option<&TextLine> {
        match self {
            TextUnit::Line(l) => Some(l),
            TextUnit::Fragment(_) => None,
        }
    }
}

/// The flattened unit stream of a whole document in one resolved mode.
#[derive(Debug, Clone)]
pub struct Document {
    pub mode: ExtractionMode,
    pub units: Vec<TextUnit>,
}

impl Document {
    /// Flatten pages into one stream, resolving `Auto` to a concrete mode.
    ///
    /// Empty (whitespace-only) fragments are dropped; lines are kept because
    /// blank lines can stand for empty cells in line mode.
    pub fn from_pages(pages: &[PageContent], requested: ExtractionMode) -> Document {
        let has_fragments = pages.iter().any(|p| !p.fragments.is_empty());
        let mode = match requested {
            ExtractionMode::Auto if has_fragments => ExtractionMode::Geometric,
            ExtractionMode::Auto => ExtractionMode::Lines,
            other => other,
        };

        let units = match mode {
            ExtractionMode::Geometric => pages
                .iter()
                .flat_map(|p| p.fragments.iter())
                .filter(|f| !f.text.trim().is_empty())
                .cloned()
                .map(TextUnit::Fragment)
                .collect(),
            _ => pages
                .iter()
                .flat_map(|p| p.lines.iter())
                .cloned()
                .map(TextUnit::Line)
                .collect(),
        };

        Document { mode, units }
    }

    pub fn is_geometric(&self) -> bool {
        self.mode == ExtractionMode::Geometric
    }

    pub fn has_text(&self) -> bool {
        self.units.iter().any(|u| !u.text().trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fragment(page: usize, text: &str) -> Fragment {
        Fragment {
            page_number: page,
            text: text.into(),
            bbox: BBox {
                x_min: 0.0,
                y_min: 0.0,
                x_max: 10.0,
                y_max: 8.0,
            },
            font_size: 8.0,
        }
    }

    #[test]
    fn test_text_line_keeps_indent() {
        let line = TextLine::from_raw(1, 0, "      CB LIMA  ");
        assert_eq!(line.text, "CB LIMA");
        assert_eq!(line.leading_spaces, 6);
    }

    #[test]
    fn test_auto_prefers_fragments() {
        let pages = vec![PageContent {
            page_number: 1,
            lines: vec![TextLine::from_raw(1, 0, "DATA")],
            fragments: vec![fragment(1, "DATA"), fragment(1, "  ")],
        }];
        let doc = Document::from_pages(&pages, ExtractionMode::Auto);
        assert!(doc.is_geometric());
        assert_eq!(doc.units.len(), 1);

        let doc = Document::from_pages(&pages, ExtractionMode::Lines);
        assert_eq!(doc.mode, ExtractionMode::Lines);
        assert!(doc.units[0].as_line().is_some());
    }

    #[test]
    fn test_auto_without_fragments_uses_lines() {
        let pages = vec![PageContent {
            page_number: 1,
            lines: vec![TextLine::from_raw(1, 0, "DATA")],
            fragments: vec![],
        }];
        let doc = Document::from_pages(&pages, ExtractionMode::Auto);
        assert_eq!(doc.mode, ExtractionMode::Lines);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("GEO".parse::<ExtractionMode>().unwrap(), ExtractionMode::Geometric);
        assert!("grid".parse::<ExtractionMode>().is_err());
    }
}
