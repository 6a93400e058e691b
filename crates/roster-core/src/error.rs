use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum RosterError {
    #[error("PDF extraction failed: {0}")]
    Extraction(String),

    #[error("pdftotext not found. Install poppler: brew install poppler (macOS) or apt install poppler-utils (Linux)")]
    PdftotextNotFound,

    #[error("pdftotext failed with exit code {code}: {stderr}")]
    PdftotextFailed { code: i32, stderr: String },

    #[error("failed to read pdftotext layout output: {0}")]
    Xml(String),

    #[error("failed to parse roster: {0}")]
    ParseError(String),

    #[error("no roster table found ({markers} header marker(s), {dropped} without resolvable dates)")]
    NoTables { markers: usize, dropped: usize },

    #[error("failed to load layout from {path}: {reason}")]
    LayoutLoad { path: PathBuf, reason: String },

    #[error("invalid layout: {0}")]
    LayoutInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<quick_xml::Error> for RosterError {
    fn from(e: quick_xml::Error) -> Self {
        RosterError::Xml(e.to_string())
    }
}
