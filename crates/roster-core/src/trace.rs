use crate::extraction::ExtractionMode;
use crate::model::{ColumnKey, PersonCandidate, Rank};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const TRACE_SCHEMA_VERSION: &str = "1.0";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TraceSeverity {
    Critical,
    Important,
    Info,
}

/// Why a piece of text did not become (part of) a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RejectionReason {
    EmptyName,
    TooShort,
    TooLong,
    ContainsDigit,
    InvalidCharacters,
    NoiseToken,
    /// Rankless text at the start of a cell with no pending name to extend.
    UnmatchedContinuation,
    /// A fragment inside a row band that fits no column.
    UnassignableFragment,
    /// A fragment equally close to two columns.
    AmbiguousColumn,
    /// A line past the last column of a service row.
    ExtraLine,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableTrace {
    pub table_index: usize,
    pub page_number: usize,
    pub anchor_unit: usize,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<ColumnKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback: Option<f32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceTrace {
    pub table_index: usize,
    pub service: String,
    pub page_number: usize,
    pub anchor_unit: usize,
    pub row_start: usize,
    pub row_end: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TracePerson {
    pub rank: Option<Rank>,
    pub name: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub from_continuation: bool,
}

impl From<&PersonCandidate> for TracePerson {
    fn from(p: &PersonCandidate) -> Self {
        TracePerson {
            rank: p.rank,
            name: p.name.clone(),
            from_continuation: p.from_continuation,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CellTrace {
    pub table_index: usize,
    pub service: String,
    pub column: usize,
    pub date: NaiveDate,
    pub raw_text: String,
    pub people: Vec<TracePerson>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceRejection {
    pub table_index: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column: Option<usize>,
    pub text: String,
    pub reason: RejectionReason,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TraceWarning {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_index: Option<usize>,
    pub message: String,
    pub severity: TraceSeverity,
}

/// Diagnostic record of one extraction run: what was detected at each stage
/// and what was thrown away.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractionTrace {
    pub trace_schema_version: String,
    pub backend: String,
    pub mode: ExtractionMode,
    pub tables: Vec<TableTrace>,
    pub services: Vec<ServiceTrace>,
    pub cells: Vec<CellTrace>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejections: Vec<TraceRejection>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<TraceWarning>,
}

impl Default for ExtractionTrace {
    fn default() -> Self {
        Self {
            trace_schema_version: TRACE_SCHEMA_VERSION.to_string(),
            backend: String::new(),
            mode: ExtractionMode::Auto,
            tables: Vec::new(),
            services: Vec::new(),
            cells: Vec::new(),
            rejections: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ExtractionTrace {
    pub fn new(mode: ExtractionMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    pub fn warn(&mut self, table_index: Option<usize>, severity: TraceSeverity, message: String) {
        self.warnings.push(TraceWarning {
            table_index,
            message,
            severity,
        });
    }

    pub fn reject(
        &mut self,
        table_index: usize,
        service: Option<&str>,
        column: Option<usize>,
        text: &str,
        reason: RejectionReason,
    ) {
        self.rejections.push(TraceRejection {
            table_index,
            service: service.map(str::to_string),
            column,
            text: text.to_string(),
            reason,
        });
    }

    pub fn rejections_for(&self, reason: RejectionReason) -> impl Iterator<Item = &TraceRejection> {
        self.rejections.iter().filter(move |r| r.reason == reason)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_trace_serializes_without_empty_lists() {
        let trace = ExtractionTrace::new(ExtractionMode::Lines);
        let json = serde_json::to_value(&trace).unwrap();
        assert_eq!(json["trace_schema_version"], TRACE_SCHEMA_VERSION);
        assert_eq!(json["mode"], "lines");
        assert!(json.get("rejections").is_none());
        assert!(json.get("warnings").is_none());
    }

    #[test]
    fn test_reject_and_filter() {
        let mut trace = ExtractionTrace::default();
        trace.reject(0, Some("ADJUNTO"), Some(2), "DA", RejectionReason::NoiseToken);
        trace.reject(0, None, None, "X", RejectionReason::UnassignableFragment);
        assert_eq!(trace.rejections_for(RejectionReason::NoiseToken).count(), 1);

        let json = serde_json::to_value(&trace.rejections[1]).unwrap();
        assert_eq!(json["reason"], "unassignable_fragment");
        assert!(json.get("service").is_none());
    }
}
