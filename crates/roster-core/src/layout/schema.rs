use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Vocabulary and tuning for one family of roster documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    /// First word of the unit that opens a table's date header.
    pub header_marker: String,
    /// Date columns per table; header collection stops once reached.
    #[serde(default = "default_max_columns")]
    pub max_columns: usize,
    /// Lowercase month abbreviation -> month number.
    pub months: BTreeMap<String, u32>,
    /// Service-name patterns, matched as substrings.
    pub services: Vec<String>,
    /// Qualifier lines merged into the preceding service name.
    #[serde(default)]
    pub complements: Vec<String>,
    /// Lines that are table furniture (weekday headings, titles).
    #[serde(default)]
    pub boundary_markers: Vec<String>,
    /// Words skipped wherever they appear in a cell.
    #[serde(default)]
    pub noise_words: Vec<String>,
    /// Whole names that are structural rather than people.
    #[serde(default)]
    pub noise_names: Vec<String>,
    #[serde(default)]
    pub names: NameRules,
    #[serde(default)]
    pub header_lookahead: HeaderLookahead,
    #[serde(default)]
    pub geometry: GeometryTuning,
    #[serde(default)]
    pub line_mode: LineModeOptions,
}

fn default_max_columns() -> usize {
    7
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NameRules {
    pub min_length: usize,
    pub max_length: usize,
    /// A single-word name at least this long may continue in the next cell.
    pub continuation_min_length: usize,
}

impl Default for NameRules {
    fn default() -> Self {
        NameRules {
            min_length: 2,
            max_length: 50,
            continuation_min_length: 3,
        }
    }
}

/// How far past a header marker dates are searched for.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderLookahead {
    pub lines: usize,
    pub fragments: usize,
}

impl Default for HeaderLookahead {
    fn default() -> Self {
        HeaderLookahead {
            lines: 3,
            fragments: 50,
        }
    }
}

/// Geometric column bucketing and row banding, in page units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeometryTuning {
    /// Column tolerance as a fraction of the narrowest inter-column gap.
    pub column_tolerance_ratio: f32,
    /// Nearest-column fallback bound as a fraction of the same gap.
    pub fallback_ratio: f32,
    /// Used when a table has fewer than two distinct column anchors.
    pub default_tolerance: f32,
    pub default_fallback: f32,
    /// Max vertical distance between a service label and its complement.
    pub complement_y_tolerance: f32,
    /// Cell content is looked for at most this far below a service label.
    pub max_row_height: f32,
    /// ... and at most this far above it.
    pub row_slack: f32,
}

impl Default for GeometryTuning {
    fn default() -> Self {
        GeometryTuning {
            column_tolerance_ratio: 0.45,
            fallback_ratio: 1.0,
            default_tolerance: 40.0,
            default_fallback: 100.0,
            complement_y_tolerance: 20.0,
            max_row_height: 60.0,
            row_slack: 2.0,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LineModeOptions {
    /// Whitespace-only lines count as empty cells.
    #[serde(default)]
    pub blank_line_cells: bool,
    /// Leading spaces per skipped empty column, if indentation is meaningful.
    #[serde(default)]
    pub leading_space_step: Option<usize>,
    /// Lines considered per service before giving up.
    #[serde(default = "default_max_lines_per_service")]
    pub max_lines_per_service: usize,
}

fn default_max_lines_per_service() -> usize {
    20
}

impl LayoutDef {
    pub fn month_number(&self, abbrev: &str) -> Option<u32> {
        self.months.get(&abbrev.to_lowercase()).copied()
    }

    /// The service pattern contained in `text`, if any.
    pub fn service_pattern(&self, text: &str) -> Option<&str> {
        let upper = text.to_uppercase();
        self.services
            .iter()
            .find(|p| upper.contains(p.as_str()))
            .map(|p| p.as_str())
    }

    pub fn is_complement(&self, text: &str) -> bool {
        let squashed = squash(text);
        !squashed.is_empty() && self.complements.iter().any(|c| squash(c) == squashed)
    }

    pub fn is_noise_word(&self, word: &str) -> bool {
        let upper = word.to_uppercase();
        self.noise_words.iter().any(|w| *w == upper)
    }

    pub fn is_noise_name(&self, name: &str) -> bool {
        let squashed = squash(name);
        self.noise_names
            .iter()
            .chain(self.noise_words.iter())
            .chain(self.complements.iter())
            .any(|n| squash(n) == squashed)
    }
}

/// Uppercase with all whitespace removed, so `2ª CIA` == `2ªCIA`.
fn squash(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_uppercase)
        .collect()
}
