use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Military rank, the closed vocabulary that delimits people inside a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    #[serde(rename = "GEN")]
    Gen,
    #[serde(rename = "CEL")]
    Cel,
    #[serde(rename = "TC")]
    Tc,
    #[serde(rename = "MAJ")]
    Maj,
    #[serde(rename = "CAP")]
    Cap,
    #[serde(rename = "1ºTEN")]
    Ten1,
    #[serde(rename = "2ºTEN")]
    Ten2,
    #[serde(rename = "ASP")]
    Asp,
    #[serde(rename = "ST")]
    St,
    #[serde(rename = "1ºSGT")]
    Sgt1,
    #[serde(rename = "2ºSGT")]
    Sgt2,
    #[serde(rename = "3ºSGT")]
    Sgt3,
    #[serde(rename = "CB")]
    Cb,
    #[serde(rename = "SD")]
    Sd,
}

impl Rank {
    pub const ALL: [Rank; 14] = [
        Rank::Gen,
        Rank::Cel,
        Rank::Tc,
        Rank::Maj,
        Rank::Cap,
        Rank::Ten1,
        Rank::Ten2,
        Rank::Asp,
        Rank::St,
        Rank::Sgt1,
        Rank::Sgt2,
        Rank::Sgt3,
        Rank::Cb,
        Rank::Sd,
    ];

    /// Canonical code as printed in the output (e.g. `1ºTEN`).
    pub fn code(&self) -> &'static str {
        match self {
            Rank::Gen => "GEN",
            Rank::Cel => "CEL",
            Rank::Tc => "TC",
            Rank::Maj => "MAJ",
            Rank::Cap => "CAP",
            Rank::Ten1 => "1ºTEN",
            Rank::Ten2 => "2ºTEN",
            Rank::Asp => "ASP",
            Rank::St => "ST",
            Rank::Sgt1 => "1ºSGT",
            Rank::Sgt2 => "2ºSGT",
            Rank::Sgt3 => "3ºSGT",
            Rank::Cb => "CB",
            Rank::Sd => "SD",
        }
    }

    /// Parse a single word as a rank, case-insensitively.
    ///
    /// Accepts the ordinal written as `º`, `°`, `o` or `O` (`1ºTEN`, `1oTEN`).
    pub fn from_word(word: &str) -> Option<Rank> {
        let upper = normalize_ordinal(&word.trim().to_uppercase());
        Rank::ALL.iter().copied().find(|r| r.code() == upper)
    }

    /// Parse a rank written as two words (`1º TEN`).
    pub fn from_split(ordinal: &str, title: &str) -> Option<Rank> {
        let ordinal = normalize_ordinal(&ordinal.trim().to_uppercase());
        if !is_ordinal(&ordinal) {
            return None;
        }
        Rank::from_word(&format!("{}{}", ordinal, title.trim()))
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// `1°`, `1O` and `1º` all become `1º`; anything else is left untouched.
fn normalize_ordinal(upper: &str) -> String {
    let mut chars = upper.chars();
    match (chars.next(), chars.next()) {
        (Some(d @ '1'..='3'), Some('º' | '°' | 'O')) => {
            let rest: String = chars.collect();
            format!("{d}º{rest}")
        }
        _ => upper.to_string(),
    }
}

fn is_ordinal(s: &str) -> bool {
    matches!(s, "1º" | "2º" | "3º")
}

/// One output row: a person on duty for a service on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentRecord {
    pub service: String,
    pub date: NaiveDate,
    #[serde(with = "hhmm")]
    pub time: Option<NaiveTime>,
    pub name: String,
    pub military_id: Option<String>,
    pub rank: Option<Rank>,
}

impl AssignmentRecord {
    /// Natural key used by consumers for insert-if-absent.
    pub fn dedup_key(&self) -> (NaiveDate, &str, Option<Rank>, &str) {
        (self.date, &self.service, self.rank, &self.name)
    }
}

/// Serializes an optional clock time as `"HH:MM"`.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(time: &Option<NaiveTime>, s: S) -> Result<S::Ok, S::Error> {
        match time {
            Some(t) => s.serialize_str(&t.format(FORMAT).to_string()),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<NaiveTime>, D::Error> {
        let raw: Option<String> = Option::deserialize(d)?;
        raw.map(|s| NaiveTime::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom))
            .transpose()
    }
}

/// How a table's columns are keyed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKey {
    /// Position in the sequence of lines following a service anchor.
    Ordinal(usize),
    /// Left x-coordinate of the column's date in the header.
    X(f32),
}

/// One roster table: a header marker with its resolved column dates.
#[derive(Debug, Clone)]
pub struct Table {
    pub index: usize,
    pub dates: Vec<NaiveDate>,
    pub columns: Vec<ColumnKey>,
    /// Unit index of the header marker.
    pub anchor: usize,
    /// Units `[anchor, end)` belong to this table.
    pub end: usize,
    pub page_number: usize,
}

impl Table {
    pub fn column_count(&self) -> usize {
        self.dates.len()
    }
}

#[derive(Debug, Clone)]
pub struct ServiceBlock {
    pub name: String,
    pub table_index: usize,
    /// Unit index of the service label.
    pub anchor: usize,
    pub row_extent: Range<usize>,
}

#[derive(Debug, Clone)]
pub struct Cell {
    pub table_index: usize,
    pub service: String,
    pub column: usize,
    pub date: NaiveDate,
    pub raw_text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonCandidate {
    pub rank: Option<Rank>,
    pub name: String,
    pub from_continuation: bool,
}

impl PersonCandidate {
    /// A single-word name long enough to be the head of a wrapped name.
    pub fn awaits_continuation(&self, min_len: usize) -> bool {
        !self.name.contains(' ') && self.name.chars().count() >= min_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_from_word_variants() {
        assert_eq!(Rank::from_word("1ºTEN"), Some(Rank::Ten1));
        assert_eq!(Rank::from_word("1°ten"), Some(Rank::Ten1));
        assert_eq!(Rank::from_word("2oSGT"), Some(Rank::Sgt2));
        assert_eq!(Rank::from_word("cb"), Some(Rank::Cb));
        assert_eq!(Rank::from_word("SILVA"), None);
        assert_eq!(Rank::from_word("SGT"), None);
    }

    #[test]
    fn test_rank_from_split() {
        assert_eq!(Rank::from_split("1º", "TEN"), Some(Rank::Ten1));
        assert_eq!(Rank::from_split("3O", "sgt"), Some(Rank::Sgt3));
        assert_eq!(Rank::from_split("CB", "SILVA"), None);
    }

    #[test]
    fn test_record_json_shape() {
        let record = AssignmentRecord {
            service: "ADJUNTO".into(),
            date: NaiveDate::from_ymd_opt(2025, 10, 29).unwrap(),
            time: None,
            name: "ROSA".into(),
            military_id: None,
            rank: Some(Rank::Ten1),
        };
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["date"], "2025-10-29");
        assert_eq!(json["rank"], "1ºTEN");
        assert!(json["time"].is_null());
        assert!(json["military_id"].is_null());
    }

    #[test]
    fn test_time_serialized_as_hhmm() {
        let record = AssignmentRecord {
            service: "SGT DE DIA".into(),
            date: NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            time: NaiveTime::from_hms_opt(7, 30, 0),
            name: "LIMA".into(),
            military_id: Some("123456".into()),
            rank: Some(Rank::Sgt2),
        };
        let json = serde_json::to_string(&record).unwrap();
        assert!(json.contains("\"time\":\"07:30\""));
        let back: AssignmentRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
