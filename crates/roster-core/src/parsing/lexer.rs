//! Tagged lexing of roster text.
//!
//! Two levels: whole units (lines or fragments) are classified into
//! structural kinds, and cell text is split into a stream of rank, name,
//! noise and date tokens. Everything downstream works on these tags instead
//! of re-matching raw strings.

use crate::layout::schema::LayoutDef;
use crate::model::Rank;
use crate::parsing::dates::{parse_date_token, starts_with_date};
use chrono::NaiveDate;

/// Structural role of one text unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitKind {
    /// Opens a table's date header.
    HeaderMarker,
    /// Service label; carries the matched pattern.
    Service(String),
    /// Qualifier merged into the preceding service name.
    Complement,
    /// Table furniture: date rows, weekday headings, titles.
    Boundary,
    Blank,
    Content,
}

pub fn classify_unit(text: &str, layout: &LayoutDef) -> UnitKind {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return UnitKind::Blank;
    }
    if is_header_marker(trimmed, layout) {
        return UnitKind::HeaderMarker;
    }

    if is_boundary(trimmed, layout) {
        return UnitKind::Boundary;
    }

    if let Some(pattern) = layout.service_pattern(trimmed) {
        return UnitKind::Service(pattern.to_string());
    }
    if layout.is_complement(trimmed) {
        return UnitKind::Complement;
    }
    UnitKind::Content
}

/// The unit's first word is the header marker (`DATA`, `DATA 29-out-25 ...`).
pub fn is_header_marker(text: &str, layout: &LayoutDef) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|w| w.eq_ignore_ascii_case(&layout.header_marker))
}

/// Date rows, weekday headings and titles. Markers match whole words and
/// only in first position, so `CB DOMINGOS` stays content.
fn is_boundary(trimmed: &str, layout: &LayoutDef) -> bool {
    if starts_with_date(trimmed, layout) {
        return true;
    }
    let Some(first) = trimmed.split_whitespace().next() else {
        return false;
    };
    let first = trim_punctuation(first).to_uppercase();
    layout.boundary_markers.iter().any(|m| m.to_uppercase() == first)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    Rank(Rank),
    Name(String),
    Noise(String),
    Date(NaiveDate),
}

/// Split cell text into tagged tokens.
///
/// Ranks may span two words (`1º TEN`); punctuation around words is dropped.
pub fn tokenize(text: &str, layout: &LayoutDef) -> Vec<Token> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(trim_punctuation)
        .filter(|w| !w.is_empty())
        .collect();

    let mut tokens = Vec::with_capacity(words.len());
    let mut i = 0;
    while i < words.len() {
        let word = words[i];
        if let Some(rank) = Rank::from_word(word) {
            tokens.push(Token::Rank(rank));
            i += 1;
            continue;
        }
        if let Some(rank) = words.get(i + 1).and_then(|next| Rank::from_split(word, next)) {
            tokens.push(Token::Rank(rank));
            i += 2;
            continue;
        }

        let token = if let Some(date) = parse_date_token(word, layout) {
            Token::Date(date)
        } else if layout.is_noise_word(word) {
            Token::Noise(word.to_string())
        } else {
            Token::Name(word.to_string())
        };
        tokens.push(token);
        i += 1;
    }

    tokens
}

pub fn contains_rank(text: &str, layout: &LayoutDef) -> bool {
    tokenize(text, layout)
        .iter()
        .any(|t| matches!(t, Token::Rank(_)))
}

/// Whitespace-separated words with the char offset each one starts at.
pub fn words_with_offsets(text: &str) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut start: Option<(usize, usize)> = None; // (char offset, byte offset)

    for (char_idx, (byte_idx, c)) in text.char_indices().enumerate() {
        if c.is_whitespace() {
            if let Some((char_start, byte_start)) = start.take() {
                out.push((char_start, &text[byte_start..byte_idx]));
            }
        } else if start.is_none() {
            start = Some((char_idx, byte_idx));
        }
    }
    if let Some((char_start, byte_start)) = start {
        out.push((char_start, &text[byte_start..]));
    }

    out
}

/// Collapse runs of whitespace into single spaces.
pub fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn trim_punctuation(word: &str) -> &str {
    word.trim_matches(|c: char| c.is_ascii_punctuation() && c != '-' && c != '\'')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::builtin::default_layout;

    #[test]
    fn test_classify_units() {
        let layout = default_layout().unwrap();
        assert_eq!(classify_unit("DATA", &layout), UnitKind::HeaderMarker);
        assert_eq!(
            classify_unit("DATA 29-out-25 30-out-25", &layout),
            UnitKind::HeaderMarker
        );
        assert_eq!(
            classify_unit("OFICIAL DE DIA", &layout),
            UnitKind::Service("OFICIAL DE DIA".into())
        );
        assert_eq!(classify_unit("2ª CIA", &layout), UnitKind::Complement);
        assert_eq!(classify_unit("29-out-25", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("QUARTA-FEIRA", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("   ", &layout), UnitKind::Blank);
        assert_eq!(classify_unit("1ºTEN ROSA", &layout), UnitKind::Content);
    }

    #[test]
    fn test_boundary_markers_match_whole_words() {
        let layout = default_layout().unwrap();
        assert_eq!(classify_unit("DOMINGO", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("SÁBADO DOMINGO", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("Quinta-feira", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("PREVISÃO DE SERVIÇO", &layout), UnitKind::Boundary);
        assert_eq!(classify_unit("CB DOMINGOS", &layout), UnitKind::Content);
        assert_eq!(classify_unit("SD SABADOS DOMINGO", &layout), UnitKind::Content);
    }

    #[test]
    fn test_marker_must_be_first_word() {
        let layout = default_layout().unwrap();
        assert!(!is_header_marker("ATUALIZADA DATA", &layout));
        assert!(!is_header_marker("DATAS", &layout));
    }

    #[test]
    fn test_tokenize_ranks_and_names() {
        let layout = default_layout().unwrap();
        let tokens = tokenize("CB SILVA 1º TEN ANDRIELLE", &layout);
        assert_eq!(
            tokens,
            vec![
                Token::Rank(Rank::Cb),
                Token::Name("SILVA".into()),
                Token::Rank(Rank::Ten1),
                Token::Name("ANDRIELLE".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_noise_and_punctuation() {
        let layout = default_layout().unwrap();
        let tokens = tokenize("SD ALVES, (SUP)", &layout);
        assert_eq!(
            tokens,
            vec![
                Token::Rank(Rank::Sd),
                Token::Name("ALVES".into()),
                Token::Noise("SUP".into()),
            ]
        );
    }

    #[test]
    fn test_tokenize_lowercase_rank() {
        let layout = default_layout().unwrap();
        assert_eq!(tokenize("cap", &layout), vec![Token::Rank(Rank::Cap)]);
    }

    #[test]
    fn test_words_with_offsets_multibyte() {
        let words = words_with_offsets("1ºTEN  ROSA");
        assert_eq!(words, vec![(0, "1ºTEN"), (7, "ROSA")]);
    }
}
