use crate::layout::schema::LayoutDef;
use crate::parsing::lexer::words_with_offsets;
use chrono::NaiveDate;

/// Parse a `day-monthAbbrev-YY` token (e.g. `29-out-25`) into a date.
///
/// Surrounding punctuation is ignored; the year is taken as `20YY`.
/// Returns None for anything else, including impossible dates (`31-fev-25`).
pub fn parse_date_token(token: &str, layout: &LayoutDef) -> Option<NaiveDate> {
    let token = token.trim_matches(|c: char| !c.is_alphanumeric());
    let mut parts = token.split('-');
    let (day, month, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() {
        return None;
    }

    if day.is_empty() || day.len() > 2 || !day.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    if year.len() != 2 || !year.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }

    let month = layout.month_number(month)?;
    let day: u32 = day.parse().ok()?;
    let year: i32 = year.parse().ok()?;
    NaiveDate::from_ymd_opt(2000 + year, month, day)
}

/// Whether `text` could be part of a date split across fragments
/// (`29`, `-`, `out`, `29-out`, `-25`, ...).
pub fn is_date_piece(text: &str, layout: &LayoutDef) -> bool {
    let text = text.trim();
    if text.is_empty() || !text.chars().all(|c| c.is_alphanumeric() || c == '-') {
        return false;
    }
    text.split('-').all(|part| {
        part.is_empty()
            || (part.len() <= 2 && part.chars().all(|c| c.is_ascii_digit()))
            || layout.month_number(part).is_some()
    })
}

/// Every date token in `text`, with the char offset where it starts.
pub fn find_dates(text: &str, layout: &LayoutDef) -> Vec<(usize, NaiveDate)> {
    words_with_offsets(text)
        .into_iter()
        .filter_map(|(offset, word)| parse_date_token(word, layout).map(|d| (offset, d)))
        .collect()
}

pub fn starts_with_date(text: &str, layout: &LayoutDef) -> bool {
    text.split_whitespace()
        .next()
        .is_some_and(|w| parse_date_token(w, layout).is_some())
}
