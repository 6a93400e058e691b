use crate::extraction::{Document, Fragment, TextUnit};
use crate::layout::schema::LayoutDef;
use crate::model::{ColumnKey, Table};
use crate::parsing::dates::{find_dates, is_date_piece, parse_date_token};
use crate::parsing::lexer::{classify_unit, is_header_marker, UnitKind};
use chrono::NaiveDate;

/// Result of scanning a document for table headers.
#[derive(Debug, Clone, Default)]
pub struct TableScan {
    pub tables: Vec<Table>,
    /// Header markers seen, including dropped ones.
    pub markers: usize,
    /// `(unit index, page)` of markers that yielded no dates.
    pub dropped: Vec<(usize, usize)>,
}

/// Find every table header and resolve its column dates.
///
/// A table runs from its marker up to the next kept marker or the end of
/// the document; markers without dates are skipped over. The date lookahead
/// never crosses any marker.
pub fn detect_tables(doc: &Document, layout: &LayoutDef) -> TableScan {
    let markers: Vec<usize> = doc
        .units
        .iter()
        .enumerate()
        .filter(|(_, u)| is_header_marker(u.text(), layout))
        .map(|(i, _)| i)
        .collect();

    let mut scan = TableScan {
        markers: markers.len(),
        ..TableScan::default()
    };

    for (n, &anchor) in markers.iter().enumerate() {
        let window_end = markers.get(n + 1).copied().unwrap_or(doc.units.len());
        let window = &doc.units[anchor..window_end];
        let page_number = window[0].page_number();

        let columns = if doc.is_geometric() {
            geometric_header(window, layout)
        } else {
            line_header(window, layout)
        };

        if columns.is_empty() {
            log::warn!(
                "header marker at unit {} (page {}) has no dates, table dropped",
                anchor,
                page_number
            );
            scan.dropped.push((anchor, page_number));
            continue;
        }

        let (columns, dates): (Vec<ColumnKey>, Vec<NaiveDate>) = columns.into_iter().unzip();
        scan.tables.push(Table {
            index: scan.tables.len(),
            dates,
            columns,
            anchor,
            end: doc.units.len(),
            page_number,
        });
    }

    let next_anchors: Vec<usize> = scan.tables.iter().skip(1).map(|t| t.anchor).collect();
    for (table, next) in scan.tables.iter_mut().zip(next_anchors) {
        table.end = next;
    }
    for table in &scan.tables {
        log::debug!(
            "table {}: {} dates from unit {} to {}",
            table.index,
            table.dates.len(),
            table.anchor,
            table.end
        );
    }

    scan
}

fn line_header(window: &[TextUnit], layout: &LayoutDef) -> Vec<(ColumnKey, NaiveDate)> {
    let max = layout.max_columns;
    let mut dates = Vec::new();

    let following = window
        .iter()
        .skip(1)
        .filter(|u| !u.text().trim().is_empty())
        .take(layout.header_lookahead.lines);

    for unit in std::iter::once(&window[0]).chain(following) {
        if matches!(classify_unit(unit.text(), layout), UnitKind::Service(_)) {
            break;
        }
        for (_, date) in find_dates(unit.text(), layout) {
            if dates.len() == max {
                break;
            }
            dates.push(date);
        }
        if dates.len() == max {
            break;
        }
    }

    dates
        .into_iter()
        .enumerate()
        .map(|(i, d)| (ColumnKey::Ordinal(i), d))
        .collect()
}

/// Pieces of one date that arrived as separate fragments (`29`, `-`, `out`).
#[derive(Default)]
struct PieceBuffer {
    text: String,
    x: Option<f32>,
}

impl PieceBuffer {
    fn push(&mut self, fragment: &Fragment) {
        self.x.get_or_insert(fragment.x());
        self.text.push_str(fragment.text.trim());
    }

    fn clear(&mut self) {
        self.text.clear();
        self.x = None;
    }
}

fn geometric_header(window: &[TextUnit], layout: &LayoutDef) -> Vec<(ColumnKey, NaiveDate)> {
    let max = layout.max_columns;
    let mut found: Vec<(ColumnKey, NaiveDate)> = Vec::new();
    let mut pieces = PieceBuffer::default();

    let lookahead = window.iter().take(layout.header_lookahead.fragments + 1);
    for (i, unit) in lookahead.enumerate() {
        if found.len() >= max {
            break;
        }
        let Some(fragment) = unit.as_fragment() else {
            continue;
        };
        if i > 0 && matches!(classify_unit(&fragment.text, layout), UnitKind::Service(_)) {
            break;
        }

        let whole = find_dates(&fragment.text, layout);
        if !whole.is_empty() {
            pieces.clear();
            let len = fragment.text.chars().count().max(1) as f32;
            for (offset, date) in whole {
                let x = fragment.x() + fragment.bbox.width() * offset as f32 / len;
                found.push((ColumnKey::X(x), date));
            }
            continue;
        }

        if i > 0 && is_date_piece(&fragment.text, layout) {
            pieces.push(fragment);
            if let Some(date) = parse_date_token(&pieces.text, layout) {
                let x = pieces.x.unwrap_or(fragment.x());
                found.push((ColumnKey::X(x), date));
                pieces.clear();
            }
        } else {
            pieces.clear();
        }
    }

    found.truncate(max);
    found
}
