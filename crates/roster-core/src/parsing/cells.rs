use crate::extraction::{Document, Fragment};
use crate::layout::schema::LayoutDef;
use crate::model::{ServiceBlock, Table};
use crate::parsing::columns::{ColumnAssignment, ColumnLayout};
use crate::parsing::lexer::{classify_unit, contains_rank, UnitKind};
use crate::parsing::people::tokenize_people;
use crate::trace::RejectionReason;

/// Per-date cell text of one service row.
#[derive(Debug, Clone, Default)]
pub struct SegmentedRow {
    /// Exactly one entry per table column; empty cells are empty strings.
    pub cells: Vec<String>,
    pub dropped: Vec<DroppedText>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DroppedText {
    pub column: Option<usize>,
    pub text: String,
    pub reason: RejectionReason,
}

/// Split a service block's extent into one text cell per date column.
pub fn segment_row(
    doc: &Document,
    table: &Table,
    columns: &ColumnLayout,
    block: &ServiceBlock,
    layout: &LayoutDef,
) -> SegmentedRow {
    let mut row = match columns {
        ColumnLayout::Ordinal { .. } => segment_lines(doc, table, block, layout),
        ColumnLayout::Geometric { .. } => segment_fragments(doc, columns, block, layout),
    };
    row.cells.resize(table.column_count(), String::new());
    row
}

fn segment_lines(doc: &Document, table: &Table, block: &ServiceBlock, layout: &LayoutDef) -> SegmentedRow {
    let n = table.column_count();
    let opts = &layout.line_mode;
    let mut row = SegmentedRow::default();

    for idx in block.row_extent.clone().take(opts.max_lines_per_service) {
        let Some(line) = doc.units[idx].as_line() else {
            continue;
        };

        match classify_unit(&line.text, layout) {
            UnitKind::Content => {}
            UnitKind::Blank => {
                if opts.blank_line_cells && row.cells.len() < n {
                    row.cells.push(String::new());
                }
                continue;
            }
            _ => continue,
        }

        if let Some(last) = row.cells.last_mut() {
            if !contains_rank(&line.text, layout) && awaits_continuation(last, layout) {
                log::debug!("'{}' continues '{}'", line.text, last);
                last.push(' ');
                last.push_str(&line.text);
                continue;
            }
        }

        if let Some(step) = opts.leading_space_step {
            for _ in 0..line.leading_spaces / step {
                if row.cells.len() < n {
                    row.cells.push(String::new());
                }
            }
        }

        if row.cells.len() >= n {
            row.dropped.push(DroppedText {
                column: None,
                text: line.text.clone(),
                reason: RejectionReason::ExtraLine,
            });
            continue;
        }
        row.cells.push(line.text.clone());
    }

    row
}

/// The cell's last person is a lone word that the next line may finish.
fn awaits_continuation(cell: &str, layout: &LayoutDef) -> bool {
    tokenize_people(cell, layout)
        .candidates
        .last()
        .is_some_and(|c| c.awaits_continuation(layout.names.continuation_min_length))
}

fn segment_fragments(
    doc: &Document,
    columns: &ColumnLayout,
    block: &ServiceBlock,
    layout: &LayoutDef,
) -> SegmentedRow {
    let mut row = SegmentedRow::default();
    let Some(label) = doc.units[block.anchor].as_fragment() else {
        return row;
    };

    let geo = &layout.geometry;
    let top = label.y() - geo.row_slack;
    let bottom = label.y() + geo.max_row_height;
    let mut buckets: Vec<Vec<&Fragment>> = vec![Vec::new(); columns.column_count()];

    for idx in block.row_extent.clone() {
        let Some(fragment) = doc.units[idx].as_fragment() else {
            continue;
        };
        if fragment.page_number != label.page_number || fragment.y() < top || fragment.y() > bottom {
            continue;
        }
        if classify_unit(&fragment.text, layout) != UnitKind::Content {
            continue;
        }

        match columns.assign(fragment.x()) {
            ColumnAssignment::Column(c) => buckets[c].push(fragment),
            ColumnAssignment::Ambiguous => {
                log::debug!("fragment '{}' at x={} is between columns", fragment.text, fragment.x());
                row.dropped.push(DroppedText {
                    column: None,
                    text: fragment.text.clone(),
                    reason: RejectionReason::AmbiguousColumn,
                });
            }
            ColumnAssignment::OutOfRange => {
                log::warn!("fragment '{}' at x={} fits no column", fragment.text, fragment.x());
                row.dropped.push(DroppedText {
                    column: None,
                    text: fragment.text.clone(),
                    reason: RejectionReason::UnassignableFragment,
                });
            }
        }
    }

    row.cells = buckets
        .into_iter()
        .map(|mut bucket| {
            bucket.sort_by(|a, b| a.y().total_cmp(&b.y()).then(a.x().total_cmp(&b.x())));
            bucket
                .iter()
                .map(|f| f.text.trim())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect();

    row
}
