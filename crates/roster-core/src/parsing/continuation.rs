use crate::layout::schema::LayoutDef;
use crate::model::PersonCandidate;
use crate::parsing::people::{validate_name, CellPeople};
use crate::trace::RejectionReason;

/// Accepted people per column of one service row, after continuation merging.
#[derive(Debug, Clone, Default)]
pub struct RowPeople {
    pub columns: Vec<Vec<PersonCandidate>>,
    pub rejections: Vec<ColumnRejection>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnRejection {
    pub column: usize,
    pub text: String,
    pub reason: RejectionReason,
}

/// State carried from one column to the next.
#[derive(Debug, Clone, Copy, Default)]
struct Carry {
    /// `(column, candidate index)` of a single-word name that may continue.
    pending: Option<(usize, usize)>,
}

/// Merge name pieces that wrapped into the following column.
///
/// A cell's leading rankless segment extends the pending candidate of the
/// previous cell. Only the most recent single-word candidate is ever
/// pending.
pub fn resolve_row(cells: Vec<CellPeople>, layout: &LayoutDef) -> RowPeople {
    let min_len = layout.names.continuation_min_length;
    let mut row = RowPeople::default();

    cells
        .into_iter()
        .enumerate()
        .fold(Carry::default(), |carry, (column, cell)| {
            for (text, reason) in cell.rejected {
                row.rejections.push(ColumnRejection {
                    column,
                    text,
                    reason,
                });
            }

            if let Some(segment) = cell.leading {
                match carry.pending {
                    Some((col, idx)) => extend(&mut row, (col, idx), column, &segment, layout),
                    None => row.rejections.push(ColumnRejection {
                        column,
                        text: segment,
                        reason: RejectionReason::UnmatchedContinuation,
                    }),
                }
            }

            let pending = cell
                .candidates
                .last()
                .filter(|c| c.awaits_continuation(min_len))
                .map(|_| (column, cell.candidates.len() - 1));
            row.columns.push(cell.candidates);

            Carry { pending }
        });

    row
}

fn extend(
    row: &mut RowPeople,
    (col, idx): (usize, usize),
    column: usize,
    segment: &str,
    layout: &LayoutDef,
) {
    let Some(candidate) = row.columns.get_mut(col).and_then(|c| c.get_mut(idx)) else {
        return;
    };

    let merged = format!("{} {}", candidate.name, segment);
    match validate_name(&merged, layout) {
        Ok(()) => {
            log::debug!("continuation: '{}' + '{}'", candidate.name, segment);
            candidate.name = merged;
            candidate.from_continuation = true;
        }
        Err(reason) => row.rejections.push(ColumnRejection {
            column,
            text: segment.to_string(),
            reason,
        }),
    }
}
