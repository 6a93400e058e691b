use crate::layout::schema::GeometryTuning;
use crate::model::{ColumnKey, Table};

/// How content is mapped onto a table's date columns.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnLayout {
    /// Line mode: the n-th cell of a row is column n.
    Ordinal { count: usize },
    /// Geometric mode: columns are x positions.
    Geometric {
        anchors: Vec<f32>,
        tolerance: f32,
        fallback: f32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnAssignment {
    Column(usize),
    /// Two columns are equally close; the fragment is not placed.
    Ambiguous,
    OutOfRange,
}

impl ColumnLayout {
    /// Build the layout for a table, calibrating geometric bounds from the
    /// spacing of its own anchors.
    pub fn for_table(table: &Table, tuning: &GeometryTuning) -> ColumnLayout {
        let anchors: Vec<f32> = table
            .columns
            .iter()
            .filter_map(|k| match k {
                ColumnKey::X(x) => Some(*x),
                ColumnKey::Ordinal(_) => None,
            })
            .collect();

        if anchors.len() != table.columns.len() || anchors.is_empty() {
            return ColumnLayout::Ordinal {
                count: table.column_count(),
            };
        }

        let (tolerance, fallback) = match min_gap(&anchors) {
            Some(gap) => (
                gap * tuning.column_tolerance_ratio,
                gap * tuning.fallback_ratio,
            ),
            None => (tuning.default_tolerance, tuning.default_fallback),
        };

        ColumnLayout::Geometric {
            anchors,
            tolerance,
            fallback,
        }
    }

    pub fn column_count(&self) -> usize {
        match self {
            ColumnLayout::Ordinal { count } => *count,
            ColumnLayout::Geometric { anchors, .. } => anchors.len(),
        }
    }

    /// Place a fragment starting at `x` into a column.
    pub fn assign(&self, x: f32) -> ColumnAssignment {
        let ColumnLayout::Geometric {
            anchors,
            tolerance,
            fallback,
        } = self
        else {
            return ColumnAssignment::OutOfRange;
        };

        let within: Vec<usize> = (0..anchors.len())
            .filter(|&i| (x - anchors[i]).abs() < *tolerance)
            .collect();
        match within.len() {
            1 => return ColumnAssignment::Column(within[0]),
            0 => {}
            _ => return nearest(anchors, &within, x),
        }

        if let Some(&last) = anchors.last() {
            if x > last {
                return ColumnAssignment::Column(anchors.len() - 1);
            }
        }

        let close: Vec<usize> = (0..anchors.len())
            .filter(|&i| (x - anchors[i]).abs() < *fallback)
            .collect();
        if close.is_empty() {
            ColumnAssignment::OutOfRange
        } else {
            nearest(anchors, &close, x)
        }
    }

    pub fn tolerance(&self) -> Option<(f32, f32)> {
        match self {
            ColumnLayout::Geometric {
                tolerance,
                fallback,
                ..
            } => Some((*tolerance, *fallback)),
            ColumnLayout::Ordinal { .. } => None,
        }
    }
}

/// Closest of `candidates` to `x`; a tie is ambiguous.
fn nearest(anchors: &[f32], candidates: &[usize], x: f32) -> ColumnAssignment {
    let mut best: Option<(usize, f32)> = None;
    let mut tied = false;

    for &i in candidates {
        let d = (x - anchors[i]).abs();
        match best {
            Some((_, bd)) if d < bd => {
                best = Some((i, d));
                tied = false;
            }
            Some((_, bd)) if d == bd => tied = true,
            Some(_) => {}
            None => best = Some((i, d)),
        }
    }

    match best {
        Some(_) if tied => ColumnAssignment::Ambiguous,
        Some((i, _)) => ColumnAssignment::Column(i),
        None => ColumnAssignment::OutOfRange,
    }
}

/// Smallest positive distance between neighbouring distinct anchors.
fn min_gap(anchors: &[f32]) -> Option<f32> {
    let mut sorted = anchors.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|gap| *gap > 0.0)
        .min_by(|a, b| a.total_cmp(b))
}
