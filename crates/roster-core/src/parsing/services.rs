use crate::extraction::{Document, TextUnit};
use crate::layout::schema::LayoutDef;
use crate::model::{ServiceBlock, Table};
use crate::parsing::lexer::{classify_unit, normalize_ws, UnitKind};

/// Find the service rows of a table, in document order.
///
/// A label followed by a complement (`CMT GDA` + `2ª CIA`) becomes one block
/// with the composed name. Each block's extent starts after its label and
/// stops at the next label or the end of the table.
pub fn locate_services(doc: &Document, table: &Table, layout: &LayoutDef) -> Vec<ServiceBlock> {
    let mut labels: Vec<(usize, usize, String)> = Vec::new(); // (anchor, extent start, name)

    let mut i = table.anchor + 1;
    while i < table.end {
        let unit = &doc.units[i];
        if !matches!(classify_unit(unit.text(), layout), UnitKind::Service(_)) {
            i += 1;
            continue;
        }

        let mut name = normalize_ws(unit.text());
        let mut next = i + 1;
        if let Some(j) = next_non_blank(doc, i + 1, table.end) {
            let candidate = &doc.units[j];
            if classify_unit(candidate.text(), layout) == UnitKind::Complement
                && complement_in_reach(unit, candidate, doc.is_geometric(), layout)
            {
                name = format!("{} {}", name, normalize_ws(candidate.text()));
                next = j + 1;
            }
        }

        log::debug!("table {}: service '{}' at unit {}", table.index, name, i);
        labels.push((i, next, name));
        i = next;
    }

    let bounds: Vec<usize> = labels
        .iter()
        .skip(1)
        .map(|(anchor, _, _)| *anchor)
        .chain(std::iter::once(table.end))
        .collect();

    labels
        .into_iter()
        .zip(bounds)
        .map(|((anchor, start, name), end)| ServiceBlock {
            name,
            table_index: table.index,
            anchor,
            row_extent: start..end.max(start),
        })
        .collect()
}

fn next_non_blank(doc: &Document, from: usize, end: usize) -> Option<usize> {
    (from..end).find(|&j| !doc.units[j].text().trim().is_empty())
}

/// In geometric mode a complement must sit on the label's page, close to it
/// vertically.
fn complement_in_reach(
    label: &TextUnit,
    complement: &TextUnit,
    geometric: bool,
    layout: &LayoutDef,
) -> bool {
    if !geometric {
        return true;
    }
    match (label.as_fragment(), complement.as_fragment()) {
        (Some(l), Some(c)) => {
            l.page_number == c.page_number
                && (c.y() - l.y()).abs() < layout.geometry.complement_y_tolerance
        }
        _ => false,
    }
}
