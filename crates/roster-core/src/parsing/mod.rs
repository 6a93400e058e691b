pub mod assemble;
pub mod cells;
pub mod columns;
pub mod continuation;
pub mod dates;
pub mod lexer;
pub mod people;
pub mod services;
pub mod tables;

use crate::error::RosterError;
use crate::extraction::Document;
use crate::layout::schema::LayoutDef;
use crate::model::AssignmentRecord;
use crate::trace::{
    CellTrace, ExtractionTrace, ServiceTrace, TableTrace, TracePerson, TraceSeverity,
};
use columns::ColumnLayout;

/// Records plus the diagnostic trace of how they were found.
#[derive(Debug, Clone)]
pub struct RosterExtraction {
    pub records: Vec<AssignmentRecord>,
    pub trace: ExtractionTrace,
}

/// Run the table/service/cell pipeline over a flattened document.
pub fn parse_roster(doc: &Document, layout: &LayoutDef) -> Result<RosterExtraction, RosterError> {
    if !doc.has_text() {
        return Err(RosterError::ParseError(
            "no text content found in PDF".into(),
        ));
    }

    let mut trace = ExtractionTrace::new(doc.mode);
    let scan = tables::detect_tables(doc, layout);
    for (unit, page) in &scan.dropped {
        trace.warn(
            None,
            TraceSeverity::Important,
            format!("header marker at unit {} (page {}) has no dates", unit, page),
        );
    }
    if scan.tables.is_empty() {
        return Err(RosterError::NoTables {
            markers: scan.markers,
            dropped: scan.dropped.len(),
        });
    }

    let mut records = Vec::new();
    for table in &scan.tables {
        let columns = ColumnLayout::for_table(table, &layout.geometry);
        let bounds = columns.tolerance();
        trace.tables.push(TableTrace {
            table_index: table.index,
            page_number: table.page_number,
            anchor_unit: table.anchor,
            dates: table.dates.clone(),
            columns: table.columns.clone(),
            tolerance: bounds.map(|(t, _)| t),
            fallback: bounds.map(|(_, f)| f),
        });

        let blocks = services::locate_services(doc, table, layout);
        if blocks.is_empty() {
            log::warn!("table {} has no service rows", table.index);
            trace.warn(
                Some(table.index),
                TraceSeverity::Info,
                "no service rows found".into(),
            );
        }

        for block in &blocks {
            trace.services.push(ServiceTrace {
                table_index: table.index,
                service: block.name.clone(),
                page_number: doc.units[block.anchor].page_number(),
                anchor_unit: block.anchor,
                row_start: block.row_extent.start,
                row_end: block.row_extent.end,
            });

            let row = cells::segment_row(doc, table, &columns, block, layout);
            for dropped in &row.dropped {
                trace.reject(
                    table.index,
                    Some(block.name.as_str()),
                    dropped.column,
                    &dropped.text,
                    dropped.reason,
                );
            }

            let cell_people = row
                .cells
                .iter()
                .map(|text| people::tokenize_people(text, layout))
                .collect();
            let resolved = continuation::resolve_row(cell_people, layout);
            for rejection in &resolved.rejections {
                trace.reject(
                    table.index,
                    Some(block.name.as_str()),
                    Some(rejection.column),
                    &rejection.text,
                    rejection.reason,
                );
            }

            for (column, (text, found)) in row.cells.iter().zip(&resolved.columns).enumerate() {
                log::debug!(
                    "table {} '{}' {}: '{}' -> {} people",
                    table.index,
                    block.name,
                    table.dates[column],
                    text,
                    found.len()
                );
                trace.cells.push(CellTrace {
                    table_index: table.index,
                    service: block.name.clone(),
                    column,
                    date: table.dates[column],
                    raw_text: text.clone(),
                    people: found.iter().map(TracePerson::from).collect(),
                });
            }

            records.extend(assemble::assemble_row(table, block, &resolved));
        }
    }

    log::info!(
        "extracted {} records from {} table(s), {} rejection(s)",
        records.len(),
        scan.tables.len(),
        trace.rejections.len()
    );

    Ok(RosterExtraction { records, trace })
}
