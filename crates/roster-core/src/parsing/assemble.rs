use crate::model::{AssignmentRecord, ServiceBlock, Table};
use crate::parsing::continuation::RowPeople;

/// Turn one service row's accepted people into records, column by column.
pub fn assemble_row(table: &Table, block: &ServiceBlock, people: &RowPeople) -> Vec<AssignmentRecord> {
    people
        .columns
        .iter()
        .zip(&table.dates)
        .flat_map(|(candidates, date)| {
            candidates.iter().map(move |c| AssignmentRecord {
                service: block.name.clone(),
                date: *date,
                time: None,
                name: c.name.clone(),
                military_id: None,
                rank: c.rank,
            })
        })
        .collect()
}
