use chrono::NaiveDate;
use roster_core::parsing::RosterExtraction;
use roster_core::trace::TracePerson;

pub fn print(result: &RosterExtraction) {
    let trace = &result.trace;

    for table in &trace.tables {
        let (first, last) = match (table.dates.first(), table.dates.last()) {
            (Some(f), Some(l)) => (f, l),
            _ => continue,
        };
        println!(
            "=== Table {} (page {}): {} to {} ===\n",
            table.table_index + 1,
            table.page_number,
            format_date(first),
            format_date(last)
        );

        let services = trace
            .services
            .iter()
            .filter(|s| s.table_index == table.table_index);
        let cells: Vec<_> = trace
            .cells
            .iter()
            .filter(|c| c.table_index == table.table_index)
            .collect();
        // cells are recorded service by service, one per date
        for (service, row) in services.zip(cells.chunks(table.dates.len())) {
            println!("  {}", service.service);
            for cell in row {
                let people = if cell.people.is_empty() {
                    "-".to_string()
                } else {
                    cell.people
                        .iter()
                        .map(format_person)
                        .collect::<Vec<_>>()
                        .join(", ")
                };
                println!("    {}  {}", format_date(&cell.date), people);
            }
            println!();
        }
    }

    println!("{} record(s)", result.records.len());
    if !trace.rejections.is_empty() {
        println!("{} text piece(s) rejected", trace.rejections.len());
    }
}

fn format_person(p: &TracePerson) -> String {
    let continued = if p.from_continuation { " (+)" } else { "" };
    match p.rank {
        Some(rank) => format!("{} {}{}", rank, p.name, continued),
        None => format!("{}{}", p.name, continued),
    }
}

fn format_date(date: &NaiveDate) -> String {
    date.format("%d/%m/%Y").to_string()
}
