use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::license::matcher::Confidence;
use crate::report::{Row, Status};

/// Print the license table followed by a one-line summary.
pub fn render(rows: &[Row], words: bool, quiet: bool) {
    if !quiet {
        println!("{}", build_table(rows, words));
    }
    println!("{}", summary(rows));
}

fn build_table(rows: &[Row], words: bool) -> Table {
    let mut header = vec![
        Cell::new("Package").add_attribute(Attribute::Bold),
        Cell::new("Version").add_attribute(Attribute::Bold),
        Cell::new("License").add_attribute(Attribute::Bold),
        Cell::new("Match").add_attribute(Attribute::Bold),
    ];
    if words {
        header.push(Cell::new("Words").add_attribute(Attribute::Bold));
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);

    for row in rows {
        let color = match row.status {
            Status::Matched(Confidence::Certain) => Color::Green,
            Status::Matched(Confidence::Probable) => Color::Yellow,
            Status::Matched(Confidence::Unknown) => Color::DarkGrey,
            Status::Missing => Color::DarkGrey,
            Status::Error => Color::Red,
        };
        let mut cells = vec![
            Cell::new(&row.package),
            Cell::new(&row.version),
            Cell::new(&row.license).fg(color),
            Cell::new(&row.matched).set_alignment(CellAlignment::Right),
        ];
        if words {
            cells.push(Cell::new(&row.words));
        }
        table.add_row(cells);
    }
    table
}

fn summary(rows: &[Row]) -> String {
    let count = |status: Status| rows.iter().filter(|r| r.status == status).count();
    let certain = count(Status::Matched(Confidence::Certain));
    let probable = count(Status::Matched(Confidence::Probable));
    let unknown = count(Status::Matched(Confidence::Unknown)) + count(Status::Missing);
    let errors = count(Status::Error);

    format!(
        "Total: {}  {}: {}  {}: {}  {}: {}  Errors: {}",
        rows.len(),
        Confidence::Certain,
        certain.to_string().green(),
        Confidence::Probable,
        probable.to_string().yellow(),
        Confidence::Unknown,
        unknown.to_string().dimmed(),
        errors.to_string().red(),
    )
}
