//! `rostergen tables`: show the compiled-in reference tables.

use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};

use rostergen_core::identity::{BlacklistReason, ReferenceTables};

use super::style;

/// Print the blacklist, patch authors, and corrections.
pub fn run_tables(tables: &ReferenceTables<'_>) {
    println!();
    println!(
        "{}",
        style::header(&format!("Blacklist ({})", tables.blacklist.len()))
    );
    let mut table = new_table(vec!["Identity", "Reason"]);
    for entry in tables.blacklist {
        let reason = match entry.reason {
            BlacklistReason::Bot => Cell::new(entry.reason).fg(comfy_table::Color::Yellow),
            BlacklistReason::Unknown => Cell::new(entry.reason).fg(comfy_table::Color::DarkGrey),
            _ => Cell::new(entry.reason),
        };
        table.add_row(vec![Cell::new(entry.identity), reason]);
    }
    println!("{}", table);

    println!();
    println!(
        "{}",
        style::header(&format!("Patch authors ({})", tables.patch_authors.len()))
    );
    let mut table = new_table(vec!["Identity", "Recovered from"]);
    for author in tables.patch_authors {
        let short = author.commit.get(..10).unwrap_or(author.commit);
        table.add_row(vec![Cell::new(author.identity), Cell::new(short)]);
    }
    println!("{}", table);

    println!();
    println!(
        "{}",
        style::header(&format!("Corrections ({})", tables.corrections.len()))
    );
    let mut table = new_table(vec!["Malformed", "Corrected"]);
    for correction in tables.corrections {
        table.add_row(vec![
            Cell::new(correction.malformed),
            Cell::new(correction.corrected),
        ]);
    }
    println!("{}", table);
    println!();
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(header);
    table
}
