//! `rostergen explain`: trace records through the resolver.

use rostergen_core::identity::{Disposition, IdentityResolver};

use super::style;

/// Print what happens to each record.
pub fn run_explain(resolver: &IdentityResolver<'_>, records: &[String]) {
    for record in records {
        println!("{}", style::header(&format!("{:?}", record)));

        match resolver.classify(record) {
            Disposition::Skipped => {
                println!("  {}", style::dim("empty record, skipped"));
            }
            Disposition::Discarded { normalized, entry } => {
                for rule in &normalized.applied {
                    println!("  {} {}", style::dim("applied"), rule);
                }
                if !normalized.applied.is_empty() {
                    println!("  {} {}", style::dim("becomes"), normalized.identity);
                }
                println!(
                    "  {}",
                    style::error(&format!("discarded: blacklisted ({})", entry.reason))
                );
            }
            Disposition::Kept(normalized) => {
                for rule in &normalized.applied {
                    println!("  {} {}", style::dim("applied"), rule);
                }
                let forced = resolver
                    .tables()
                    .patch_authors
                    .iter()
                    .any(|p| p.identity == normalized.identity);
                let note = if forced { " (also a patch author)" } else { "" };
                println!(
                    "  {}",
                    style::success(&format!("kept as {}{}", normalized.identity, note))
                );
            }
        }
        println!();
    }
}
