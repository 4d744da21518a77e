//! Catalog browsing command.

use std::fmt::Write as _;

use anyhow::Result;
use ob_core::{CapabilityTag, Catalog, CatalogEntry, Category};

/// Runs the catalog command and prints the listing to stdout.
pub fn run(
    catalog: &Catalog,
    category: Option<Category>,
    tag: Option<CapabilityTag>,
    hidden: bool,
    json: bool,
) -> Result<()> {
    let entries: Vec<&CatalogEntry> = catalog
        .entries()
        .iter()
        .filter(|e| category.is_none_or(|c| e.category == c))
        .filter(|e| tag.is_none_or(|t| e.has_tag(t)))
        .filter(|e| hidden || !e.hidden_from_picker)
        .collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        print!("{}", format_listing(&entries));
    }
    Ok(())
}

/// Formats the human-readable catalog listing.
pub fn format_listing(entries: &[&CatalogEntry]) -> String {
    let mut output = String::new();

    if entries.is_empty() {
        writeln!(output, "No matching catalog entries.").unwrap();
        return output;
    }

    for category in Category::ORDER {
        let section: Vec<_> = entries.iter().filter(|e| e.category == category).collect();
        if section.is_empty() {
            continue;
        }
        writeln!(output, "{} ({})", category.label(), category.code_range()).unwrap();
        for entry in section {
            let marker = if entry.hidden_from_picker { " (auto)" } else { "" };
            writeln!(
                output,
                "  {:<12} {:>6} pt  {}{}",
                entry.code, entry.point_value, entry.name, marker
            )
            .unwrap();
        }
        writeln!(output).unwrap();
    }

    output
}
