//! Plain-text rendering for the one-shot `query` command.

use std::fmt::Write;

use assessly_core::render::{DescriptionCell, ItemRow, COLUMN_HEADERS};
use assessly_core::{Row, TableView};

pub fn render_text(table: &TableView) -> String {
    let mut out = String::new();
    for row in table.rows() {
        match row {
            Row::Message(text) => {
                let _ = writeln!(out, "{text}");
            }
            Row::Item(item) => write_item(&mut out, item),
        }
    }
    out
}

fn write_item(out: &mut String, item: &ItemRow) {
    let _ = writeln!(out, "{}. {}", item.key.index() + 1, item.test_type);
    for (label, value) in COLUMN_HEADERS[1..4].iter().zip([
        &item.duration,
        &item.adaptive_support,
        &item.remote_support,
    ]) {
        let _ = writeln!(out, "   {:<18} {}", format!("{label}:"), value);
    }
    // Nothing to click in a report, so expandable cells print in full.
    let description = match &item.description {
        DescriptionCell::Truncated(text) => text.as_str(),
        DescriptionCell::Expandable { full, .. } => full.as_str(),
    };
    let _ = writeln!(out, "   {:<18} {}", "Description:", description);
    let _ = writeln!(out, "   {:<18} {}", "Link:", item.url);
    out.push('\n');
}
