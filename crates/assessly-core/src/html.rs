//! `<tbody>` markup for the browser results page.
//!
//! The page owns `#results-table`, `#loading` and `#job-description`; this
//! module only produces the rows that go inside the table body.

use std::fmt::Write;

use crate::render::{DescriptionCell, ItemRow, Row, TableView, COLUMN_COUNT, LINK_LABEL};

pub fn render_tbody(table: &TableView) -> String {
    let mut out = String::new();
    for row in table.rows() {
        match row {
            Row::Message(text) => {
                let _ = writeln!(
                    out,
                    "<tr><td colspan='{COLUMN_COUNT}'>{}</td></tr>",
                    escape(text)
                );
            }
            Row::Item(item) => write_item(&mut out, item),
        }
    }
    out
}

fn write_item(out: &mut String, item: &ItemRow) {
    out.push_str("<tr>");
    for cell in [
        &item.test_type,
        &item.duration,
        &item.adaptive_support,
        &item.remote_support,
    ] {
        let _ = write!(out, "<td>{}</td>", escape(cell));
    }

    match &item.description {
        DescriptionCell::Truncated(text) => {
            let _ = write!(out, "<td>{}</td>", escape(text));
        }
        DescriptionCell::Expandable { full, state } => {
            let id = item.key.description_id();
            let class = if state.is_expanded() {
                "description expanded"
            } else {
                "description"
            };
            let _ = write!(
                out,
                "<td><div class=\"{class}\" id=\"{id}\">{}</div>\
                 <button class=\"toggle-btn\" data-target=\"{id}\" data-row=\"{}\">{}</button></td>",
                escape(full),
                item.key.index(),
                state.label(),
            );
        }
    }

    let _ = writeln!(
        out,
        "<td><a href=\"{}\" target=\"_blank\">{LINK_LABEL}</a></td></tr>",
        escape(&item.url)
    );
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Recommendation;
    use crate::render::{render, render_items, DescriptionMode, Outcome};

    fn sample() -> Recommendation {
        Recommendation {
            test_type: "Knowledge & Skills".into(),
            duration: 20u64.into(),
            adaptive_support: "No".into(),
            remote_support: "Yes".into(),
            description: "Measures <script> knowledge".into(),
            url: "https://example.com/view?id=1&x=2".into(),
        }
    }

    #[test]
    fn message_row_spans_all_columns() {
        let html = render_tbody(&render(&Outcome::Loaded(vec![]), DescriptionMode::Toggle));
        assert_eq!(html, "<tr><td colspan='6'>No recommendations found.</td></tr>\n");
    }

    #[test]
    fn item_row_escapes_text() {
        let html = render_tbody(&render_items(&[sample()], DescriptionMode::Truncate));
        assert!(html.contains("<td>Knowledge &amp; Skills</td>"));
        assert!(html.contains("Measures &lt;script&gt; knowledge..."));
        assert!(html.contains(
            "<a href=\"https://example.com/view?id=1&amp;x=2\" target=\"_blank\">View</a>"
        ));
        assert_eq!(html.matches("<td").count(), 6);
    }

    #[test]
    fn toggle_row_is_keyed_by_index() {
        let mut table = render_items(&[sample(), sample()], DescriptionMode::Toggle);
        table.item_mut(1).unwrap().toggle();
        let html = render_tbody(&table);

        assert!(html.contains("<div class=\"description\" id=\"desc-0\">"));
        assert!(html.contains("data-row=\"0\">Read more</button>"));
        assert!(html.contains("<div class=\"description expanded\" id=\"desc-1\">"));
        assert!(html.contains("data-row=\"1\">Read less</button>"));
    }
}
