//! Pure rendering of a submission outcome into table rows.
//!
//! Nothing here touches a terminal or a document; adapters (`crate::html`,
//! the TUI table component, the plain-text report) consume [`TableView`].

use std::borrow::Cow;

use crate::recommendation::Recommendation;
use crate::toggle::ToggleState;

pub const COLUMN_COUNT: usize = 6;
pub const COLUMN_HEADERS: [&str; COLUMN_COUNT] = [
    "Test Type",
    "Duration",
    "Adaptive Support",
    "Remote Support",
    "Description",
    "Link",
];

pub const NO_RESULTS_MESSAGE: &str = "No recommendations found.";
pub const FETCH_ERROR_MESSAGE: &str = "Error fetching data. Please try again.";
pub const MISSING_TEST_TYPE: &str = "N/A";
pub const LINK_LABEL: &str = "View";
pub const PREVIEW_CHARS: usize = 100;
pub const ELLIPSIS: &str = "...";

/// How the description column is presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DescriptionMode {
    /// First 100 characters plus an ellipsis.
    Truncate,
    /// Full text behind a Read more / Read less control.
    #[default]
    Toggle,
}

/// What a finished submission produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Loaded(Vec<Recommendation>),
    Failed,
}

/// Structural row key: the row's position in the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RowKey(pub usize);

impl RowKey {
    pub fn index(self) -> usize {
        self.0
    }

    /// Element id correlating a description with its toggle control.
    pub fn description_id(self) -> String {
        format!("desc-{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DescriptionCell {
    Truncated(String),
    Expandable { full: String, state: ToggleState },
}

impl DescriptionCell {
    /// Text currently visible in the cell.
    pub fn visible_text(&self) -> Cow<'_, str> {
        match self {
            DescriptionCell::Truncated(text) => Cow::Borrowed(text),
            DescriptionCell::Expandable { full, state } if state.is_expanded() => {
                Cow::Borrowed(full)
            }
            DescriptionCell::Expandable { full, .. } => preview(full),
        }
    }

    pub fn toggle_state(&self) -> Option<ToggleState> {
        match self {
            DescriptionCell::Truncated(_) => None,
            DescriptionCell::Expandable { state, .. } => Some(*state),
        }
    }

    /// Label of the Read more / Read less control, if the cell has one.
    pub fn toggle_label(&self) -> Option<&'static str> {
        self.toggle_state().map(ToggleState::label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemRow {
    pub key: RowKey,
    pub test_type: String,
    pub duration: String,
    pub adaptive_support: String,
    pub remote_support: String,
    pub description: DescriptionCell,
    pub url: String,
}

impl ItemRow {
    /// Flip the description between collapsed and expanded.
    /// Returns the new state, or `None` if the cell is not expandable.
    pub fn toggle(&mut self) -> Option<ToggleState> {
        match &mut self.description {
            DescriptionCell::Truncated(_) => None,
            DescriptionCell::Expandable { state, .. } => {
                *state = state.flip();
                Some(*state)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Row {
    Item(ItemRow),
    /// A single cell spanning all columns.
    Message(String),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableView {
    rows: Vec<Row>,
}

impl TableView {
    pub fn new(rows: Vec<Row>) -> Self {
        Self { rows }
    }

    pub fn message(text: &str) -> Self {
        Self::new(vec![Row::Message(text.to_string())])
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn clear(&mut self) {
        self.rows.clear();
    }

    pub fn item_mut(&mut self, index: usize) -> Option<&mut ItemRow> {
        match self.rows.get_mut(index)? {
            Row::Item(item) => Some(item),
            Row::Message(_) => None,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &ItemRow> {
        self.rows.iter().filter_map(|row| match row {
            Row::Item(item) => Some(item),
            Row::Message(_) => None,
        })
    }
}

pub fn render(outcome: &Outcome, mode: DescriptionMode) -> TableView {
    match outcome {
        Outcome::Loaded(items) => render_items(items, mode),
        Outcome::Failed => TableView::message(FETCH_ERROR_MESSAGE),
    }
}

pub fn render_items(items: &[Recommendation], mode: DescriptionMode) -> TableView {
    if items.is_empty() {
        return TableView::message(NO_RESULTS_MESSAGE);
    }
    let rows = items
        .iter()
        .enumerate()
        .map(|(i, item)| Row::Item(render_item(RowKey(i), item, mode)))
        .collect();
    TableView::new(rows)
}

fn render_item(key: RowKey, item: &Recommendation, mode: DescriptionMode) -> ItemRow {
    let test_type = if item.test_type.is_blank() {
        MISSING_TEST_TYPE.to_string()
    } else {
        item.test_type.to_string()
    };
    let description = match mode {
        DescriptionMode::Truncate => DescriptionCell::Truncated(truncate(&item.description)),
        DescriptionMode::Toggle => DescriptionCell::Expandable {
            full: item.description.clone(),
            state: ToggleState::Collapsed,
        },
    };
    ItemRow {
        key,
        test_type,
        duration: item.duration.to_string(),
        adaptive_support: item.adaptive_support.to_string(),
        remote_support: item.remote_support.to_string(),
        description,
        url: item.url.clone(),
    }
}

/// First [`PREVIEW_CHARS`] characters followed by the ellipsis.
/// The ellipsis is appended even when nothing was cut.
pub fn truncate(text: &str) -> String {
    let mut out: String = text.chars().take(PREVIEW_CHARS).collect();
    out.push_str(ELLIPSIS);
    out
}

/// Collapsed view of an expandable description: ellipsis only when cut.
fn preview(text: &str) -> Cow<'_, str> {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => Cow::Owned(format!("{}{ELLIPSIS}", &text[..cut])),
        None => Cow::Borrowed(text),
    }
}
