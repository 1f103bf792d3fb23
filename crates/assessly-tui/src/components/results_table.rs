use assessly_core::render::{ItemRow, LINK_LABEL};
use assessly_core::{Row as ResultRow, ViewState};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

const HEADERS: [&str; 6] = ["Test Type", "Duration", "Adaptive", "Remote", "Description", "Link"];
const FIXED_WIDTHS: [u16; 5] = [20, 9, 9, 9, 6];
const IDLE_HINT: &str = "Type a job description and press Enter.";

/// Results area: loading indicator, message row, or the item table.
pub struct ResultsTable {
    state: TableState,
    row_count: usize,
}

impl Default for ResultsTable {
    fn default() -> Self {
        Self::new()
    }
}

impl ResultsTable {
    pub fn new() -> Self {
        Self {
            state: TableState::default(),
            row_count: 0,
        }
    }

    /// Forget the old selection after the rows were rebuilt.
    pub fn reset(&mut self, row_count: usize) {
        self.row_count = row_count;
        self.state.select(if row_count > 0 { Some(0) } else { None });
    }

    pub fn selected(&self) -> Option<usize> {
        self.state.selected()
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if self.row_count == 0 {
            return;
        }
        let current = self.state.selected().unwrap_or(0);
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if current + 1 < self.row_count {
                    self.state.select(Some(current + 1));
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                if current > 0 {
                    self.state.select(Some(current - 1));
                }
            }
            KeyCode::Char('g') => self.state.select(Some(0)),
            KeyCode::Char('G') => self.state.select(Some(self.row_count - 1)),
            _ => {}
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, view: &ViewState, focused: bool) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .title(" Recommendations ")
            .borders(Borders::ALL)
            .border_style(border_style);

        if view.loading {
            let loading = Paragraph::new("Loading...")
                .block(block)
                .style(Style::default().fg(Color::Yellow))
                .alignment(Alignment::Center);
            frame.render_widget(loading, area);
            return;
        }
        if !view.table_visible {
            let hint = Paragraph::new(IDLE_HINT)
                .block(block)
                .style(Style::default().fg(Color::DarkGray))
                .alignment(Alignment::Center);
            frame.render_widget(hint, area);
            return;
        }
        if let Some(ResultRow::Message(text)) = view.table.rows().first() {
            let message = Paragraph::new(text.as_str())
                .block(block)
                .wrap(Wrap { trim: true })
                .alignment(Alignment::Center);
            frame.render_widget(message, area);
            return;
        }

        let fixed: u16 = FIXED_WIDTHS.iter().sum();
        // borders, column spacing and the highlight symbol
        let description_width = area.width.saturating_sub(fixed + 2 + 5 + 2).max(10);

        let rows: Vec<Row> = view
            .table
            .items()
            .map(|item| item_row(item, description_width))
            .collect();

        let widths = [
            Constraint::Length(FIXED_WIDTHS[0]),
            Constraint::Length(FIXED_WIDTHS[1]),
            Constraint::Length(FIXED_WIDTHS[2]),
            Constraint::Length(FIXED_WIDTHS[3]),
            Constraint::Min(10),
            Constraint::Length(FIXED_WIDTHS[4]),
        ];

        let header = Row::new(HEADERS).style(Style::default().bold().fg(Color::Yellow));
        let table = Table::new(rows, widths)
            .header(header)
            .block(block)
            .row_highlight_style(Style::default().bg(Color::DarkGray))
            .highlight_symbol("> ");

        let mut state = self.state.clone();
        frame.render_stateful_widget(table, area, &mut state);
    }
}

fn item_row(item: &ItemRow, description_width: u16) -> Row<'_> {
    let text = item.description.visible_text();
    let mut lines: Vec<Line> = wrap(&text, description_width as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    if let Some(label) = item.description.toggle_label() {
        lines.push(Line::from(Span::styled(
            format!("[{label}]"),
            Style::default().fg(Color::Yellow),
        )));
    }
    let height = lines.len() as u16;

    Row::new(vec![
        Cell::from(item.test_type.as_str()),
        Cell::from(item.duration.as_str()),
        Cell::from(item.adaptive_support.as_str()),
        Cell::from(item.remote_support.as_str()),
        Cell::from(Text::from(lines)),
        Cell::from(Span::styled(
            LINK_LABEL,
            Style::default().fg(Color::Cyan).underlined(),
        )),
    ])
    .height(height)
}

/// Greedy word wrap by character count.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use assessly_core::render::render;
    use assessly_core::{DescriptionMode, Outcome, Recommendation};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn reset_selects_first_row() {
        let mut table = ResultsTable::new();
        table.reset(3);
        assert_eq!(table.selected(), Some(0));
        table.reset(0);
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut table = ResultsTable::new();
        table.reset(3);
        table.handle_key(key(KeyCode::Char('k')));
        assert_eq!(table.selected(), Some(0));
        table.handle_key(key(KeyCode::Char('j')));
        table.handle_key(key(KeyCode::Down));
        table.handle_key(key(KeyCode::Char('j')));
        assert_eq!(table.selected(), Some(2));
        table.handle_key(key(KeyCode::Char('g')));
        assert_eq!(table.selected(), Some(0));
        table.handle_key(key(KeyCode::Char('G')));
        assert_eq!(table.selected(), Some(2));
    }

    #[test]
    fn navigation_ignored_without_rows() {
        let mut table = ResultsTable::new();
        table.handle_key(key(KeyCode::Char('j')));
        assert_eq!(table.selected(), None);
    }

    #[test]
    fn wrap_breaks_on_words() {
        assert_eq!(
            wrap("measures numerical reasoning under time pressure", 20),
            vec!["measures numerical", "reasoning under time", "pressure"]
        );
    }

    #[test]
    fn wrap_keeps_long_words_whole() {
        assert_eq!(wrap("supercalifragilistic a", 5), vec!["supercalifragilistic", "a"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn truncated_description_is_wrapped_not_clipped() {
        // "w00 w01 ... w39": the first 100 characters end with "w24 ".
        let description = (0..40)
            .map(|i| format!("w{i:02}"))
            .collect::<Vec<_>>()
            .join(" ");
        let item = Recommendation {
            description,
            ..Default::default()
        };
        let view = ViewState {
            loading: false,
            table_visible: true,
            table: render(&Outcome::Loaded(vec![item]), DescriptionMode::Truncate),
        };

        let mut terminal = Terminal::new(TestBackend::new(100, 20)).unwrap();
        let table = ResultsTable::new();
        terminal
            .draw(|f| table.render(f, f.area(), &view, true))
            .unwrap();
        let screen: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();

        assert!(screen.contains("w24"));
        assert!(screen.contains("..."));
        assert!(!screen.contains("w25"));
    }
}
