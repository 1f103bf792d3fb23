use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use assessly_core::{
    Completion, DescriptionMode, PendingRequest, RecommendResponse, RequestToken, Session,
    ViewState,
};
use assessly_service::{outcome_from, RecommendService, ServiceError};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use tokio::runtime::Handle;
use tracing::{debug, info};

use crate::components::results_table::ResultsTable;

/// What the app is currently doing
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Navigating the results table
    Normal,
    /// Typing the job description
    Input,
    /// Blocking alert, dismissed by any key
    Alert { message: String },
}

type Reply = (RequestToken, Result<RecommendResponse, ServiceError>);

pub struct App {
    service: Arc<dyn RecommendService>,
    runtime: Handle,
    session: Session,
    input: String,
    results: ResultsTable,
    mode: Mode,
    status_message: Option<String>,
    replies_tx: Sender<Reply>,
    replies_rx: Receiver<Reply>,
    /// Set by handle_key when the user wants to open a result link.
    /// The event loop hands it to the platform opener.
    pub open_request: Option<String>,
}

impl App {
    pub fn new(service: Arc<dyn RecommendService>, runtime: Handle, mode: DescriptionMode) -> Self {
        let (replies_tx, replies_rx) = mpsc::channel();
        Self {
            service,
            runtime,
            session: Session::new(mode),
            input: String::new(),
            results: ResultsTable::new(),
            mode: Mode::Input,
            status_message: None,
            replies_tx,
            replies_rx,
            open_request: None,
        }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn view(&self) -> &ViewState {
        self.session.view()
    }

    pub fn selected_row(&self) -> Option<usize> {
        self.results.selected()
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status_message.as_deref()
    }

    pub fn set_status(&mut self, msg: String) {
        self.status_message = Some(msg);
    }

    pub fn is_input_mode(&self) -> bool {
        matches!(self.mode, Mode::Input)
    }

    /// Ctrl+C always quits. `q` only quits from the results view: while typing
    /// it is text, and with an alert up it just dismisses the alert.
    pub fn is_quit_key(&self, key: &KeyEvent) -> bool {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return true;
        }
        key.code == KeyCode::Char('q') && matches!(self.mode, Mode::Normal)
    }

    /// Returns true if the event loop should use a poll timeout instead of blocking.
    pub fn needs_polling(&self) -> bool {
        self.session.is_loading()
    }

    /// Apply any responses that arrived since the last call.
    /// Called on timeout from the event loop.
    pub fn poll_responses(&mut self) {
        while let Ok((token, result)) = self.replies_rx.try_recv() {
            match self.session.complete(token, outcome_from(result)) {
                Completion::Applied => {
                    let count = self.session.view().table.items().count();
                    info!(%token, rows = count, "results rendered");
                    self.results.reset(count);
                }
                Completion::Stale => debug!(%token, "ignored superseded response"),
            }
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.status_message = None;

        match self.mode {
            Mode::Alert { .. } => self.mode = Mode::Input,
            Mode::Input => self.handle_input_key(key),
            Mode::Normal => self.handle_normal_key(key),
        }
    }

    fn handle_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit(),
            KeyCode::Esc => self.mode = Mode::Normal,
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
            }
            KeyCode::Char(c) => self.input.push(c),
            _ => {}
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('i') | KeyCode::Char('e') | KeyCode::Char('/') => {
                self.mode = Mode::Input;
            }
            KeyCode::Char('r') => self.submit(),
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('o') => {
                if let Some(url) = self.selected_url() {
                    if url.is_empty() {
                        self.status_message = Some("No link for this row".into());
                    } else {
                        self.open_request = Some(url);
                    }
                }
            }
            _ => self.results.handle_key(key),
        }
    }

    /// Validate the input and send it; the response arrives via `poll_responses`.
    fn submit(&mut self) {
        let PendingRequest { token, query } = match self.session.begin(&self.input) {
            Ok(pending) => pending,
            Err(e) => {
                self.results.reset(0);
                self.mode = Mode::Alert {
                    message: e.alert().to_string(),
                };
                return;
            }
        };
        self.results.reset(0);
        self.mode = Mode::Normal;
        info!(%token, "submitting query");

        let service = Arc::clone(&self.service);
        let tx = self.replies_tx.clone();
        self.runtime.spawn(async move {
            let result = service.recommend(&query).await;
            // The receiver only goes away when the app exits.
            let _ = tx.send((token, result));
        });
    }

    fn toggle_selected(&mut self) {
        if let Some(row) = self.results.selected() {
            if let Some(state) = self.session.toggle(row) {
                debug!(row, ?state, "description toggled");
            }
        }
    }

    fn selected_url(&self) -> Option<String> {
        let row = self.results.selected()?;
        self.session
            .view()
            .table
            .items()
            .nth(row)
            .map(|item| item.url.clone())
    }

    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(5),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.render_title_bar(frame, layout[0]);
        self.render_input(frame, layout[1]);
        self.results.render(
            frame,
            layout[2],
            self.session.view(),
            matches!(self.mode, Mode::Normal),
        );
        self.render_status_bar(frame, layout[3]);

        if let Mode::Alert { message } = &self.mode {
            self.render_alert(frame, message, area);
        }
    }

    fn render_title_bar(&self, frame: &mut Frame, area: Rect) {
        let mode = match self.session.mode() {
            DescriptionMode::Toggle => "toggle",
            DescriptionMode::Truncate => "truncate",
        };
        let title = Line::from(vec![
            Span::styled(" assessly ", Style::default().bold().fg(Color::Cyan)),
            Span::raw("| "),
            Span::styled("assessment recommendations", Style::default().fg(Color::Yellow)),
            Span::styled(format!(" ({mode})"), Style::default().fg(Color::DarkGray)),
        ]);
        frame.render_widget(title, area);
    }

    fn render_input(&self, frame: &mut Frame, area: Rect) {
        let border_style = if self.is_input_mode() {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(" Job description ");
        let paragraph = Paragraph::new(self.input.as_str())
            .block(block)
            .wrap(Wrap { trim: false });
        frame.render_widget(paragraph, area);
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        if let Some(ref msg) = self.status_message {
            let line = Line::from(Span::styled(
                format!(" {msg}"),
                Style::default().fg(Color::Green),
            ));
            frame.render_widget(line, area);
            return;
        }

        let hints = match &self.mode {
            Mode::Normal => vec![
                ("q", "quit"),
                ("i", "edit"),
                ("r", "resubmit"),
                ("j/k", "rows"),
                ("Enter", "read more/less"),
                ("o", "open link"),
            ],
            Mode::Input => vec![("Enter", "submit"), ("Ctrl+U", "clear"), ("Esc", "results")],
            Mode::Alert { .. } => vec![("any", "dismiss")],
        };

        let spans: Vec<Span> = hints
            .into_iter()
            .flat_map(|(key, desc)| {
                vec![
                    Span::styled(format!(" {key}"), Style::default().fg(Color::Yellow).bold()),
                    Span::raw(format!(" {desc} ")),
                ]
            })
            .collect();

        frame.render_widget(Line::from(spans), area);
    }

    fn render_alert(&self, frame: &mut Frame, message: &str, area: Rect) {
        let popup = centered_rect(50, 20, area);
        frame.render_widget(Clear, popup);

        let block = Block::default()
            .title(" Alert ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));

        let text = format!("{message}\n\n(any key) OK");
        let paragraph = Paragraph::new(text)
            .block(block)
            .wrap(Wrap { trim: false })
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, popup);
    }
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
