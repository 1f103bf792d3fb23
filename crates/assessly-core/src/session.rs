use tracing::debug;

use crate::error::QueryError;
use crate::query::Query;
use crate::render::{self, DescriptionMode, Outcome, TableView};
use crate::sequence::{RequestToken, RequestTracker};
use crate::toggle::ToggleState;

/// Everything an adapter needs to draw the results area.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewState {
    pub loading: bool,
    pub table_visible: bool,
    pub table: TableView,
}

/// A submission that passed validation and should be sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingRequest {
    pub token: RequestToken,
    pub query: Query,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// A newer submission was issued after this one; the view was left alone.
    Stale,
}

/// Submit/complete/toggle state machine for the results area.
///
/// `begin` and `complete` are split so the network call can run anywhere:
/// the caller sends `PendingRequest::query` and hands the result back with
/// its token.
#[derive(Debug, Default)]
pub struct Session {
    mode: DescriptionMode,
    tracker: RequestTracker,
    view: ViewState,
}

impl Session {
    pub fn new(mode: DescriptionMode) -> Self {
        Self {
            mode,
            tracker: RequestTracker::new(),
            view: ViewState::default(),
        }
    }

    pub fn mode(&self) -> DescriptionMode {
        self.mode
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn is_loading(&self) -> bool {
        self.view.loading
    }

    /// Start a submission. Previous rows are cleared and the table hidden
    /// whether or not the input is usable.
    ///
    /// Empty input supersedes anything in flight and returns the error whose
    /// `alert()` text the caller shows; no request should be made.
    pub fn begin(&mut self, raw: &str) -> Result<PendingRequest, QueryError> {
        self.view.table.clear();
        self.view.table_visible = false;

        let query = match Query::parse(raw) {
            Ok(query) => query,
            Err(e) => {
                self.tracker.invalidate();
                self.view.loading = false;
                return Err(e);
            }
        };

        let token = self.tracker.issue();
        self.view.loading = true;
        debug!(%token, "submission started");
        Ok(PendingRequest { token, query })
    }

    /// Apply the result of the request identified by `token`.
    pub fn complete(&mut self, token: RequestToken, outcome: Outcome) -> Completion {
        if !self.tracker.is_latest(token) {
            debug!(%token, "discarding stale response");
            return Completion::Stale;
        }
        self.view.table = render::render(&outcome, self.mode);
        self.view.loading = false;
        self.view.table_visible = true;
        Completion::Applied
    }

    /// Flip the description of the item row at `row`.
    /// No-op (returns `None`) for message rows, out-of-range rows and the
    /// truncate mode.
    pub fn toggle(&mut self, row: usize) -> Option<ToggleState> {
        self.view.table.item_mut(row)?.toggle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::Recommendation;
    use crate::render::{Row, FETCH_ERROR_MESSAGE, NO_RESULTS_MESSAGE};

    fn items(n: usize) -> Vec<Recommendation> {
        (0..n)
            .map(|i| Recommendation {
                description: format!("description {i}"),
                url: format!("https://example.com/{i}"),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn begin_sets_loading_and_hides_table() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let pending = session.begin("  rust engineer ").unwrap();
        assert_eq!(pending.query.as_str(), "rust engineer");
        assert!(session.is_loading());
        assert!(!session.view().table_visible);
    }

    #[test]
    fn empty_input_is_rejected_without_loading() {
        let mut session = Session::new(DescriptionMode::Toggle);
        assert_eq!(session.begin("   "), Err(QueryError::Empty));
        assert!(!session.is_loading());
        assert!(session.view().table.is_empty());
    }

    #[test]
    fn begin_clears_previous_rows() {
        let mut session = Session::new(DescriptionMode::Truncate);
        let p = session.begin("one").unwrap();
        session.complete(p.token, Outcome::Loaded(items(3)));
        assert_eq!(session.view().table.len(), 3);

        session.begin("two").unwrap();
        assert!(session.view().table.is_empty());
        assert!(!session.view().table_visible);
    }

    #[test]
    fn completion_shows_table_and_stops_loading() {
        for outcome in [
            Outcome::Loaded(items(2)),
            Outcome::Loaded(vec![]),
            Outcome::Failed,
        ] {
            let mut session = Session::new(DescriptionMode::Toggle);
            let p = session.begin("query").unwrap();
            assert_eq!(session.complete(p.token, outcome), Completion::Applied);
            assert!(!session.is_loading());
            assert!(session.view().table_visible);
        }
    }

    #[test]
    fn failure_renders_one_error_row() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let p = session.begin("query").unwrap();
        session.complete(p.token, Outcome::Failed);
        assert_eq!(
            session.view().table.rows(),
            &[Row::Message(FETCH_ERROR_MESSAGE.into())]
        );
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let first = session.begin("first").unwrap();
        let second = session.begin("second").unwrap();

        // second resolves first, then the older response arrives
        assert_eq!(
            session.complete(second.token, Outcome::Loaded(vec![])),
            Completion::Applied
        );
        assert_eq!(
            session.complete(first.token, Outcome::Loaded(items(4))),
            Completion::Stale
        );
        assert_eq!(
            session.view().table.rows(),
            &[Row::Message(NO_RESULTS_MESSAGE.into())]
        );
    }

    #[test]
    fn stale_completion_keeps_loading_for_latest() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let first = session.begin("first").unwrap();
        let _second = session.begin("second").unwrap();
        assert_eq!(session.complete(first.token, Outcome::Failed), Completion::Stale);
        assert!(session.is_loading());
        assert!(session.view().table.is_empty());
    }

    #[test]
    fn empty_submit_supersedes_in_flight_request() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let first = session.begin("first").unwrap();
        assert!(session.begin("").is_err());
        assert_eq!(
            session.complete(first.token, Outcome::Loaded(items(1))),
            Completion::Stale
        );
        assert!(!session.is_loading());
        assert!(session.view().table.is_empty());
    }

    #[test]
    fn toggle_flips_item_rows_only() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let p = session.begin("q").unwrap();
        session.complete(p.token, Outcome::Loaded(items(2)));

        assert_eq!(session.toggle(1), Some(ToggleState::Expanded));
        assert_eq!(session.toggle(1), Some(ToggleState::Collapsed));
        assert_eq!(session.toggle(7), None);

        let rows: Vec<_> = session.view().table.items().collect();
        assert_eq!(rows[0].description.toggle_state(), Some(ToggleState::Collapsed));
    }

    #[test]
    fn toggle_is_noop_on_message_row_and_truncate_mode() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let p = session.begin("q").unwrap();
        session.complete(p.token, Outcome::Loaded(vec![]));
        assert_eq!(session.toggle(0), None);

        let mut session = Session::new(DescriptionMode::Truncate);
        let p = session.begin("q").unwrap();
        session.complete(p.token, Outcome::Loaded(items(1)));
        assert_eq!(session.toggle(0), None);
    }

    #[test]
    fn resubmit_resets_toggle_state() {
        let mut session = Session::new(DescriptionMode::Toggle);
        let p = session.begin("q").unwrap();
        session.complete(p.token, Outcome::Loaded(items(1)));
        session.toggle(0);

        let p = session.begin("q").unwrap();
        session.complete(p.token, Outcome::Loaded(items(1)));
        let row = session.view().table.items().next().unwrap();
        assert_eq!(row.description.toggle_state(), Some(ToggleState::Collapsed));
    }
}
