use thiserror::Error;

/// Message shown to the user when a submission has no usable text.
pub const EMPTY_QUERY_ALERT: &str = "Please enter a job description!";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QueryError {
    #[error("query is empty")]
    Empty,
}

impl QueryError {
    /// The user-facing alert text for this error.
    pub fn alert(&self) -> &'static str {
        match self {
            QueryError::Empty => EMPTY_QUERY_ALERT,
        }
    }
}
