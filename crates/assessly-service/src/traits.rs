use assessly_core::{Query, RecommendResponse};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("service error {status}: {message}")]
    Rejected { status: u16, message: String },

    #[error("internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// True when the service itself answered with a well-formed error body,
    /// as opposed to the request never completing or the reply being garbage.
    pub fn is_answered(&self) -> bool {
        !matches!(self, Self::Internal(_))
    }
}

/// Abstraction over the remote recommendation engine.
///
/// The interactive client and the one-shot command program against this
/// trait. `HttpService` talks to the real service; tests substitute their
/// own implementations.
#[async_trait]
pub trait RecommendService: Send + Sync {
    async fn health_check(&self) -> Result<(), ServiceError>;
    async fn recommend(&self, query: &Query) -> Result<RecommendResponse, ServiceError>;
}
