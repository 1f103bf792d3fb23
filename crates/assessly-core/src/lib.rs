pub mod error;
pub mod html;
pub mod query;
pub mod recommendation;
pub mod render;
pub mod sequence;
pub mod session;
pub mod toggle;

pub use error::QueryError;
pub use query::Query;
pub use recommendation::{FieldValue, RecommendRequest, RecommendResponse, Recommendation};
pub use render::{DescriptionMode, Outcome, Row, TableView};
pub use sequence::{RequestToken, RequestTracker};
pub use session::{Completion, PendingRequest, Session, ViewState};
pub use toggle::ToggleState;
