mod http;
mod submit;
mod traits;

#[cfg(feature = "test-helpers")]
pub mod test_helpers;

pub use http::HttpService;
pub use submit::{outcome_from, submit};
pub use traits::{RecommendService, ServiceError};
