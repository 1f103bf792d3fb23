use assessly_core::{Completion, Outcome, QueryError, RecommendResponse, Session};
use tracing::{error, info, warn};

use crate::{RecommendService, ServiceError};

/// Map a service result onto what the table should show.
///
/// Any error the service answered with a JSON body carries no
/// `recommended_assessments`, so it renders as an empty result; the detail
/// only goes to the log. Transport failures and unreadable bodies are logged
/// as errors and collapse into the generic failure row.
pub fn outcome_from(result: Result<RecommendResponse, ServiceError>) -> Outcome {
    match result {
        Ok(resp) => Outcome::Loaded(resp.into_assessments()),
        Err(ServiceError::NotFound(msg)) => {
            info!("service returned no assessments: {msg}");
            Outcome::Loaded(Vec::new())
        }
        Err(e) if e.is_answered() => {
            warn!("service rejected the query: {e}");
            Outcome::Loaded(Vec::new())
        }
        Err(e) => {
            error!("recommendation request failed: {e}");
            Outcome::Failed
        }
    }
}

/// Run one submission end to end: validate, call the service, render.
///
/// Returns `Err` only for unusable input, in which case no request was made
/// and the caller should show `QueryError::alert`.
pub async fn submit<S: RecommendService + ?Sized>(
    service: &S,
    session: &mut Session,
    raw: &str,
) -> Result<Completion, QueryError> {
    let pending = session.begin(raw)?;
    let result = service.recommend(&pending.query).await;
    Ok(session.complete(pending.token, outcome_from(result)))
}
