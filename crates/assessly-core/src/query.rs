use std::fmt;

use crate::error::QueryError;
use crate::recommendation::RecommendRequest;

/// A job description ready to be sent: trimmed and never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn parse(raw: &str) -> Result<Self, QueryError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(QueryError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn to_request(&self) -> RecommendRequest {
        RecommendRequest {
            query: self.0.clone(),
        }
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_surrounding_whitespace() {
        let q = Query::parse("  Java developer, 40 minutes \n").unwrap();
        assert_eq!(q.as_str(), "Java developer, 40 minutes");
    }

    #[test]
    fn empty_and_whitespace_rejected() {
        assert_eq!(Query::parse(""), Err(QueryError::Empty));
        assert_eq!(Query::parse(" \t\n  "), Err(QueryError::Empty));
    }

    #[test]
    fn request_body_shape() {
        let q = Query::parse(" analyst ").unwrap();
        let body = serde_json::to_value(q.to_request()).unwrap();
        assert_eq!(body, serde_json::json!({ "query": "analyst" }));
    }

    #[test]
    fn empty_alert_text() {
        assert_eq!(QueryError::Empty.alert(), "Please enter a job description!");
    }
}
