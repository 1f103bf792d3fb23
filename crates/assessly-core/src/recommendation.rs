use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// A loosely typed value as sent by the recommendation service.
///
/// The service does not commit to a type for most fields (`duration` arrives
/// as either `"30"` or `30`), so values are carried through as-is and only
/// turned into text when rendered.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Flag(bool),
    #[default]
    Missing,
}

impl FieldValue {
    /// True when the value is absent, null or an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            FieldValue::Missing => true,
            FieldValue::Text(s) => s.is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Flag(b) => write!(f, "{b}"),
            FieldValue::Missing => Ok(()),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<u64> for FieldValue {
    fn from(n: u64) -> Self {
        FieldValue::Number(n.into())
    }
}

/// One assessment record returned by the service.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    #[serde(default)]
    pub test_type: FieldValue,
    #[serde(default)]
    pub duration: FieldValue,
    #[serde(default)]
    pub adaptive_support: FieldValue,
    #[serde(default)]
    pub remote_support: FieldValue,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecommendRequest {
    pub query: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecommendResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recommended_assessments: Option<Vec<Recommendation>>,
}

impl RecommendResponse {
    pub fn new(items: Vec<Recommendation>) -> Self {
        Self {
            recommended_assessments: Some(items),
        }
    }

    /// The returned items; an absent or null list is empty.
    pub fn into_assessments(self) -> Vec<Recommendation> {
        self.recommended_assessments.unwrap_or_default()
    }
}

fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
