//! Wire contract of the remote numbers service.
//!
//! Every endpoint answers with the same envelope `{ value, cause, success }`;
//! only the type of `value` differs.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const VALIDATE_PATH: &str = "api/numbers/validate";

/// One of the two remote datasets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dataset {
    A,
    B,
}

impl Dataset {
    pub fn as_str(self) -> &'static str {
        match self {
            Dataset::A => "A",
            Dataset::B => "B",
        }
    }
}

impl fmt::Display for Dataset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Response envelope shared by all endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    #[serde(alias = "Value")]
    pub value: Option<T>,
    #[serde(alias = "Cause")]
    pub cause: Option<String>,
    #[serde(default, alias = "Success")]
    pub success: bool,
}

/// Session initialization outcome. `value` is an opaque token the pipeline
/// reports but does not otherwise consume.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InitResult {
    pub success: bool,
    pub value: Option<String>,
    pub cause: Option<String>,
}

impl InitResult {
    pub fn failed(cause: impl Into<String>) -> Self {
        Self {
            success: false,
            value: None,
            cause: Some(cause.into()),
        }
    }
}

pub fn init_path(dimension: usize) -> String {
    format!("api/numbers/init/{dimension}")
}

pub fn row_path(dataset: Dataset, index: usize) -> String {
    format!("api/numbers/{dataset}/row/{index}")
}

/// Init responses carry the value either as a string or as a number.
pub(crate) fn value_to_string(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Null => None,
        serde_json::Value::String(s) => Some(s),
        other => Some(other.to_string()),
    }
}
