//! # Endpoint Model
//!
//! Data types shared by the generator, the store and the router:
//!
//! - [`MockEndpoint`] - one persisted mock definition (path, method, canned response)
//! - [`MockMethod`] - the closed set of HTTP methods a definition may use
//! - [`ResponseEnvelope`] - the uniform `{ code, data, msg }` wrapper
//!
//! Paths always start with `/api/<entity>`; detail operations append a single
//! placeholder segment (`/api/<entity>/{id}`).

use crate::error::{MockError, Result};
use crate::ids::MockId;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Prefix every generated path lives under.
pub const API_PREFIX: &str = "/api/";

/// Canonical placeholder for detail paths.
pub const ID_PLACEHOLDER: &str = "{id}";

static ENTITY_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/api/([^/{]+)").expect("entity segment regex should be valid"));

/// HTTP methods a mock definition can answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MockMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl MockMethod {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            MockMethod::Get => "GET",
            MockMethod::Post => "POST",
            MockMethod::Put => "PUT",
            MockMethod::Delete => "DELETE",
        }
    }

    /// Whether definitions with this method carry a `requestBody`.
    #[must_use]
    pub fn has_request_body(&self) -> bool {
        matches!(self, MockMethod::Post | MockMethod::Put)
    }

    /// Map an `http::Method`; anything outside GET/POST/PUT/DELETE is `None`.
    #[must_use]
    pub fn from_http(method: &http::Method) -> Option<Self> {
        match *method {
            http::Method::GET => Some(MockMethod::Get),
            http::Method::POST => Some(MockMethod::Post),
            http::Method::PUT => Some(MockMethod::Put),
            http::Method::DELETE => Some(MockMethod::Delete),
            _ => None,
        }
    }
}

impl fmt::Display for MockMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MockMethod {
    type Err = MockError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GET" => Ok(MockMethod::Get),
            "POST" => Ok(MockMethod::Post),
            "PUT" => Ok(MockMethod::Put),
            "DELETE" => Ok(MockMethod::Delete),
            other => Err(MockError::validation(format!(
                "unsupported method '{other}'"
            ))),
        }
    }
}

/// Uniform response wrapper: `code = 0` means success by convention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResponseEnvelope {
    pub code: i64,
    pub data: Value,
    pub msg: String,
}

impl ResponseEnvelope {
    pub fn success(data: Value) -> Self {
        Self {
            code: 0,
            data,
            msg: "success".to_string(),
        }
    }

    pub fn failure(msg: impl Into<String>) -> Self {
        Self {
            code: 1,
            data: Value::Null,
            msg: msg.into(),
        }
    }
}

impl From<&MockError> for ResponseEnvelope {
    fn from(err: &MockError) -> Self {
        ResponseEnvelope::failure(err.message())
    }
}

/// One persisted mock endpoint definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MockEndpoint {
    pub id: MockId,
    pub path: String,
    pub method: MockMethod,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_body: Option<Map<String, Value>>,
    pub response_body: ResponseEnvelope,
}

impl MockEndpoint {
    /// Entity segment of this definition's path.
    pub fn entity(&self) -> Result<String> {
        entity_from_path(&self.path).map(str::to_string)
    }

    /// Detail paths carry a placeholder segment after the entity.
    #[must_use]
    pub fn is_detail(&self) -> bool {
        self.path
            .trim_end_matches('/')
            .split('/')
            .nth(3)
            .is_some_and(is_placeholder)
    }

    /// A list endpoint is a `GET` without a placeholder segment.
    #[must_use]
    pub fn is_list(&self) -> bool {
        self.method == MockMethod::Get && !self.is_detail()
    }
}

/// Extract the entity segment from `/api/<entity>...`.
///
/// # Errors
///
/// Returns `Validation` when the path is not under `/api/` or the entity
/// segment is empty.
pub fn entity_from_path(path: &str) -> Result<&str> {
    ENTITY_SEGMENT
        .captures(path)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| MockError::validation(format!("invalid api path '{path}'")))
}

/// `{name}` or `:name` path segment.
#[must_use]
pub fn is_placeholder(segment: &str) -> bool {
    (segment.len() > 2 && segment.starts_with('{') && segment.ends_with('}'))
        || (segment.len() > 1 && segment.starts_with(':'))
}

/// Key holding the item array inside a list response, e.g. `user_list`.
#[must_use]
pub fn list_key(entity: &str) -> String {
    format!("{entity}_list")
}

#[must_use]
pub fn list_path(entity: &str) -> String {
    format!("{API_PREFIX}{entity}")
}

#[must_use]
pub fn detail_path(entity: &str) -> String {
    format!("{API_PREFIX}{entity}/{ID_PLACEHOLDER}")
}
