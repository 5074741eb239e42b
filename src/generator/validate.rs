//! Acceptance checks for endpoint definitions returned by the backend.
//!
//! Every reply passes three gates before it becomes a [`MockEndpoint`]:
//!
//! 1. JSON Schema validation of the raw value (shape, envelope, list payload)
//! 2. Deserialization into the typed [`EndpointDraft`]
//! 3. Semantic checks against what was requested (entity segment, method, path shape)

use super::archetype::Archetype;
use crate::error::{MockError, Result};
use crate::ids::MockId;
use crate::model::{is_placeholder, list_key, MockEndpoint, MockMethod, ResponseEnvelope, ID_PLACEHOLDER};
use serde::Deserialize;
use serde_json::{json, Map, Value};

/// Typed view of one reply, before an id is assigned.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EndpointDraft {
    pub path: String,
    pub method: String,
    pub description: String,
    #[serde(default)]
    pub request_body: Option<Map<String, Value>>,
    pub response_body: ResponseEnvelope,
}

/// JSON Schema a reply for `archetype` on `entity` must satisfy.
#[must_use]
pub fn reply_schema(archetype: Archetype, entity: &str) -> Value {
    let mut envelope = json!({
        "type": "object",
        "required": ["code", "data", "msg"],
        "properties": {
            "code": { "type": "integer" },
            "msg": { "type": "string" }
        }
    });
    if archetype.is_list() {
        let key = list_key(entity);
        let mut properties = Map::new();
        properties.insert(key.clone(), json!({ "type": "array" }));
        properties.insert("total".to_string(), json!({ "type": "integer", "minimum": 0 }));
        envelope["properties"]["data"] = json!({
            "type": "object",
            "required": [key, "total"],
            "properties": properties
        });
    }

    let mut required = vec!["path", "method", "description", "responseBody"];
    if archetype.method().has_request_body() {
        required.push("requestBody");
    }
    let request_body = if archetype.method().has_request_body() {
        json!({ "type": "object" })
    } else {
        json!({ "type": ["object", "null"] })
    };

    json!({
        "type": "object",
        "required": required,
        "properties": {
            "path": { "type": "string", "pattern": "^/api/" },
            "method": { "type": "string" },
            "description": { "type": "string" },
            "requestBody": request_body,
            "responseBody": envelope
        }
    })
}

/// Strip Markdown code fences some backends wrap JSON replies in.
#[must_use]
pub fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map_or("", |(_, body)| body);
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parse and validate one reply, assigning a fresh id on success.
///
/// # Errors
///
/// Returns `Generation` naming the archetype and the first violations found.
pub fn accept_reply(archetype: Archetype, entity: &str, reply: &str) -> Result<MockEndpoint> {
    let value: Value = serde_json::from_str(strip_code_fences(reply)).map_err(|e| {
        MockError::generation(format!("{archetype}: reply is not valid JSON: {e}"))
    })?;

    let schema = reply_schema(archetype, entity);
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| MockError::generation(format!("{archetype}: invalid reply schema: {e}")))?;
    let violations: Vec<String> = validator
        .iter_errors(&value)
        .take(5)
        .map(|e| e.to_string())
        .collect();
    if !violations.is_empty() {
        return Err(MockError::generation(format!(
            "{archetype}: reply failed validation: {}",
            violations.join("; ")
        )));
    }

    let draft: EndpointDraft = serde_json::from_value(value)
        .map_err(|e| MockError::generation(format!("{archetype}: malformed reply: {e}")))?;
    accept_draft(archetype, entity, draft)
}

/// Semantic checks on a typed draft.
///
/// # Errors
///
/// Returns `Generation` on an entity, method or path-shape mismatch.
pub fn accept_draft(archetype: Archetype, entity: &str, draft: EndpointDraft) -> Result<MockEndpoint> {
    let expected_method = archetype.method();
    let method: MockMethod = draft.method.parse().map_err(|_| {
        MockError::generation(format!(
            "{archetype}: unsupported method '{}'",
            draft.method
        ))
    })?;
    if method != expected_method {
        return Err(MockError::generation(format!(
            "{archetype}: expected method {expected_method}, got {method}"
        )));
    }

    let path = canonical_path(archetype, entity, &draft.path)?;

    let request_body = if method.has_request_body() {
        draft.request_body
    } else {
        None
    };

    Ok(MockEndpoint {
        id: MockId::new(),
        path,
        method,
        description: draft.description,
        request_body,
        response_body: draft.response_body,
    })
}

/// Check the path shape for `archetype` and normalize the placeholder to `{id}`.
fn canonical_path(archetype: Archetype, entity: &str, path: &str) -> Result<String> {
    let segments: Vec<&str> = path
        .trim()
        .trim_end_matches('/')
        .split('/')
        .filter(|s| !s.is_empty())
        .collect();

    let entity_ok = segments.first() == Some(&"api") && segments.get(1) == Some(&entity);
    if !entity_ok {
        return Err(MockError::generation(format!(
            "{archetype}: path '{path}' does not start with /api/{entity}"
        )));
    }

    let shape_ok = if archetype.is_detail() {
        segments.len() == 3 && is_placeholder(segments[2])
    } else {
        segments.len() == 2
    };
    if !shape_ok {
        return Err(MockError::generation(format!(
            "{archetype}: path '{path}' should be {}",
            archetype.expected_path(entity)
        )));
    }

    Ok(if archetype.is_detail() {
        format!("/api/{entity}/{ID_PLACEHOLDER}")
    } else {
        format!("/api/{entity}")
    })
}
