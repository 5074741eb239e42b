//! Router core: resolves a dynamic request against the stored definitions.

use super::pagination::Pagination;
use crate::error::{MockError, Result};
use crate::model::{is_placeholder, MockEndpoint, MockMethod, ResponseEnvelope};
use crate::store::MockStore;
use http::Method;
use regex::Regex;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Definition selected for a request plus the placeholder values it captured.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub endpoint: MockEndpoint,
    /// Path parameters extracted from the URL (e.g., `{id}` → `("id", "123")`)
    pub path_params: Vec<(String, String)>,
}

impl RouteMatch {
    /// Get a path parameter by name; the last occurrence wins.
    #[must_use]
    pub fn get_path_param(&self, name: &str) -> Option<&str> {
        self.path_params
            .iter()
            .rfind(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Matches requests against whatever the store holds at request time.
///
/// There is no cached routing table: definitions saved or deleted through the
/// management API are visible on the next request.
#[derive(Clone)]
pub struct MockRouter {
    store: Arc<dyn MockStore>,
}

impl MockRouter {
    pub fn new(store: Arc<dyn MockStore>) -> Self {
        Self { store }
    }

    /// Find the definition whose method and path pattern match the request.
    ///
    /// Literal paths are tried before paths with placeholders, so
    /// `GET /api/user` always resolves to the list definition.
    ///
    /// # Errors
    ///
    /// - `NotFound` when nothing matches (including unsupported methods)
    /// - `Storage` when the store cannot be read
    pub fn match_route(&self, method: &Method, path: &str) -> Result<RouteMatch> {
        debug!(method = %method, path = %path, "Route match attempt");
        let start = Instant::now();

        let Some(mock_method) = MockMethod::from_http(method) else {
            warn!(method = %method, path = %path, "Unsupported method for mock routes");
            return Err(MockError::not_found("endpoint not found"));
        };
        let request_path = normalize_path(path);

        let mut candidates: Vec<MockEndpoint> = self
            .store
            .get_all()?
            .into_iter()
            .filter(|e| e.method == mock_method)
            .collect();
        candidates.sort_by(|a, b| {
            a.is_detail()
                .cmp(&b.is_detail())
                .then_with(|| a.path.cmp(&b.path))
        });

        for endpoint in candidates {
            let (regex, names) = Self::path_to_regex(&endpoint.path)?;
            let Some(caps) = regex.captures(request_path) else {
                continue;
            };
            let path_params: Vec<(String, String)> = names
                .into_iter()
                .zip(caps.iter().skip(1))
                .filter_map(|(name, m)| m.map(|m| (name, m.as_str().to_string())))
                .collect();
            info!(
                method = %method,
                path = %path,
                route_pattern = %endpoint.path,
                mock_id = %endpoint.id,
                path_params = ?path_params,
                duration_us = start.elapsed().as_micros() as u64,
                "Route matched"
            );
            return Ok(RouteMatch {
                endpoint,
                path_params,
            });
        }

        warn!(
            method = %method,
            path = %path,
            duration_us = start.elapsed().as_micros() as u64,
            "No route matched"
        );
        Err(MockError::not_found("endpoint not found"))
    }

    /// Resolve the request and produce the response envelope to send.
    ///
    /// List definitions are paginated with `page` / `pageSize` from `query`;
    /// everything else returns the stored response body verbatim.
    ///
    /// # Errors
    ///
    /// Same as [`MockRouter::match_route`].
    pub fn respond(
        &self,
        method: &Method,
        path: &str,
        query: &HashMap<String, String>,
    ) -> Result<ResponseEnvelope> {
        let matched = self.match_route(method, path)?;
        let endpoint = &matched.endpoint;
        if !endpoint.is_list() {
            return Ok(endpoint.response_body.clone());
        }
        let pagination = Pagination::from_query(query);
        let entity = endpoint.entity()?;
        debug!(
            entity = %entity,
            page = pagination.page,
            page_size = pagination.page_size,
            "Paginating list response"
        );
        Ok(pagination.apply(&endpoint.response_body, &entity))
    }

    /// Convert a stored path pattern to a regex and extract parameter names
    ///
    /// Both `{id}` and `:id` segments become `([^/]+)`; literal segments are
    /// escaped.
    ///
    /// ```rust,ignore
    /// let (regex, params) = MockRouter::path_to_regex("/api/user/{id}")?;
    /// assert_eq!(params, vec!["id"]);
    /// assert!(regex.is_match("/api/user/123"));
    /// ```
    pub(crate) fn path_to_regex(path: &str) -> Result<(Regex, Vec<String>)> {
        let path = normalize_path(path);
        if path == "/" {
            let regex = Regex::new(r"^/$")
                .map_err(|e| MockError::validation(format!("invalid path pattern: {e}")))?;
            return Ok((regex, Vec::new()));
        }

        let mut pattern = String::with_capacity(path.len() + 8);
        pattern.push('^');
        let mut param_names = Vec::new();

        for segment in path.split('/').filter(|s| !s.is_empty()) {
            if is_placeholder(segment) {
                let name = segment
                    .trim_start_matches(':')
                    .trim_start_matches('{')
                    .trim_end_matches('}');
                pattern.push_str("/([^/]+)");
                param_names.push(name.to_string());
            } else {
                pattern.push('/');
                pattern.push_str(&regex::escape(segment));
            }
        }

        pattern.push('$');
        let regex = Regex::new(&pattern)
            .map_err(|e| MockError::validation(format!("invalid path pattern '{path}': {e}")))?;
        Ok((regex, param_names))
    }
}

/// Drop a trailing slash, keeping the root as `/`.
fn normalize_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}
