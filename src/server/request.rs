use may_minihttp::Request;
use serde_json::Value;
use std::collections::HashMap;
use std::io::Read;
use std::time::Instant;
use tracing::{debug, info};

/// Parsed HTTP request data used by `AppService`.
#[derive(Debug, PartialEq)]
pub struct ParsedRequest {
    /// HTTP method (GET, POST, etc.)
    pub method: String,
    /// Request path without the query string
    pub path: String,
    /// HTTP headers (lowercase keys)
    pub headers: HashMap<String, String>,
    /// Parsed query string parameters
    pub query_params: HashMap<String, String>,
    /// Parsed JSON body; `None` when absent or not valid JSON
    pub body: Option<Value>,
}

impl ParsedRequest {
    /// String field of a JSON object body, if present.
    #[must_use]
    pub fn body_str(&self, field: &str) -> Option<&str> {
        self.body.as_ref()?.get(field)?.as_str()
    }
}

/// Parse query string parameters from a URL path
///
/// Extracts everything after the `?` character and URL-decodes parameter names
/// and values. Repeated names keep the last value.
///
/// ```rust,ignore
/// let q = parse_query_params("/api/user?page=2&pageSize=5");
/// assert_eq!(q.get("page").map(String::as_str), Some("2"));
/// ```
pub fn parse_query_params(path: &str) -> HashMap<String, String> {
    match path.split_once('?') {
        Some((_, query)) => url::form_urlencoded::parse(query.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        None => HashMap::new(),
    }
}

/// Parse an incoming `may_minihttp` request.
///
/// The body is read last since reading it consumes the request.
pub fn parse_request(req: Request) -> ParsedRequest {
    let method = req.method().to_string();
    let raw_path = req.path().to_string();
    let path = raw_path.split('?').next().unwrap_or("/").to_string();

    let headers: HashMap<String, String> = req
        .headers()
        .iter()
        .map(|h| {
            (
                h.name.to_ascii_lowercase(),
                String::from_utf8_lossy(h.value).to_string(),
            )
        })
        .collect();
    debug!(
        header_count = headers.len(),
        header_names = ?headers.keys().take(20).collect::<Vec<_>>(),
        "Headers extracted"
    );

    let query_params = parse_query_params(&raw_path);
    debug!(
        param_count = query_params.len(),
        query_params = ?query_params,
        "Query params parsed"
    );

    let parse_start = Instant::now();
    let mut raw_body = String::new();
    let body = match req.body().read_to_string(&mut raw_body) {
        Ok(size) if size > 0 => {
            let content_type = headers
                .get("content-type")
                .map(String::as_str)
                .unwrap_or("");
            debug!(
                body_size_bytes = size,
                content_type = %content_type,
                "Request body read"
            );
            let parsed = serde_json::from_str::<Value>(&raw_body);
            debug!(
                parse_duration_us = parse_start.elapsed().as_micros() as u64,
                valid_json = parsed.is_ok(),
                "JSON body parse attempted"
            );
            parsed.ok()
        }
        Ok(_) => None,
        Err(e) => {
            debug!(error = %e, "Request body unreadable");
            None
        }
    };

    info!(
        method = %method,
        path = %path,
        headers_count = headers.len(),
        has_body = body.is_some(),
        "HTTP request parsed"
    );

    ParsedRequest {
        method,
        path,
        headers,
        query_params,
        body,
    }
}
