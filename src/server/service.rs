use super::request::{parse_request, ParsedRequest};
use super::response::{write_envelope, write_error, write_json, write_success};
use crate::error::{MockError, Result};
use crate::generator::{EndpointBatch, EndpointGenerator};
use crate::ids::MockId;
use crate::model::{MockEndpoint, ResponseEnvelope};
use crate::router::MockRouter;
use crate::store::MockStore;
use may_minihttp::{HttpService, Request, Response};
use serde_json::{json, Value};
use std::io;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Management routes live under this prefix; every other `/api/...` path is dynamic.
pub const MANAGEMENT_PATH: &str = "/api/mock";

/// HTTP front door: management API plus the dynamic mock routes.
#[derive(Clone)]
pub struct AppService {
    store: Arc<dyn MockStore>,
    generator: Arc<EndpointGenerator>,
    router: MockRouter,
}

impl AppService {
    pub fn new(store: Arc<dyn MockStore>, generator: Arc<EndpointGenerator>) -> Self {
        Self {
            router: MockRouter::new(Arc::clone(&store)),
            store,
            generator,
        }
    }

    /// Generate one batch for `description` and persist it.
    ///
    /// # Errors
    ///
    /// `Validation` for a missing or blank description, otherwise whatever
    /// generation or the store reports. Nothing is saved on failure.
    pub fn create_mocks(&self, description: Option<&str>) -> Result<Vec<MockEndpoint>> {
        let batch = self.generate(description)?;
        self.store.save_batch(&batch.endpoints)?;
        info!(
            entity = %batch.entity,
            count = batch.endpoints.len(),
            "Endpoint batch persisted"
        );
        Ok(batch.endpoints)
    }

    /// Same as [`AppService::create_mocks`] without persisting.
    pub fn preview_mocks(&self, description: Option<&str>) -> Result<Vec<MockEndpoint>> {
        Ok(self.generate(description)?.endpoints)
    }

    pub fn list_mocks(&self) -> Result<Vec<MockEndpoint>> {
        self.store.get_all()
    }

    /// Canned response body of one definition.
    pub fn get_mock(&self, id: &str) -> Result<ResponseEnvelope> {
        Ok(self.lookup(id)?.response_body)
    }

    /// Delete one definition by id.
    ///
    /// # Errors
    ///
    /// `NotFound` for an unknown id; `Storage` when the store reports nothing
    /// was removed after a successful lookup.
    pub fn delete_mock(&self, id: &str) -> Result<()> {
        let endpoint = self.lookup(id)?;
        if self.store.delete(&endpoint.id, &endpoint)? {
            Ok(())
        } else {
            Err(MockError::storage("failed to delete mock"))
        }
    }

    fn generate(&self, description: Option<&str>) -> Result<EndpointBatch> {
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| MockError::validation("description is required"))?;
        self.generator.generate_endpoint_set(description)
    }

    fn lookup(&self, id: &str) -> Result<MockEndpoint> {
        let id: MockId = id
            .parse()
            .map_err(|_| MockError::not_found("mock not found"))?;
        self.store
            .find(&id)?
            .ok_or_else(|| MockError::not_found("mock not found"))
    }

    fn handle(&self, req: &ParsedRequest, res: &mut Response) -> Result<()> {
        let method = req.method.as_str();
        let path = req.path.trim_end_matches('/');

        if path == MANAGEMENT_PATH {
            return match method {
                "GET" => {
                    write_success(res, to_value(&self.list_mocks()?)?);
                    Ok(())
                }
                "POST" => {
                    write_success(res, to_value(&self.create_mocks(req.body_str("description"))?)?);
                    Ok(())
                }
                _ => Err(MockError::not_found("endpoint not found")),
            };
        }

        if path == "/api/mock/generate" && method == "POST" {
            write_success(res, to_value(&self.preview_mocks(req.body_str("description"))?)?);
            return Ok(());
        }

        if let Some(id) = path
            .strip_prefix(MANAGEMENT_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|id| !id.contains('/'))
        {
            return match method {
                "GET" => {
                    write_success(res, to_value(&self.get_mock(id)?)?);
                    Ok(())
                }
                "DELETE" => {
                    self.delete_mock(id)?;
                    write_success(res, Value::Null);
                    Ok(())
                }
                _ => Err(MockError::not_found("endpoint not found")),
            };
        }

        let method: http::Method = method
            .parse()
            .map_err(|_| MockError::not_found("endpoint not found"))?;
        let envelope = self.router.respond(&method, &req.path, &req.query_params)?;
        write_envelope(res, 200, &envelope);
        Ok(())
    }
}

fn to_value<T: serde::Serialize>(value: &T) -> Result<Value> {
    serde_json::to_value(value)
        .map_err(|e| MockError::storage(format!("cannot encode response: {e}")))
}

/// Basic health check endpoint returning `{ "status": "ok" }`.
pub fn health_endpoint(res: &mut Response) -> io::Result<()> {
    write_json(res, 200, &json!({ "status": "ok" }));
    Ok(())
}

impl HttpService for AppService {
    fn call(&mut self, req: Request, res: &mut Response) -> io::Result<()> {
        let start = Instant::now();
        let parsed = parse_request(req);

        if parsed.method == "GET" && parsed.path == "/health" {
            return health_endpoint(res);
        }

        match self.handle(&parsed, res) {
            Ok(()) => info!(
                method = %parsed.method,
                path = %parsed.path,
                duration_ms = start.elapsed().as_millis() as u64,
                "Request handled"
            ),
            Err(e) => {
                warn!(
                    method = %parsed.method,
                    path = %parsed.path,
                    status = e.status_code(),
                    error = %e,
                    duration_ms = start.elapsed().as_millis() as u64,
                    "Request failed"
                );
                write_error(res, &e);
            }
        }
        Ok(())
    }
}
