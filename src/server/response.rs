use crate::error::MockError;
use crate::model::ResponseEnvelope;
use may_minihttp::Response;
use serde::Serialize;
use serde_json::Value;
use tracing::error;

pub(crate) fn status_reason(status: u16) -> &'static str {
    match status {
        200 => "OK",
        400 => "Bad Request",
        404 => "Not Found",
        405 => "Method Not Allowed",
        500 => "Internal Server Error",
        _ => "OK",
    }
}

/// Serialize `body` as the JSON response with `status`.
pub fn write_json<T: Serialize>(res: &mut Response, status: u16, body: &T) {
    let bytes = match serde_json::to_vec(body) {
        Ok(bytes) => bytes,
        Err(e) => {
            error!(error = %e, "Response serialization failed");
            res.status_code(500, status_reason(500));
            res.header("Content-Type: application/json");
            res.body_vec(
                br#"{"code":1,"data":null,"msg":"response serialization failed"}"#.to_vec(),
            );
            return;
        }
    };
    res.status_code(status as usize, status_reason(status));
    res.header("Content-Type: application/json");
    res.body_vec(bytes);
}

pub fn write_envelope(res: &mut Response, status: u16, envelope: &ResponseEnvelope) {
    write_json(res, status, envelope);
}

/// `{ code: 0, data, msg: "success" }` with status 200.
pub fn write_success(res: &mut Response, data: Value) {
    write_envelope(res, 200, &ResponseEnvelope::success(data));
}

/// Failure envelope with the status the error maps to.
pub fn write_error(res: &mut Response, err: &MockError) {
    write_envelope(res, err.status_code(), &ResponseEnvelope::from(err));
}
