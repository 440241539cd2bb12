use axum::body::{Body, to_bytes};
use axum::extract::Request;
use axum::http::{HeaderMap, StatusCode, header};
use axum::middleware::Next;
use axum::response::Response;
use serde_json::Value;

use super::problem::{APPLICATION_PROBLEM_JSON, Problem};
use crate::domain::error::DomainError;

pub type ApiResult<T> = Result<T, Problem>;

const ERROR_BASE: &str = "https://errors.cms.local";
const MAX_PROBLEM_BYTES: usize = 64 * 1024;

impl From<DomainError> for Problem {
    fn from(e: DomainError) -> Self {
        let (status, code, title, detail) = match &e {
            DomainError::Validation { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CMS_VALIDATION",
                "Validation Failed",
                format!("Validation error on '{field}': {message}"),
            ),
            DomainError::InvalidFieldType { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CMS_INVALID_FIELD_TYPE",
                "Invalid Field Type",
                e.to_string(),
            ),
            DomainError::TypeMismatch { .. } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CMS_TYPE_MISMATCH",
                "Type Mismatch",
                e.to_string(),
            ),
            DomainError::InvalidLayout { reason } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "CMS_INVALID_LAYOUT",
                "Invalid Layout",
                reason.clone(),
            ),
            DomainError::DuplicateName { .. } => (
                StatusCode::CONFLICT,
                "CMS_DUPLICATE_NAME",
                "Conflict",
                e.to_string(),
            ),
            DomainError::Conflict { message } => (
                StatusCode::CONFLICT,
                "CMS_CONFLICT",
                "Conflict",
                message.clone(),
            ),
            DomainError::NotFound { .. } => (
                StatusCode::NOT_FOUND,
                "CMS_NOT_FOUND",
                "Not Found",
                e.to_string(),
            ),
            DomainError::SchemaGeneration { .. } | DomainError::Database { .. } => {
                tracing::error!(error = %e, "Internal error occurred");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CMS_INTERNAL",
                    "Internal Server Error",
                    "An internal error occurred".to_owned(),
                )
            }
        };

        let mut problem = Problem::new(status, title, detail)
            .with_type(format!("{ERROR_BASE}/{code}"))
            .with_code(code);
        if let Some(id) = tracing::Span::current().id() {
            problem = problem.with_trace_id(id.into_u64().to_string());
        }
        problem
    }
}

/// Trace id from the usual propagation headers.
pub fn extract_trace_id(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-trace-id")
        .or_else(|| headers.get("x-request-id"))
        .or_else(|| headers.get("traceparent"))
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn is_problem_response(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with(APPLICATION_PROBLEM_JSON))
}

/// Fill `instance` and `trace_id` of problem responses from the request.
pub async fn problem_context(request: Request, next: Next) -> Response {
    let instance = request.uri().path().to_owned();
    let trace_id = extract_trace_id(request.headers());

    let response = next.run(request).await;
    if !is_problem_response(&response) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let Ok(bytes) = to_bytes(body, MAX_PROBLEM_BYTES).await else {
        return Response::from_parts(parts, Body::empty());
    };
    let Ok(Value::Object(mut doc)) = serde_json::from_slice::<Value>(&bytes) else {
        return Response::from_parts(parts, Body::from(bytes));
    };

    if doc.get("instance").and_then(Value::as_str).is_none_or(str::is_empty) {
        doc.insert("instance".to_owned(), Value::String(instance));
    }
    if let Some(id) = trace_id {
        doc.insert("trace_id".to_owned(), Value::String(id));
    }

    match serde_json::to_vec(&doc) {
        Ok(body) => {
            parts.headers.remove(header::CONTENT_LENGTH);
            Response::from_parts(parts, Body::from(body))
        }
        Err(_) => Response::from_parts(parts, Body::from(bytes)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        let cases = [
            (DomainError::validation("slug", "bad"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::invalid_field_type("date"), StatusCode::UNPROCESSABLE_ENTITY),
            (DomainError::invalid_layout("gap"), StatusCode::UNPROCESSABLE_ENTITY),
            (
                DomainError::type_mismatch("views", "integer", "string"),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (DomainError::duplicate_name("Field", "title"), StatusCode::CONFLICT),
            (DomainError::conflict("single"), StatusCode::CONFLICT),
            (DomainError::not_found("Content", "x"), StatusCode::NOT_FOUND),
            (DomainError::database("locked"), StatusCode::INTERNAL_SERVER_ERROR),
            (
                DomainError::schema_generation("dup"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(Problem::from(err).status, status);
        }
    }

    #[test]
    fn internal_details_are_not_leaked() {
        let p = Problem::from(DomainError::database("no such table: fields"));
        assert_eq!(p.detail, "An internal error occurred");
        assert_eq!(p.code, "CMS_INTERNAL");
        assert_eq!(p.type_url, "https://errors.cms.local/CMS_INTERNAL");
    }

    #[test]
    fn trace_id_prefers_explicit_header() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "req-1".parse().unwrap());
        assert_eq!(extract_trace_id(&headers).as_deref(), Some("req-1"));
        headers.insert("x-trace-id", "trace-9".parse().unwrap());
        assert_eq!(extract_trace_id(&headers).as_deref(), Some("trace-9"));
    }
}
