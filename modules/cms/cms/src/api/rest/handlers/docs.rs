use std::sync::Arc;

use axum::extract::Extension;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use utoipa::openapi::OpenApi;

use crate::api::rest::site::Site;
use crate::domain::openapi::stub_document;
use crate::domain::service::ConcreteAppServices;

const YAML: &str = "application/yaml";

const DOCS_PAGE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <title>API Documentation</title>
  <link rel="stylesheet" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css" />
</head>
<body>
  <div id="swagger-ui"></div>
  <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
  <script>
    window.ui = SwaggerUIBundle({ url: "/api/docs.json", dom_id: "#swagger-ui" });
  </script>
</body>
</html>
"##;

const ERROR_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8" /><title>API Documentation Temporarily Unavailable</title></head>
<body>
  <h1>API Documentation Temporarily Unavailable</h1>
  <p>The API documentation could not be generated. Please try again later.</p>
</body>
</html>
"#;

/// Representation picked from the `Accept` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocsFormat {
    Html,
    Json,
    Yaml,
}

impl DocsFormat {
    #[must_use]
    pub fn negotiate(headers: &HeaderMap) -> Self {
        let accept = headers
            .get(header::ACCEPT)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        if accept.contains("application/yaml")
            || accept.contains("application/x-yaml")
            || accept.contains("text/yaml")
        {
            DocsFormat::Yaml
        } else if accept.contains("application/json") {
            DocsFormat::Json
        } else {
            DocsFormat::Html
        }
    }
}

fn render(format: DocsFormat, doc: &OpenApi, status: StatusCode) -> Response {
    match format {
        DocsFormat::Html => (status, Html(DOCS_PAGE)).into_response(),
        DocsFormat::Json => (status, axum::Json(doc)).into_response(),
        DocsFormat::Yaml => match serde_yaml::to_string(doc) {
            Ok(body) => (
                status,
                [(header::CONTENT_TYPE, HeaderValue::from_static(YAML))],
                body,
            )
                .into_response(),
            Err(e) => {
                tracing::error!(error = %e, "Failed to serialize API docs as YAML");
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        },
    }
}

async fn serve(svc: &ConcreteAppServices, site: Site, format: DocsFormat) -> Response {
    match svc.docs.generate_schema(&site.0).await {
        Ok(doc) => render(format, &doc, StatusCode::OK),
        Err(e) => {
            tracing::error!(error = %e, site_id = site.0.site_id, "API docs generation failed");
            match format {
                DocsFormat::Html => {
                    (StatusCode::INTERNAL_SERVER_ERROR, Html(ERROR_PAGE)).into_response()
                }
                DocsFormat::Json | DocsFormat::Yaml => {
                    render(format, &stub_document(), StatusCode::INTERNAL_SERVER_ERROR)
                }
            }
        }
    }
}

pub async fn docs(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    site: Site,
    headers: HeaderMap,
) -> Response {
    serve(&svc, site, DocsFormat::negotiate(&headers)).await
}

pub async fn docs_json(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    site: Site,
) -> Response {
    serve(&svc, site, DocsFormat::Json).await
}

pub async fn docs_yaml(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    site: Site,
) -> Response {
    serve(&svc, site, DocsFormat::Yaml).await
}
