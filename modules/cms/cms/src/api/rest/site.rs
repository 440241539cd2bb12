use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::StatusCode;
use axum::http::request::Parts;
use cms_sdk::SiteContext;

use super::problem::Problem;
use crate::domain::service::ConcreteAppServices;

pub const SITE_HEADER: &str = "x-site-id";

/// Site of the request: the `x-site-id` header, else the configured default.
#[derive(Debug, Clone, Copy)]
pub struct Site(pub SiteContext);

impl<S: Send + Sync> FromRequestParts<S> for Site {
    type Rejection = Problem;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        if let Some(raw) = parts.headers.get(SITE_HEADER) {
            let site_id = raw
                .to_str()
                .ok()
                .and_then(|s| s.trim().parse::<i64>().ok())
                .ok_or_else(|| {
                    Problem::new(
                        StatusCode::BAD_REQUEST,
                        "Bad Request",
                        format!("{SITE_HEADER} must be an integer"),
                    )
                    .with_code("CMS_BAD_SITE")
                })?;
            return Ok(Self(SiteContext::new(site_id)));
        }

        let default = parts
            .extensions
            .get::<Arc<ConcreteAppServices>>()
            .map_or(0, |svc| svc.config().default_site_id);
        Ok(Self(SiteContext::new(default)))
    }
}
