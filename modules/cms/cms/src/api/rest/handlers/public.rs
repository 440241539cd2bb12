//! Public content API. Routes resolve against the content types of the site:
//! a collection slug lists and serves records, a single slug serves its one
//! record.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::response::{IntoResponse, Response};
use cms_sdk::RouteShape;
use serde_json::{Map, Value};

use crate::api::rest::dto::{PageDto, PageQuery};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::error::DomainError;
use crate::domain::service::ConcreteAppServices;

/// `GET /api/v1/{slug}`: paginated list for a collection, the document for a single.
pub async fn get_entries(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(slug): Path<String>,
    Query(q): Query<PageQuery>,
) -> ApiResult<Response> {
    let routes = &svc.content_types;
    if routes.resolve_route(&ctx, &slug, RouteShape::Collection).await? {
        let page = svc
            .contents
            .public_list(&ctx, &slug, q.page, q.per_page)
            .await?;
        return Ok(Json(PageDto::<Value>::from(page)).into_response());
    }
    if routes.resolve_route(&ctx, &slug, RouteShape::Single).await? {
        let doc = svc.contents.public_single(&ctx, &slug).await?;
        return Ok(Json(doc).into_response());
    }
    Err(DomainError::not_found("ContentType", slug).into())
}

/// `GET /api/v1/{slug}/{id}`: one published record of a collection, by id or slug.
pub async fn get_entry(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((slug, id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    if !svc
        .content_types
        .resolve_route(&ctx, &slug, RouteShape::Collection)
        .await?
    {
        return Err(DomainError::not_found("ContentType", slug).into());
    }
    let doc = svc.contents.public_get(&ctx, &slug, &id).await?;
    Ok(Json(doc))
}

/// `PUT /api/v1/{slug}`: write the record of a single type.
pub async fn put_single(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(slug): Path<String>,
    Json(body): Json<Map<String, Value>>,
) -> ApiResult<Json<Value>> {
    if !svc
        .content_types
        .resolve_route(&ctx, &slug, RouteShape::Single)
        .await?
    {
        return Err(DomainError::not_found("ContentType", slug).into());
    }
    let doc = svc.contents.upsert_single(&ctx, &slug, &body).await?;
    Ok(Json(doc))
}
