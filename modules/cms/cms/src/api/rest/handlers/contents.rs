use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path, Query};
use axum::http::StatusCode;
use cms_sdk::{NewContent, ContentPatch, SiteContext};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::api::rest::dto::{
    ContentDto, CreateContentRequest, PageDto, PageQuery, UpdateContentRequest,
};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::error::DomainError;
use crate::domain::service::ConcreteAppServices;
use crate::domain::values::render;

/// Stored values of a record keyed by field name.
async fn value_map(
    svc: &ConcreteAppServices,
    ctx: &SiteContext,
    content_id: Uuid,
) -> Result<Map<String, Value>, DomainError> {
    let values = svc.values.values_for(ctx, content_id).await?;
    Ok(values
        .into_iter()
        .map(|(field, value)| (field.name, render(field.field_type, &value)))
        .collect())
}

pub async fn list_contents(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(content_type_id): Path<Uuid>,
    Query(q): Query<PageQuery>,
) -> ApiResult<Json<PageDto<ContentDto>>> {
    let page = svc
        .contents
        .list(&ctx, content_type_id, q.page, q.per_page)
        .await?;
    Ok(Json(page.into()))
}

pub async fn create_content(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(content_type_id): Path<Uuid>,
    Json(req): Json<CreateContentRequest>,
) -> ApiResult<(StatusCode, Json<ContentDto>)> {
    let new = NewContent::try_from(req)?;
    let content = svc.contents.create(&ctx, content_type_id, new).await?;
    let values = value_map(&svc, &ctx, content.id).await?;
    Ok((
        StatusCode::CREATED,
        Json(ContentDto::from(content).with_values(values)),
    ))
}

pub async fn get_content(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_type_id, content_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ContentDto>> {
    let content = svc.contents.get(&ctx, content_type_id, content_id).await?;
    let values = value_map(&svc, &ctx, content.id).await?;
    Ok(Json(ContentDto::from(content).with_values(values)))
}

pub async fn update_content(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_type_id, content_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateContentRequest>,
) -> ApiResult<Json<ContentDto>> {
    let patch = ContentPatch::try_from(req)?;
    let content = svc
        .contents
        .update(&ctx, content_type_id, content_id, patch)
        .await?;
    let values = value_map(&svc, &ctx, content.id).await?;
    Ok(Json(ContentDto::from(content).with_values(values)))
}

pub async fn delete_content(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_type_id, content_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    svc.contents
        .delete(&ctx, content_type_id, content_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
