use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::rest::dto::{ContentTypeDto, CreateContentTypeRequest, UpdateContentTypeRequest};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::service::ConcreteAppServices;

pub async fn list_content_types(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
) -> ApiResult<Json<Vec<ContentTypeDto>>> {
    let items = svc.content_types.list(&ctx).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create_content_type(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Json(req): Json<CreateContentTypeRequest>,
) -> ApiResult<(StatusCode, Json<ContentTypeDto>)> {
    let ct = svc.content_types.create(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(ct.into())))
}

pub async fn get_content_type(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ContentTypeDto>> {
    let ct = svc.content_types.get(&ctx, id).await?;
    Ok(Json(ct.into()))
}

pub async fn update_content_type(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateContentTypeRequest>,
) -> ApiResult<Json<ContentTypeDto>> {
    let ct = svc.content_types.update(&ctx, id, req.into()).await?;
    Ok(Json(ct.into()))
}

pub async fn delete_content_type(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    svc.content_types.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
