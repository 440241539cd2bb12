use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::Json;
use uuid::Uuid;

use crate::api::rest::dto::{ComponentDto, CreateComponentRequest, UpdateComponentRequest};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::service::ConcreteAppServices;

pub async fn list_components(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
) -> ApiResult<Json<Vec<ComponentDto>>> {
    let items = svc.components.list(&ctx).await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}

pub async fn create_component(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Json(req): Json<CreateComponentRequest>,
) -> ApiResult<(StatusCode, Json<ComponentDto>)> {
    let component = svc.components.create(&ctx, req.into()).await?;
    Ok((StatusCode::CREATED, Json(component.into())))
}

pub async fn get_component(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
) -> ApiResult<Json<ComponentDto>> {
    let component = svc.components.get(&ctx, id).await?;
    Ok(Json(component.into()))
}

pub async fn update_component(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateComponentRequest>,
) -> ApiResult<Json<ComponentDto>> {
    let component = svc.components.update(&ctx, id, req.into()).await?;
    Ok(Json(component.into()))
}

pub async fn delete_component(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    svc.components.delete(&ctx, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
