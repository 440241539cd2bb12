use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cms_sdk::{FieldOwner, FieldWidth, LayoutEntry};
use uuid::Uuid;

use crate::api::rest::dto::{
    CreateFieldRequest, EditorError, FieldDto, FieldWidthDto, MoveFieldRequest, SuccessResponse,
    UpdateFieldRequest, UpdatePositionsRequest, UpdateWidthRequest, UpdateWidthResponse,
};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::service::ConcreteAppServices;

/// Which registry the `{id}` segment of a field route names. Set per route group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerKind {
    ContentType,
    Component,
}

impl OwnerKind {
    #[must_use]
    pub fn owner(self, id: Uuid) -> FieldOwner {
        match self {
            OwnerKind::ContentType => FieldOwner::ContentType(id),
            OwnerKind::Component => FieldOwner::Component(id),
        }
    }
}

fn editor_error(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(EditorError {
            error: message.to_owned(),
        }),
    )
        .into_response()
}

pub async fn list_fields(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path(owner_id): Path<Uuid>,
) -> ApiResult<Json<Vec<FieldDto>>> {
    let fields = svc.fields.list(&ctx, kind.owner(owner_id)).await?;
    Ok(Json(fields.into_iter().map(Into::into).collect()))
}

pub async fn create_field(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path(owner_id): Path<Uuid>,
    Json(req): Json<CreateFieldRequest>,
) -> ApiResult<(StatusCode, Json<FieldDto>)> {
    let field = svc
        .fields
        .create(&ctx, kind.owner(owner_id), req.into())
        .await?;
    Ok((StatusCode::CREATED, Json(field.into())))
}

pub async fn get_field(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path((owner_id, field_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<FieldDto>> {
    let field = svc.fields.get(&ctx, kind.owner(owner_id), field_id).await?;
    Ok(Json(field.into()))
}

pub async fn update_field(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path((owner_id, field_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<UpdateFieldRequest>,
) -> ApiResult<Json<FieldDto>> {
    let field = svc
        .fields
        .update(&ctx, kind.owner(owner_id), field_id, req.into())
        .await?;
    Ok(Json(field.into()))
}

pub async fn delete_field(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path((owner_id, field_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    svc.fields
        .delete(&ctx, kind.owner(owner_id), field_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Full layout rewrite from the editor's drag-and-drop state. A missing or
/// unreadable body counts as no positions.
pub async fn update_positions(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path(owner_id): Path<Uuid>,
    body: Result<Json<UpdatePositionsRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let positions = body.ok().and_then(|Json(req)| req.positions);
    let Some(mut positions) = positions.filter(|p| !p.is_empty()) else {
        return Ok(editor_error(StatusCode::BAD_REQUEST, "No positions provided"));
    };
    positions.sort_by_key(|p| p.position);
    let entries: Vec<LayoutEntry> = positions
        .iter()
        .map(|p| LayoutEntry {
            field_id: p.id,
            row_group: p.row_group,
        })
        .collect();

    svc.fields
        .reorder(&ctx, kind.owner(owner_id), &entries)
        .await?;
    Ok(Json(SuccessResponse { success: true }).into_response())
}

pub async fn update_width(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path((owner_id, field_id)): Path<(Uuid, Uuid)>,
    body: Result<Json<UpdateWidthRequest>, JsonRejection>,
) -> ApiResult<Response> {
    let width = body
        .ok()
        .and_then(|Json(req)| req.width)
        .and_then(|w| w.parse::<FieldWidth>().ok());
    let Some(width) = width else {
        return Ok(editor_error(StatusCode::UNPROCESSABLE_ENTITY, "Invalid width"));
    };

    let field = svc
        .fields
        .set_width(&ctx, kind.owner(owner_id), field_id, width)
        .await?;
    Ok(Json(UpdateWidthResponse {
        success: true,
        field: FieldWidthDto {
            id: field.id,
            width: field.width.as_str().to_owned(),
        },
    })
    .into_response())
}

pub async fn move_field(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Extension(kind): Extension<OwnerKind>,
    Site(ctx): Site,
    Path((owner_id, field_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<MoveFieldRequest>,
) -> ApiResult<Json<Vec<FieldDto>>> {
    let fields = svc
        .fields
        .move_field(&ctx, kind.owner(owner_id), field_id, req.position)
        .await?;
    Ok(Json(fields.into_iter().map(Into::into).collect()))
}
