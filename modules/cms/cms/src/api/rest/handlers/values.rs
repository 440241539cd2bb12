use std::sync::Arc;

use axum::Json;
use axum::extract::{Extension, Path};
use axum::http::StatusCode;
use uuid::Uuid;

use crate::api::rest::dto::{SetValueRequest, ValueDto};
use crate::api::rest::error::ApiResult;
use crate::api::rest::site::Site;
use crate::domain::error::DomainError;
use crate::domain::service::ConcreteAppServices;
use crate::domain::values::render;

pub async fn get_value(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_id, field_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<Json<ValueDto>> {
    let field = svc
        .values
        .values_for(&ctx, content_id)
        .await?
        .into_iter()
        .find(|(f, _)| f.id == field_id);

    let dto = match field {
        Some((field, value)) => ValueDto {
            content_id,
            field_id,
            value_kind: Some(value.kind().as_str().to_owned()),
            value: render(field.field_type, &value),
        },
        None => {
            // Still reject fields that do not belong to the record's type.
            svc.values.get_value(&ctx, content_id, field_id).await?;
            ValueDto {
                content_id,
                field_id,
                value_kind: None,
                value: serde_json::Value::Null,
            }
        }
    };
    Ok(Json(dto))
}

pub async fn set_value(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_id, field_id)): Path<(Uuid, Uuid)>,
    Json(req): Json<SetValueRequest>,
) -> ApiResult<Json<ValueDto>> {
    let binding = svc
        .values
        .set_value(&ctx, content_id, field_id, &req.value)
        .await?;
    let (field, value) = svc
        .values
        .values_for(&ctx, content_id)
        .await?
        .into_iter()
        .find(|(f, _)| f.id == field_id)
        .ok_or_else(|| DomainError::not_found("Value", field_id))?;
    Ok(Json(ValueDto::from_binding(
        &binding,
        render(field.field_type, &value),
    )))
}

pub async fn clear_value(
    Extension(svc): Extension<Arc<ConcreteAppServices>>,
    Site(ctx): Site,
    Path((content_id, field_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    if svc.values.clear_value(&ctx, content_id, field_id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(DomainError::not_found("Value", field_id).into())
    }
}
