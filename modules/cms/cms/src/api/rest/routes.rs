use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Json, Router, middleware};
use utoipa::OpenApi;

use crate::api::rest::handlers::fields::OwnerKind;
use crate::api::rest::handlers::{
    components, content_types, contents, docs, fields, public, values,
};
use crate::api::rest::{dto, error, problem};
use crate::domain::service::ConcreteAppServices;

/// Schemas of the admin API, served at `/admin/v1/openapi.json`.
#[derive(OpenApi)]
#[openapi(
    info(title = "CMS Admin API", version = "1.0.0"),
    components(schemas(
        problem::Problem,
        dto::ContentTypeDto,
        dto::CreateContentTypeRequest,
        dto::UpdateContentTypeRequest,
        dto::ComponentDto,
        dto::CreateComponentRequest,
        dto::UpdateComponentRequest,
        dto::FieldDto,
        dto::CreateFieldRequest,
        dto::UpdateFieldRequest,
        dto::PositionEntry,
        dto::UpdatePositionsRequest,
        dto::UpdateWidthRequest,
        dto::UpdateWidthResponse,
        dto::FieldWidthDto,
        dto::MoveFieldRequest,
        dto::SuccessResponse,
        dto::EditorError,
        dto::ContentDto,
        dto::CreateContentRequest,
        dto::UpdateContentRequest,
        dto::PageQuery,
        dto::PageMeta,
        dto::SetValueRequest,
        dto::ValueDto,
    ))
)]
pub struct AdminApiDoc;

async fn admin_openapi() -> Json<utoipa::openapi::OpenApi> {
    Json(AdminApiDoc::openapi())
}

/// Field routes for one owner registry, mounted under `prefix/{id}/fields`.
fn field_routes(prefix: &str, kind: OwnerKind) -> Router {
    let base = format!("{prefix}/{{id}}/fields");
    Router::new()
        .route(&base, get(fields::list_fields).post(fields::create_field))
        .route(
            &format!("{base}/update_positions"),
            post(fields::update_positions),
        )
        .route(
            &format!("{base}/{{field_id}}"),
            get(fields::get_field)
                .patch(fields::update_field)
                .delete(fields::delete_field),
        )
        .route(
            &format!("{base}/{{field_id}}/update_width"),
            axum::routing::patch(fields::update_width),
        )
        .route(&format!("{base}/{{field_id}}/move"), post(fields::move_field))
        .layer(Extension(kind))
}

fn admin_routes() -> Router {
    const CONTENT_TYPES: &str = "/admin/v1/content-types";
    const COMPONENTS: &str = "/admin/v1/components";

    Router::new()
        .route("/admin/v1/openapi.json", get(admin_openapi))
        .route(
            CONTENT_TYPES,
            get(content_types::list_content_types).post(content_types::create_content_type),
        )
        .route(
            &format!("{CONTENT_TYPES}/{{id}}"),
            get(content_types::get_content_type)
                .patch(content_types::update_content_type)
                .delete(content_types::delete_content_type),
        )
        .route(
            &format!("{CONTENT_TYPES}/{{id}}/contents"),
            get(contents::list_contents).post(contents::create_content),
        )
        .route(
            &format!("{CONTENT_TYPES}/{{id}}/contents/{{content_id}}"),
            get(contents::get_content)
                .patch(contents::update_content)
                .delete(contents::delete_content),
        )
        .route(
            COMPONENTS,
            get(components::list_components).post(components::create_component),
        )
        .route(
            &format!("{COMPONENTS}/{{id}}"),
            get(components::get_component)
                .patch(components::update_component)
                .delete(components::delete_component),
        )
        .route(
            "/admin/v1/contents/{content_id}/values/{field_id}",
            get(values::get_value)
                .put(values::set_value)
                .delete(values::clear_value),
        )
        .merge(field_routes(CONTENT_TYPES, OwnerKind::ContentType))
        .merge(field_routes(COMPONENTS, OwnerKind::Component))
}

fn docs_routes() -> Router {
    Router::new()
        .route("/api/docs", get(docs::docs))
        .route("/api/docs.json", get(docs::docs_json))
        .route("/api/docs.yaml", get(docs::docs_yaml))
}

fn public_routes() -> Router {
    Router::new()
        .route(
            "/api/v1/{slug}",
            get(public::get_entries).put(public::put_single),
        )
        .route("/api/v1/{slug}/{id}", get(public::get_entry))
}

/// Complete CMS router with the service stack attached.
pub fn router(services: Arc<ConcreteAppServices>) -> Router {
    Router::new()
        .merge(admin_routes())
        .merge(docs_routes())
        .merge(public_routes())
        .layer(middleware::from_fn(error::problem_context))
        .layer(Extension(services))
}
