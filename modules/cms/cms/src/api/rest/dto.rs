use cms_sdk::{
    Component, ComponentPatch, Content, ContentPatch, ContentStatus, ContentType,
    ContentTypePatch, ContentValue, Field, FieldOwner, FieldPatch, FieldWidth, NewComponent,
    NewContent, NewContentType, NewField,
};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use time::OffsetDateTime;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::service::PublicPage;

/// Absent stays `None`, explicit `null` becomes `Some(None)`.
fn double_option<'de, D, T>(d: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(d).map(Some)
}

fn parse_status(raw: Option<&str>) -> Result<Option<ContentStatus>, DomainError> {
    raw.map(|s| s.parse().map_err(|e: String| DomainError::validation("status", e)))
        .transpose()
}

// --- content types ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentTypeDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub site_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_single: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl From<ContentType> for ContentTypeDto {
    fn from(ct: ContentType) -> Self {
        Self {
            id: ct.id,
            site_id: ct.site_id,
            name: ct.name,
            slug: ct.slug,
            description: ct.description,
            is_single: ct.is_single,
            created_at: ct.created_at,
            updated_at: ct.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContentTypeRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub is_single: Option<bool>,
}

impl From<CreateContentTypeRequest> for NewContentType {
    fn from(req: CreateContentTypeRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            is_single: req.is_single,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContentTypeRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub is_single: Option<bool>,
}

impl From<UpdateContentTypeRequest> for ContentTypePatch {
    fn from(req: UpdateContentTypeRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            is_single: req.is_single,
        }
    }
}

// --- components ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub site_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub repeatable: bool,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl From<Component> for ComponentDto {
    fn from(c: Component) -> Self {
        Self {
            id: c.id,
            site_id: c.site_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            repeatable: c.repeatable,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateComponentRequest {
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repeatable: bool,
}

impl From<CreateComponentRequest> for NewComponent {
    fn from(req: CreateComponentRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            repeatable: req.repeatable,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateComponentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub repeatable: Option<bool>,
}

impl From<UpdateComponentRequest> for ComponentPatch {
    fn from(req: UpdateComponentRequest) -> Self {
        Self {
            name: req.name,
            slug: req.slug,
            description: req.description,
            repeatable: req.repeatable,
        }
    }
}

// --- fields ---

#[derive(Debug, Serialize, ToSchema)]
pub struct FieldDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = Option<String>)]
    pub content_type_id: Option<Uuid>,
    #[schema(value_type = Option<String>)]
    pub component_id: Option<Uuid>,
    pub name: String,
    pub field_type: String,
    pub field_type_label: String,
    pub description: Option<String>,
    pub required: bool,
    #[schema(value_type = Object)]
    pub options: Map<String, Value>,
    pub position: i32,
    pub width: String,
    pub row_group: Option<i32>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
}

impl From<Field> for FieldDto {
    fn from(f: Field) -> Self {
        let (content_type_id, component_id) = match f.owner {
            FieldOwner::ContentType(id) => (Some(id), None),
            FieldOwner::Component(id) => (None, Some(id)),
        };
        Self {
            id: f.id,
            content_type_id,
            component_id,
            name: f.name,
            field_type: f.field_type.as_str().to_owned(),
            field_type_label: f.field_type.label().to_owned(),
            description: f.description,
            required: f.required,
            options: f.options,
            position: f.position,
            width: f.width.as_str().to_owned(),
            row_group: f.row_group,
            created_at: f.created_at,
            updated_at: f.updated_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateFieldRequest {
    pub name: String,
    pub field_type: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub options: Map<String, Value>,
    #[serde(default)]
    pub position: Option<i32>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub width: Option<FieldWidth>,
}

impl From<CreateFieldRequest> for NewField {
    fn from(req: CreateFieldRequest) -> Self {
        Self {
            name: req.name,
            field_type: req.field_type,
            description: req.description,
            required: req.required,
            options: req.options,
            position: req.position,
            width: req.width,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateFieldRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub field_type: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub description: Option<Option<String>>,
    #[serde(default)]
    pub required: Option<bool>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub options: Option<Map<String, Value>>,
    #[serde(default)]
    #[schema(value_type = Option<String>)]
    pub width: Option<FieldWidth>,
}

impl From<UpdateFieldRequest> for FieldPatch {
    fn from(req: UpdateFieldRequest) -> Self {
        Self {
            name: req.name,
            field_type: req.field_type,
            description: req.description,
            required: req.required,
            options: req.options,
            width: req.width,
        }
    }
}

/// One entry of a layout rewrite as sent by the editor.
#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct PositionEntry {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub position: i32,
    #[serde(default)]
    pub row_group: Option<i32>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdatePositionsRequest {
    #[serde(default)]
    pub positions: Option<Vec<PositionEntry>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateWidthRequest {
    #[serde(default)]
    pub width: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct MoveFieldRequest {
    pub position: i32,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FieldWidthDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    pub width: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UpdateWidthResponse {
    pub success: bool,
    pub field: FieldWidthDto,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SuccessResponse {
    pub success: bool,
}

/// Plain `{error}` body used by the editor-facing layout endpoints.
#[derive(Debug, Serialize, ToSchema)]
pub struct EditorError {
    pub error: String,
}

// --- contents ---

#[derive(Debug, Serialize, ToSchema)]
pub struct ContentDto {
    #[schema(value_type = String)]
    pub id: Uuid,
    #[schema(value_type = String)]
    pub content_type_id: Uuid,
    pub slug: String,
    pub status: String,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub published_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    #[schema(value_type = Option<String>, format = DateTime)]
    pub unpublished_at: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: OffsetDateTime,
    /// Field values by name; present on single-record responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub values: Option<Map<String, Value>>,
}

impl From<Content> for ContentDto {
    fn from(c: Content) -> Self {
        Self {
            id: c.id,
            content_type_id: c.content_type_id,
            slug: c.slug,
            status: c.status.as_str().to_owned(),
            published_at: c.published_at,
            unpublished_at: c.unpublished_at,
            created_at: c.created_at,
            updated_at: c.updated_at,
            values: None,
        }
    }
}

impl ContentDto {
    #[must_use]
    pub fn with_values(mut self, values: Map<String, Value>) -> Self {
        self.values = Some(values);
        self
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateContentRequest {
    pub slug: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: Map<String, Value>,
}

impl TryFrom<CreateContentRequest> for NewContent {
    type Error = DomainError;

    fn try_from(req: CreateContentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: req.slug,
            status: parse_status(req.status.as_deref())?,
            values: req.values,
        })
    }
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateContentRequest {
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    #[schema(value_type = Object)]
    pub values: Map<String, Value>,
}

impl TryFrom<UpdateContentRequest> for ContentPatch {
    type Error = DomainError;

    fn try_from(req: UpdateContentRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            slug: req.slug,
            status: parse_status(req.status.as_deref())?,
            values: req.values,
        })
    }
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct PageQuery {
    pub page: Option<u64>,
    pub per_page: Option<u64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct PageMeta {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

#[derive(Debug, Serialize)]
pub struct PageDto<T> {
    pub data: Vec<T>,
    pub meta: PageMeta,
}

impl<T, U: From<T>> From<PublicPage<T>> for PageDto<U> {
    fn from(page: PublicPage<T>) -> Self {
        Self {
            data: page.data.into_iter().map(U::from).collect(),
            meta: PageMeta {
                current_page: page.current_page,
                total_pages: page.total_pages,
                total_count: page.total_count,
            },
        }
    }
}

// --- values ---

#[derive(Debug, Deserialize, ToSchema)]
pub struct SetValueRequest {
    #[schema(value_type = Object)]
    pub value: Value,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ValueDto {
    #[schema(value_type = String)]
    pub content_id: Uuid,
    #[schema(value_type = String)]
    pub field_id: Uuid,
    pub value_kind: Option<String>,
    #[schema(value_type = Object)]
    pub value: Value,
}

impl ValueDto {
    #[must_use]
    pub fn from_binding(binding: &ContentValue, value: Value) -> Self {
        Self {
            content_id: binding.content_id,
            field_id: binding.field_id,
            value_kind: Some(binding.value_kind.as_str().to_owned()),
            value,
        }
    }
}
