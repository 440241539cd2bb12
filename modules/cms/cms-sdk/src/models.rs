//! Public models for the `cms` module.
//!
//! These are transport-agnostic data structures that define the contract
//! between the `cms` module and its consumers.

use std::fmt;

use serde_json::{Map, Value};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::field_type::{FieldType, FieldWidth, ValueKind};

/// Tenant scope of a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SiteContext {
    pub site_id: i64,
}

impl SiteContext {
    #[must_use]
    pub fn new(site_id: i64) -> Self {
        Self { site_id }
    }
}

/// A user-defined schema for a kind of record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    pub id: Uuid,
    pub site_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_single: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl ContentType {
    /// One record, exposed as an object.
    #[must_use]
    pub fn single(&self) -> bool {
        self.is_single
    }

    /// Many slugged records, exposed as a paginated list.
    #[must_use]
    pub fn collection(&self) -> bool {
        !self.is_single
    }

    #[must_use]
    pub fn route_shape(&self) -> RouteShape {
        if self.is_single {
            RouteShape::Single
        } else {
            RouteShape::Collection
        }
    }
}

/// Data for creating a content type. `is_single` defaults to a collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewContentType {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub is_single: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ContentTypePatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub is_single: Option<bool>,
}

/// Shape of a public content route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteShape {
    Collection,
    Single,
}

/// A reusable field group embeddable through `component` fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: Uuid,
    pub site_id: i64,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub repeatable: bool,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewComponent {
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub repeatable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComponentPatch {
    pub name: Option<String>,
    pub slug: Option<String>,
    pub description: Option<Option<String>>,
    pub repeatable: Option<bool>,
}

/// Schema container a field belongs to. Exactly one owner, never both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldOwner {
    ContentType(Uuid),
    Component(Uuid),
}

impl FieldOwner {
    #[must_use]
    pub fn id(self) -> Uuid {
        match self {
            FieldOwner::ContentType(id) | FieldOwner::Component(id) => id,
        }
    }

    #[must_use]
    pub fn kind(self) -> &'static str {
        match self {
            FieldOwner::ContentType(_) => "ContentType",
            FieldOwner::Component(_) => "Component",
        }
    }
}

impl fmt::Display for FieldOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind(), self.id())
    }
}

/// One named, typed slot of a schema.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub id: Uuid,
    pub owner: FieldOwner,
    pub name: String,
    pub field_type: FieldType,
    pub description: Option<String>,
    pub required: bool,
    pub options: Map<String, Value>,
    pub position: i32,
    pub width: FieldWidth,
    pub row_group: Option<i32>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a field. `field_type` is the raw type name and is
/// checked against the closed set by the service.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewField {
    pub name: String,
    pub field_type: String,
    pub description: Option<String>,
    pub required: bool,
    pub options: Map<String, Value>,
    pub position: Option<i32>,
    pub width: Option<FieldWidth>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldPatch {
    pub name: Option<String>,
    pub field_type: Option<String>,
    pub description: Option<Option<String>>,
    pub required: Option<bool>,
    pub options: Option<Map<String, Value>>,
    pub width: Option<FieldWidth>,
}

/// One slot of a full layout rewrite, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutEntry {
    pub field_id: Uuid,
    pub row_group: Option<i32>,
}

/// Publication state of a content record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ContentStatus {
    #[default]
    Draft,
    Published,
    Archived,
}

impl ContentStatus {
    pub const ALL: [ContentStatus; 3] = [
        ContentStatus::Draft,
        ContentStatus::Published,
        ContentStatus::Archived,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ContentStatus::Draft => "draft",
            ContentStatus::Published => "published",
            ContentStatus::Archived => "archived",
        }
    }
}

impl std::str::FromStr for ContentStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ContentStatus::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| format!("unknown status '{s}'"))
    }
}

impl fmt::Display for ContentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One record of a content type. Field values live in the value store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub id: Uuid,
    pub site_id: i64,
    pub content_type_id: Uuid,
    pub slug: String,
    pub status: ContentStatus,
    pub published_at: Option<OffsetDateTime>,
    pub unpublished_at: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Data for creating a content record; `values` are raw inputs keyed by field name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewContent {
    pub slug: String,
    pub status: Option<ContentStatus>,
    pub values: Map<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ContentPatch {
    pub slug: Option<String>,
    pub status: Option<ContentStatus>,
    pub values: Map<String, Value>,
}

/// Binding of one (content, field) pair to a typed value row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentValue {
    pub id: Uuid,
    pub content_id: Uuid,
    pub field_id: Uuid,
    pub value_kind: ValueKind,
    pub value_id: Uuid,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}
