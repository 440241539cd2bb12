//! Conversions between SeaORM models and SDK contract types.
//!
//! Rows that violate a storage invariant (both or neither owner set, unknown
//! enum text, malformed options) are reported as database errors.

use cms_sdk::{
    Component, Content, ContentType, ContentValue, Field, FieldOwner, FieldType,
};
use serde_json::{Map, Value};

use crate::domain::error::DomainError;
use crate::infra::storage::entity::{component, content, content_type, content_value, field};

impl From<content_type::Model> for ContentType {
    fn from(e: content_type::Model) -> Self {
        Self {
            id: e.id,
            site_id: e.site_id,
            name: e.name,
            slug: e.slug,
            description: e.description,
            is_single: e.is_single,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

impl From<component::Model> for Component {
    fn from(e: component::Model) -> Self {
        Self {
            id: e.id,
            site_id: e.site_id,
            name: e.name,
            slug: e.slug,
            description: e.description,
            repeatable: e.repeatable,
            created_at: e.created_at,
            updated_at: e.updated_at,
        }
    }
}

fn corrupt(table: &str, id: impl std::fmt::Display, what: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("corrupt {table} row {id}: {what}"))
}

impl TryFrom<field::Model> for Field {
    type Error = DomainError;

    fn try_from(e: field::Model) -> Result<Self, Self::Error> {
        let owner = match (e.content_type_id, e.component_id) {
            (Some(ct), None) => FieldOwner::ContentType(ct),
            (None, Some(c)) => FieldOwner::Component(c),
            _ => return Err(corrupt("fields", e.id, "exactly one owner must be set")),
        };
        let field_type: FieldType = e
            .field_type
            .parse()
            .map_err(|err| corrupt("fields", e.id, err))?;
        let width = e
            .width
            .parse()
            .map_err(|err| corrupt("fields", e.id, err))?;
        let options = match serde_json::from_str::<Value>(&e.options) {
            Ok(Value::Object(map)) => map,
            Ok(Value::Null) => Map::new(),
            Ok(_) => return Err(corrupt("fields", e.id, "options is not an object")),
            Err(err) => return Err(corrupt("fields", e.id, err)),
        };

        Ok(Self {
            id: e.id,
            owner,
            name: e.name,
            field_type,
            description: e.description,
            required: e.required,
            options,
            position: e.position,
            width,
            row_group: e.row_group,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

impl TryFrom<content::Model> for Content {
    type Error = DomainError;

    fn try_from(e: content::Model) -> Result<Self, Self::Error> {
        let status = e
            .status
            .parse()
            .map_err(|err| corrupt("contents", e.id, err))?;
        Ok(Self {
            id: e.id,
            site_id: e.site_id,
            content_type_id: e.content_type_id,
            slug: e.slug,
            status,
            published_at: e.published_at,
            unpublished_at: e.unpublished_at,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

impl TryFrom<content_value::Model> for ContentValue {
    type Error = DomainError;

    fn try_from(e: content_value::Model) -> Result<Self, Self::Error> {
        let value_kind = e
            .value_kind
            .parse()
            .map_err(|err| corrupt("content_values", e.id, err))?;
        Ok(Self {
            id: e.id,
            content_id: e.content_id,
            field_id: e.field_id,
            value_kind,
            value_id: e.value_id,
            created_at: e.created_at,
            updated_at: e.updated_at,
        })
    }
}

/// Owner columns of a field row.
#[must_use]
pub fn owner_columns(owner: FieldOwner) -> (Option<uuid::Uuid>, Option<uuid::Uuid>) {
    match owner {
        FieldOwner::ContentType(id) => (Some(id), None),
        FieldOwner::Component(id) => (None, Some(id)),
    }
}

/// Component referenced by a `component` field's options, if any.
#[must_use]
pub fn component_ref(field: &Field) -> Option<uuid::Uuid> {
    if field.field_type != FieldType::Component {
        return None;
    }
    field
        .options
        .get("component_id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
}
