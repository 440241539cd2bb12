use async_trait::async_trait;
use cms_sdk::{ContentValue, FieldValue, ValueKind};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::ValuesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::content_value::{
    ActiveModel as ContentValueAM, Column, Entity as ContentValueEntity, Model as ContentValueModel,
};
use crate::infra::storage::entity::{value_boolean, value_integer, value_string, value_text};

/// ORM-based implementation of the `ValuesRepository` trait.
#[derive(Clone, Default)]
pub struct OrmValuesRepository;

fn binding_model(b: &ContentValue) -> ContentValueAM {
    ContentValueAM {
        id: Set(b.id),
        content_id: Set(b.content_id),
        field_id: Set(b.field_id),
        value_kind: Set(b.value_kind.as_str().to_owned()),
        value_id: Set(b.value_id),
        created_at: Set(b.created_at),
        updated_at: Set(b.updated_at),
    }
}

fn to_bindings(rows: Vec<ContentValueModel>) -> Result<Vec<ContentValue>, DomainError> {
    rows.into_iter().map(ContentValue::try_from).collect()
}

#[async_trait]
impl ValuesRepository for OrmValuesRepository {
    async fn binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_id: Uuid,
        field_id: Uuid,
    ) -> Result<Option<ContentValue>, DomainError> {
        ContentValueEntity::find()
            .filter(Column::ContentId.eq(content_id))
            .filter(Column::FieldId.eq(field_id))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(ContentValue::try_from)
            .transpose()
    }

    async fn bindings_for_content<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_id: Uuid,
    ) -> Result<Vec<ContentValue>, DomainError> {
        let rows = ContentValueEntity::find()
            .filter(Column::ContentId.eq(content_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        to_bindings(rows)
    }

    async fn bindings_for_field<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field_id: Uuid,
    ) -> Result<Vec<ContentValue>, DomainError> {
        let rows = ContentValueEntity::find()
            .filter(Column::FieldId.eq(field_id))
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        to_bindings(rows)
    }

    async fn insert_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        binding: &ContentValue,
    ) -> Result<(), DomainError> {
        let _ = binding_model(binding).insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        binding: &ContentValue,
    ) -> Result<(), DomainError> {
        let m = ContentValueAM {
            id: Set(binding.id),
            value_kind: Set(binding.value_kind.as_str().to_owned()),
            value_id: Set(binding.value_id),
            updated_at: Set(binding.updated_at),
            ..Default::default()
        };
        let _ = m.update(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<(), DomainError> {
        ContentValueEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn read<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: ValueKind,
        value_id: Uuid,
    ) -> Result<Option<FieldValue>, DomainError> {
        let value = match kind {
            ValueKind::String => value_string::Entity::find_by_id(value_id)
                .one(conn)
                .await
                .map_err(db_err)?
                .map(|m| FieldValue::String(m.value)),
            ValueKind::Text => value_text::Entity::find_by_id(value_id)
                .one(conn)
                .await
                .map_err(db_err)?
                .map(|m| FieldValue::Text(m.value)),
            ValueKind::Boolean => value_boolean::Entity::find_by_id(value_id)
                .one(conn)
                .await
                .map_err(db_err)?
                .map(|m| FieldValue::Boolean(m.value)),
            ValueKind::Integer => value_integer::Entity::find_by_id(value_id)
                .one(conn)
                .await
                .map_err(db_err)?
                .map(|m| FieldValue::Integer(m.value)),
        };
        Ok(value)
    }

    async fn insert_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        value_id: Uuid,
        value: &FieldValue,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        match value {
            FieldValue::String(s) => {
                let m = value_string::ActiveModel {
                    id: Set(value_id),
                    value: Set(s.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let _ = m.insert(conn).await.map_err(db_err)?;
            }
            FieldValue::Text(s) => {
                let m = value_text::ActiveModel {
                    id: Set(value_id),
                    value: Set(s.clone()),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let _ = m.insert(conn).await.map_err(db_err)?;
            }
            FieldValue::Boolean(b) => {
                let m = value_boolean::ActiveModel {
                    id: Set(value_id),
                    value: Set(*b),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let _ = m.insert(conn).await.map_err(db_err)?;
            }
            FieldValue::Integer(i) => {
                let m = value_integer::ActiveModel {
                    id: Set(value_id),
                    value: Set(*i),
                    created_at: Set(now),
                    updated_at: Set(now),
                };
                let _ = m.insert(conn).await.map_err(db_err)?;
            }
        }
        Ok(())
    }

    async fn update_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        value_id: Uuid,
        value: &FieldValue,
        now: OffsetDateTime,
    ) -> Result<(), DomainError> {
        match value {
            FieldValue::String(s) => {
                let m = value_string::ActiveModel {
                    id: Set(value_id),
                    value: Set(s.clone()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let _ = m.update(conn).await.map_err(db_err)?;
            }
            FieldValue::Text(s) => {
                let m = value_text::ActiveModel {
                    id: Set(value_id),
                    value: Set(s.clone()),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let _ = m.update(conn).await.map_err(db_err)?;
            }
            FieldValue::Boolean(b) => {
                let m = value_boolean::ActiveModel {
                    id: Set(value_id),
                    value: Set(*b),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let _ = m.update(conn).await.map_err(db_err)?;
            }
            FieldValue::Integer(i) => {
                let m = value_integer::ActiveModel {
                    id: Set(value_id),
                    value: Set(*i),
                    updated_at: Set(now),
                    ..Default::default()
                };
                let _ = m.update(conn).await.map_err(db_err)?;
            }
        }
        Ok(())
    }

    async fn delete_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: ValueKind,
        value_id: Uuid,
    ) -> Result<(), DomainError> {
        match kind {
            ValueKind::String => value_string::Entity::delete_by_id(value_id).exec(conn).await,
            ValueKind::Text => value_text::Entity::delete_by_id(value_id).exec(conn).await,
            ValueKind::Boolean => value_boolean::Entity::delete_by_id(value_id).exec(conn).await,
            ValueKind::Integer => value_integer::Entity::delete_by_id(value_id).exec(conn).await,
        }
        .map_err(db_err)?;
        Ok(())
    }
}
