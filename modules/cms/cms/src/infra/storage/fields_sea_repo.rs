use async_trait::async_trait;
use cms_sdk::{Field, FieldOwner};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use serde_json::Value;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::layout::Slot;
use crate::domain::repos::FieldsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::field::{ActiveModel as FieldAM, Column, Entity as FieldEntity};
use crate::infra::storage::mapper::{component_ref, owner_columns};

/// ORM-based implementation of the `FieldsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmFieldsRepository;

fn owner_filter(owner: FieldOwner) -> sea_orm::Condition {
    let cond = sea_orm::Condition::all();
    match owner {
        FieldOwner::ContentType(id) => cond
            .add(Column::ContentTypeId.eq(id))
            .add(Column::ComponentId.is_null()),
        FieldOwner::Component(id) => cond
            .add(Column::ComponentId.eq(id))
            .add(Column::ContentTypeId.is_null()),
    }
}

fn active_model(field: &Field) -> FieldAM {
    let (content_type_id, component_id) = owner_columns(field.owner);
    FieldAM {
        id: Set(field.id),
        content_type_id: Set(content_type_id),
        component_id: Set(component_id),
        name: Set(field.name.clone()),
        field_type: Set(field.field_type.as_str().to_owned()),
        description: Set(field.description.clone()),
        required: Set(field.required),
        options: Set(Value::Object(field.options.clone()).to_string()),
        position: Set(field.position),
        width: Set(field.width.as_str().to_owned()),
        row_group: Set(field.row_group),
        component_ref: Set(component_ref(field)),
        created_at: Set(field.created_at),
        updated_at: Set(field.updated_at),
    }
}

#[async_trait]
impl FieldsRepository for OrmFieldsRepository {
    async fn list_for_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
    ) -> Result<Vec<Field>, DomainError> {
        let rows = FieldEntity::find()
            .filter(owner_filter(owner))
            .order_by_asc(Column::Position)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        rows.into_iter().map(Field::try_from).collect()
    }

    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Field>, DomainError> {
        FieldEntity::find_by_id(id)
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Field::try_from)
            .transpose()
    }

    async fn name_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DomainError> {
        let mut query = FieldEntity::find()
            .filter(owner_filter(owner))
            .filter(Column::Name.eq(name));
        if let Some(id) = except {
            query = query.filter(Column::Id.ne(id));
        }
        let count = query.count(conn).await.map_err(db_err)?;
        Ok(count > 0)
    }

    async fn count_component_refs<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component_id: Uuid,
    ) -> Result<u64, DomainError> {
        FieldEntity::find()
            .filter(Column::ComponentRef.eq(component_id))
            .count(conn)
            .await
            .map_err(db_err)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field: &Field,
    ) -> Result<(), DomainError> {
        let _ = active_model(field).insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field: &Field,
    ) -> Result<(), DomainError> {
        let _ = active_model(field).update(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn set_layout<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        slot: &Slot,
    ) -> Result<(), DomainError> {
        let m = FieldAM {
            id: Set(slot.field_id),
            position: Set(slot.position),
            width: Set(slot.width.as_str().to_owned()),
            row_group: Set(slot.row_group),
            updated_at: Set(OffsetDateTime::now_utc()),
            ..Default::default()
        };
        let _ = m.update(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = FieldEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
    ) -> Result<Vec<Uuid>, DomainError> {
        let ids: Vec<Uuid> = FieldEntity::find()
            .select_only()
            .column(Column::Id)
            .filter(owner_filter(owner))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)?;
        if !ids.is_empty() {
            FieldEntity::delete_many()
                .filter(Column::Id.is_in(ids.clone()))
                .exec(conn)
                .await
                .map_err(db_err)?;
        }
        Ok(ids)
    }
}
