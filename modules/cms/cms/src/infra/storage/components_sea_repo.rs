use async_trait::async_trait;
use cms_sdk::Component;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::ComponentsRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::component::{
    ActiveModel as ComponentAM, Column, Entity as ComponentEntity,
};

/// ORM-based implementation of the `ComponentsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmComponentsRepository;

fn active_model(c: &Component) -> ComponentAM {
    ComponentAM {
        id: Set(c.id),
        site_id: Set(c.site_id),
        name: Set(c.name.clone()),
        slug: Set(c.slug.clone()),
        description: Set(c.description.clone()),
        repeatable: Set(c.repeatable),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

#[async_trait]
impl ComponentsRepository for OrmComponentsRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<Component>, DomainError> {
        let found = ComponentEntity::find_by_id(id)
            .filter(Column::SiteId.eq(site_id))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        slug: &str,
    ) -> Result<Option<Component>, DomainError> {
        let found = ComponentEntity::find()
            .filter(Column::SiteId.eq(site_id))
            .filter(Column::Slug.eq(slug))
            .one(conn)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
    ) -> Result<Vec<Component>, DomainError> {
        let rows = ComponentEntity::find()
            .filter(Column::SiteId.eq(site_id))
            .order_by_asc(Column::Name)
            .order_by_asc(Column::Id)
            .all(conn)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component: &Component,
    ) -> Result<(), DomainError> {
        let _ = active_model(component)
            .insert(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component: &Component,
    ) -> Result<(), DomainError> {
        let _ = active_model(component)
            .update(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = ComponentEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
