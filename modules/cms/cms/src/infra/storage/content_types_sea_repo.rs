use async_trait::async_trait;
use cms_sdk::ContentType;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::ContentTypesRepository;
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::content_type::{
    ActiveModel as ContentTypeAM, Column, Entity as ContentTypeEntity,
};

/// ORM-based implementation of the `ContentTypesRepository` trait.
#[derive(Clone, Default)]
pub struct OrmContentTypesRepository;

fn active_model(ct: &ContentType) -> ContentTypeAM {
    ContentTypeAM {
        id: Set(ct.id),
        site_id: Set(ct.site_id),
        name: Set(ct.name.clone()),
        slug: Set(ct.slug.clone()),
        description: Set(ct.description.clone()),
        is_single: Set(ct.is_single),
        created_at: Set(ct.created_at),
        updated_at: Set(ct.updated_at),
    }
}

#[async_trait]
impl ContentTypesRepository for OrmContentTypesRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<ContentType>, DomainError> {
        let found = ContentTypeEntity::find_by_id(id)
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
    ) -> Result<Option<ContentType>, DomainError> {
        let found = ContentTypeEntity::find()
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
    ) -> Result<Vec<ContentType>, DomainError> {
        let rows = ContentTypeEntity::find()
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
        content_type: &ContentType,
    ) -> Result<(), DomainError> {
        let _ = active_model(content_type)
            .insert(conn)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type: &ContentType,
    ) -> Result<(), DomainError> {
        let _ = active_model(content_type)
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
        let result = ContentTypeEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }
}
