use async_trait::async_trait;
use cms_sdk::{Content, ContentStatus};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::repos::{ContentsPage, ContentsRepository};
use crate::infra::storage::db::db_err;
use crate::infra::storage::entity::content::{
    ActiveModel as ContentAM, Column, Entity as ContentEntity,
};

/// ORM-based implementation of the `ContentsRepository` trait.
#[derive(Clone, Default)]
pub struct OrmContentsRepository;

fn active_model(c: &Content) -> ContentAM {
    ContentAM {
        id: Set(c.id),
        site_id: Set(c.site_id),
        content_type_id: Set(c.content_type_id),
        slug: Set(c.slug.clone()),
        status: Set(c.status.as_str().to_owned()),
        published_at: Set(c.published_at),
        unpublished_at: Set(c.unpublished_at),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

#[async_trait]
impl ContentsRepository for OrmContentsRepository {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<Content>, DomainError> {
        ContentEntity::find_by_id(id)
            .filter(Column::SiteId.eq(site_id))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Content::try_from)
            .transpose()
    }

    async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        slug: &str,
    ) -> Result<Option<Content>, DomainError> {
        ContentEntity::find()
            .filter(Column::Slug.eq(slug))
            .one(conn)
            .await
            .map_err(db_err)?
            .map(Content::try_from)
            .transpose()
    }

    async fn count_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<u64, DomainError> {
        ContentEntity::find()
            .filter(Column::ContentTypeId.eq(content_type_id))
            .count(conn)
            .await
            .map_err(db_err)
    }

    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
        published_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<ContentsPage, DomainError> {
        let mut query = ContentEntity::find().filter(Column::ContentTypeId.eq(content_type_id));
        if published_only {
            query = query.filter(Column::Status.eq(ContentStatus::Published.as_str()));
        }
        let paginator = query
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .paginate(conn, per_page.max(1));

        let total = paginator.num_items().await.map_err(db_err)?;
        let rows = paginator
            .fetch_page(page.saturating_sub(1))
            .await
            .map_err(db_err)?;
        let items = rows
            .into_iter()
            .map(Content::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ContentsPage { items, total })
    }

    async fn ids_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError> {
        ContentEntity::find()
            .select_only()
            .column(Column::Id)
            .filter(Column::ContentTypeId.eq(content_type_id))
            .into_tuple()
            .all(conn)
            .await
            .map_err(db_err)
    }

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content: &Content,
    ) -> Result<(), DomainError> {
        let _ = active_model(content).insert(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content: &Content,
    ) -> Result<(), DomainError> {
        let _ = active_model(content).update(conn).await.map_err(db_err)?;
        Ok(())
    }

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError> {
        let result = ContentEntity::delete_by_id(id)
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<u64, DomainError> {
        let result = ContentEntity::delete_many()
            .filter(Column::ContentTypeId.eq(content_type_id))
            .exec(conn)
            .await
            .map_err(db_err)?;
        Ok(result.rows_affected)
    }
}
