use async_trait::async_trait;
use cms_sdk::Content;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// One page of content records plus the total match count.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentsPage {
    pub items: Vec<Content>,
    pub total: u64,
}

/// Repository trait for content records.
#[async_trait]
pub trait ContentsRepository: Send + Sync + 'static {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<Content>, DomainError>;

    /// Slugs are unique across all sites and types.
    async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        slug: &str,
    ) -> Result<Option<Content>, DomainError>;

    async fn count_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<u64, DomainError>;

    /// Page `page` (1-based) of a content type's records, newest first.
    async fn list_page<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
        published_only: bool,
        page: u64,
        per_page: u64,
    ) -> Result<ContentsPage, DomainError>;

    async fn ids_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<Vec<Uuid>, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content: &Content,
    ) -> Result<(), DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content: &Content,
    ) -> Result<(), DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    async fn delete_for_type<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type_id: Uuid,
    ) -> Result<u64, DomainError>;
}
