use async_trait::async_trait;
use cms_sdk::ContentType;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for content type persistence.
///
/// Lookups are scoped by `site_id`; writes take a fully-formed model
/// (ids, timestamps and validation are the service's job).
#[async_trait]
pub trait ContentTypesRepository: Send + Sync + 'static {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<ContentType>, DomainError>;

    async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        slug: &str,
    ) -> Result<Option<ContentType>, DomainError>;

    /// All content types of a site, ordered by name.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
    ) -> Result<Vec<ContentType>, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type: &ContentType,
    ) -> Result<(), DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_type: &ContentType,
    ) -> Result<(), DomainError>;

    /// Returns `true` if a row was deleted.
    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}
