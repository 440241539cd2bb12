use async_trait::async_trait;
use cms_sdk::Component;
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for component persistence, scoped by site like content types.
#[async_trait]
pub trait ComponentsRepository: Send + Sync + 'static {
    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        id: Uuid,
    ) -> Result<Option<Component>, DomainError>;

    async fn find_by_slug<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
        slug: &str,
    ) -> Result<Option<Component>, DomainError>;

    /// All components of a site, ordered by name.
    async fn list<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        site_id: i64,
    ) -> Result<Vec<Component>, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component: &Component,
    ) -> Result<(), DomainError>;

    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component: &Component,
    ) -> Result<(), DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;
}
