use async_trait::async_trait;
use cms_sdk::{ContentValue, FieldValue, ValueKind};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::error::DomainError;

/// Repository trait for the typed value tables and the `content_values` join.
///
/// The join row is the only reference to a typed row; callers keep the two
/// in step inside one transaction.
#[async_trait]
pub trait ValuesRepository: Send + Sync + 'static {
    async fn binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_id: Uuid,
        field_id: Uuid,
    ) -> Result<Option<ContentValue>, DomainError>;

    async fn bindings_for_content<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        content_id: Uuid,
    ) -> Result<Vec<ContentValue>, DomainError>;

    async fn bindings_for_field<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field_id: Uuid,
    ) -> Result<Vec<ContentValue>, DomainError>;

    async fn insert_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        binding: &ContentValue,
    ) -> Result<(), DomainError>;

    /// Repoint an existing binding (`value_kind`, `value_id`, `updated_at`).
    async fn update_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        binding: &ContentValue,
    ) -> Result<(), DomainError>;

    async fn delete_binding<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<(), DomainError>;

    /// Read a typed row.
    async fn read<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: ValueKind,
        value_id: Uuid,
    ) -> Result<Option<FieldValue>, DomainError>;

    /// Insert a typed row into the table of `value.kind()`.
    async fn insert_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        value_id: Uuid,
        value: &FieldValue,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    /// Overwrite a typed row in place. The row must already be of `value.kind()`.
    async fn update_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        value_id: Uuid,
        value: &FieldValue,
        now: OffsetDateTime,
    ) -> Result<(), DomainError>;

    async fn delete_value<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        kind: ValueKind,
        value_id: Uuid,
    ) -> Result<(), DomainError>;
}
