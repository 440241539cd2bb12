use async_trait::async_trait;
use cms_sdk::{Field, FieldOwner};
use sea_orm::ConnectionTrait;
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::layout::Slot;

/// Repository trait for field definitions.
#[async_trait]
pub trait FieldsRepository: Send + Sync + 'static {
    /// Fields of one owner in display order (`position` ascending).
    async fn list_for_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
    ) -> Result<Vec<Field>, DomainError>;

    async fn get<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<Option<Field>, DomainError>;

    /// Whether `owner` already has a field called `name`, ignoring `except`.
    async fn name_taken<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
        name: &str,
        except: Option<Uuid>,
    ) -> Result<bool, DomainError>;

    /// Number of `component` fields embedding the given component.
    async fn count_component_refs<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        component_id: Uuid,
    ) -> Result<u64, DomainError>;

    async fn insert<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field: &Field,
    ) -> Result<(), DomainError>;

    /// Rewrite the definition columns (name, type, description, flags, options, width).
    async fn update<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        field: &Field,
    ) -> Result<(), DomainError>;

    /// Persist one planned layout slot (`position`, `width`, `row_group`).
    async fn set_layout<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        slot: &Slot,
    ) -> Result<(), DomainError>;

    async fn delete<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        id: Uuid,
    ) -> Result<bool, DomainError>;

    /// Delete every field of an owner, returning the deleted ids.
    async fn delete_for_owner<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        owner: FieldOwner,
    ) -> Result<Vec<Uuid>, DomainError>;
}
