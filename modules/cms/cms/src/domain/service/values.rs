use std::sync::Arc;

use cms_sdk::{Content, ContentValue, Field, FieldOwner, FieldValue, SiteContext};
use sea_orm::ConnectionTrait;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceCore;
use crate::domain::error::DomainError;
use crate::domain::repos::{ContentsRepository, FieldsRepository, Repositories, ValuesRepository};
use crate::domain::values::coerce;

/// Typed value store.
pub struct ValuesService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for ValuesService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

pub(super) async fn load_content<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    id: Uuid,
) -> Result<Content, DomainError> {
    core.repos
        .contents()
        .get(conn, ctx.site_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Content", id))
}

/// The field, provided it belongs to the content's type.
async fn field_of<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    content: &Content,
    field_id: Uuid,
) -> Result<Field, DomainError> {
    let field = core
        .repos
        .fields()
        .get(conn, field_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Field", field_id))?;
    if field.owner != FieldOwner::ContentType(content.content_type_id) {
        return Err(DomainError::validation(
            "field_id",
            format!("field {field_id} does not belong to this content's type"),
        ));
    }
    Ok(field)
}

/// Remove join rows together with the typed rows they point at.
pub(super) async fn purge_bindings<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    bindings: Vec<ContentValue>,
) -> Result<usize, DomainError> {
    let count = bindings.len();
    for b in bindings {
        core.repos.values().delete_binding(conn, b.id).await?;
        core.repos
            .values()
            .delete_value(conn, b.value_kind, b.value_id)
            .await?;
    }
    Ok(count)
}

/// Coerce `raw` and store it as the single value of (`content`, `field`).
///
/// Same storage kind: the typed row is updated in place. Different kind: the
/// old typed row is replaced and the join repointed.
pub(super) async fn write_value<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    content: &Content,
    field: &Field,
    raw: &Value,
) -> Result<ContentValue, DomainError> {
    let value = coerce(field, raw)?;
    let kind = value.kind();
    let now = OffsetDateTime::now_utc();
    let values = core.repos.values();

    match values.binding(conn, content.id, field.id).await? {
        None => {
            let binding = ContentValue {
                id: Uuid::now_v7(),
                content_id: content.id,
                field_id: field.id,
                value_kind: kind,
                value_id: Uuid::now_v7(),
                created_at: now,
                updated_at: now,
            };
            values.insert_value(conn, binding.value_id, &value, now).await?;
            values.insert_binding(conn, &binding).await?;
            Ok(binding)
        }
        Some(mut binding) if binding.value_kind == kind => {
            values.update_value(conn, binding.value_id, &value, now).await?;
            binding.updated_at = now;
            values.update_binding(conn, &binding).await?;
            Ok(binding)
        }
        Some(mut binding) => {
            values
                .delete_value(conn, binding.value_kind, binding.value_id)
                .await?;
            binding.value_kind = kind;
            binding.value_id = Uuid::now_v7();
            binding.updated_at = now;
            values.insert_value(conn, binding.value_id, &value, now).await?;
            values.update_binding(conn, &binding).await?;
            Ok(binding)
        }
    }
}

/// Write several values keyed by field name. Unknown names fail the whole batch.
pub(super) async fn write_named_values<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    content: &Content,
    raw: &Map<String, Value>,
) -> Result<Vec<ContentValue>, DomainError> {
    if raw.is_empty() {
        return Ok(Vec::new());
    }
    let fields = core
        .repos
        .fields()
        .list_for_owner(conn, FieldOwner::ContentType(content.content_type_id))
        .await?;

    let mut written = Vec::with_capacity(raw.len());
    for (name, value) in raw {
        let field = fields
            .iter()
            .find(|f| &f.name == name)
            .ok_or_else(|| DomainError::validation(name.clone(), "unknown field"))?;
        written.push(write_value(core, conn, content, field, value).await?);
    }
    Ok(written)
}

/// Stored values of a content record in field position order.
pub(super) async fn read_values<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    content: &Content,
) -> Result<Vec<(Field, FieldValue)>, DomainError> {
    let fields = core
        .repos
        .fields()
        .list_for_owner(conn, FieldOwner::ContentType(content.content_type_id))
        .await?;
    let bindings = core
        .repos
        .values()
        .bindings_for_content(conn, content.id)
        .await?;

    let mut out = Vec::with_capacity(bindings.len());
    for field in fields {
        let Some(binding) = bindings.iter().find(|b| b.field_id == field.id) else {
            continue;
        };
        if let Some(value) = core
            .repos
            .values()
            .read(conn, binding.value_kind, binding.value_id)
            .await?
        {
            out.push((field, value));
        }
    }
    Ok(out)
}

impl<R: Repositories> ValuesService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    /// Store one value; exactly one binding exists per (content, field) afterwards.
    #[instrument(skip(self, raw), fields(site_id = ctx.site_id))]
    pub async fn set_value(
        &self,
        ctx: &SiteContext,
        content_id: Uuid,
        field_id: Uuid,
        raw: &Value,
    ) -> Result<ContentValue, DomainError> {
        let txn = self.core.begin().await?;
        let result: Result<ContentValue, DomainError> = async {
            let content = load_content(&self.core, &txn, ctx, content_id).await?;
            let field = field_of(&self.core, &txn, &content, field_id).await?;
            write_value(&self.core, &txn, &content, &field, raw).await
        }
        .await;
        let binding = ServiceCore::<R>::finish(txn, result).await?;

        info!(kind = %binding.value_kind, "Stored field value");
        Ok(binding)
    }

    /// Store several values by field name in one transaction.
    #[instrument(skip(self, raw), fields(site_id = ctx.site_id, count = raw.len()))]
    pub async fn set_values(
        &self,
        ctx: &SiteContext,
        content_id: Uuid,
        raw: &Map<String, Value>,
    ) -> Result<Vec<ContentValue>, DomainError> {
        let txn = self.core.begin().await?;
        let result: Result<Vec<ContentValue>, DomainError> = async {
            let content = load_content(&self.core, &txn, ctx, content_id).await?;
            write_named_values(&self.core, &txn, &content, raw).await
        }
        .await;
        let written = ServiceCore::<R>::finish(txn, result).await?;

        info!("Stored {} field values", written.len());
        Ok(written)
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn get_value(
        &self,
        ctx: &SiteContext,
        content_id: Uuid,
        field_id: Uuid,
    ) -> Result<Option<FieldValue>, DomainError> {
        let conn = &self.core.db;
        let content = load_content(&self.core, conn, ctx, content_id).await?;
        field_of(&self.core, conn, &content, field_id).await?;

        let Some(binding) = self
            .core
            .repos
            .values()
            .binding(conn, content_id, field_id)
            .await?
        else {
            debug!("No value stored");
            return Ok(None);
        };
        self.core
            .repos
            .values()
            .read(conn, binding.value_kind, binding.value_id)
            .await
    }

    /// Remove the value of (content, field). Returns `false` if none was stored.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn clear_value(
        &self,
        ctx: &SiteContext,
        content_id: Uuid,
        field_id: Uuid,
    ) -> Result<bool, DomainError> {
        let txn = self.core.begin().await?;
        let result: Result<bool, DomainError> = async {
            let content = load_content(&self.core, &txn, ctx, content_id).await?;
            field_of(&self.core, &txn, &content, field_id).await?;
            let binding = self
                .core
                .repos
                .values()
                .binding(&txn, content_id, field_id)
                .await?;
            let removed = purge_bindings(&self.core, &txn, binding.into_iter().collect()).await?;
            Ok(removed > 0)
        }
        .await;
        let removed = ServiceCore::<R>::finish(txn, result).await?;

        info!(removed, "Cleared field value");
        Ok(removed)
    }

    /// All stored values of a content record, in field position order.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn values_for(
        &self,
        ctx: &SiteContext,
        content_id: Uuid,
    ) -> Result<Vec<(Field, FieldValue)>, DomainError> {
        let content = load_content(&self.core, &self.core.db, ctx, content_id).await?;
        read_values(&self.core, &self.core.db, &content).await
    }
}
