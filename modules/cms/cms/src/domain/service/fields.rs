use std::sync::Arc;

use cms_sdk::{
    Field, FieldOwner, FieldPatch, FieldType, FieldWidth, LayoutEntry, NewField, SiteContext,
};
use sea_orm::ConnectionTrait;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceCore;
use super::components::load_component;
use super::content_types::load_content_type;
use super::values::purge_bindings;
use crate::domain::error::DomainError;
use crate::domain::layout::{self, Slot};
use crate::domain::repos::{ComponentsRepository, FieldsRepository, Repositories, ValuesRepository};
use crate::domain::validation::validate_name;

/// Field registry and layout operations for content types and components.
pub struct FieldsService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for FieldsService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

/// The owner must exist in the caller's site.
async fn ensure_owner<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    owner: FieldOwner,
) -> Result<(), DomainError> {
    match owner {
        FieldOwner::ContentType(id) => load_content_type(core, conn, ctx, id).await.map(|_| ()),
        FieldOwner::Component(id) => load_component(core, conn, ctx, id).await.map(|_| ()),
    }
}

async fn load_field<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    owner: FieldOwner,
    id: Uuid,
) -> Result<Field, DomainError> {
    core.repos
        .fields()
        .get(conn, id)
        .await?
        .filter(|f| f.owner == owner)
        .ok_or_else(|| DomainError::not_found("Field", id))
}

async fn current_slots<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    owner: FieldOwner,
) -> Result<Vec<Slot>, DomainError> {
    let fields = core.repos.fields().list_for_owner(conn, owner).await?;
    Ok(fields.iter().map(Slot::from).collect())
}

/// Persist every slot that differs between the two layouts.
async fn apply_layout<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    before: &[Slot],
    after: &[Slot],
) -> Result<usize, DomainError> {
    let changed = layout::changed(before, after);
    for slot in &changed {
        core.repos.fields().set_layout(conn, slot).await?;
    }
    Ok(changed.len())
}

fn parse_field_type(raw: &str) -> Result<FieldType, DomainError> {
    raw.parse()
        .map_err(|_| DomainError::invalid_field_type(raw))
}

/// `component` fields must reference an existing component of the same site,
/// and never the component that owns them.
async fn check_component_options<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    owner: FieldOwner,
    field_type: FieldType,
    options: &Map<String, Value>,
) -> Result<(), DomainError> {
    if field_type != FieldType::Component {
        return Ok(());
    }
    let id: Uuid = options
        .get("component_id")
        .and_then(Value::as_str)
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| {
            DomainError::validation(
                "options.component_id",
                "component fields need the id of the embedded component",
            )
        })?;
    if owner == FieldOwner::Component(id) {
        return Err(DomainError::validation(
            "options.component_id",
            "a component cannot embed itself",
        ));
    }
    if core.repos.components().get(conn, ctx.site_id, id).await?.is_none() {
        return Err(DomainError::validation(
            "options.component_id",
            format!("component {id} does not exist"),
        ));
    }
    Ok(())
}

/// Stored values stay readable across a type change only within plain text.
fn values_survive(from: FieldType, to: FieldType) -> bool {
    from == to
        || matches!(
            (from, to),
            (FieldType::Text, FieldType::Markdown) | (FieldType::Markdown, FieldType::Text)
        )
}

impl<R: Repositories> FieldsService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    /// Fields of `owner` in display order.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn list(&self, ctx: &SiteContext, owner: FieldOwner) -> Result<Vec<Field>, DomainError> {
        let conn = &self.core.db;
        ensure_owner(&self.core, conn, ctx, owner).await?;
        let fields = self.core.repos.fields().list_for_owner(conn, owner).await?;
        debug!("Listed {} fields", fields.len());
        Ok(fields)
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn get(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        id: Uuid,
    ) -> Result<Field, DomainError> {
        let conn = &self.core.db;
        ensure_owner(&self.core, conn, ctx, owner).await?;
        load_field(&self.core, conn, owner, id).await
    }

    /// Add a field, inserted at `new.position` or appended.
    #[instrument(skip(self, new), fields(site_id = ctx.site_id, name = %new.name))]
    pub async fn create(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        new: NewField,
    ) -> Result<Field, DomainError> {
        info!("Creating field");

        validate_name("name", &new.name)?;
        let field_type = parse_field_type(&new.field_type)?;

        let now = OffsetDateTime::now_utc();
        let mut field = Field {
            id: Uuid::now_v7(),
            owner,
            name: new.name.trim().to_owned(),
            field_type,
            description: new.description,
            required: new.required,
            options: new.options,
            position: 0,
            width: new.width.unwrap_or_default(),
            row_group: None,
            created_at: now,
            updated_at: now,
        };

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            let fields = self.core.repos.fields();
            if fields.name_taken(&txn, owner, &field.name, None).await? {
                return Err(DomainError::duplicate_name("Field", field.name.clone()));
            }
            check_component_options(&self.core, &txn, ctx, owner, field_type, &field.options)
                .await?;

            let before = current_slots(&self.core, &txn, owner).await?;
            let after = layout::plan_insert(&before, Slot::from(&field), new.position);
            if let Some(slot) = after.iter().find(|s| s.field_id == field.id) {
                field.position = slot.position;
            }

            fields.insert(&txn, &field).await?;
            let others: Vec<Slot> = after
                .iter()
                .filter(|s| s.field_id != field.id)
                .copied()
                .collect();
            apply_layout(&self.core, &txn, &before, &others).await?;
            Ok(())
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!(id = %field.id, position = field.position, "Created field");
        Ok(field)
    }

    /// Update a field definition. A type change that makes stored values
    /// unreadable drops them; a width change follows `set_width`.
    #[instrument(skip(self, patch), fields(site_id = ctx.site_id))]
    pub async fn update(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        id: Uuid,
        patch: FieldPatch,
    ) -> Result<Field, DomainError> {
        info!("Updating field");

        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        let new_type = patch.field_type.as_deref().map(parse_field_type).transpose()?;

        let txn = self.core.begin().await?;
        let result: Result<Field, DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            let mut field = load_field(&self.core, &txn, owner, id).await?;
            let fields = self.core.repos.fields();

            if let Some(name) = patch.name {
                let name = name.trim().to_owned();
                if fields.name_taken(&txn, owner, &name, Some(id)).await? {
                    return Err(DomainError::duplicate_name("Field", name));
                }
                field.name = name;
            }
            if let Some(description) = patch.description {
                field.description = description;
            }
            if let Some(required) = patch.required {
                field.required = required;
            }
            if let Some(options) = patch.options {
                field.options = options;
            }

            let old_type = field.field_type;
            if let Some(t) = new_type {
                field.field_type = t;
            }
            if new_type.is_some() || field.field_type == FieldType::Component {
                check_component_options(
                    &self.core,
                    &txn,
                    ctx,
                    owner,
                    field.field_type,
                    &field.options,
                )
                .await?;
            }
            if !values_survive(old_type, field.field_type) {
                let bindings = self.core.repos.values().bindings_for_field(&txn, id).await?;
                let dropped = purge_bindings(&self.core, &txn, bindings).await?;
                debug!(dropped, "Dropped values after type change");
            }

            if let Some(width) = patch.width {
                let before = current_slots(&self.core, &txn, owner).await?;
                let after = layout::plan_width(&before, id, width)?;
                apply_layout(&self.core, &txn, &before, &after).await?;
                if let Some(slot) = after.iter().find(|s| s.field_id == id) {
                    field.position = slot.position;
                    field.width = slot.width;
                    field.row_group = slot.row_group;
                }
            }

            field.updated_at = OffsetDateTime::now_utc();
            fields.update(&txn, &field).await?;
            Ok(field)
        }
        .await;
        let field = self.core.finish_schema_change(txn, result).await?;

        info!("Updated field");
        Ok(field)
    }

    /// Delete a field with its stored values; a former row partner is unpaired.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn delete(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        id: Uuid,
    ) -> Result<(), DomainError> {
        info!("Deleting field");

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            load_field(&self.core, &txn, owner, id).await?;

            let bindings = self.core.repos.values().bindings_for_field(&txn, id).await?;
            purge_bindings(&self.core, &txn, bindings).await?;

            let before = current_slots(&self.core, &txn, owner).await?;
            self.core.repos.fields().delete(&txn, id).await?;
            let after = layout::plan_remove(&before, id);
            apply_layout(&self.core, &txn, &before, &after).await?;
            Ok(())
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!("Deleted field");
        Ok(())
    }

    /// Rewrite the whole layout of `owner`. All-or-nothing.
    ///
    /// `entries` must list exactly the owner's current fields; a list built
    /// from a stale read is rejected.
    #[instrument(skip(self, entries), fields(site_id = ctx.site_id, count = entries.len()))]
    pub async fn reorder(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        entries: &[LayoutEntry],
    ) -> Result<Vec<Field>, DomainError> {
        info!("Reordering fields");

        let txn = self.core.begin().await?;
        let result: Result<Vec<Field>, DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            let before = current_slots(&self.core, &txn, owner).await?;
            let after = layout::plan_reorder(&before, entries)?;
            let written = apply_layout(&self.core, &txn, &before, &after).await?;
            debug!(written, "Layout slots written");
            self.core.repos.fields().list_for_owner(&txn, owner).await
        }
        .await;
        let fields = self.core.finish_schema_change(txn, result).await?;

        info!("Reordered fields");
        Ok(fields)
    }

    /// Change one field's width. Going `full` unpairs the field and its partner.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn set_width(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        id: Uuid,
        width: FieldWidth,
    ) -> Result<Field, DomainError> {
        info!("Setting field width");

        let txn = self.core.begin().await?;
        let result: Result<Field, DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            load_field(&self.core, &txn, owner, id).await?;
            let before = current_slots(&self.core, &txn, owner).await?;
            let after = layout::plan_width(&before, id, width)?;
            apply_layout(&self.core, &txn, &before, &after).await?;
            load_field(&self.core, &txn, owner, id).await
        }
        .await;
        let field = self.core.finish_schema_change(txn, result).await?;

        info!(width = %field.width, "Set field width");
        Ok(field)
    }

    /// Move one field to a 1-based position, clamped to the field count.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn move_field(
        &self,
        ctx: &SiteContext,
        owner: FieldOwner,
        id: Uuid,
        position: i32,
    ) -> Result<Vec<Field>, DomainError> {
        info!("Moving field");

        let txn = self.core.begin().await?;
        let result: Result<Vec<Field>, DomainError> = async {
            ensure_owner(&self.core, &txn, ctx, owner).await?;
            load_field(&self.core, &txn, owner, id).await?;
            let before = current_slots(&self.core, &txn, owner).await?;
            let after = layout::plan_move(&before, id, position)?;
            apply_layout(&self.core, &txn, &before, &after).await?;
            self.core.repos.fields().list_for_owner(&txn, owner).await
        }
        .await;
        let fields = self.core.finish_schema_change(txn, result).await?;

        info!("Moved field");
        Ok(fields)
    }
}
