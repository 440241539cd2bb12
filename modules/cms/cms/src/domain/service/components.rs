use std::sync::Arc;

use cms_sdk::{Component, ComponentPatch, FieldOwner, NewComponent, SiteContext};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceCore;
use super::values::purge_bindings;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    ComponentsRepository, FieldsRepository, Repositories, ValuesRepository,
};
use crate::domain::validation::{validate_name, validate_slug};

/// Component registry. Slugs live in their own namespace, separate from content types.
pub struct ComponentsService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for ComponentsService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

pub(super) async fn load_component<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    id: Uuid,
) -> Result<Component, DomainError> {
    core.repos
        .components()
        .get(conn, ctx.site_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("Component", id))
}

async fn ensure_slug_free<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    slug: &str,
    except: Option<Uuid>,
) -> Result<(), DomainError> {
    match core
        .repos
        .components()
        .find_by_slug(conn, ctx.site_id, slug)
        .await?
    {
        Some(c) if Some(c.id) != except => Err(DomainError::duplicate_name("Component", slug)),
        _ => Ok(()),
    }
}

impl<R: Repositories> ComponentsService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn list(&self, ctx: &SiteContext) -> Result<Vec<Component>, DomainError> {
        let items = self
            .core
            .repos
            .components()
            .list(&self.core.db, ctx.site_id)
            .await?;
        debug!("Listed {} components", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn get(&self, ctx: &SiteContext, id: Uuid) -> Result<Component, DomainError> {
        load_component(&self.core, &self.core.db, ctx, id).await
    }

    #[instrument(skip(self, new), fields(site_id = ctx.site_id, slug = %new.slug))]
    pub async fn create(
        &self,
        ctx: &SiteContext,
        new: NewComponent,
    ) -> Result<Component, DomainError> {
        info!("Creating component");

        validate_name("name", &new.name)?;
        validate_slug("slug", &new.slug)?;

        let now = OffsetDateTime::now_utc();
        let component = Component {
            id: Uuid::now_v7(),
            site_id: ctx.site_id,
            name: new.name.trim().to_owned(),
            slug: new.slug,
            description: new.description,
            repeatable: new.repeatable,
            created_at: now,
            updated_at: now,
        };

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            ensure_slug_free(&self.core, &txn, ctx, &component.slug, None).await?;
            self.core.repos.components().insert(&txn, &component).await
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!(id = %component.id, "Created component");
        Ok(component)
    }

    #[instrument(skip(self, patch), fields(site_id = ctx.site_id))]
    pub async fn update(
        &self,
        ctx: &SiteContext,
        id: Uuid,
        patch: ComponentPatch,
    ) -> Result<Component, DomainError> {
        info!("Updating component");

        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(slug) = &patch.slug {
            validate_slug("slug", slug)?;
        }

        let txn = self.core.begin().await?;
        let result: Result<Component, DomainError> = async {
            let mut component = load_component(&self.core, &txn, ctx, id).await?;
            if let Some(name) = patch.name {
                component.name = name.trim().to_owned();
            }
            if let Some(slug) = patch.slug {
                ensure_slug_free(&self.core, &txn, ctx, &slug, Some(id)).await?;
                component.slug = slug;
            }
            if let Some(description) = patch.description {
                component.description = description;
            }
            if let Some(repeatable) = patch.repeatable {
                component.repeatable = repeatable;
            }
            component.updated_at = OffsetDateTime::now_utc();

            self.core.repos.components().update(&txn, &component).await?;
            Ok(component)
        }
        .await;
        let component = self.core.finish_schema_change(txn, result).await?;

        info!("Updated component");
        Ok(component)
    }

    /// Delete a component and its own fields. Refused while any `component`
    /// field still embeds it.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn delete(&self, ctx: &SiteContext, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting component");

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            let component = load_component(&self.core, &txn, ctx, id).await?;
            let repos = &self.core.repos;

            let refs = repos.fields().count_component_refs(&txn, id).await?;
            if refs > 0 {
                return Err(DomainError::conflict(format!(
                    "component '{}' is used by {refs} field(s)",
                    component.slug
                )));
            }

            for field in repos
                .fields()
                .list_for_owner(&txn, FieldOwner::Component(id))
                .await?
            {
                let bindings = repos.values().bindings_for_field(&txn, field.id).await?;
                purge_bindings(&self.core, &txn, bindings).await?;
            }
            repos
                .fields()
                .delete_for_owner(&txn, FieldOwner::Component(id))
                .await?;
            repos.components().delete(&txn, id).await?;
            Ok(())
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!("Deleted component");
        Ok(())
    }
}
