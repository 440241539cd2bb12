use std::sync::Arc;

use cms_sdk::{ContentType, ContentTypePatch, FieldOwner, NewContentType, RouteShape, SiteContext};
use sea_orm::ConnectionTrait;
use time::OffsetDateTime;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceCore;
use super::values::purge_bindings;
use crate::domain::error::DomainError;
use crate::domain::repos::{
    ContentTypesRepository, ContentsRepository, FieldsRepository, Repositories, ValuesRepository,
};
use crate::domain::validation::{validate_name, validate_slug};

/// Content type registry.
pub struct ContentTypesService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for ContentTypesService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

/// Load a content type of the caller's site or fail with `NotFound`.
pub(super) async fn load_content_type<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    id: Uuid,
) -> Result<ContentType, DomainError> {
    core.repos
        .content_types()
        .get(conn, ctx.site_id, id)
        .await?
        .ok_or_else(|| DomainError::not_found("ContentType", id))
}

async fn ensure_slug_free<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    slug: &str,
    except: Option<Uuid>,
) -> Result<(), DomainError> {
    let existing = core
        .repos
        .content_types()
        .find_by_slug(conn, ctx.site_id, slug)
        .await?;
    match existing {
        Some(ct) if Some(ct.id) != except => Err(DomainError::duplicate_name("ContentType", slug)),
        _ => Ok(()),
    }
}

impl<R: Repositories> ContentTypesService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn list(&self, ctx: &SiteContext) -> Result<Vec<ContentType>, DomainError> {
        let items = self
            .core
            .repos
            .content_types()
            .list(&self.core.db, ctx.site_id)
            .await?;
        debug!("Listed {} content types", items.len());
        Ok(items)
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn get(&self, ctx: &SiteContext, id: Uuid) -> Result<ContentType, DomainError> {
        load_content_type(&self.core, &self.core.db, ctx, id).await
    }

    /// Whether a content type with this slug and route shape exists.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn resolve_route(
        &self,
        ctx: &SiteContext,
        slug: &str,
        shape: RouteShape,
    ) -> Result<bool, DomainError> {
        let found = self
            .core
            .repos
            .content_types()
            .find_by_slug(&self.core.db, ctx.site_id, slug)
            .await?;
        Ok(found.is_some_and(|ct| ct.route_shape() == shape))
    }

    #[instrument(skip(self, new), fields(site_id = ctx.site_id, slug = %new.slug))]
    pub async fn create(
        &self,
        ctx: &SiteContext,
        new: NewContentType,
    ) -> Result<ContentType, DomainError> {
        info!("Creating content type");

        validate_name("name", &new.name)?;
        validate_slug("slug", &new.slug)?;

        let now = OffsetDateTime::now_utc();
        let ct = ContentType {
            id: Uuid::now_v7(),
            site_id: ctx.site_id,
            name: new.name.trim().to_owned(),
            slug: new.slug,
            description: new.description,
            is_single: new.is_single.unwrap_or(false),
            created_at: now,
            updated_at: now,
        };

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            ensure_slug_free(&self.core, &txn, ctx, &ct.slug, None).await?;
            self.core.repos.content_types().insert(&txn, &ct).await
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!(id = %ct.id, "Created content type");
        Ok(ct)
    }

    #[instrument(skip(self, patch), fields(site_id = ctx.site_id))]
    pub async fn update(
        &self,
        ctx: &SiteContext,
        id: Uuid,
        patch: ContentTypePatch,
    ) -> Result<ContentType, DomainError> {
        info!("Updating content type");

        if let Some(name) = &patch.name {
            validate_name("name", name)?;
        }
        if let Some(slug) = &patch.slug {
            validate_slug("slug", slug)?;
        }

        let txn = self.core.begin().await?;
        let result: Result<ContentType, DomainError> = async {
            let mut ct = load_content_type(&self.core, &txn, ctx, id).await?;

            if let Some(name) = patch.name {
                ct.name = name.trim().to_owned();
            }
            if let Some(slug) = patch.slug {
                ensure_slug_free(&self.core, &txn, ctx, &slug, Some(id)).await?;
                ct.slug = slug;
            }
            if let Some(description) = patch.description {
                ct.description = description;
            }
            if let Some(is_single) = patch.is_single {
                if is_single && !ct.is_single {
                    let count = self.core.repos.contents().count_for_type(&txn, id).await?;
                    if count > 1 {
                        return Err(DomainError::validation(
                            "is_single",
                            format!("cannot become a single type while it has {count} entries"),
                        ));
                    }
                }
                ct.is_single = is_single;
            }
            ct.updated_at = OffsetDateTime::now_utc();

            self.core.repos.content_types().update(&txn, &ct).await?;
            Ok(ct)
        }
        .await;
        let ct = self.core.finish_schema_change(txn, result).await?;

        info!("Updated content type");
        Ok(ct)
    }

    /// Delete a content type with its fields, contents and stored values.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn delete(&self, ctx: &SiteContext, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting content type");

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            load_content_type(&self.core, &txn, ctx, id).await?;
            let repos = &self.core.repos;

            for content_id in repos.contents().ids_for_type(&txn, id).await? {
                let bindings = repos.values().bindings_for_content(&txn, content_id).await?;
                purge_bindings(&self.core, &txn, bindings).await?;
            }
            for field in repos.fields().list_for_owner(&txn, FieldOwner::ContentType(id)).await? {
                let bindings = repos.values().bindings_for_field(&txn, field.id).await?;
                purge_bindings(&self.core, &txn, bindings).await?;
            }

            let contents = repos.contents().delete_for_type(&txn, id).await?;
            let fields = repos
                .fields()
                .delete_for_owner(&txn, FieldOwner::ContentType(id))
                .await?;
            repos.content_types().delete(&txn, id).await?;
            debug!(contents, fields = fields.len(), "Removed dependent rows");
            Ok(())
        }
        .await;
        self.core.finish_schema_change(txn, result).await?;

        info!("Deleted content type");
        Ok(())
    }
}
