use std::sync::Arc;

use cms_sdk::{FieldOwner, SiteContext};
use tracing::{info, instrument};
use utoipa::openapi::OpenApi;

use super::ServiceCore;
use crate::domain::error::DomainError;
use crate::domain::openapi::{SchemaSource, build_document};
use crate::domain::repos::{ContentTypesRepository, FieldsRepository, Repositories};

/// Generated API document, served through the docs cache.
pub struct DocsService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for DocsService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

impl<R: Repositories> DocsService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    /// Document for every content type of the site, cached per site.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn generate_schema(&self, ctx: &SiteContext) -> Result<Arc<OpenApi>, DomainError> {
        self.core
            .docs_cache
            .get_or_build(ctx.site_id, || self.build(ctx))
            .await
    }

    async fn build(&self, ctx: &SiteContext) -> Result<OpenApi, DomainError> {
        let conn = &self.core.db;
        let content_types = self
            .core
            .repos
            .content_types()
            .list(conn, ctx.site_id)
            .await?;

        let mut sources = Vec::with_capacity(content_types.len());
        for content_type in content_types {
            let fields = self
                .core
                .repos
                .fields()
                .list_for_owner(conn, FieldOwner::ContentType(content_type.id))
                .await?;
            sources.push(SchemaSource {
                content_type,
                fields,
            });
        }

        let config = &self.core.config;
        let doc = build_document(&config.docs_title, config.default_page_size, &sources)?;
        info!(content_types = sources.len(), "Generated API document");
        Ok(doc)
    }
}
