//! Domain service layer - business logic and rules.
//!
//! ## Architecture
//!
//! Per-resource services share one [`ServiceCore`] (connection pool,
//! repositories, docs cache, configuration):
//! - `content_types` - content type registry and public route resolution
//! - `components` - reusable field groups
//! - `fields` - field registry and layout operations
//! - `values` - typed value store behind the `content_values` join
//! - `contents` - content records, publication state and public rendering
//! - `docs` - generated API document with TTL cache
//!
//! ## Transactions
//!
//! Every mutation runs in one transaction opened by the service; repositories
//! only ever see the transaction handle. Schema mutations (content types,
//! components, fields, layout) invalidate the docs cache after commit.

use std::sync::Arc;

use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};

use crate::config::CmsConfig;
use crate::domain::docs_cache::ApiDocsCache;
use crate::domain::error::DomainError;
use crate::domain::repos::Repositories;
use crate::infra::storage::OrmRepositories;
use crate::infra::storage::db::db_err;

mod components;
mod content_types;
mod contents;
mod docs;
mod fields;
mod values;

pub use components::ComponentsService;
pub use content_types::ContentTypesService;
pub use contents::{ContentsService, PublicPage};
pub use docs::DocsService;
pub use fields::FieldsService;
pub use values::ValuesService;

#[cfg(test)]
mod tests;

/// State shared by all services.
pub struct ServiceCore<R: Repositories> {
    pub(crate) db: DatabaseConnection,
    pub(crate) repos: R,
    pub(crate) docs_cache: Arc<ApiDocsCache>,
    pub(crate) config: CmsConfig,
}

impl<R: Repositories> ServiceCore<R> {
    pub(crate) async fn begin(&self) -> Result<DatabaseTransaction, DomainError> {
        self.db.begin().await.map_err(db_err)
    }

    /// Commit on success, roll back on error.
    pub(crate) async fn finish<T>(
        txn: DatabaseTransaction,
        result: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        match result {
            Ok(value) => {
                txn.commit().await.map_err(db_err)?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "Transaction rollback failed");
                }
                Err(e)
            }
        }
    }

    /// `finish`, then drop cached API documents if the schema changed.
    pub(crate) async fn finish_schema_change<T>(
        &self,
        txn: DatabaseTransaction,
        result: Result<T, DomainError>,
    ) -> Result<T, DomainError> {
        let value = Self::finish(txn, result).await?;
        self.docs_cache.invalidate();
        Ok(value)
    }
}

// DI Container - aggregates all domain services
pub struct AppServices<R: Repositories> {
    pub content_types: ContentTypesService<R>,
    pub components: ComponentsService<R>,
    pub fields: FieldsService<R>,
    pub values: ValuesService<R>,
    pub contents: ContentsService<R>,
    pub docs: DocsService<R>,
    core: Arc<ServiceCore<R>>,
}

/// Service stack over the SeaORM repositories.
pub type ConcreteAppServices = AppServices<OrmRepositories>;

impl<R: Repositories> AppServices<R> {
    pub fn new(db: DatabaseConnection, repos: R, config: CmsConfig) -> Self {
        let docs_cache = Arc::new(ApiDocsCache::new(config.docs_cache_ttl));
        Self::with_cache(db, repos, config, docs_cache)
    }

    /// Build the services around an existing docs cache.
    pub fn with_cache(
        db: DatabaseConnection,
        repos: R,
        config: CmsConfig,
        docs_cache: Arc<ApiDocsCache>,
    ) -> Self {
        let core = Arc::new(ServiceCore {
            db,
            repos,
            docs_cache,
            config,
        });

        Self {
            content_types: ContentTypesService::new(Arc::clone(&core)),
            components: ComponentsService::new(Arc::clone(&core)),
            fields: FieldsService::new(Arc::clone(&core)),
            values: ValuesService::new(Arc::clone(&core)),
            contents: ContentsService::new(Arc::clone(&core)),
            docs: DocsService::new(Arc::clone(&core)),
            core,
        }
    }

    #[must_use]
    pub fn config(&self) -> &CmsConfig {
        &self.core.config
    }

    #[must_use]
    pub fn docs_cache(&self) -> &ApiDocsCache {
        &self.core.docs_cache
    }

    #[must_use]
    pub fn db(&self) -> &DatabaseConnection {
        &self.core.db
    }
}

impl ConcreteAppServices {
    #[must_use]
    pub fn from_db(db: DatabaseConnection, config: CmsConfig) -> Self {
        Self::new(db, OrmRepositories::new(), config)
    }
}
