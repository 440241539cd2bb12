//! Process-wide cache of generated API documents, one entry per site.

use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use moka::future::Cache;
use utoipa::openapi::OpenApi;

use super::error::DomainError;

pub const CACHE_KEY_PREFIX: &str = "cms_api_docs";
const MAX_SITES: u64 = 1_024;

#[derive(Clone)]
struct CachedDoc {
    generation: u64,
    doc: Arc<OpenApi>,
}

/// TTL cache for generated documents.
///
/// Every entry is tagged with the generation it was built under. `invalidate`
/// bumps the generation, so a document built before an invalidation is never
/// served after it, even if its build finishes late.
pub struct ApiDocsCache {
    cache: Cache<String, CachedDoc>,
    generation: AtomicU64,
    builds: AtomicU64,
}

impl ApiDocsCache {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        let cache = Cache::builder()
            .max_capacity(MAX_SITES)
            .time_to_live(ttl)
            .build();

        Self {
            cache,
            generation: AtomicU64::new(0),
            builds: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn key(site_id: i64) -> String {
        format!("{CACHE_KEY_PREFIX}:{site_id}")
    }

    /// Cached document for `site_id`, or the result of `build` on a miss.
    ///
    /// Build errors are returned and nothing is cached.
    pub async fn get_or_build<F, Fut>(
        &self,
        site_id: i64,
        build: F,
    ) -> Result<Arc<OpenApi>, DomainError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<OpenApi, DomainError>>,
    {
        let key = Self::key(site_id);
        let generation = self.generation.load(Ordering::Acquire);

        if let Some(hit) = self.cache.get(&key).await {
            if hit.generation == generation {
                tracing::debug!(site_id, "API docs cache hit");
                return Ok(hit.doc);
            }
        }

        self.builds.fetch_add(1, Ordering::Relaxed);
        let doc = Arc::new(build().await?);

        if self.generation.load(Ordering::Acquire) == generation {
            self.cache
                .insert(
                    key,
                    CachedDoc {
                        generation,
                        doc: Arc::clone(&doc),
                    },
                )
                .await;
        }
        Ok(doc)
    }

    /// Drop every cached document. Called after each committed schema mutation.
    pub fn invalidate(&self) {
        self.generation.fetch_add(1, Ordering::AcqRel);
        self.cache.invalidate_all();
        tracing::debug!("API docs cache invalidated");
    }

    /// Number of documents built since creation.
    #[must_use]
    pub fn builds(&self) -> u64 {
        self.builds.load(Ordering::Relaxed)
    }
}
