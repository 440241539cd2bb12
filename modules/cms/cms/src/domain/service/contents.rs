use std::sync::Arc;

use cms_sdk::{
    Content, ContentPatch, ContentStatus, ContentType, Field, FieldOwner, FieldType, FieldValue,
    NewContent, SiteContext,
};
use sea_orm::ConnectionTrait;
use serde_json::{Map, Value};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::ServiceCore;
use super::content_types::load_content_type;
use super::values::{load_content, purge_bindings, read_values, write_named_values};
use crate::domain::error::DomainError;
use crate::domain::repos::{
    ContentTypesRepository, ContentsRepository, FieldsRepository, Repositories, ValuesRepository,
};
use crate::domain::validation::validate_slug;
use crate::domain::values::render;

/// Keys every public document carries besides its field values.
const BASE_KEYS: [&str; 6] = ["id", "title", "slug", "status", "created_at", "updated_at"];

/// One page of a listing with its pagination meta.
#[derive(Debug, Clone, PartialEq)]
pub struct PublicPage<T> {
    pub data: Vec<T>,
    pub current_page: u64,
    pub total_pages: u64,
    pub total_count: u64,
}

/// Content records, publication state and the public read model.
pub struct ContentsService<R: Repositories> {
    core: Arc<ServiceCore<R>>,
}

impl<R: Repositories> Clone for ContentsService<R> {
    fn clone(&self) -> Self {
        Self {
            core: Arc::clone(&self.core),
        }
    }
}

/// Move `content` to `status`, stamping the publication timestamps.
fn transition(content: &mut Content, status: ContentStatus, now: OffsetDateTime) {
    if content.status == status {
        return;
    }
    if status == ContentStatus::Published {
        content.published_at = Some(now);
    } else if content.status == ContentStatus::Published {
        content.unpublished_at = Some(now);
    }
    content.status = status;
}

fn timestamp(t: OffsetDateTime) -> Value {
    t.format(&Rfc3339).map_or(Value::Null, Value::String)
}

/// Public document of a record: field values by name, then the base keys.
fn document(content: &Content, values: &[(Field, FieldValue)]) -> Value {
    let mut doc = Map::with_capacity(values.len() + 6);
    for (field, value) in values {
        doc.insert(field.name.clone(), render(field.field_type, value));
    }

    let title = values
        .iter()
        .find(|(f, _)| f.name == "title" && f.field_type == FieldType::String)
        .and_then(|(_, v)| v.as_str())
        .unwrap_or(content.slug.as_str())
        .to_owned();

    doc.insert("id".to_owned(), Value::String(content.id.to_string()));
    doc.insert("title".to_owned(), Value::String(title));
    doc.insert("slug".to_owned(), Value::String(content.slug.clone()));
    doc.insert(
        "status".to_owned(),
        Value::String(content.status.as_str().to_owned()),
    );
    doc.insert("created_at".to_owned(), timestamp(content.created_at));
    doc.insert("updated_at".to_owned(), timestamp(content.updated_at));
    Value::Object(doc)
}

fn page_meta<T>(data: Vec<T>, page: u64, per_page: u64, total: u64) -> PublicPage<T> {
    PublicPage {
        data,
        current_page: page,
        total_pages: total.div_ceil(per_page.max(1)),
        total_count: total,
    }
}

/// Content of `content_type` with this id, or `NotFound`.
async fn load_owned_content<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    ctx: &SiteContext,
    content_type_id: Uuid,
    id: Uuid,
) -> Result<Content, DomainError> {
    let content = load_content(core, conn, ctx, id).await?;
    if content.content_type_id != content_type_id {
        return Err(DomainError::not_found("Content", id));
    }
    Ok(content)
}

async fn ensure_content_slug_free<R: Repositories, C: ConnectionTrait + Send + Sync>(
    core: &ServiceCore<R>,
    conn: &C,
    slug: &str,
) -> Result<(), DomainError> {
    if core.repos.contents().find_by_slug(conn, slug).await?.is_some() {
        return Err(DomainError::duplicate_name("Content", slug));
    }
    Ok(())
}

impl<R: Repositories> ContentsService<R> {
    pub(super) fn new(core: Arc<ServiceCore<R>>) -> Self {
        Self { core }
    }

    /// Page of a content type's records, newest first. `per_page` is clamped by config.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn list(
        &self,
        ctx: &SiteContext,
        content_type_id: Uuid,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<PublicPage<Content>, DomainError> {
        let conn = &self.core.db;
        load_content_type(&self.core, conn, ctx, content_type_id).await?;

        let page = page.unwrap_or(1).max(1);
        let per_page = self.core.config.page_size(per_page);
        let found = self
            .core
            .repos
            .contents()
            .list_page(conn, content_type_id, false, page, per_page)
            .await?;
        debug!(total = found.total, "Listed contents");
        Ok(page_meta(found.items, page, per_page, found.total))
    }

    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn get(
        &self,
        ctx: &SiteContext,
        content_type_id: Uuid,
        id: Uuid,
    ) -> Result<Content, DomainError> {
        load_owned_content(&self.core, &self.core.db, ctx, content_type_id, id).await
    }

    /// Create a record and write its initial values in the same transaction.
    #[instrument(skip(self, new), fields(site_id = ctx.site_id, slug = %new.slug))]
    pub async fn create(
        &self,
        ctx: &SiteContext,
        content_type_id: Uuid,
        new: NewContent,
    ) -> Result<Content, DomainError> {
        info!("Creating content");

        validate_slug("slug", &new.slug)?;

        let txn = self.core.begin().await?;
        let result: Result<Content, DomainError> = async {
            let ct = load_content_type(&self.core, &txn, ctx, content_type_id).await?;
            self.insert_content(&txn, ctx, &ct, new.slug, new.status.unwrap_or_default(), &new.values)
                .await
        }
        .await;
        let content = ServiceCore::<R>::finish(txn, result).await?;

        info!(id = %content.id, status = %content.status, "Created content");
        Ok(content)
    }

    async fn insert_content<C: ConnectionTrait + Send + Sync>(
        &self,
        conn: &C,
        ctx: &SiteContext,
        ct: &ContentType,
        slug: String,
        status: ContentStatus,
        values: &Map<String, Value>,
    ) -> Result<Content, DomainError> {
        let contents = self.core.repos.contents();
        if ct.single() && contents.count_for_type(conn, ct.id).await? > 0 {
            return Err(DomainError::conflict(format!(
                "single type '{}' already has its entry",
                ct.slug
            )));
        }
        ensure_content_slug_free(&self.core, conn, &slug).await?;

        let now = OffsetDateTime::now_utc();
        let mut content = Content {
            id: Uuid::now_v7(),
            site_id: ctx.site_id,
            content_type_id: ct.id,
            slug,
            status: ContentStatus::Draft,
            published_at: None,
            unpublished_at: None,
            created_at: now,
            updated_at: now,
        };
        transition(&mut content, status, now);

        contents.insert(conn, &content).await?;
        write_named_values(&self.core, conn, &content, values).await?;
        Ok(content)
    }

    #[instrument(skip(self, patch), fields(site_id = ctx.site_id))]
    pub async fn update(
        &self,
        ctx: &SiteContext,
        content_type_id: Uuid,
        id: Uuid,
        patch: ContentPatch,
    ) -> Result<Content, DomainError> {
        info!("Updating content");

        if let Some(slug) = &patch.slug {
            validate_slug("slug", slug)?;
        }

        let txn = self.core.begin().await?;
        let result: Result<Content, DomainError> = async {
            let mut content =
                load_owned_content(&self.core, &txn, ctx, content_type_id, id).await?;
            let now = OffsetDateTime::now_utc();

            if let Some(slug) = patch.slug {
                if slug != content.slug {
                    ensure_content_slug_free(&self.core, &txn, &slug).await?;
                    content.slug = slug;
                }
            }
            if let Some(status) = patch.status {
                transition(&mut content, status, now);
            }
            content.updated_at = now;

            self.core.repos.contents().update(&txn, &content).await?;
            write_named_values(&self.core, &txn, &content, &patch.values).await?;
            Ok(content)
        }
        .await;
        let content = ServiceCore::<R>::finish(txn, result).await?;

        info!(status = %content.status, "Updated content");
        Ok(content)
    }

    /// Delete a record with its stored values.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn delete(
        &self,
        ctx: &SiteContext,
        content_type_id: Uuid,
        id: Uuid,
    ) -> Result<(), DomainError> {
        info!("Deleting content");

        let txn = self.core.begin().await?;
        let result: Result<(), DomainError> = async {
            load_owned_content(&self.core, &txn, ctx, content_type_id, id).await?;
            let bindings = self
                .core
                .repos
                .values()
                .bindings_for_content(&txn, id)
                .await?;
            let purged = purge_bindings(&self.core, &txn, bindings).await?;
            self.core.repos.contents().delete(&txn, id).await?;
            debug!(purged, "Removed content values");
            Ok(())
        }
        .await;
        ServiceCore::<R>::finish(txn, result).await?;

        info!("Deleted content");
        Ok(())
    }

    /// Render the public document of a record.
    #[instrument(skip(self, content), fields(site_id = ctx.site_id, id = %content.id))]
    pub async fn render(&self, ctx: &SiteContext, content: &Content) -> Result<Value, DomainError> {
        let values = read_values(&self.core, &self.core.db, content).await?;
        Ok(document(content, &values))
    }

    async fn public_type(
        &self,
        ctx: &SiteContext,
        slug: &str,
        single: bool,
    ) -> Result<ContentType, DomainError> {
        self.core
            .repos
            .content_types()
            .find_by_slug(&self.core.db, ctx.site_id, slug)
            .await?
            .filter(|ct| ct.single() == single)
            .ok_or_else(|| DomainError::not_found("ContentType", slug))
    }

    /// Published records of a collection as rendered documents.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn public_list(
        &self,
        ctx: &SiteContext,
        slug: &str,
        page: Option<u64>,
        per_page: Option<u64>,
    ) -> Result<PublicPage<Value>, DomainError> {
        let ct = self.public_type(ctx, slug, false).await?;
        let page = page.unwrap_or(1).max(1);
        let per_page = self.core.config.page_size(per_page);

        let found = self
            .core
            .repos
            .contents()
            .list_page(&self.core.db, ct.id, true, page, per_page)
            .await?;
        let mut data = Vec::with_capacity(found.items.len());
        for content in &found.items {
            data.push(self.render(ctx, content).await?);
        }
        Ok(page_meta(data, page, per_page, found.total))
    }

    /// One published record of a collection, addressed by id or slug.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn public_get(
        &self,
        ctx: &SiteContext,
        slug: &str,
        id_or_slug: &str,
    ) -> Result<Value, DomainError> {
        let ct = self.public_type(ctx, slug, false).await?;
        let contents = self.core.repos.contents();
        let found = match id_or_slug.parse::<Uuid>() {
            Ok(id) => contents.get(&self.core.db, ctx.site_id, id).await?,
            Err(_) => contents.find_by_slug(&self.core.db, id_or_slug).await?,
        };
        let content = found
            .filter(|c| {
                c.site_id == ctx.site_id
                    && c.content_type_id == ct.id
                    && c.status == ContentStatus::Published
            })
            .ok_or_else(|| DomainError::not_found("Content", id_or_slug))?;
        self.render(ctx, &content).await
    }

    /// The published record of a single type.
    #[instrument(skip(self), fields(site_id = ctx.site_id))]
    pub async fn public_single(&self, ctx: &SiteContext, slug: &str) -> Result<Value, DomainError> {
        let ct = self.public_type(ctx, slug, true).await?;
        let found = self
            .core
            .repos
            .contents()
            .list_page(&self.core.db, ct.id, true, 1, 1)
            .await?;
        let content = found
            .items
            .into_iter()
            .next()
            .ok_or_else(|| DomainError::not_found("Content", slug))?;
        self.render(ctx, &content).await
    }

    /// Write the values of a single type's record, creating it published if absent.
    ///
    /// `body` may be a previously read document: base keys that are not also
    /// field names are ignored.
    #[instrument(skip(self, body), fields(site_id = ctx.site_id))]
    pub async fn upsert_single(
        &self,
        ctx: &SiteContext,
        slug: &str,
        body: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        info!("Writing single entry");

        let ct = self.public_type(ctx, slug, true).await?;
        let fields = self
            .core
            .repos
            .fields()
            .list_for_owner(&self.core.db, FieldOwner::ContentType(ct.id))
            .await?;
        let values: Map<String, Value> = body
            .iter()
            .filter(|(k, _)| {
                !BASE_KEYS.contains(&k.as_str()) || fields.iter().any(|f| &f.name == *k)
            })
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let values = &values;

        let txn = self.core.begin().await?;
        let result: Result<Content, DomainError> = async {
            let contents = self.core.repos.contents();
            let existing = contents.list_page(&txn, ct.id, false, 1, 1).await?;
            match existing.items.into_iter().next() {
                Some(mut content) => {
                    content.updated_at = OffsetDateTime::now_utc();
                    contents.update(&txn, &content).await?;
                    write_named_values(&self.core, &txn, &content, values).await?;
                    Ok(content)
                }
                None => {
                    let entry_slug = if contents.find_by_slug(&txn, &ct.slug).await?.is_some() {
                        format!("{}-{}", ct.slug, ct.id.simple())
                    } else {
                        ct.slug.clone()
                    };
                    self.insert_content(&txn, ctx, &ct, entry_slug, ContentStatus::Published, values)
                        .await
                }
            }
        }
        .await;
        let content = ServiceCore::<R>::finish(txn, result).await?;

        info!(id = %content.id, "Wrote single entry");
        let values = read_values(&self.core, &self.core.db, &content).await?;
        Ok(document(&content, &values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cms_sdk::{FieldOwner, FieldWidth};

    fn content(status: ContentStatus) -> Content {
        let now = OffsetDateTime::now_utc();
        Content {
            id: Uuid::now_v7(),
            site_id: 0,
            content_type_id: Uuid::now_v7(),
            slug: "hello-world".to_owned(),
            status,
            published_at: None,
            unpublished_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn field(name: &str, field_type: FieldType) -> Field {
        let now = OffsetDateTime::now_utc();
        Field {
            id: Uuid::now_v7(),
            owner: FieldOwner::ContentType(Uuid::now_v7()),
            name: name.to_owned(),
            field_type,
            description: None,
            required: false,
            options: Map::new(),
            position: 1,
            width: FieldWidth::Full,
            row_group: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn publishing_stamps_published_at() {
        let mut c = content(ContentStatus::Draft);
        let now = OffsetDateTime::now_utc();
        transition(&mut c, ContentStatus::Published, now);
        assert_eq!(c.status, ContentStatus::Published);
        assert_eq!(c.published_at, Some(now));
        assert_eq!(c.unpublished_at, None);
    }

    #[test]
    fn leaving_published_stamps_unpublished_at() {
        let mut c = content(ContentStatus::Published);
        let now = OffsetDateTime::now_utc();
        transition(&mut c, ContentStatus::Archived, now);
        assert_eq!(c.unpublished_at, Some(now));
        assert_eq!(c.published_at, None);
    }

    #[test]
    fn draft_to_archived_stamps_nothing() {
        let mut c = content(ContentStatus::Draft);
        transition(&mut c, ContentStatus::Archived, OffsetDateTime::now_utc());
        assert_eq!(c.status, ContentStatus::Archived);
        assert!(c.published_at.is_none() && c.unpublished_at.is_none());
    }

    #[test]
    fn document_takes_title_from_string_field() {
        let c = content(ContentStatus::Published);
        let values = vec![
            (field("title", FieldType::String), FieldValue::String("Hello".to_owned())),
            (field("views", FieldType::Integer), FieldValue::Integer(7)),
        ];
        let doc = document(&c, &values);
        assert_eq!(doc["title"], "Hello");
        assert_eq!(doc["views"], 7);
        assert_eq!(doc["slug"], "hello-world");
        assert_eq!(doc["status"], "published");
        assert!(doc["created_at"].is_string());
    }

    #[test]
    fn document_falls_back_to_slug_and_keeps_base_keys() {
        let c = content(ContentStatus::Draft);
        let values = vec![(field("id", FieldType::String), FieldValue::String("spoof".to_owned()))];
        let doc = document(&c, &values);
        assert_eq!(doc["title"], "hello-world");
        assert_eq!(doc["id"], c.id.to_string());
    }

    #[test]
    fn page_meta_rounds_up() {
        let page = page_meta(vec![1, 2], 1, 2, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.total_count, 5);
        let empty: PublicPage<u8> = page_meta(vec![], 1, 25, 0);
        assert_eq!(empty.total_pages, 0);
    }
}
