#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Shared fixtures for in-crate tests: a migrated in-memory database and a
//! service stack on top of it.

use std::time::Duration;

use cms_sdk::{ContentType, FieldOwner, NewContentType, NewField, SiteContext};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

use crate::config::CmsConfig;
use crate::domain::repos::Repositories;
use crate::domain::service::{AppServices, ConcreteAppServices};
use crate::infra::storage::migrations::Migrator;

/// Fresh migrated `sqlite::memory:` database. One connection, so every
/// handle sees the same in-memory file.
pub async fn inmem_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(5))
        .sqlx_logging(false);
    let db = Database::connect(opts)
        .await
        .expect("Failed to connect to in-memory database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub async fn services() -> ConcreteAppServices {
    ConcreteAppServices::from_db(inmem_db().await, CmsConfig::default())
}

#[must_use]
pub fn ctx() -> SiteContext {
    SiteContext::new(0)
}

pub async fn content_type<R: Repositories>(
    svc: &AppServices<R>,
    name: &str,
    slug: &str,
    is_single: bool,
) -> ContentType {
    svc.content_types
        .create(
            &ctx(),
            NewContentType {
                name: name.to_owned(),
                slug: slug.to_owned(),
                description: None,
                is_single: Some(is_single),
            },
        )
        .await
        .expect("create content type")
}

#[must_use]
pub fn new_field(name: &str, field_type: &str) -> NewField {
    NewField {
        name: name.to_owned(),
        field_type: field_type.to_owned(),
        ..Default::default()
    }
}

pub async fn field<R: Repositories>(
    svc: &AppServices<R>,
    owner: FieldOwner,
    name: &str,
    field_type: &str,
) -> cms_sdk::Field {
    svc.fields
        .create(&ctx(), owner, new_field(name, field_type))
        .await
        .expect("create field")
}
