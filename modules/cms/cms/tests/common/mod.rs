#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common fixtures for CMS integration tests.

use std::sync::Arc;
use std::time::Duration;

use cms::config::CmsConfig;
use cms::domain::repos::Repositories;
use cms::domain::service::{AppServices, ConcreteAppServices};
use cms::infra::storage::migrations::Migrator;
use cms_sdk::{ContentType, Field, FieldOwner, NewContentType, NewField, SiteContext};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Statement};
use sea_orm_migration::MigratorTrait;

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

pub async fn create_services() -> Arc<ConcreteAppServices> {
    Arc::new(ConcreteAppServices::from_db(
        inmem_db().await,
        CmsConfig::default(),
    ))
}

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

pub async fn field<R: Repositories>(
    svc: &AppServices<R>,
    owner: FieldOwner,
    name: &str,
    field_type: &str,
) -> Field {
    svc.fields
        .create(
            &ctx(),
            owner,
            NewField {
                name: name.to_owned(),
                field_type: field_type.to_owned(),
                ..Default::default()
            },
        )
        .await
        .expect("create field")
}

/// Row count of a table, read with raw SQL so tests see what is really stored.
pub async fn count_rows(db: &DatabaseConnection, table: &str) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            format!("SELECT COUNT(*) AS n FROM {table}"),
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "n").unwrap()
}

pub const VALUE_TABLES: [&str; 4] = [
    "field_values_strings",
    "field_values_texts",
    "field_values_integers",
    "field_values_booleans",
];

/// Checks the pairing rule over a layout: every row group is shared by
/// exactly two adjacent half-width fields.
pub fn assert_pairing(fields: &[Field]) {
    let mut sorted: Vec<&Field> = fields.iter().collect();
    sorted.sort_by_key(|f| f.position);
    for (i, f) in sorted.iter().enumerate() {
        assert_eq!(f.position, i32::try_from(i + 1).unwrap(), "positions are dense");
        let Some(group) = f.row_group else { continue };
        let members: Vec<_> = sorted.iter().filter(|g| g.row_group == Some(group)).collect();
        assert_eq!(members.len(), 2, "row group {group} has {} members", members.len());
        assert!(members.iter().all(|m| m.width == cms_sdk::FieldWidth::Half));
        assert_eq!((members[0].position - members[1].position).abs(), 1);
    }
}
