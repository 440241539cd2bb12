#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Generated API document and its cache.

mod common;

use cms_sdk::{FieldOwner, NewContent};
use common::{content_type, create_services, ctx, field};
use serde_json::{Map, Value, json};

fn to_json(doc: &utoipa::openapi::OpenApi) -> Value {
    serde_json::to_value(doc).unwrap()
}

#[tokio::test]
async fn post_collection_is_documented() {
    let svc = create_services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    field(&svc, FieldOwner::ContentType(ct.id), "title", "string").await;

    let doc = to_json(&svc.docs.generate_schema(&ctx()).await.unwrap());

    assert!(doc.pointer("/paths/~1api~1v1~1posts/get").is_some());
    assert!(doc.pointer("/paths/~1api~1v1~1posts~1{id}/get").is_some());
    assert!(doc.pointer("/paths/~1api~1v1~1posts/put").is_none());
    assert_eq!(
        doc.pointer("/components/schemas/posts/properties/title/type"),
        Some(&json!("string"))
    );
    for base in ["id", "slug", "status", "created_at", "updated_at"] {
        assert!(
            doc.pointer(&format!("/components/schemas/posts/properties/{base}"))
                .is_some(),
            "missing base property {base}"
        );
    }
}

#[tokio::test]
async fn unchanged_schema_is_served_from_cache() {
    let svc = create_services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    field(&svc, FieldOwner::ContentType(ct.id), "title", "string").await;

    let first = serde_json::to_string(&*svc.docs.generate_schema(&ctx()).await.unwrap()).unwrap();
    let second = serde_json::to_string(&*svc.docs.generate_schema(&ctx()).await.unwrap()).unwrap();
    assert_eq!(first, second);
    assert_eq!(svc.docs_cache().builds(), 1);

    // Content writes do not touch the schema.
    let mut values = Map::new();
    values.insert("title".to_owned(), json!("Hello"));
    svc.contents
        .create(
            &ctx(),
            ct.id,
            NewContent {
                slug: "hello".to_owned(),
                status: None,
                values,
            },
        )
        .await
        .unwrap();
    svc.docs.generate_schema(&ctx()).await.unwrap();
    assert_eq!(svc.docs_cache().builds(), 1);
}

#[tokio::test]
async fn schema_mutation_forces_rebuild() {
    let svc = create_services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    svc.docs.generate_schema(&ctx()).await.unwrap();

    field(&svc, FieldOwner::ContentType(ct.id), "summary", "text").await;

    let doc = to_json(&svc.docs.generate_schema(&ctx()).await.unwrap());
    assert_eq!(svc.docs_cache().builds(), 2);
    assert_eq!(
        doc.pointer("/components/schemas/posts/properties/summary/type"),
        Some(&json!("string"))
    );

    let single = content_type(&svc, "Home", "home", true).await;
    let doc = to_json(&svc.docs.generate_schema(&ctx()).await.unwrap());
    assert_eq!(svc.docs_cache().builds(), 3);
    assert!(doc.pointer("/paths/~1api~1v1~1home/put").is_some());
    assert!(doc.pointer("/paths/~1api~1v1~1home~1{id}").is_none());

    svc.content_types.delete(&ctx(), single.id).await.unwrap();
    let doc = to_json(&svc.docs.generate_schema(&ctx()).await.unwrap());
    assert!(doc.pointer("/paths/~1api~1v1~1home").is_none());
}

#[tokio::test]
async fn sites_get_separate_documents() {
    let svc = create_services().await;
    content_type(&svc, "Post", "posts", false).await;

    let other = cms_sdk::SiteContext::new(42);
    let doc = to_json(&svc.docs.generate_schema(&other).await.unwrap());
    assert!(doc.pointer("/paths/~1api~1v1~1posts").is_none());

    let doc = to_json(&svc.docs.generate_schema(&ctx()).await.unwrap());
    assert!(doc.pointer("/paths/~1api~1v1~1posts").is_some());
}
