#![allow(clippy::unwrap_used, clippy::expect_used)]

use cms_sdk::{
    ComponentPatch, ContentPatch, ContentStatus, ContentTypePatch, FieldOwner, FieldPatch,
    FieldValue, FieldWidth, LayoutEntry, NewComponent, NewContent, NewContentType, RouteShape,
};
use serde_json::{Map, Value, json};

use crate::domain::error::DomainError;
use crate::domain::layout::{Slot, pairing_violation};
use crate::test_support::{content_type, ctx, field, new_field, services};

fn values(v: Value) -> Map<String, Value> {
    match v {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}

fn new_content(slug: &str, status: ContentStatus, vals: Value) -> NewContent {
    NewContent {
        slug: slug.to_owned(),
        status: Some(status),
        values: values(vals),
    }
}

#[tokio::test]
async fn invalid_slug_is_rejected_before_any_write() {
    let svc = services().await;
    let err = svc
        .content_types
        .create(
            &ctx(),
            NewContentType {
                name: "Posts".to_owned(),
                slug: "Posts!".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert!(svc.content_types.list(&ctx()).await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_content_type_slug_is_rejected_per_site() {
    let svc = services().await;
    content_type(&svc, "Post", "posts", false).await;

    let err = svc
        .content_types
        .create(
            &ctx(),
            NewContentType {
                name: "Other".to_owned(),
                slug: "posts".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateName { .. }));

    let other_site = cms_sdk::SiteContext::new(7);
    svc.content_types
        .create(
            &other_site,
            NewContentType {
                name: "Post".to_owned(),
                slug: "posts".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(svc.content_types.list(&other_site).await.unwrap().len(), 1);
}

#[tokio::test]
async fn content_types_are_listed_by_name_and_routed_by_shape() {
    let svc = services().await;
    content_type(&svc, "Zebra", "zebras", false).await;
    content_type(&svc, "About", "about", true).await;

    let names: Vec<_> = svc
        .content_types
        .list(&ctx())
        .await
        .unwrap()
        .into_iter()
        .map(|ct| ct.name)
        .collect();
    assert_eq!(names, ["About", "Zebra"]);

    let ct = &svc.content_types;
    assert!(ct.resolve_route(&ctx(), "zebras", RouteShape::Collection).await.unwrap());
    assert!(!ct.resolve_route(&ctx(), "zebras", RouteShape::Single).await.unwrap());
    assert!(ct.resolve_route(&ctx(), "about", RouteShape::Single).await.unwrap());
    assert!(!ct.resolve_route(&ctx(), "missing", RouteShape::Collection).await.unwrap());
}

#[tokio::test]
async fn collection_with_entries_cannot_become_single() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    for slug in ["one", "two"] {
        svc.contents
            .create(&ctx(), ct.id, new_content(slug, ContentStatus::Draft, json!({})))
            .await
            .unwrap();
    }

    let err = svc
        .content_types
        .update(
            &ctx(),
            ct.id,
            ContentTypePatch {
                is_single: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn field_creation_checks_name_and_type() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    field(&svc, owner, "title", "string").await;

    let dup = svc
        .fields
        .create(&ctx(), owner, new_field("title", "text"))
        .await
        .unwrap_err();
    assert!(matches!(dup, DomainError::DuplicateName { .. }));

    let bad = svc
        .fields
        .create(&ctx(), owner, new_field("when", "datetime"))
        .await
        .unwrap_err();
    assert_eq!(bad, DomainError::invalid_field_type("datetime"));

    let empty = svc
        .fields
        .create(&ctx(), owner, new_field("  ", "string"))
        .await
        .unwrap_err();
    assert!(matches!(empty, DomainError::Validation { .. }));
}

#[tokio::test]
async fn fields_are_appended_or_inserted_at_position() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    field(&svc, owner, "a", "string").await;
    field(&svc, owner, "b", "string").await;

    let mut first = new_field("first", "string");
    first.position = Some(1);
    svc.fields.create(&ctx(), owner, first).await.unwrap();

    let listed = svc.fields.list(&ctx(), owner).await.unwrap();
    let order: Vec<_> = listed.iter().map(|f| (f.name.as_str(), f.position)).collect();
    assert_eq!(order, [("first", 1), ("a", 2), ("b", 3)]);
}

#[tokio::test]
async fn component_fields_need_an_existing_component() {
    let svc = services().await;
    let ct = content_type(&svc, "Page", "pages", false).await;
    let owner = FieldOwner::ContentType(ct.id);

    let missing = svc
        .fields
        .create(&ctx(), owner, new_field("hero", "component"))
        .await
        .unwrap_err();
    assert!(matches!(missing, DomainError::Validation { .. }));

    let hero = svc
        .components
        .create(
            &ctx(),
            NewComponent {
                name: "Hero".to_owned(),
                slug: "hero".to_owned(),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let mut self_ref = new_field("nested", "component");
    self_ref
        .options
        .insert("component_id".to_owned(), json!(hero.id.to_string()));
    let err = svc
        .fields
        .create(&ctx(), FieldOwner::Component(hero.id), self_ref)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));

    let mut embed = new_field("hero", "component");
    embed
        .options
        .insert("component_id".to_owned(), json!(hero.id.to_string()));
    svc.fields.create(&ctx(), owner, embed).await.unwrap();

    let in_use = svc.components.delete(&ctx(), hero.id).await.unwrap_err();
    assert!(matches!(in_use, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn component_crud_round_trip() {
    let svc = services().await;
    let c = svc
        .components
        .create(
            &ctx(),
            NewComponent {
                name: "Seo".to_owned(),
                slug: "seo".to_owned(),
                description: None,
                repeatable: false,
            },
        )
        .await
        .unwrap();
    field(&svc, FieldOwner::Component(c.id), "meta_title", "string").await;

    let updated = svc
        .components
        .update(
            &ctx(),
            c.id,
            ComponentPatch {
                repeatable: Some(true),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(updated.repeatable);

    svc.components.delete(&ctx(), c.id).await.unwrap();
    let gone = svc.components.get(&ctx(), c.id).await.unwrap_err();
    assert!(matches!(gone, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn reorder_rewrites_positions_and_pairs() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    let b = field(&svc, owner, "b", "string").await;
    let c = field(&svc, owner, "c", "string").await;
    for id in [a.id, c.id] {
        svc.fields
            .set_width(&ctx(), owner, id, FieldWidth::Half)
            .await
            .unwrap();
    }

    let entries = [
        LayoutEntry { field_id: b.id, row_group: None },
        LayoutEntry { field_id: c.id, row_group: Some(1) },
        LayoutEntry { field_id: a.id, row_group: Some(1) },
    ];
    let fields = svc.fields.reorder(&ctx(), owner, &entries).await.unwrap();

    let got: Vec<_> = fields.iter().map(|f| (f.id, f.position, f.row_group)).collect();
    assert_eq!(
        got,
        [(b.id, 1, None), (c.id, 2, Some(1)), (a.id, 3, Some(1))]
    );
    let slots: Vec<Slot> = fields.iter().map(Slot::from).collect();
    assert_eq!(pairing_violation(&slots), None);
}

#[tokio::test]
async fn invalid_reorder_changes_nothing() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    let b = field(&svc, owner, "b", "string").await;

    // b is full width, so the pair is rejected.
    let entries = [
        LayoutEntry { field_id: b.id, row_group: Some(3) },
        LayoutEntry { field_id: a.id, row_group: Some(3) },
    ];
    let err = svc.fields.reorder(&ctx(), owner, &entries).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidLayout { .. }));

    let names: Vec<_> = svc
        .fields
        .list(&ctx(), owner)
        .await
        .unwrap()
        .into_iter()
        .map(|f| (f.name, f.row_group))
        .collect();
    assert_eq!(names, [("a".to_owned(), None), ("b".to_owned(), None)]);
}

#[tokio::test]
async fn stale_reorder_list_is_rejected() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    field(&svc, owner, "b", "string").await;

    let entries = [LayoutEntry { field_id: a.id, row_group: None }];
    let err = svc.fields.reorder(&ctx(), owner, &entries).await.unwrap_err();
    assert!(matches!(err, DomainError::InvalidLayout { .. }));
}

#[tokio::test]
async fn full_width_clears_both_pair_members() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    let b = field(&svc, owner, "b", "string").await;
    for id in [a.id, b.id] {
        svc.fields.set_width(&ctx(), owner, id, FieldWidth::Half).await.unwrap();
    }
    let paired = [
        LayoutEntry { field_id: a.id, row_group: Some(9) },
        LayoutEntry { field_id: b.id, row_group: Some(9) },
    ];
    svc.fields.reorder(&ctx(), owner, &paired).await.unwrap();

    let a_after = svc.fields.set_width(&ctx(), owner, a.id, FieldWidth::Full).await.unwrap();
    assert_eq!(a_after.row_group, None);
    let b_after = svc.fields.get(&ctx(), owner, b.id).await.unwrap();
    assert_eq!(b_after.row_group, None);
    assert_eq!(b_after.width, FieldWidth::Half);
}

#[tokio::test]
async fn deleting_a_paired_field_unpairs_the_partner() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    let b = field(&svc, owner, "b", "string").await;
    let c = field(&svc, owner, "c", "string").await;
    for id in [a.id, b.id] {
        svc.fields.set_width(&ctx(), owner, id, FieldWidth::Half).await.unwrap();
    }
    let paired = [
        LayoutEntry { field_id: a.id, row_group: Some(1) },
        LayoutEntry { field_id: b.id, row_group: Some(1) },
        LayoutEntry { field_id: c.id, row_group: None },
    ];
    svc.fields.reorder(&ctx(), owner, &paired).await.unwrap();

    svc.fields.delete(&ctx(), owner, a.id).await.unwrap();
    let left = svc.fields.list(&ctx(), owner).await.unwrap();
    let got: Vec<_> = left.iter().map(|f| (f.id, f.position, f.row_group)).collect();
    assert_eq!(got, [(b.id, 1, None), (c.id, 2, None)]);
}

#[tokio::test]
async fn move_field_renumbers_densely() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let a = field(&svc, owner, "a", "string").await;
    field(&svc, owner, "b", "string").await;
    field(&svc, owner, "c", "string").await;

    let fields = svc.fields.move_field(&ctx(), owner, a.id, 99).await.unwrap();
    let got: Vec<_> = fields.iter().map(|f| (f.name.as_str(), f.position)).collect();
    assert_eq!(got, [("b", 1), ("c", 2), ("a", 3)]);
}

#[tokio::test]
async fn values_round_trip_per_type() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let title = field(&svc, owner, "title", "string").await;
    let views = field(&svc, owner, "views", "integer").await;
    let featured = field(&svc, owner, "featured", "boolean").await;
    let body = field(&svc, owner, "body", "text").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let cases = [
        (title.id, json!("hello"), FieldValue::String("hello".to_owned())),
        (views.id, json!(42), FieldValue::Integer(42)),
        (featured.id, json!(true), FieldValue::Boolean(true)),
        (
            body.id,
            json!("paragraph one\n\nparagraph two"),
            FieldValue::Text("paragraph one\n\nparagraph two".to_owned()),
        ),
    ];
    for (field_id, raw, expected) in cases {
        svc.values.set_value(&ctx(), post.id, field_id, &raw).await.unwrap();
        let got = svc.values.get_value(&ctx(), post.id, field_id).await.unwrap();
        assert_eq!(got, Some(expected));
    }
}

#[tokio::test]
async fn overwriting_a_value_keeps_one_binding() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let title = field(&svc, owner, "title", "string").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let first = svc.values.set_value(&ctx(), post.id, title.id, &json!("one")).await.unwrap();
    let second = svc.values.set_value(&ctx(), post.id, title.id, &json!("two")).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.value_id, second.value_id);

    let all = svc.values.values_for(&ctx(), post.id).await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].1, FieldValue::String("two".to_owned()));
}

#[tokio::test]
async fn mismatched_value_is_rejected_and_nothing_stored() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let featured = field(&svc, owner, "featured", "boolean").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let err = svc
        .values
        .set_value(&ctx(), post.id, featured.id, &json!("yes please"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TypeMismatch { .. }));
    assert_eq!(svc.values.get_value(&ctx(), post.id, featured.id).await.unwrap(), None);
}

#[tokio::test]
async fn field_of_another_type_is_rejected() {
    let svc = services().await;
    let posts = content_type(&svc, "Post", "posts", false).await;
    let pages = content_type(&svc, "Page", "pages", false).await;
    let foreign = field(&svc, FieldOwner::ContentType(pages.id), "title", "string").await;
    let post = svc
        .contents
        .create(&ctx(), posts.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let err = svc
        .values
        .set_value(&ctx(), post.id, foreign.id, &json!("x"))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
}

#[tokio::test]
async fn batch_values_roll_back_together() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    field(&svc, owner, "title", "string").await;
    field(&svc, owner, "views", "integer").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let err = svc
        .values
        .set_values(&ctx(), post.id, &values(json!({"title": "ok", "views": "many"})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::TypeMismatch { .. }));
    assert!(svc.values.values_for(&ctx(), post.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn clear_value_reports_whether_something_was_removed() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let title = field(&svc, FieldOwner::ContentType(ct.id), "title", "string").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({"title": "Hi"})))
        .await
        .unwrap();

    assert!(svc.values.clear_value(&ctx(), post.id, title.id).await.unwrap());
    assert!(!svc.values.clear_value(&ctx(), post.id, title.id).await.unwrap());
}

#[tokio::test]
async fn changing_field_type_drops_unreadable_values() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let views = field(&svc, owner, "views", "integer").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({"views": 3})))
        .await
        .unwrap();

    svc.fields
        .update(
            &ctx(),
            owner,
            views.id,
            FieldPatch {
                field_type: Some("string".to_owned()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(svc.values.get_value(&ctx(), post.id, views.id).await.unwrap(), None);
}

#[tokio::test]
async fn content_slugs_are_globally_unique() {
    let svc = services().await;
    let posts = content_type(&svc, "Post", "posts", false).await;
    let pages = content_type(&svc, "Page", "pages", false).await;
    svc.contents
        .create(&ctx(), posts.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();

    let err = svc
        .contents
        .create(&ctx(), pages.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::DuplicateName { .. }));
}

#[tokio::test]
async fn single_type_accepts_one_entry() {
    let svc = services().await;
    let about = content_type(&svc, "About", "about", true).await;
    svc.contents
        .create(&ctx(), about.id, new_content("about-us", ContentStatus::Published, json!({})))
        .await
        .unwrap();

    let err = svc
        .contents
        .create(&ctx(), about.id, new_content("about-2", ContentStatus::Draft, json!({})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict { .. }));
}

#[tokio::test]
async fn unknown_initial_value_fails_creation() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let err = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({"nope": 1})))
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    let page = svc.contents.list(&ctx(), ct.id, None, None).await.unwrap();
    assert_eq!(page.total_count, 0);
}

#[tokio::test]
async fn status_changes_stamp_timestamps() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();
    assert!(post.published_at.is_none());

    let published = svc
        .contents
        .update(
            &ctx(),
            ct.id,
            post.id,
            ContentPatch {
                status: Some(ContentStatus::Published),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(published.published_at.is_some());

    let archived = svc
        .contents
        .update(
            &ctx(),
            ct.id,
            post.id,
            ContentPatch {
                status: Some(ContentStatus::Archived),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert!(archived.unpublished_at.is_some());
}

#[tokio::test]
async fn public_reads_only_see_published_records() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    field(&svc, FieldOwner::ContentType(ct.id), "title", "string").await;
    let live = svc
        .contents
        .create(&ctx(), ct.id, new_content("live", ContentStatus::Published, json!({"title": "Live"})))
        .await
        .unwrap();
    svc.contents
        .create(&ctx(), ct.id, new_content("draft", ContentStatus::Draft, json!({"title": "Draft"})))
        .await
        .unwrap();

    let page = svc.contents.public_list(&ctx(), "posts", None, None).await.unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.current_page, 1);
    assert_eq!(page.total_pages, 1);
    assert_eq!(page.data[0]["title"], "Live");

    let by_id = svc.contents.public_get(&ctx(), "posts", &live.id.to_string()).await.unwrap();
    assert_eq!(by_id["slug"], "live");
    let by_slug = svc.contents.public_get(&ctx(), "posts", "live").await.unwrap();
    assert_eq!(by_slug["id"], live.id.to_string());

    let hidden = svc.contents.public_get(&ctx(), "posts", "draft").await.unwrap_err();
    assert!(matches!(hidden, DomainError::NotFound { .. }));
}

#[tokio::test]
async fn single_upsert_creates_then_updates() {
    let svc = services().await;
    let about = content_type(&svc, "About", "about", true).await;
    field(&svc, FieldOwner::ContentType(about.id), "headline", "string").await;

    let missing = svc.contents.public_single(&ctx(), "about").await.unwrap_err();
    assert!(matches!(missing, DomainError::NotFound { .. }));

    let first = svc
        .contents
        .upsert_single(&ctx(), "about", &values(json!({"headline": "Hi"})))
        .await
        .unwrap();
    let second = svc
        .contents
        .upsert_single(&ctx(), "about", &values(json!({"headline": "Hello"})))
        .await
        .unwrap();
    assert_eq!(first["id"], second["id"]);

    let doc = svc.contents.public_single(&ctx(), "about").await.unwrap();
    assert_eq!(doc["headline"], "Hello");
    assert_eq!(doc["status"], "published");
}

#[tokio::test]
async fn deleting_content_type_removes_everything_under_it() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    let owner = FieldOwner::ContentType(ct.id);
    let title = field(&svc, owner, "title", "string").await;
    let post = svc
        .contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({"title": "Hi"})))
        .await
        .unwrap();

    svc.content_types.delete(&ctx(), ct.id).await.unwrap();

    assert!(matches!(
        svc.content_types.get(&ctx(), ct.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        svc.values.get_value(&ctx(), post.id, title.id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn docs_are_cached_until_schema_changes() {
    let svc = services().await;
    let ct = content_type(&svc, "Post", "posts", false).await;
    field(&svc, FieldOwner::ContentType(ct.id), "title", "string").await;

    let first = svc.docs.generate_schema(&ctx()).await.unwrap();
    let second = svc.docs.generate_schema(&ctx()).await.unwrap();
    assert_eq!(
        serde_json::to_string(&*first).unwrap(),
        serde_json::to_string(&*second).unwrap()
    );
    assert_eq!(svc.docs_cache().builds(), 1);

    // Content writes leave the document alone.
    svc.contents
        .create(&ctx(), ct.id, new_content("hello", ContentStatus::Draft, json!({})))
        .await
        .unwrap();
    svc.docs.generate_schema(&ctx()).await.unwrap();
    assert_eq!(svc.docs_cache().builds(), 1);

    field(&svc, FieldOwner::ContentType(ct.id), "summary", "text").await;
    let third = svc.docs.generate_schema(&ctx()).await.unwrap();
    assert_eq!(svc.docs_cache().builds(), 2);
    let json = serde_json::to_value(&*third).unwrap();
    assert!(json["components"]["schemas"]["posts"]["properties"]["summary"].is_object());
}
