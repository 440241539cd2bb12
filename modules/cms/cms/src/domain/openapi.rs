//! OpenAPI document for the public content API, derived from the schema registries.

use std::collections::HashSet;

use cms_sdk::{ContentStatus, ContentType, Field, FieldType};
use serde_json::json;
use utoipa::openapi::{
    OpenApi, OpenApiBuilder, Ref, RefOr, Required,
    content::ContentBuilder,
    info::InfoBuilder,
    path::{
        HttpMethod, Operation, OperationBuilder, ParameterBuilder, ParameterIn, PathItemBuilder,
        PathsBuilder,
    },
    request_body::RequestBodyBuilder,
    response::{ResponseBuilder, ResponsesBuilder},
    schema::{ArrayBuilder, ComponentsBuilder, ObjectBuilder, Schema, SchemaFormat, SchemaType, Type},
    security::{HttpAuthScheme, HttpBuilder, SecurityRequirement, SecurityScheme},
};

use super::error::DomainError;

pub const DOCS_VERSION: &str = "1.0.0";
pub const UNAVAILABLE_TITLE: &str = "API Documentation Temporarily Unavailable";
const BEARER: &str = "bearerAuth";
const JSON: &str = "application/json";

/// A content type together with its fields in position order.
#[derive(Debug, Clone)]
pub struct SchemaSource {
    pub content_type: ContentType,
    pub fields: Vec<Field>,
}

fn typed(t: Type) -> ObjectBuilder {
    ObjectBuilder::new().schema_type(SchemaType::Type(t))
}

fn string() -> Schema {
    Schema::Object(typed(Type::String).build())
}

fn integer() -> Schema {
    Schema::Object(typed(Type::Integer).build())
}

fn object_of(props: &[&str]) -> Schema {
    let obj = props
        .iter()
        .fold(typed(Type::Object), |o, p| o.property(*p, string()));
    Schema::Object(obj.build())
}

fn schema_ref(slug: &str) -> RefOr<Schema> {
    RefOr::Ref(Ref::from_schema_name(slug))
}

fn json_content(schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::content::Content {
    ContentBuilder::new().schema(Some(schema)).build()
}

/// Property schema of one field type.
#[must_use]
pub fn field_schema(field_type: FieldType) -> Schema {
    match field_type {
        FieldType::String | FieldType::Text | FieldType::Markdown => string(),
        FieldType::Integer => integer(),
        FieldType::Boolean => Schema::Object(typed(Type::Boolean).build()),
        FieldType::Media => object_of(&["url", "filename", "content_type"]),
        FieldType::Relation => object_of(&["id", "title"]),
        FieldType::Component => {
            let obj = typed(Type::Object)
                .property("id", string())
                .property("type", string())
                .property("fields", Schema::Object(typed(Type::Object).build()));
            Schema::Object(obj.build())
        }
    }
}

fn content_type_schema(source: &SchemaSource) -> Schema {
    let date_time = || {
        Schema::Object(
            typed(Type::String)
                .format(Some(SchemaFormat::Custom("date-time".into())))
                .build(),
        )
    };
    let status = typed(Type::String)
        .enum_values(Some(ContentStatus::ALL.iter().map(|s| s.as_str())))
        .build();

    let base = typed(Type::Object)
        .property("id", string())
        .property("title", string())
        .property("slug", string())
        .property("status", Schema::Object(status))
        .property("created_at", date_time())
        .property("updated_at", date_time());

    let obj = source
        .fields
        .iter()
        .fold(base, |o, f| o.property(&f.name, field_schema(f.field_type)));
    Schema::Object(obj.build())
}

fn ok_response(description: String, schema: impl Into<RefOr<Schema>>) -> utoipa::openapi::Response {
    ResponseBuilder::new()
        .description(description)
        .content(JSON, json_content(schema))
        .build()
}

fn page_param(name: &str, description: &str, default: u64) -> utoipa::openapi::path::Parameter {
    ParameterBuilder::new()
        .name(name)
        .parameter_in(ParameterIn::Query)
        .required(Required::False)
        .description(Some(description))
        .schema(Some(Schema::Object(
            typed(Type::Integer).default(Some(json!(default))).build(),
        )))
        .build()
}

/// English plural of a display name, e.g. `Category` to `Categories`.
fn pluralize(name: &str) -> String {
    let lower = name.to_ascii_lowercase();
    if ["s", "x", "z", "ch", "sh"].iter().any(|end| lower.ends_with(end)) {
        return format!("{name}es");
    }
    let mut tail = lower.chars().rev();
    match (tail.next(), tail.next()) {
        (Some('y'), Some(prev)) if !"aeiou".contains(prev) => {
            format!("{}ies", &name[..name.len() - 1])
        }
        _ => format!("{name}s"),
    }
}

fn list_operation(ct: &ContentType, per_page: u64) -> Operation {
    let meta = typed(Type::Object)
        .property("current_page", integer())
        .property("total_pages", integer())
        .property("total_count", integer());
    let data = ArrayBuilder::new().items(schema_ref(&ct.slug)).build();
    let envelope = Schema::Object(
        typed(Type::Object)
            .property("data", Schema::Array(data))
            .property("meta", Schema::Object(meta.build()))
            .build(),
    );

    OperationBuilder::new()
        .tag(&ct.name)
        .summary(Some(format!("List all {}", pluralize(&ct.name))))
        .parameter(page_param("page", "Page number for pagination", 1))
        .parameter(page_param("per_page", "Number of items per page", per_page))
        .responses(
            ResponsesBuilder::new()
                .response(
                    "200",
                    ok_response(format!("Returns list of {}", pluralize(&ct.name)), envelope),
                )
                .build(),
        )
        .build()
}

fn detail_operation(ct: &ContentType) -> Operation {
    let id = ParameterBuilder::new()
        .name("id")
        .parameter_in(ParameterIn::Path)
        .required(Required::True)
        .description(Some(format!("The ID of the {} to retrieve", ct.name)))
        .schema(Some(string()))
        .build();

    OperationBuilder::new()
        .tag(&ct.name)
        .summary(Some(format!("Get a specific {}", ct.name)))
        .parameter(id)
        .responses(
            ResponsesBuilder::new()
                .response("200", ok_response(format!("Returns the {}", ct.name), schema_ref(&ct.slug)))
                .response(
                    "404",
                    ResponseBuilder::new()
                        .description(format!("{} not found", ct.name))
                        .build(),
                )
                .build(),
        )
        .build()
}

fn single_get_operation(ct: &ContentType) -> Operation {
    OperationBuilder::new()
        .tag(&ct.name)
        .summary(Some(format!("Get {}", ct.name)))
        .responses(
            ResponsesBuilder::new()
                .response("200", ok_response(format!("Returns the {}", ct.name), schema_ref(&ct.slug)))
                .build(),
        )
        .build()
}

fn single_put_operation(ct: &ContentType) -> Operation {
    let body = RequestBodyBuilder::new()
        .content(JSON, json_content(schema_ref(&ct.slug)))
        .required(Some(Required::True))
        .build();

    OperationBuilder::new()
        .tag(&ct.name)
        .summary(Some(format!("Update {}", ct.name)))
        .request_body(Some(body))
        .responses(
            ResponsesBuilder::new()
                .response("200", ok_response(format!("Returns the updated {}", ct.name), schema_ref(&ct.slug)))
                .build(),
        )
        .build()
}

fn bearer_security() -> SecurityRequirement {
    SecurityRequirement::new(BEARER, Vec::<String>::new())
}

/// Build the document for every content type of a site.
///
/// Collections get `GET /api/v1/{slug}` (paginated) and
/// `GET /api/v1/{slug}/{id}`; singletons get `GET` and `PUT /api/v1/{slug}`.
pub fn build_document(
    title: &str,
    default_per_page: u64,
    sources: &[SchemaSource],
) -> Result<OpenApi, DomainError> {
    let mut seen = HashSet::with_capacity(sources.len());
    let mut paths = PathsBuilder::new();
    let mut components = ComponentsBuilder::new();

    for source in sources {
        let ct = &source.content_type;
        if !seen.insert(ct.slug.as_str()) {
            return Err(DomainError::schema_generation(format!(
                "duplicate content type slug '{}'",
                ct.slug
            )));
        }
        if let Some(dup) = duplicate_field_name(&source.fields) {
            return Err(DomainError::schema_generation(format!(
                "content type '{}' has two fields named '{dup}'",
                ct.slug
            )));
        }

        let base = format!("/api/v1/{}", ct.slug);
        if ct.single() {
            let item = PathItemBuilder::new()
                .operation(HttpMethod::Get, single_get_operation(ct))
                .operation(HttpMethod::Put, single_put_operation(ct))
                .build();
            paths = paths.path(base, item);
        } else {
            let list = PathItemBuilder::new()
                .operation(HttpMethod::Get, list_operation(ct, default_per_page))
                .build();
            let detail = PathItemBuilder::new()
                .operation(HttpMethod::Get, detail_operation(ct))
                .build();
            paths = paths.path(format!("{base}/{{id}}"), detail).path(base, list);
        }

        components = components.schema(ct.slug.clone(), content_type_schema(source));
    }

    components = components.security_scheme(
        BEARER,
        SecurityScheme::Http(
            HttpBuilder::new()
                .scheme(HttpAuthScheme::Bearer)
                .bearer_format("JWT")
                .build(),
        ),
    );

    let info = InfoBuilder::new()
        .title(title)
        .version(DOCS_VERSION)
        .description(Some("API documentation for content types"))
        .build();

    Ok(OpenApiBuilder::new()
        .info(info)
        .paths(paths.build())
        .components(Some(components.build()))
        .security(Some(vec![bearer_security()]))
        .build())
}

fn duplicate_field_name(fields: &[Field]) -> Option<&str> {
    let mut names = HashSet::with_capacity(fields.len());
    fields
        .iter()
        .map(|f| f.name.as_str())
        .find(|n| !names.insert(*n))
}

/// Fixed document served when generation fails.
#[must_use]
pub fn stub_document() -> OpenApi {
    let info = InfoBuilder::new()
        .title(UNAVAILABLE_TITLE)
        .version(DOCS_VERSION)
        .description(Some(
            "The API documentation could not be generated. Please try again later.",
        ))
        .build();
    OpenApiBuilder::new()
        .info(info)
        .paths(PathsBuilder::new().build())
        .build()
}
