//! CMS SDK
//!
//! Transport-agnostic contract of the `cms` module: content types, components,
//! fields and their layout, content records, typed field values and the public
//! error type.

pub mod errors;
pub mod field_type;
pub mod models;

pub use errors::CmsError;
pub use field_type::{FieldType, FieldValue, FieldWidth, ValueKind};
pub use models::{
    Component, ComponentPatch, Content, ContentPatch, ContentStatus, ContentType,
    ContentTypePatch, ContentValue, Field, FieldOwner, FieldPatch, LayoutEntry, NewComponent,
    NewContent, NewContentType, NewField, RouteShape, SiteContext,
};
