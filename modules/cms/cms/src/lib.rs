//! CMS Module
//!
//! Administrators define content types and components composed of ordered
//! fields; content records store their values polymorphically across typed
//! value tables, and an OpenAPI document is derived live from that schema.
//!
//! ## Public API
//!
//! The contract is defined in the `cms-sdk` crate and re-exported here.

// === PUBLIC API (from SDK) ===
pub use cms_sdk::{
    CmsError, Component, Content, ContentStatus, ContentType, ContentValue, Field, FieldOwner,
    FieldType, FieldValue, FieldWidth, LayoutEntry, RouteShape, SiteContext, ValueKind,
};

pub use config::CmsConfig;
pub use domain::service::{AppServices, ConcreteAppServices};

// === INTERNAL MODULES ===
// Exposed for the server binary and integration tests only.
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod config;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;

#[cfg(test)]
mod test_support;
