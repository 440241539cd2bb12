//! Domain layer - business rules of the CMS.
//!
//! ## Layering Rules
//!
//! The domain layer:
//! - **MAY** import: `cms_sdk` (contract types), `sea_orm` connection traits for transactions
//! - **MUST NOT** import: `api::*` (one-way dependency: API → Domain)
//! - **Uses**: SDK contract types (`ContentType`, `Field`, ...) as primary domain models
//!
//! Pure planning code (`layout`, `values`, `openapi`) has no I/O; the
//! `service` module applies its results through the `repos` ports.

pub mod docs_cache;
pub mod error;
pub mod layout;
pub mod openapi;
pub mod repos;
pub mod service;
pub mod validation;
pub mod values;
