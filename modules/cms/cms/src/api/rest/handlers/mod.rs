//! Axum handlers. Each takes the service stack from the request extensions
//! and the caller's site from [`Site`](super::site::Site).

pub mod components;
pub mod content_types;
pub mod contents;
pub mod docs;
pub mod fields;
pub mod public;
pub mod values;
