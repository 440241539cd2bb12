//! REST surface: admin API, generated docs and the public content API.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod problem;
pub mod routes;
pub mod site;
