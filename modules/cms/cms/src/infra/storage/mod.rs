//! Infrastructure storage layer - SeaORM entities, migrations and repositories.
//!
//! ## Architecture
//!
//! This module contains ALL SeaORM-specific code and database operations:
//! - `entity/` - SeaORM entity definitions (schema registries, contents, typed value tables)
//! - `mapper.rs` - Conversions between SeaORM models and SDK contract types
//! - `migrations/` - Database schema migrations
//! - `*_sea_repo.rs` - Implementations of the domain repository traits
//!
//! Typed value rows have no foreign key of their own: the `content_values`
//! join is their only reference, so every path that removes a join row also
//! removes the typed row it points at.

pub mod db;
pub mod entity;
pub mod mapper;
pub mod migrations;

mod components_sea_repo;
mod content_types_sea_repo;
mod contents_sea_repo;
mod fields_sea_repo;
mod values_sea_repo;

pub use components_sea_repo::OrmComponentsRepository;
pub use content_types_sea_repo::OrmContentTypesRepository;
pub use contents_sea_repo::OrmContentsRepository;
pub use fields_sea_repo::OrmFieldsRepository;
pub use values_sea_repo::OrmValuesRepository;

use crate::domain::repos::Repositories;

/// SeaORM-backed repository set.
#[derive(Clone, Default)]
pub struct OrmRepositories {
    content_types: OrmContentTypesRepository,
    components: OrmComponentsRepository,
    fields: OrmFieldsRepository,
    contents: OrmContentsRepository,
    values: OrmValuesRepository,
}

impl OrmRepositories {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Repositories for OrmRepositories {
    type ContentTypes = OrmContentTypesRepository;
    type Components = OrmComponentsRepository;
    type Fields = OrmFieldsRepository;
    type Contents = OrmContentsRepository;
    type Values = OrmValuesRepository;

    fn content_types(&self) -> &Self::ContentTypes {
        &self.content_types
    }

    fn components(&self) -> &Self::Components {
        &self.components
    }

    fn fields(&self) -> &Self::Fields {
        &self.fields
    }

    fn contents(&self) -> &Self::Contents {
        &self.contents
    }

    fn values(&self) -> &Self::Values {
        &self.values
    }
}
