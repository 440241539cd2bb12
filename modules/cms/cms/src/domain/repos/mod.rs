//! Persistence ports of the domain layer.
//!
//! Every method takes the connection to run on, so the service decides what
//! runs inside a transaction (`DatabaseTransaction`) and what runs on the pool
//! (`DatabaseConnection`).

mod components_repo;
mod content_types_repo;
mod contents_repo;
mod fields_repo;
mod values_repo;

pub use components_repo::ComponentsRepository;
pub use content_types_repo::ContentTypesRepository;
pub use contents_repo::{ContentsPage, ContentsRepository};
pub use fields_repo::FieldsRepository;
pub use values_repo::ValuesRepository;

/// The full set of repositories a service stack runs on.
pub trait Repositories: Send + Sync + 'static {
    type ContentTypes: ContentTypesRepository;
    type Components: ComponentsRepository;
    type Fields: FieldsRepository;
    type Contents: ContentsRepository;
    type Values: ValuesRepository;

    fn content_types(&self) -> &Self::ContentTypes;
    fn components(&self) -> &Self::Components;
    fn fields(&self) -> &Self::Fields;
    fn contents(&self) -> &Self::Contents;
    fn values(&self) -> &Self::Values;
}
