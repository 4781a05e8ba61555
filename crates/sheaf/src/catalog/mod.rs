//! Worksheet catalog: categories, tags, worksheets, and the service and
//! routers that expose them over HTTP.

pub mod admin;
pub mod domain;
mod memory;
pub mod pagination;
pub mod query;
pub mod repository;
pub mod router;
pub mod service;
mod slug;
pub mod views;

#[cfg(test)]
mod tests;

pub use admin::admin_router;
pub use domain::{
    CategoryDraft, CategoryId, CategoryRecord, Difficulty, GradeLevel, SiteSettings, TagDraft,
    TagId, TagRecord, WorksheetDraft, WorksheetFlags, WorksheetId, WorksheetRecord,
};
pub use memory::InMemoryCatalog;
pub use pagination::{Page, PageError, PageRequest};
pub use query::{SearchQuery, WorksheetQuery};
pub use repository::{CatalogRepository, RepositoryError};
pub use router::catalog_router;
pub use service::{CatalogError, CatalogService, ValidationError, WorksheetDownload};
