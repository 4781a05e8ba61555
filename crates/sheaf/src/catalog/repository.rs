use super::domain::{
    CategoryId, CategoryRecord, SiteSettings, TagId, TagRecord, WorksheetId, WorksheetRecord,
};

/// Storage abstraction so the service module can be exercised in isolation.
/// Implementations enforce id and slug uniqueness (and tag name uniqueness)
/// and report collisions as [`RepositoryError::Conflict`]. Records inserted
/// with the zero id receive the next free id, returned on the stored copy.
pub trait CatalogRepository: Send + Sync {
    fn insert_category(&self, record: CategoryRecord) -> Result<CategoryRecord, RepositoryError>;
    fn update_category(&self, record: CategoryRecord) -> Result<(), RepositoryError>;
    fn remove_category(&self, id: CategoryId) -> Result<(), RepositoryError>;
    fn category(&self, id: CategoryId) -> Result<Option<CategoryRecord>, RepositoryError>;
    fn category_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepositoryError>;
    fn categories(&self) -> Result<Vec<CategoryRecord>, RepositoryError>;

    fn insert_tag(&self, record: TagRecord) -> Result<TagRecord, RepositoryError>;
    fn update_tag(&self, record: TagRecord) -> Result<(), RepositoryError>;
    fn remove_tag(&self, id: TagId) -> Result<(), RepositoryError>;
    fn tag(&self, id: TagId) -> Result<Option<TagRecord>, RepositoryError>;
    fn tag_by_slug(&self, slug: &str) -> Result<Option<TagRecord>, RepositoryError>;
    fn tags(&self) -> Result<Vec<TagRecord>, RepositoryError>;

    fn insert_worksheet(&self, record: WorksheetRecord)
        -> Result<WorksheetRecord, RepositoryError>;
    fn update_worksheet(&self, record: WorksheetRecord) -> Result<(), RepositoryError>;
    fn remove_worksheet(&self, id: WorksheetId) -> Result<(), RepositoryError>;
    fn worksheet(&self, id: WorksheetId) -> Result<Option<WorksheetRecord>, RepositoryError>;
    fn worksheet_by_slug(&self, slug: &str) -> Result<Option<WorksheetRecord>, RepositoryError>;
    fn worksheets(&self) -> Result<Vec<WorksheetRecord>, RepositoryError>;

    /// Site settings singleton; defaults apply until the first store.
    fn settings(&self) -> Result<SiteSettings, RepositoryError>;
    fn store_settings(&self, settings: SiteSettings) -> Result<(), RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
