use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use super::domain::{
    CategoryId, CategoryRecord, SiteSettings, TagId, TagRecord, WorksheetId, WorksheetRecord,
};
use super::repository::{CatalogRepository, RepositoryError};

#[derive(Default)]
struct CatalogState {
    categories: BTreeMap<u64, CategoryRecord>,
    tags: BTreeMap<u64, TagRecord>,
    worksheets: BTreeMap<u64, WorksheetRecord>,
    settings: Option<SiteSettings>,
}

#[derive(Default)]
struct IdSequences {
    categories: AtomicU64,
    tags: AtomicU64,
    worksheets: AtomicU64,
}

impl IdSequences {
    fn next(sequence: &AtomicU64) -> u64 {
        sequence.fetch_add(1, Ordering::Relaxed) + 1
    }

    fn advance_past(sequence: &AtomicU64, id: u64) {
        sequence.fetch_max(id, Ordering::Relaxed);
    }
}

/// Mutex-guarded catalog store. The maps are keyed by raw id so listings
/// iterate in a stable order; sequences hand out ids for records inserted
/// with the zero placeholder.
#[derive(Default, Clone)]
pub struct InMemoryCatalog {
    state: Arc<Mutex<CatalogState>>,
    sequences: Arc<IdSequences>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> std::sync::MutexGuard<'_, CatalogState> {
        self.state.lock().expect("catalog mutex poisoned")
    }
}

impl CatalogRepository for InMemoryCatalog {
    fn insert_category(&self, record: CategoryRecord) -> Result<CategoryRecord, RepositoryError> {
        let mut state = self.state();
        let mut record = record;
        if record.id.0 == 0 {
            record.id = CategoryId(IdSequences::next(&self.sequences.categories));
        } else if state.categories.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        } else {
            IdSequences::advance_past(&self.sequences.categories, record.id.0);
        }
        if state.categories.values().any(|other| other.slug == record.slug) {
            return Err(RepositoryError::Conflict);
        }
        state.categories.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn update_category(&self, record: CategoryRecord) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if !state.categories.contains_key(&record.id.0) {
            return Err(RepositoryError::NotFound);
        }
        let slug_taken = state
            .categories
            .values()
            .any(|other| other.id != record.id && other.slug == record.slug);
        if slug_taken {
            return Err(RepositoryError::Conflict);
        }
        state.categories.insert(record.id.0, record);
        Ok(())
    }

    fn remove_category(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        state
            .categories
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn category(&self, id: CategoryId) -> Result<Option<CategoryRecord>, RepositoryError> {
        Ok(self.state().categories.get(&id.0).cloned())
    }

    fn category_by_slug(&self, slug: &str) -> Result<Option<CategoryRecord>, RepositoryError> {
        let state = self.state();
        Ok(state
            .categories
            .values()
            .find(|record| record.slug == slug)
            .cloned())
    }

    fn categories(&self) -> Result<Vec<CategoryRecord>, RepositoryError> {
        Ok(self.state().categories.values().cloned().collect())
    }

    fn insert_tag(&self, record: TagRecord) -> Result<TagRecord, RepositoryError> {
        let mut state = self.state();
        let mut record = record;
        if record.id.0 == 0 {
            record.id = TagId(IdSequences::next(&self.sequences.tags));
        } else if state.tags.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        } else {
            IdSequences::advance_past(&self.sequences.tags, record.id.0);
        }
        let taken = state
            .tags
            .values()
            .any(|other| other.slug == record.slug || other.name == record.name);
        if taken {
            return Err(RepositoryError::Conflict);
        }
        state.tags.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn update_tag(&self, record: TagRecord) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if !state.tags.contains_key(&record.id.0) {
            return Err(RepositoryError::NotFound);
        }
        let taken = state.tags.values().any(|other| {
            other.id != record.id && (other.slug == record.slug || other.name == record.name)
        });
        if taken {
            return Err(RepositoryError::Conflict);
        }
        state.tags.insert(record.id.0, record);
        Ok(())
    }

    fn remove_tag(&self, id: TagId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        state
            .tags
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn tag(&self, id: TagId) -> Result<Option<TagRecord>, RepositoryError> {
        Ok(self.state().tags.get(&id.0).cloned())
    }

    fn tag_by_slug(&self, slug: &str) -> Result<Option<TagRecord>, RepositoryError> {
        let state = self.state();
        Ok(state
            .tags
            .values()
            .find(|record| record.slug == slug)
            .cloned())
    }

    fn tags(&self) -> Result<Vec<TagRecord>, RepositoryError> {
        Ok(self.state().tags.values().cloned().collect())
    }

    fn insert_worksheet(
        &self,
        record: WorksheetRecord,
    ) -> Result<WorksheetRecord, RepositoryError> {
        let mut state = self.state();
        let mut record = record;
        if record.id.0 == 0 {
            record.id = WorksheetId(IdSequences::next(&self.sequences.worksheets));
        } else if state.worksheets.contains_key(&record.id.0) {
            return Err(RepositoryError::Conflict);
        } else {
            IdSequences::advance_past(&self.sequences.worksheets, record.id.0);
        }
        if state.worksheets.values().any(|other| other.slug == record.slug) {
            return Err(RepositoryError::Conflict);
        }
        state.worksheets.insert(record.id.0, record.clone());
        Ok(record)
    }

    fn update_worksheet(&self, record: WorksheetRecord) -> Result<(), RepositoryError> {
        let mut state = self.state();
        if !state.worksheets.contains_key(&record.id.0) {
            return Err(RepositoryError::NotFound);
        }
        let slug_taken = state
            .worksheets
            .values()
            .any(|other| other.id != record.id && other.slug == record.slug);
        if slug_taken {
            return Err(RepositoryError::Conflict);
        }
        state.worksheets.insert(record.id.0, record);
        Ok(())
    }

    fn remove_worksheet(&self, id: WorksheetId) -> Result<(), RepositoryError> {
        let mut state = self.state();
        state
            .worksheets
            .remove(&id.0)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn worksheet(&self, id: WorksheetId) -> Result<Option<WorksheetRecord>, RepositoryError> {
        Ok(self.state().worksheets.get(&id.0).cloned())
    }

    fn worksheet_by_slug(&self, slug: &str) -> Result<Option<WorksheetRecord>, RepositoryError> {
        let state = self.state();
        Ok(state
            .worksheets
            .values()
            .find(|record| record.slug == slug)
            .cloned())
    }

    fn worksheets(&self) -> Result<Vec<WorksheetRecord>, RepositoryError> {
        Ok(self.state().worksheets.values().cloned().collect())
    }

    fn settings(&self) -> Result<SiteSettings, RepositoryError> {
        Ok(self.state().settings.clone().unwrap_or_default())
    }

    fn store_settings(&self, settings: SiteSettings) -> Result<(), RepositoryError> {
        self.state().settings = Some(settings);
        Ok(())
    }
}
