use std::collections::BTreeSet;
use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use serde_json::json;
use tracing::warn;

use crate::media::{self, MediaError, MediaStore};
use crate::previews::PreviewGenerator;

use super::domain::{
    CategoryDraft, CategoryId, CategoryRecord, SiteSettings, TagDraft, TagId, TagRecord,
    WorksheetDraft, WorksheetFlags, WorksheetId, WorksheetRecord,
};
use super::pagination::{paginate, Page, PageError, PageRequest};
use super::query::{apply_ordering, contains_ci, Ordering, SearchQuery, WorksheetQuery};
use super::repository::{CatalogRepository, RepositoryError};
use super::slug;
use super::views::{
    CategoryTreeView, CategoryView, TagDetailView, TagView, WorksheetDetailView, WorksheetListView,
};

/// Most worksheets the featured rail returns.
pub const FEATURED_LIMIT: usize = 12;
/// Random same-category picks served next to a worksheet.
pub const SIMILAR_LIMIT: usize = 4;
/// Tags the popular endpoint returns.
pub const POPULAR_TAG_LIMIT: usize = 20;

/// Service composing the repository, the media store, and the preview
/// generator. All catalog reads and admin writes go through here.
pub struct CatalogService<R, M> {
    repository: Arc<R>,
    media: Arc<M>,
    previews: Arc<PreviewGenerator>,
}

impl<R, M> CatalogService<R, M>
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    pub fn new(repository: Arc<R>, media: Arc<M>, previews: Arc<PreviewGenerator>) -> Self {
        Self {
            repository,
            media,
            previews,
        }
    }

    /// Active categories, flat, in menu order.
    pub fn list_categories(&self) -> Result<Vec<CategoryView>, CatalogError> {
        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        let mut active: Vec<CategoryRecord> = categories
            .iter()
            .filter(|record| record.is_active)
            .cloned()
            .collect();
        order_categories(&mut active);
        Ok(active
            .iter()
            .map(|record| category_view(record, &categories, &worksheets))
            .collect())
    }

    /// Active root categories with their active children.
    pub fn category_tree(&self) -> Result<Vec<CategoryTreeView>, CatalogError> {
        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        let mut roots: Vec<CategoryRecord> = categories
            .iter()
            .filter(|record| record.is_active && record.is_parent())
            .cloned()
            .collect();
        order_categories(&mut roots);
        Ok(roots
            .iter()
            .map(|root| tree_view(root, &categories, &worksheets))
            .collect())
    }

    /// One active category with its children. Children of child categories
    /// cannot exist, so for a child the list is simply empty.
    pub fn category_detail(&self, slug: &str) -> Result<CategoryTreeView, CatalogError> {
        let record = self
            .repository
            .category_by_slug(slug)?
            .filter(|record| record.is_active)
            .ok_or(RepositoryError::NotFound)?;
        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        Ok(tree_view(&record, &categories, &worksheets))
    }

    /// All tags, most used first.
    pub fn list_tags(&self) -> Result<Vec<TagView>, CatalogError> {
        let mut tags = self.repository.tags()?;
        order_tags(&mut tags);
        Ok(tags.iter().map(TagView::from_record).collect())
    }

    pub fn popular_tags(&self) -> Result<Vec<TagView>, CatalogError> {
        let mut views = self.list_tags()?;
        views.truncate(POPULAR_TAG_LIMIT);
        Ok(views)
    }

    pub fn tag_detail(&self, slug: &str) -> Result<TagDetailView, CatalogError> {
        let record = self
            .repository
            .tag_by_slug(slug)?
            .ok_or(RepositoryError::NotFound)?;
        let worksheets = self.repository.worksheets()?;
        let count = worksheets
            .iter()
            .filter(|worksheet| worksheet.is_published && worksheet.tags.contains(&record.id))
            .count() as u64;
        Ok(TagDetailView::new(&record, count))
    }

    /// Published worksheets, filtered, ordered, and paginated. `path` is the
    /// endpoint path used for the next/previous links.
    pub fn list_worksheets(
        &self,
        query: &WorksheetQuery,
        path: &str,
    ) -> Result<Page<WorksheetListView>, CatalogError> {
        let categories = self.repository.categories()?;
        let mut records = self.published_worksheets()?;

        if let Some(filter) = category_filter(query, &categories) {
            records.retain(|worksheet| filter.contains(&worksheet.category));
        }
        if let Some(grade) = query.grade_level {
            records.retain(|worksheet| worksheet.grade_level == grade);
        }
        if let Some(difficulty) = query.difficulty {
            records.retain(|worksheet| worksheet.difficulty == difficulty);
        }
        if let Some(tag_slug) = query.tag_slug.as_deref() {
            match self.repository.tag_by_slug(tag_slug)? {
                Some(tag) => records.retain(|worksheet| worksheet.tags.contains(&tag.id)),
                None => records.clear(),
            }
        }
        if let Some(term) = trimmed(query.search.as_deref()) {
            records.retain(|worksheet| {
                contains_ci(&worksheet.title, term) || contains_ci(&worksheet.description, term)
            });
        }

        apply_ordering(&mut records, Ordering::parse(query.ordering.as_deref()));
        self.page_of(records, query.page_request(), path)
    }

    /// Title search. An empty query returns an empty first page rather than
    /// the whole catalog.
    pub fn search_worksheets(
        &self,
        query: &SearchQuery,
        path: &str,
    ) -> Result<Page<WorksheetListView>, CatalogError> {
        let mut records = match trimmed(query.q.as_deref()) {
            Some(term) => {
                let mut records = self.published_worksheets()?;
                records.retain(|worksheet| contains_ci(&worksheet.title, term));
                records
            }
            None => Vec::new(),
        };
        apply_ordering(&mut records, Ordering::default());
        self.page_of(records, query.page_request(), path)
    }

    /// Featured rail: newest first, capped at [`FEATURED_LIMIT`].
    pub fn featured_worksheets(&self) -> Result<Vec<WorksheetListView>, CatalogError> {
        let mut records = self.published_worksheets()?;
        records.retain(|worksheet| worksheet.is_featured);
        apply_ordering(&mut records, Ordering::default());
        records.truncate(FEATURED_LIMIT);
        self.list_views(&records)
    }

    /// Worksheets under a category; a root category also serves everything
    /// filed under its active children.
    pub fn worksheets_by_category(
        &self,
        slug: &str,
        request: PageRequest,
        path: &str,
    ) -> Result<Page<WorksheetListView>, CatalogError> {
        let categories = self.repository.categories()?;
        let record = categories
            .iter()
            .find(|record| record.slug == slug && record.is_active)
            .ok_or(RepositoryError::NotFound)?;
        let ids = expand_category(record, &categories);
        let mut records = self.published_worksheets()?;
        records.retain(|worksheet| ids.contains(&worksheet.category));
        apply_ordering(&mut records, Ordering::default());
        self.page_of(records, request, path)
    }

    pub fn worksheets_by_tag(
        &self,
        slug: &str,
        request: PageRequest,
        path: &str,
    ) -> Result<Page<WorksheetListView>, CatalogError> {
        let tag = self
            .repository
            .tag_by_slug(slug)?
            .ok_or(RepositoryError::NotFound)?;
        let mut records = self.published_worksheets()?;
        records.retain(|worksheet| worksheet.tags.contains(&tag.id));
        apply_ordering(&mut records, Ordering::default());
        self.page_of(records, request, path)
    }

    /// One published worksheet. Serving the detail counts as a view, so the
    /// returned counter already includes this request.
    pub fn worksheet_detail(&self, slug: &str) -> Result<WorksheetDetailView, CatalogError> {
        let mut record = self
            .repository
            .worksheet_by_slug(slug)?
            .filter(|worksheet| worksheet.is_published)
            .ok_or(RepositoryError::NotFound)?;
        record.views_count += 1;
        self.repository.update_worksheet(record.clone())?;
        self.detail_view(&record)
    }

    /// Up to [`SIMILAR_LIMIT`] random published worksheets from the same
    /// category, never including the worksheet itself.
    pub fn similar_worksheets(&self, slug: &str) -> Result<Vec<WorksheetListView>, CatalogError> {
        let record = self
            .repository
            .worksheet_by_slug(slug)?
            .filter(|worksheet| worksheet.is_published)
            .ok_or(RepositoryError::NotFound)?;
        let mut candidates = self.published_worksheets()?;
        candidates
            .retain(|worksheet| worksheet.category == record.category && worksheet.id != record.id);
        candidates.shuffle(&mut rand::rng());
        candidates.truncate(SIMILAR_LIMIT);
        self.list_views(&candidates)
    }

    /// The PDF behind a published worksheet, counted as a download.
    pub fn download(&self, id: WorksheetId) -> Result<WorksheetDownload, CatalogError> {
        let mut record = self
            .repository
            .worksheet(id)?
            .filter(|worksheet| worksheet.is_published)
            .ok_or(RepositoryError::NotFound)?;
        let path = record
            .pdf_file
            .clone()
            .ok_or_else(|| CatalogError::MissingPdf(record.slug.clone()))?;
        let bytes = self.media.read(&path)?;
        record.downloads_count += 1;
        self.repository.update_worksheet(record.clone())?;
        Ok(WorksheetDownload {
            filename: format!("{}.pdf", record.slug),
            bytes,
        })
    }

    pub fn site_settings(&self) -> Result<SiteSettings, CatalogError> {
        Ok(self.repository.settings()?)
    }

    pub fn update_site_settings(
        &self,
        settings: SiteSettings,
    ) -> Result<SiteSettings, CatalogError> {
        self.repository.store_settings(settings.clone())?;
        Ok(settings)
    }

    pub fn create_category(&self, draft: CategoryDraft) -> Result<CategoryView, CatalogError> {
        let categories = self.repository.categories()?;
        let parent = validate_parent(draft.parent, None, &categories)?;
        let taken: BTreeSet<String> = categories.iter().map(|record| record.slug.clone()).collect();
        let slug = resolve_slug(&draft.name, draft.slug.clone(), &taken)?;

        let now = Utc::now();
        let record = CategoryRecord {
            id: CategoryId(0),
            name: draft.name,
            slug,
            parent: parent.map(|record| record.id),
            description: draft.description,
            icon: None,
            order: draft.order,
            is_active: draft.is_active,
            created_at: now,
            updated_at: now,
        };
        let stored = self.repository.insert_category(record)?;

        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        Ok(category_view(&stored, &categories, &worksheets))
    }

    pub fn update_category(
        &self,
        id: CategoryId,
        draft: CategoryDraft,
    ) -> Result<CategoryView, CatalogError> {
        let categories = self.repository.categories()?;
        let mut record = categories
            .iter()
            .find(|record| record.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound)?;
        let parent = validate_parent(draft.parent, Some(&record), &categories)?;

        record.name = draft.name;
        if let Some(slug) = draft.slug {
            record.slug = explicit_slug(slug)?;
        }
        record.parent = parent.map(|record| record.id);
        record.description = draft.description;
        record.order = draft.order;
        record.is_active = draft.is_active;
        record.updated_at = Utc::now();

        self.repository.update_category(record.clone())?;
        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        Ok(category_view(&record, &categories, &worksheets))
    }

    /// Removes a category and its children. Fails while any worksheet still
    /// references the category or one of its children.
    pub fn delete_category(&self, id: CategoryId) -> Result<(), CatalogError> {
        let categories = self.repository.categories()?;
        let record = categories
            .iter()
            .find(|record| record.id == id)
            .ok_or(RepositoryError::NotFound)?;
        let children: Vec<CategoryId> = categories
            .iter()
            .filter(|child| child.parent == Some(record.id))
            .map(|child| child.id)
            .collect();

        let worksheets = self.repository.worksheets()?;
        let referenced = worksheets.iter().any(|worksheet| {
            worksheet.category == record.id || children.contains(&worksheet.category)
        });
        if referenced {
            return Err(CatalogError::CategoryInUse(record.slug.clone()));
        }

        for child in children {
            self.repository.remove_category(child)?;
        }
        self.repository.remove_category(record.id)?;
        Ok(())
    }

    pub fn upload_category_icon(
        &self,
        id: CategoryId,
        extension: &str,
        bytes: &[u8],
    ) -> Result<CategoryView, CatalogError> {
        let mut record = self
            .repository
            .category(id)?
            .ok_or(RepositoryError::NotFound)?;
        let path = media::icon_path(&record.slug, extension);
        self.media.store(&path, bytes)?;
        if let Some(previous) = record.icon.replace(path.clone()) {
            if previous != path {
                self.discard_media(&record.slug, &previous);
            }
        }
        record.updated_at = Utc::now();
        self.repository.update_category(record.clone())?;

        let categories = self.repository.categories()?;
        let worksheets = self.repository.worksheets()?;
        Ok(category_view(&record, &categories, &worksheets))
    }

    pub fn create_tag(&self, draft: TagDraft) -> Result<TagView, CatalogError> {
        let tags = self.repository.tags()?;
        let taken: BTreeSet<String> = tags.iter().map(|record| record.slug.clone()).collect();
        let slug = resolve_slug(&draft.name, draft.slug.clone(), &taken)?;

        let record = TagRecord {
            id: TagId(0),
            name: draft.name,
            slug,
            description: draft.description,
            usage_count: 0,
            created_at: Utc::now(),
        };
        let stored = self.repository.insert_tag(record)?;
        Ok(TagView::from_record(&stored))
    }

    pub fn update_tag(&self, id: TagId, draft: TagDraft) -> Result<TagView, CatalogError> {
        let mut record = self.repository.tag(id)?.ok_or(RepositoryError::NotFound)?;
        record.name = draft.name;
        if let Some(slug) = draft.slug {
            record.slug = explicit_slug(slug)?;
        }
        record.description = draft.description;
        self.repository.update_tag(record.clone())?;
        Ok(TagView::from_record(&record))
    }

    /// Removes a tag, detaching it from every worksheet first.
    pub fn delete_tag(&self, id: TagId) -> Result<(), CatalogError> {
        self.repository.tag(id)?.ok_or(RepositoryError::NotFound)?;
        for mut worksheet in self.repository.worksheets()? {
            if let Some(position) = worksheet.tags.iter().position(|tag| *tag == id) {
                worksheet.tags.remove(position);
                self.repository.update_worksheet(worksheet)?;
            }
        }
        self.repository.remove_tag(id)?;
        Ok(())
    }

    pub fn create_worksheet(
        &self,
        draft: WorksheetDraft,
    ) -> Result<WorksheetDetailView, CatalogError> {
        let categories = self.repository.categories()?;
        if !categories.iter().any(|record| record.id == draft.category) {
            return Err(ValidationError::UnknownCategory(draft.category.0).into());
        }
        let tags = self.resolve_tags(&draft.tags)?;
        let worksheets = self.repository.worksheets()?;
        let taken: BTreeSet<String> = worksheets
            .iter()
            .map(|record| record.slug.clone())
            .collect();
        let slug = resolve_slug(&draft.title, draft.slug.clone(), &taken)?;

        let now = Utc::now();
        let record = WorksheetRecord {
            id: WorksheetId(0),
            title: draft.title,
            slug,
            description: draft.description,
            category: draft.category,
            tags: tags.clone(),
            grade_level: draft.grade_level,
            difficulty: draft.difficulty,
            pdf_file: None,
            thumbnail: None,
            preview_image: None,
            meta_title: draft.meta_title,
            meta_description: draft.meta_description,
            views_count: 0,
            downloads_count: 0,
            is_featured: draft.is_featured,
            is_published: draft.is_published,
            created_at: now,
            updated_at: now,
            published_at: draft.is_published.then_some(now),
        };
        let stored = self.repository.insert_worksheet(record)?;
        self.refresh_tag_usage(&tags)?;
        self.detail_view(&stored)
    }

    pub fn update_worksheet(
        &self,
        id: WorksheetId,
        draft: WorksheetDraft,
    ) -> Result<WorksheetDetailView, CatalogError> {
        let mut record = self
            .repository
            .worksheet(id)?
            .ok_or(RepositoryError::NotFound)?;
        let categories = self.repository.categories()?;
        if !categories.iter().any(|other| other.id == draft.category) {
            return Err(ValidationError::UnknownCategory(draft.category.0).into());
        }
        let tags = self.resolve_tags(&draft.tags)?;
        let mut touched: BTreeSet<TagId> = record.tags.iter().copied().collect();
        touched.extend(tags.iter().copied());

        record.title = draft.title;
        if let Some(slug) = draft.slug {
            record.slug = explicit_slug(slug)?;
        }
        record.description = draft.description;
        record.category = draft.category;
        record.tags = tags;
        record.grade_level = draft.grade_level;
        record.difficulty = draft.difficulty;
        record.meta_title = draft.meta_title;
        record.meta_description = draft.meta_description;
        record.is_featured = draft.is_featured;
        if draft.is_published && record.published_at.is_none() {
            record.published_at = Some(Utc::now());
        }
        record.is_published = draft.is_published;
        record.updated_at = Utc::now();

        self.repository.update_worksheet(record.clone())?;
        let touched: Vec<TagId> = touched.into_iter().collect();
        self.refresh_tag_usage(&touched)?;
        self.detail_view(&record)
    }

    /// Removes a worksheet together with its stored media.
    pub fn delete_worksheet(&self, id: WorksheetId) -> Result<(), CatalogError> {
        let record = self
            .repository
            .worksheet(id)?
            .ok_or(RepositoryError::NotFound)?;
        self.repository.remove_worksheet(id)?;
        for path in [&record.pdf_file, &record.thumbnail, &record.preview_image]
            .into_iter()
            .flatten()
        {
            self.discard_media(&record.slug, path);
        }
        self.refresh_tag_usage(&record.tags)?;
        Ok(())
    }

    /// Stores the worksheet PDF and derives both preview images from its
    /// first page. Preview failures are logged and skipped; the PDF itself
    /// must land.
    pub fn upload_worksheet_pdf(
        &self,
        id: WorksheetId,
        bytes: &[u8],
    ) -> Result<WorksheetDetailView, CatalogError> {
        if !bytes.starts_with(b"%PDF") {
            return Err(ValidationError::NotAPdf.into());
        }
        let mut record = self
            .repository
            .worksheet(id)?
            .ok_or(RepositoryError::NotFound)?;

        let now = Utc::now();
        let path = media::pdf_path(&record.slug, now);
        self.media.store(&path, bytes)?;
        if let Some(previous) = record.pdf_file.replace(path.clone()) {
            if previous != path {
                self.discard_media(&record.slug, &previous);
            }
        }

        self.apply_previews(&mut record, bytes, now);
        record.updated_at = now;
        self.repository.update_worksheet(record.clone())?;
        self.detail_view(&record)
    }

    /// Re-derives the preview images from the stored PDF, overwriting the
    /// current ones in place.
    pub fn regenerate_previews(&self, id: WorksheetId) -> Result<WorksheetDetailView, CatalogError> {
        let mut record = self
            .repository
            .worksheet(id)?
            .ok_or(RepositoryError::NotFound)?;
        let path = record
            .pdf_file
            .clone()
            .ok_or_else(|| CatalogError::MissingPdf(record.slug.clone()))?;
        let pdf = self.media.read(&path)?;

        let now = Utc::now();
        self.apply_previews(&mut record, &pdf, now);
        record.updated_at = now;
        self.repository.update_worksheet(record.clone())?;
        self.detail_view(&record)
    }

    /// Applies publish/feature toggles. The first publish stamps
    /// `published_at`; later republishing keeps the original stamp.
    pub fn set_worksheet_flags(
        &self,
        id: WorksheetId,
        flags: WorksheetFlags,
    ) -> Result<WorksheetDetailView, CatalogError> {
        let mut record = self
            .repository
            .worksheet(id)?
            .ok_or(RepositoryError::NotFound)?;
        if let Some(featured) = flags.is_featured {
            record.is_featured = featured;
        }
        if let Some(published) = flags.is_published {
            if published && record.published_at.is_none() {
                record.published_at = Some(Utc::now());
            }
            record.is_published = published;
        }
        record.updated_at = Utc::now();
        self.repository.update_worksheet(record.clone())?;
        self.refresh_tag_usage(&record.tags)?;
        self.detail_view(&record)
    }

    fn published_worksheets(&self) -> Result<Vec<WorksheetRecord>, CatalogError> {
        Ok(self
            .repository
            .worksheets()?
            .into_iter()
            .filter(|worksheet| worksheet.is_published)
            .collect())
    }

    /// Paginates first, then assembles views for just the served slice.
    fn page_of(
        &self,
        records: Vec<WorksheetRecord>,
        request: PageRequest,
        path: &str,
    ) -> Result<Page<WorksheetListView>, CatalogError> {
        let page = paginate(records, request, path)?;
        let results = self.list_views(&page.results)?;
        Ok(Page {
            count: page.count,
            total_pages: page.total_pages,
            current_page: page.current_page,
            page_size: page.page_size,
            next: page.next,
            previous: page.previous,
            results,
        })
    }

    fn list_views(
        &self,
        records: &[WorksheetRecord],
    ) -> Result<Vec<WorksheetListView>, CatalogError> {
        let categories = self.repository.categories()?;
        let tags = self.repository.tags()?;
        records
            .iter()
            .map(|record| assemble_list_view(record, &categories, &tags))
            .collect()
    }

    fn detail_view(&self, record: &WorksheetRecord) -> Result<WorksheetDetailView, CatalogError> {
        let categories = self.repository.categories()?;
        let tags = self.repository.tags()?;
        let worksheets = self.repository.worksheets()?;
        let Some(category) = categories.iter().find(|other| other.id == record.category) else {
            return Err(missing_category(record));
        };
        let category = category_view(category, &categories, &worksheets);
        Ok(WorksheetDetailView::new(
            record,
            category,
            tag_views(record, &tags),
        ))
    }

    fn resolve_tags(&self, slugs: &[String]) -> Result<Vec<TagId>, CatalogError> {
        let tags = self.repository.tags()?;
        let mut ids = Vec::with_capacity(slugs.len());
        for slug in slugs {
            let Some(tag) = tags.iter().find(|record| record.slug == *slug) else {
                return Err(ValidationError::UnknownTag(slug.clone()).into());
            };
            if !ids.contains(&tag.id) {
                ids.push(tag.id);
            }
        }
        Ok(ids)
    }

    /// Recounts `usage_count` for the given tags from the published
    /// worksheets that carry them.
    fn refresh_tag_usage(&self, tag_ids: &[TagId]) -> Result<(), CatalogError> {
        if tag_ids.is_empty() {
            return Ok(());
        }
        let worksheets = self.repository.worksheets()?;
        for id in tag_ids {
            let Some(mut tag) = self.repository.tag(*id)? else {
                continue;
            };
            tag.usage_count = worksheets
                .iter()
                .filter(|worksheet| worksheet.is_published && worksheet.tags.contains(id))
                .count() as u32;
            self.repository.update_tag(tag)?;
        }
        Ok(())
    }

    fn apply_previews(&self, record: &mut WorksheetRecord, pdf: &[u8], now: DateTime<Utc>) {
        let set = match self.previews.derive(pdf) {
            Ok(Some(set)) => set,
            Ok(None) => {
                warn!(worksheet = %record.slug, "no pdf rasterizer, previews skipped");
                return;
            }
            Err(err) => {
                warn!(worksheet = %record.slug, %err, "preview derivation failed");
                return;
            }
        };

        // Existing paths are reused so regeneration overwrites in place.
        let thumbnail_path = record
            .thumbnail
            .clone()
            .unwrap_or_else(|| media::thumbnail_path(&record.slug, now));
        let preview_path = record
            .preview_image
            .clone()
            .unwrap_or_else(|| media::preview_path(&record.slug, now));

        let stored = self
            .media
            .store(&thumbnail_path, &set.thumbnail)
            .and_then(|()| self.media.store(&preview_path, &set.preview));
        match stored {
            Ok(()) => {
                record.thumbnail = Some(thumbnail_path);
                record.preview_image = Some(preview_path);
            }
            Err(err) => warn!(worksheet = %record.slug, %err, "preview images not stored"),
        }
    }

    fn discard_media(&self, slug: &str, path: &str) {
        match self.media.remove(path) {
            Ok(()) | Err(MediaError::NotFound(_)) => {}
            Err(err) => warn!(%slug, %err, "media object not removed"),
        }
    }
}

/// The PDF payload for a worksheet, with the filename the browser saves.
#[derive(Debug)]
pub struct WorksheetDownload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

fn order_categories(records: &mut [CategoryRecord]) {
    records.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.name.cmp(&b.name)));
}

fn order_tags(records: &mut [TagRecord]) {
    records.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.name.cmp(&b.name))
    });
}

fn published_in(worksheets: &[WorksheetRecord], category: CategoryId) -> u64 {
    worksheets
        .iter()
        .filter(|worksheet| worksheet.is_published && worksheet.category == category)
        .count() as u64
}

/// Published worksheet count for a category. Root categories aggregate their
/// own worksheets plus everything under their active children.
fn worksheets_count(
    record: &CategoryRecord,
    categories: &[CategoryRecord],
    worksheets: &[WorksheetRecord],
) -> u64 {
    let mut count = published_in(worksheets, record.id);
    if record.is_parent() {
        count += categories
            .iter()
            .filter(|child| child.parent == Some(record.id) && child.is_active)
            .map(|child| published_in(worksheets, child.id))
            .sum::<u64>();
    }
    count
}

fn category_view(
    record: &CategoryRecord,
    categories: &[CategoryRecord],
    worksheets: &[WorksheetRecord],
) -> CategoryView {
    let parent = record
        .parent
        .and_then(|id| categories.iter().find(|other| other.id == id));
    CategoryView::new(record, parent, worksheets_count(record, categories, worksheets))
}

fn tree_view(
    root: &CategoryRecord,
    categories: &[CategoryRecord],
    worksheets: &[WorksheetRecord],
) -> CategoryTreeView {
    let mut children: Vec<CategoryRecord> = categories
        .iter()
        .filter(|child| child.is_active && child.parent == Some(root.id))
        .cloned()
        .collect();
    order_categories(&mut children);
    CategoryTreeView {
        category: category_view(root, categories, worksheets),
        children: children
            .iter()
            .map(|child| category_view(child, categories, worksheets))
            .collect(),
    }
}

/// The category and its active children, the set of ids the by-category
/// listing covers.
fn expand_category(record: &CategoryRecord, categories: &[CategoryRecord]) -> BTreeSet<CategoryId> {
    let mut ids = BTreeSet::new();
    ids.insert(record.id);
    ids.extend(
        categories
            .iter()
            .filter(|child| child.parent == Some(record.id) && child.is_active)
            .map(|child| child.id),
    );
    ids
}

/// Resolves the list filters naming a category. A filter for an unknown
/// category matches nothing; no filter at all matches everything.
fn category_filter(
    query: &WorksheetQuery,
    categories: &[CategoryRecord],
) -> Option<BTreeSet<CategoryId>> {
    let record = if let Some(id) = query.category {
        categories.iter().find(|record| record.id.0 == id)
    } else if let Some(slug) = query.category_slug.as_deref() {
        categories.iter().find(|record| record.slug == slug)
    } else {
        return None;
    };
    Some(match record {
        Some(record) => expand_category(record, categories),
        None => BTreeSet::new(),
    })
}

fn validate_parent<'a>(
    parent: Option<CategoryId>,
    existing: Option<&CategoryRecord>,
    categories: &'a [CategoryRecord],
) -> Result<Option<&'a CategoryRecord>, CatalogError> {
    let Some(parent_id) = parent else {
        return Ok(None);
    };
    if let Some(existing) = existing {
        if existing.id == parent_id {
            return Err(ValidationError::SelfParent.into());
        }
        let has_children = categories
            .iter()
            .any(|record| record.parent == Some(existing.id));
        if has_children {
            return Err(ValidationError::HasChildren(existing.slug.clone()).into());
        }
    }
    let Some(record) = categories.iter().find(|record| record.id == parent_id) else {
        return Err(ValidationError::UnknownCategory(parent_id.0).into());
    };
    if !record.is_parent() {
        return Err(ValidationError::ParentIsChild(record.slug.clone()).into());
    }
    Ok(Some(record))
}

/// Takes the explicit slug when the draft carries one, otherwise generates
/// and dedupes one from the name. Uniqueness of explicit slugs stays with
/// the repository.
fn resolve_slug(
    name: &str,
    explicit: Option<String>,
    taken: &BTreeSet<String>,
) -> Result<String, CatalogError> {
    if let Some(slug) = explicit {
        return explicit_slug(slug);
    }
    let base = slug::slugify(name);
    if base.is_empty() {
        return Err(ValidationError::EmptySlug.into());
    }
    Ok(slug::dedupe(&base, taken))
}

fn explicit_slug(slug: String) -> Result<String, CatalogError> {
    let slug = slug.trim().to_string();
    if slug.is_empty() {
        return Err(ValidationError::EmptySlug.into());
    }
    Ok(slug)
}

fn tag_views(record: &WorksheetRecord, tags: &[TagRecord]) -> Vec<TagView> {
    let mut attached: Vec<&TagRecord> = tags
        .iter()
        .filter(|tag| record.tags.contains(&tag.id))
        .collect();
    attached.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.name.cmp(&b.name))
    });
    attached
        .into_iter()
        .map(TagView::from_record)
        .collect()
}

fn assemble_list_view(
    record: &WorksheetRecord,
    categories: &[CategoryRecord],
    tags: &[TagRecord],
) -> Result<WorksheetListView, CatalogError> {
    let Some(category) = categories.iter().find(|other| other.id == record.category) else {
        return Err(missing_category(record));
    };
    let parent_slug = category
        .parent
        .and_then(|id| categories.iter().find(|other| other.id == id))
        .map(|parent| parent.slug.as_str());
    Ok(WorksheetListView::new(
        record,
        category,
        parent_slug,
        tag_views(record, tags),
    ))
}

fn missing_category(record: &WorksheetRecord) -> CatalogError {
    RepositoryError::Unavailable(format!(
        "worksheet '{}' references a missing category",
        record.slug
    ))
    .into()
}

fn trimmed(raw: Option<&str>) -> Option<&str> {
    raw.map(str::trim).filter(|term| !term.is_empty())
}

/// Rejected admin input.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("category {0} does not exist")]
    UnknownCategory(u64),
    #[error("tag '{0}' does not exist")]
    UnknownTag(String),
    #[error("categories nest at most two levels; '{0}' is already a child")]
    ParentIsChild(String),
    #[error("'{0}' has child categories and cannot be moved under a parent")]
    HasChildren(String),
    #[error("a category cannot be its own parent")]
    SelfParent,
    #[error("a slug could not be generated; supply one explicitly")]
    EmptySlug,
    #[error("file is not a pdf")]
    NotAPdf,
}

/// Error raised by the catalog service.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Media(#[from] MediaError),
    #[error(transparent)]
    Page(#[from] PageError),
    #[error("worksheet '{0}' has no pdf file")]
    MissingPdf(String),
    #[error("category '{0}' still has worksheets")]
    CategoryInUse(String),
}

impl CatalogError {
    /// Status the HTTP routers answer with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            CatalogError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            CatalogError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            CatalogError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            CatalogError::Media(MediaError::NotFound(_)) => StatusCode::NOT_FOUND,
            CatalogError::Media(_) => StatusCode::INTERNAL_SERVER_ERROR,
            CatalogError::Page(_) => StatusCode::NOT_FOUND,
            CatalogError::MissingPdf(_) => StatusCode::NOT_FOUND,
            CatalogError::CategoryInUse(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let payload = json!({
            "error": self.to_string(),
        });
        (self.status(), axum::Json(payload)).into_response()
    }
}
