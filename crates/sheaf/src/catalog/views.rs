//! Response shapes for the public API. Field names and nesting follow the
//! frontend contract, so renames here are breaking changes.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::media::media_url;

use super::domain::{
    CategoryId, CategoryRecord, Difficulty, GradeLevel, TagId, TagRecord, WorksheetId,
    WorksheetRecord,
};

#[derive(Debug, Clone, Serialize)]
pub struct TagView {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub usage_count: u32,
}

impl TagView {
    pub fn from_record(record: &TagRecord) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            usage_count: record.usage_count,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TagDetailView {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub usage_count: u32,
    pub description: String,
    pub worksheets_count: u64,
    pub created_at: DateTime<Utc>,
}

impl TagDetailView {
    pub fn new(record: &TagRecord, worksheets_count: u64) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            usage_count: record.usage_count,
            description: record.description.clone(),
            worksheets_count,
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryParentView {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryView {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub parent: Option<CategoryParentView>,
    pub level: u8,
    pub is_parent: bool,
    pub full_path: String,
    pub icon: Option<String>,
    pub order: u32,
    pub worksheets_count: u64,
}

impl CategoryView {
    /// `parent` must be the record named by `record.parent`, when any.
    pub fn new(
        record: &CategoryRecord,
        parent: Option<&CategoryRecord>,
        worksheets_count: u64,
    ) -> Self {
        Self {
            id: record.id,
            name: record.name.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            parent: parent.map(|parent| CategoryParentView {
                id: parent.id,
                name: parent.name.clone(),
                slug: parent.slug.clone(),
            }),
            level: record.level(),
            is_parent: record.is_parent(),
            full_path: record.full_path(parent.map(|parent| parent.slug.as_str())),
            icon: record.icon.as_deref().map(media_url),
            order: record.order,
            worksheets_count,
        }
    }
}

/// A root category with its active children, as served by the tree and
/// navigation endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct CategoryTreeView {
    #[serde(flatten)]
    pub category: CategoryView,
    pub children: Vec<CategoryView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetListView {
    pub id: WorksheetId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category_name: String,
    pub category_slug: String,
    pub category_path: String,
    pub grade_level: GradeLevel,
    pub difficulty: Difficulty,
    pub thumbnail: Option<String>,
    pub tags: Vec<TagView>,
    pub views_count: u64,
    pub downloads_count: u64,
    pub download_url: String,
    pub created_at: DateTime<Utc>,
}

impl WorksheetListView {
    pub fn new(
        record: &WorksheetRecord,
        category: &CategoryRecord,
        parent_slug: Option<&str>,
        tags: Vec<TagView>,
    ) -> Self {
        Self {
            id: record.id,
            title: record.title.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            category_name: category.name.clone(),
            category_slug: category.slug.clone(),
            category_path: category.full_path(parent_slug),
            grade_level: record.grade_level,
            difficulty: record.difficulty,
            thumbnail: record.thumbnail.as_deref().map(media_url),
            tags,
            views_count: record.views_count,
            downloads_count: record.downloads_count,
            download_url: download_url(record.id),
            created_at: record.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct WorksheetDetailView {
    pub id: WorksheetId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: CategoryView,
    pub grade_level: GradeLevel,
    pub difficulty: Difficulty,
    pub preview_image: Option<String>,
    pub thumbnail: Option<String>,
    pub pdf_file: Option<String>,
    pub tags: Vec<TagView>,
    pub views_count: u64,
    pub downloads_count: u64,
    pub download_url: String,
    pub absolute_url: String,
    pub meta_title: String,
    pub meta_description: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WorksheetDetailView {
    pub fn new(record: &WorksheetRecord, category: CategoryView, tags: Vec<TagView>) -> Self {
        let absolute_url = format!("/{}/{}/", category.full_path, record.slug);
        Self {
            id: record.id,
            title: record.title.clone(),
            slug: record.slug.clone(),
            description: record.description.clone(),
            category,
            grade_level: record.grade_level,
            difficulty: record.difficulty,
            preview_image: record.preview_image.as_deref().map(media_url),
            thumbnail: record.thumbnail.as_deref().map(media_url),
            pdf_file: record.pdf_file.as_deref().map(media_url),
            tags,
            views_count: record.views_count,
            downloads_count: record.downloads_count,
            download_url: download_url(record.id),
            absolute_url,
            meta_title: record.meta_title.clone(),
            meta_description: record.meta_description.clone(),
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

/// Route for fetching the PDF behind a worksheet.
pub fn download_url(id: WorksheetId) -> String {
    format!("/api/worksheets/{}/download/", id.0)
}
