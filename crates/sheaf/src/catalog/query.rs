//! Query-string parameters accepted by the worksheet list endpoints, plus
//! the ordering whitelist applied to results.

use serde::Deserialize;

use super::domain::{Difficulty, GradeLevel, WorksheetRecord};
use super::pagination::{PageRequest, DEFAULT_PAGE_SIZE};

/// Filters for `GET /api/worksheets/`. Double-underscore names mirror the
/// query strings the frontend already sends.
#[derive(Debug, Clone, Deserialize)]
pub struct WorksheetQuery {
    #[serde(default)]
    pub category: Option<u64>,
    #[serde(default, rename = "category__slug")]
    pub category_slug: Option<String>,
    #[serde(default)]
    pub grade_level: Option<GradeLevel>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default, rename = "tags__slug")]
    pub tag_slug: Option<String>,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub ordering: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl WorksheetQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Default for WorksheetQuery {
    fn default() -> Self {
        Self {
            category: None,
            category_slug: None,
            grade_level: None,
            difficulty: None,
            tag_slug: None,
            search: None,
            ordering: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// Parameters for `GET /api/worksheets/search/`.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "default_page_size")]
    pub page_size: u32,
}

impl SearchQuery {
    pub fn page_request(&self) -> PageRequest {
        PageRequest {
            page: self.page,
            page_size: self.page_size,
        }
    }
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self {
            q: None,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

fn first_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderKey {
    CreatedAt,
    ViewsCount,
    DownloadsCount,
    Title,
}

/// A validated ordering directive. Anything outside the whitelist falls back
/// to newest-first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ordering {
    pub key: OrderKey,
    pub descending: bool,
}

impl Default for Ordering {
    fn default() -> Self {
        Self {
            key: OrderKey::CreatedAt,
            descending: true,
        }
    }
}

impl Ordering {
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };
        let (descending, name) = match raw.strip_prefix('-') {
            Some(name) => (true, name),
            None => (false, raw),
        };
        let key = match name {
            "created_at" => OrderKey::CreatedAt,
            "views_count" => OrderKey::ViewsCount,
            "downloads_count" => OrderKey::DownloadsCount,
            "title" => OrderKey::Title,
            _ => return Self::default(),
        };
        Self { key, descending }
    }
}

/// Sorts records in place. Ids break ties so repeated queries page
/// consistently.
pub fn apply_ordering(records: &mut [WorksheetRecord], ordering: Ordering) {
    records.sort_by(|a, b| {
        let by_key = match ordering.key {
            OrderKey::CreatedAt => a.created_at.cmp(&b.created_at),
            OrderKey::ViewsCount => a.views_count.cmp(&b.views_count),
            OrderKey::DownloadsCount => a.downloads_count.cmp(&b.downloads_count),
            OrderKey::Title => a.title.cmp(&b.title),
        };
        let by_key = if ordering.descending {
            by_key.reverse()
        } else {
            by_key
        };
        by_key.then_with(|| a.id.cmp(&b.id))
    });
}

/// Case-insensitive substring match, the shape of the list search filter.
pub fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}
