use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TagId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct WorksheetId(pub u64);

/// Target audience for a worksheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradeLevel {
    Preschool,
    Kindergarten,
    Grade1,
    Grade2,
    Grade3,
    Grade4,
    Grade5,
}

impl GradeLevel {
    pub const fn ordered() -> [Self; 7] {
        [
            Self::Preschool,
            Self::Kindergarten,
            Self::Grade1,
            Self::Grade2,
            Self::Grade3,
            Self::Grade4,
            Self::Grade5,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Preschool => "Preschool",
            Self::Kindergarten => "Kindergarten",
            Self::Grade1 => "Grade 1",
            Self::Grade2 => "Grade 2",
            Self::Grade3 => "Grade 3",
            Self::Grade4 => "Grade 4",
            Self::Grade5 => "Grade 5",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const fn ordered() -> [Self; 3] {
        [Self::Easy, Self::Medium, Self::Hard]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Easy => "Easy",
            Self::Medium => "Medium",
            Self::Hard => "Hard",
        }
    }
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// A catalog category. Nesting is limited to two levels: a root category
/// and its direct children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent: Option<CategoryId>,
    pub description: String,
    /// Media-relative path to the menu icon, when one was uploaded.
    pub icon: Option<String>,
    pub order: u32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl CategoryRecord {
    pub fn level(&self) -> u8 {
        if self.parent.is_some() {
            2
        } else {
            1
        }
    }

    pub fn is_parent(&self) -> bool {
        self.parent.is_none()
    }

    /// URL path segment(s) for the category, `parent-slug/slug` for children.
    pub fn full_path(&self, parent_slug: Option<&str>) -> String {
        match parent_slug {
            Some(parent) => format!("{parent}/{}", self.slug),
            None => self.slug.clone(),
        }
    }
}

/// Admin payload for creating or replacing a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub parent: Option<CategoryId>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub order: u32,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

impl Default for CategoryDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            slug: None,
            parent: None,
            description: String::new(),
            order: 0,
            is_active: true,
        }
    }
}

/// A tag attached to worksheets. `usage_count` is denormalized and kept in
/// step with the published worksheets carrying the tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TagRecord {
    pub id: TagId,
    pub name: String,
    pub slug: String,
    pub description: String,
    pub usage_count: u32,
    pub created_at: DateTime<Utc>,
}

/// Admin payload for creating or replacing a tag.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TagDraft {
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
}

/// A printable worksheet. Media fields hold media-relative paths; the PDF
/// and both previews are persisted through the media store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorksheetRecord {
    pub id: WorksheetId,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub category: CategoryId,
    pub tags: Vec<TagId>,
    pub grade_level: GradeLevel,
    pub difficulty: Difficulty,
    pub pdf_file: Option<String>,
    pub thumbnail: Option<String>,
    pub preview_image: Option<String>,
    pub meta_title: String,
    pub meta_description: String,
    pub views_count: u64,
    pub downloads_count: u64,
    pub is_featured: bool,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub published_at: Option<DateTime<Utc>>,
}

/// Admin payload for creating or replacing a worksheet. Tags are referenced
/// by slug.
#[derive(Debug, Clone, Deserialize)]
pub struct WorksheetDraft {
    pub title: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub description: String,
    pub category: CategoryId,
    #[serde(default)]
    pub tags: Vec<String>,
    pub grade_level: GradeLevel,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub meta_title: String,
    #[serde(default)]
    pub meta_description: String,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default = "default_true")]
    pub is_published: bool,
}

/// Publication and feature toggles applied to a worksheet.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct WorksheetFlags {
    #[serde(default)]
    pub is_published: Option<bool>,
    #[serde(default)]
    pub is_featured: Option<bool>,
}

/// Site-wide settings surfaced to the frontend. Stored as a singleton.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteSettings {
    #[serde(default)]
    pub contact_email: String,
    #[serde(default)]
    pub contact_phone: String,
    #[serde(default)]
    pub header_text: String,
    #[serde(default)]
    pub home_page_intro: String,
    #[serde(default)]
    pub footer_text: String,
    #[serde(default)]
    pub telegram_url: String,
    #[serde(default = "SiteSettings::default_worksheets_per_page")]
    pub worksheets_per_page: u32,
    #[serde(default = "default_true")]
    pub show_stats: bool,
}

impl SiteSettings {
    fn default_worksheets_per_page() -> u32 {
        20
    }
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            contact_email: String::new(),
            contact_phone: String::new(),
            header_text: String::new(),
            home_page_intro: String::new(),
            footer_text: String::new(),
            telegram_url: String::new(),
            worksheets_per_page: Self::default_worksheets_per_page(),
            show_stats: true,
        }
    }
}

fn default_true() -> bool {
    true
}
