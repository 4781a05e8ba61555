use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::response::Response;
use chrono::{Duration, Utc};
use image::{DynamicImage, Rgba, RgbaImage};
use serde_json::Value;

use crate::catalog::admin::admin_router;
use crate::catalog::domain::{
    CategoryDraft, CategoryId, Difficulty, GradeLevel, TagDraft, WorksheetDraft, WorksheetId,
    WorksheetRecord,
};
use crate::catalog::memory::InMemoryCatalog;
use crate::catalog::router::catalog_router;
use crate::catalog::service::CatalogService;
use crate::media::{MediaError, MediaStore};
use crate::previews::{PdfRasterizer, PreviewError, PreviewGenerator};

/// Minimal PDF payload that passes the magic-byte check on upload.
pub(super) const PDF_STUB: &[u8] =
    b"%PDF-1.4\n1 0 obj\n<< /Type /Catalog >>\nendobj\ntrailer\n<< /Root 1 0 R >>\n%%EOF\n";

/// Media store double backed by a path-keyed map.
#[derive(Default, Clone)]
pub(super) struct MemoryMedia {
    objects: Arc<Mutex<HashMap<String, Vec<u8>>>>,
}

impl MemoryMedia {
    pub(super) fn object(&self, path: &str) -> Option<Vec<u8>> {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .get(path)
            .cloned()
    }

    pub(super) fn contains(&self, path: &str) -> bool {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .contains_key(path)
    }

    pub(super) fn object_count(&self) -> usize {
        self.objects.lock().expect("media mutex poisoned").len()
    }
}

impl MediaStore for MemoryMedia {
    fn store(&self, path: &str, bytes: &[u8]) -> Result<(), MediaError> {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .insert(path.to_string(), bytes.to_vec());
        Ok(())
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        self.object(path)
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn remove(&self, path: &str) -> Result<(), MediaError> {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .remove(path)
            .map(|_| ())
            .ok_or_else(|| MediaError::NotFound(path.to_string()))
    }

    fn exists(&self, path: &str) -> Result<bool, MediaError> {
        Ok(self.contains(path))
    }
}

/// Media store double that refuses every write and read.
pub(super) struct FailingMedia;

impl MediaStore for FailingMedia {
    fn store(&self, _path: &str, _bytes: &[u8]) -> Result<(), MediaError> {
        Err(MediaError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn read(&self, path: &str) -> Result<Vec<u8>, MediaError> {
        Err(MediaError::NotFound(path.to_string()))
    }

    fn remove(&self, _path: &str) -> Result<(), MediaError> {
        Err(MediaError::Io(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        )))
    }

    fn exists(&self, _path: &str) -> Result<bool, MediaError> {
        Ok(false)
    }
}

/// Rasterizer double that renders a blank page of the given size.
pub(super) struct PageRasterizer {
    pub(super) width: u32,
    pub(super) height: u32,
}

impl PdfRasterizer for PageRasterizer {
    fn first_page(&self, _pdf: &[u8], _target_width: u32) -> Result<DynamicImage, PreviewError> {
        Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            self.width,
            self.height,
            Rgba([255, 255, 255, 255]),
        )))
    }
}

pub(super) fn build_service() -> (
    CatalogService<InMemoryCatalog, MemoryMedia>,
    Arc<InMemoryCatalog>,
    Arc<MemoryMedia>,
) {
    let repository = Arc::new(InMemoryCatalog::new());
    let media = Arc::new(MemoryMedia::default());
    let service = CatalogService::new(
        repository.clone(),
        media.clone(),
        Arc::new(PreviewGenerator::disabled()),
    );
    (service, repository, media)
}

pub(super) fn build_service_with_previews() -> (
    CatalogService<InMemoryCatalog, MemoryMedia>,
    Arc<InMemoryCatalog>,
    Arc<MemoryMedia>,
) {
    let repository = Arc::new(InMemoryCatalog::new());
    let media = Arc::new(MemoryMedia::default());
    let generator = PreviewGenerator::new(Some(Box::new(PageRasterizer {
        width: 600,
        height: 800,
    })));
    let service = CatalogService::new(repository.clone(), media.clone(), Arc::new(generator));
    (service, repository, media)
}

pub(super) fn full_router(service: CatalogService<InMemoryCatalog, MemoryMedia>) -> Router {
    let service = Arc::new(service);
    catalog_router(service.clone()).merge(admin_router(service))
}

pub(super) fn category_draft(name: &str, parent: Option<CategoryId>) -> CategoryDraft {
    CategoryDraft {
        name: name.to_string(),
        slug: None,
        parent,
        description: format!("{name} worksheets"),
        order: 0,
        is_active: true,
    }
}

pub(super) fn tag_draft(name: &str) -> TagDraft {
    TagDraft {
        name: name.to_string(),
        slug: None,
        description: String::new(),
    }
}

pub(super) fn worksheet_draft(title: &str, category: CategoryId, tags: &[&str]) -> WorksheetDraft {
    WorksheetDraft {
        title: title.to_string(),
        slug: None,
        description: format!("{title} practice sheet"),
        category,
        tags: tags.iter().map(|slug| slug.to_string()).collect(),
        grade_level: GradeLevel::Preschool,
        difficulty: Difficulty::Medium,
        meta_title: String::new(),
        meta_description: String::new(),
        is_featured: false,
        is_published: true,
    }
}

/// Worksheet record for direct repository inserts, aged so orderings
/// never depend on wall-clock ties.
pub(super) fn worksheet_record(
    title: &str,
    category: CategoryId,
    age_days: i64,
) -> WorksheetRecord {
    let created = Utc::now() - Duration::days(age_days);
    WorksheetRecord {
        id: WorksheetId(0),
        title: title.to_string(),
        slug: title.to_lowercase().replace(' ', "-"),
        description: String::new(),
        category,
        tags: Vec::new(),
        grade_level: GradeLevel::Preschool,
        difficulty: Difficulty::Medium,
        pdf_file: None,
        thumbnail: None,
        preview_image: None,
        meta_title: String::new(),
        meta_description: String::new(),
        is_featured: false,
        is_published: true,
        views_count: 0,
        downloads_count: 0,
        published_at: Some(created),
        created_at: created,
        updated_at: created,
    }
}

pub(super) struct SeededCatalog {
    pub(super) math: CategoryId,
    pub(super) addition: CategoryId,
    pub(super) subtraction: CategoryId,
    pub(super) coloring: CategoryId,
    pub(super) addition_up_to_ten: WorksheetId,
    pub(super) addition_with_pictures: WorksheetId,
    pub(super) subtraction_up_to_ten: WorksheetId,
    pub(super) animal_coloring: WorksheetId,
    pub(super) draft: WorksheetId,
}

/// Two root categories, two children under Mathematics, three tags and
/// five worksheets, one of them unpublished.
pub(super) fn seed_catalog(service: &CatalogService<InMemoryCatalog, MemoryMedia>) -> SeededCatalog {
    let mut draft = category_draft("Mathematics", None);
    draft.order = 1;
    let math = service.create_category(draft).expect("math category");

    let mut draft = category_draft("Coloring", None);
    draft.order = 2;
    let coloring = service.create_category(draft).expect("coloring category");

    let mut draft = category_draft("Addition", Some(math.id));
    draft.order = 1;
    let addition = service.create_category(draft).expect("addition category");

    let mut draft = category_draft("Subtraction", Some(math.id));
    draft.order = 2;
    let subtraction = service.create_category(draft).expect("subtraction category");

    for name in ["Counting", "Addition Facts", "Animals"] {
        service.create_tag(tag_draft(name)).expect("tag");
    }

    let mut draft = worksheet_draft(
        "Addition up to 10",
        addition.id,
        &["counting", "addition-facts"],
    );
    draft.grade_level = GradeLevel::Grade1;
    draft.difficulty = Difficulty::Easy;
    draft.is_featured = true;
    let addition_up_to_ten = service.create_worksheet(draft).expect("worksheet").id;

    let draft = worksheet_draft("Addition with Pictures", addition.id, &["addition-facts"]);
    let addition_with_pictures = service.create_worksheet(draft).expect("worksheet").id;

    let mut draft = worksheet_draft("Subtraction up to 10", subtraction.id, &["counting"]);
    draft.grade_level = GradeLevel::Grade1;
    let subtraction_up_to_ten = service.create_worksheet(draft).expect("worksheet").id;

    let mut draft = worksheet_draft("Animal Coloring Pages", coloring.id, &["animals"]);
    draft.difficulty = Difficulty::Easy;
    draft.is_featured = true;
    let animal_coloring = service.create_worksheet(draft).expect("worksheet").id;

    let mut draft = worksheet_draft("Counting Practice", addition.id, &["counting"]);
    draft.grade_level = GradeLevel::Kindergarten;
    draft.is_published = false;
    let unpublished = service.create_worksheet(draft).expect("worksheet").id;

    SeededCatalog {
        math: math.id,
        addition: addition.id,
        subtraction: subtraction.id,
        coloring: coloring.id,
        addition_up_to_ten,
        addition_with_pictures,
        subtraction_up_to_ten,
        animal_coloring,
        draft: unpublished,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("response body");
    serde_json::from_slice(&bytes).expect("json body")
}
