//! Admin endpoints for maintaining the catalog. These sit under
//! `/api/v1/admin` and are expected to be reachable only from trusted
//! networks; they carry no authentication of their own.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{post, put},
    Router,
};

use crate::media::MediaStore;

use super::domain::{
    CategoryDraft, CategoryId, SiteSettings, TagDraft, TagId, WorksheetDraft, WorksheetFlags,
    WorksheetId,
};
use super::repository::CatalogRepository;
use super::service::CatalogService;

/// Router builder for the admin write endpoints.
pub fn admin_router<R, M>(service: Arc<CatalogService<R, M>>) -> Router
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    Router::new()
        .route("/api/v1/admin/categories", post(create_category_handler::<R, M>))
        .route(
            "/api/v1/admin/categories/:id",
            put(update_category_handler::<R, M>).delete(delete_category_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/categories/:id/icon",
            post(upload_icon_handler::<R, M>),
        )
        .route("/api/v1/admin/tags", post(create_tag_handler::<R, M>))
        .route(
            "/api/v1/admin/tags/:id",
            put(update_tag_handler::<R, M>).delete(delete_tag_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/worksheets",
            post(create_worksheet_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/worksheets/:id",
            put(update_worksheet_handler::<R, M>).delete(delete_worksheet_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/worksheets/:id/pdf",
            post(upload_pdf_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/worksheets/:id/previews",
            post(regenerate_previews_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/worksheets/:id/flags",
            post(set_flags_handler::<R, M>),
        )
        .route(
            "/api/v1/admin/settings",
            put(update_settings_handler::<R, M>),
        )
        .with_state(service)
}

pub(crate) async fn create_category_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    axum::Json(draft): axum::Json<CategoryDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.create_category(draft) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_category_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    axum::Json(draft): axum::Json<CategoryDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.update_category(CategoryId(id), draft) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_category_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.delete_category(CategoryId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn upload_icon_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let extension = icon_extension(&headers);
    match service.upload_category_icon(CategoryId(id), extension, &body) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_tag_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    axum::Json(draft): axum::Json<TagDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.create_tag(draft) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_tag_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    axum::Json(draft): axum::Json<TagDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.update_tag(TagId(id), draft) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_tag_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.delete_tag(TagId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn create_worksheet_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    axum::Json(draft): axum::Json<WorksheetDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.create_worksheet(draft) {
        Ok(view) => (StatusCode::CREATED, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_worksheet_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    axum::Json(draft): axum::Json<WorksheetDraft>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.update_worksheet(WorksheetId(id), draft) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn delete_worksheet_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.delete_worksheet(WorksheetId(id)) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn upload_pdf_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    body: Bytes,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.upload_worksheet_pdf(WorksheetId(id), &body) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn regenerate_previews_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.regenerate_previews(WorksheetId(id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn set_flags_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(id): Path<u64>,
    axum::Json(flags): axum::Json<WorksheetFlags>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.set_worksheet_flags(WorksheetId(id), flags) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn update_settings_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    axum::Json(settings): axum::Json<SiteSettings>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.update_site_settings(settings) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// File extension for an uploaded icon, from the request content type.
/// Unknown types fall back to png.
fn icon_extension(headers: &HeaderMap) -> &'static str {
    match headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some("image/jpeg") => "jpg",
        Some("image/svg+xml") => "svg",
        Some("image/webp") => "webp",
        _ => "png",
    }
}
