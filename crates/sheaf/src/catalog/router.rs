use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde_json::json;

use crate::media::MediaStore;

use super::domain::WorksheetId;
use super::pagination::PageRequest;
use super::query::{SearchQuery, WorksheetQuery};
use super::repository::CatalogRepository;
use super::service::CatalogService;

/// Router builder for the read-only catalog endpoints. Paths keep their
/// trailing slash; that is what the frontend requests.
pub fn catalog_router<R, M>(service: Arc<CatalogService<R, M>>) -> Router
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    Router::new()
        .route("/api/categories/", get(list_categories_handler::<R, M>))
        .route("/api/categories/tree/", get(category_tree_handler::<R, M>))
        .route("/api/categories/:slug/", get(category_detail_handler::<R, M>))
        .route(
            "/api/categories/:slug/worksheets/",
            get(worksheets_by_category_handler::<R, M>),
        )
        .route("/api/tags/", get(list_tags_handler::<R, M>))
        .route("/api/tags/popular/", get(popular_tags_handler::<R, M>))
        .route("/api/tags/:slug/", get(tag_detail_handler::<R, M>))
        .route(
            "/api/tags/:slug/worksheets/",
            get(worksheets_by_tag_handler::<R, M>),
        )
        .route("/api/worksheets/", get(list_worksheets_handler::<R, M>))
        .route("/api/worksheets/search/", get(search_handler::<R, M>))
        .route("/api/worksheets/featured/", get(featured_handler::<R, M>))
        .route("/api/worksheets/:slug/", get(worksheet_detail_handler::<R, M>))
        .route(
            "/api/worksheets/:slug/similar/",
            get(similar_handler::<R, M>),
        )
        .route(
            "/api/worksheets/:slug/download/",
            get(download_handler::<R, M>),
        )
        .route("/api/settings/", get(settings_handler::<R, M>))
        .with_state(service)
}

pub(crate) async fn list_categories_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.list_categories() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn category_tree_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.category_tree() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn category_detail_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.category_detail(&slug) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn worksheets_by_category_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
    Query(request): Query<PageRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let path = format!("/api/categories/{slug}/worksheets/");
    match service.worksheets_by_category(&slug, request, &path) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_tags_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.list_tags() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn popular_tags_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.popular_tags() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn tag_detail_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.tag_detail(&slug) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn worksheets_by_tag_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
    Query(request): Query<PageRequest>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let path = format!("/api/tags/{slug}/worksheets/");
    match service.worksheets_by_tag(&slug, request, &path) {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn list_worksheets_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Query(query): Query<WorksheetQuery>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.list_worksheets(&query, "/api/worksheets/") {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn search_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Query(query): Query<SearchQuery>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.search_worksheets(&query, "/api/worksheets/search/") {
        Ok(page) => (StatusCode::OK, axum::Json(page)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn featured_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.featured_worksheets() {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn worksheet_detail_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.worksheet_detail(&slug) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn similar_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.similar_worksheets(&slug) {
        Ok(views) => (StatusCode::OK, axum::Json(views)).into_response(),
        Err(error) => error.into_response(),
    }
}

/// The download route shares its position with the slug routes, so the
/// parameter arrives as a string and is parsed here.
pub(crate) async fn download_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
    Path(slug): Path<String>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    let Ok(id) = slug.parse::<u64>() else {
        let payload = json!({
            "error": "worksheet downloads are keyed by numeric id",
        });
        return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
    };
    match service.download(WorksheetId(id)) {
        Ok(download) => {
            let headers = [
                (header::CONTENT_TYPE, "application/pdf".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", download.filename),
                ),
            ];
            (StatusCode::OK, headers, download.bytes).into_response()
        }
        Err(error) => error.into_response(),
    }
}

pub(crate) async fn settings_handler<R, M>(
    State(service): State<Arc<CatalogService<R, M>>>,
) -> Response
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    match service.site_settings() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(error) => error.into_response(),
    }
}
