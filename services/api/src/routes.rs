use crate::infra::AppState;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde_json::json;
use sheaf::catalog::{admin_router, catalog_router, CatalogRepository, CatalogService};
use sheaf::media::{MediaError, MediaStore};
use std::sync::Arc;

pub(crate) fn with_catalog_routes<R, M>(
    service: Arc<CatalogService<R, M>>,
    media: Arc<M>,
) -> axum::Router
where
    R: CatalogRepository + 'static,
    M: MediaStore + 'static,
{
    catalog_router(service.clone())
        .merge(admin_router(service))
        .merge(media_router(media))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

fn media_router<M>(media: Arc<M>) -> axum::Router
where
    M: MediaStore + 'static,
{
    axum::Router::new()
        .route("/media/*path", axum::routing::get(media_endpoint::<M>))
        .with_state(media)
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Serves stored media objects under `/media/`. The content type comes from
/// the path extension; stored paths always carry one.
pub(crate) async fn media_endpoint<M>(
    State(media): State<Arc<M>>,
    Path(path): Path<String>,
) -> Response
where
    M: MediaStore + 'static,
{
    match media.read(&path) {
        Ok(bytes) => {
            let content_type = mime_guess::from_path(&path).first_or_octet_stream();
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, content_type.to_string())],
                bytes,
            )
                .into_response()
        }
        Err(err) => {
            let status = match &err {
                MediaError::NotFound(_) => StatusCode::NOT_FOUND,
                MediaError::InvalidPath(_) => StatusCode::BAD_REQUEST,
                MediaError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
            };
            (status, Json(json!({ "error": err.to_string() }))).into_response()
        }
    }
}
