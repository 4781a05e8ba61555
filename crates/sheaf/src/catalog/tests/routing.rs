use super::common::*;
use axum::extract::State;
use axum::http::{header, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::catalog::memory::InMemoryCatalog;

#[tokio::test]
async fn worksheet_list_serves_the_pagination_envelope() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::get("/api/worksheets/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("count"), Some(&json!(4)));
    assert_eq!(payload.get("total_pages"), Some(&json!(1)));
    assert_eq!(
        payload
            .get("results")
            .and_then(Value::as_array)
            .map(Vec::len),
        Some(4)
    );
    assert!(payload["results"][0].get("download_url").is_some());
}

#[tokio::test]
async fn detail_route_counts_views_and_hides_unknown_slugs() {
    let (service, _, _) = build_service();
    seed_catalog(&service);
    let router = full_router(service);

    for expected in 1..=2 {
        let response = router
            .clone()
            .oneshot(
                axum::http::Request::get("/api/worksheets/addition-up-to-10/")
                    .body(axum::body::Body::empty())
                    .unwrap(),
            )
            .await
            .expect("route executes");
        assert_eq!(response.status(), StatusCode::OK);
        let payload = read_json_body(response).await;
        assert_eq!(payload.get("views_count"), Some(&json!(expected)));
    }

    let response = router
        .oneshot(
            axum::http::Request::get("/api/worksheets/missing/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload.get("error").is_some());
}

#[tokio::test]
async fn download_route_serves_pdf_headers() {
    let (service, _, _) = build_service();
    let seeded = seed_catalog(&service);
    let router = full_router(service);

    let upload = router
        .clone()
        .oneshot(
            axum::http::Request::post(format!(
                "/api/v1/admin/worksheets/{}/pdf",
                seeded.addition_up_to_ten.0
            ))
            .header(header::CONTENT_TYPE, "application/pdf")
            .body(axum::body::Body::from(PDF_STUB))
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(upload.status(), StatusCode::OK);

    let response = router
        .oneshot(
            axum::http::Request::get(format!(
                "/api/worksheets/{}/download/",
                seeded.addition_up_to_ten.0
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok()),
        Some("application/pdf")
    );
    assert!(response
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .contains("addition-up-to-10.pdf"));
    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    assert_eq!(bytes.as_ref(), PDF_STUB);
}

#[tokio::test]
async fn download_handler_rejects_non_numeric_ids() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = crate::catalog::router::download_handler::<InMemoryCatalog, MemoryMedia>(
        State(Arc::new(service)),
        axum::extract::Path("addition-up-to-10".to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn admin_created_categories_appear_publicly() {
    let (service, _, _) = build_service();
    seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/admin/categories")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({"name": "Logic"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("slug"), Some(&json!("logic")));

    let listing = router
        .oneshot(
            axum::http::Request::get("/api/categories/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(listing).await;
    let slugs: Vec<&str> = payload
        .as_array()
        .expect("array body")
        .iter()
        .filter_map(|category| category["slug"].as_str())
        .collect();
    assert!(slugs.contains(&"logic"));
}

#[tokio::test]
async fn admin_worksheet_payloads_round_trip() {
    let (service, _, _) = build_service();
    let seeded = seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post("/api/v1/admin/worksheets")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "title": "Shapes and Colors",
                        "category": seeded.coloring.0,
                        "grade_level": "preschool",
                        "tags": ["animals"],
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("slug"), Some(&json!("shapes-and-colors")));
    assert_eq!(payload.get("difficulty"), Some(&json!("medium")));

    let listing = router
        .oneshot(
            axum::http::Request::get("/api/worksheets/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(listing).await;
    assert_eq!(payload.get("count"), Some(&json!(5)));
}

#[tokio::test]
async fn invalid_nesting_maps_to_unprocessable() {
    let (service, _, _) = build_service();
    let seeded = seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .oneshot(
            axum::http::Request::post("/api/v1/admin/categories")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "name": "Carrying",
                        "parent": seeded.addition.0,
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("two levels"));
}

#[tokio::test]
async fn duplicate_tags_conflict_over_the_api() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::post("/api/v1/admin/tags")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({"name": "Counting"})).unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

#[tokio::test]
async fn out_of_range_pages_map_to_not_found() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::get("/api/worksheets/?page=9")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let payload = read_json_body(response).await;
    assert!(payload["error"]
        .as_str()
        .unwrap_or_default()
        .contains("out of range"));
}

#[tokio::test]
async fn unpublishing_over_the_api_hides_the_worksheet() {
    let (service, _, _) = build_service();
    let seeded = seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::post(format!(
                "/api/v1/admin/worksheets/{}/flags",
                seeded.animal_coloring.0
            ))
            .header(header::CONTENT_TYPE, "application/json")
            .body(axum::body::Body::from(
                serde_json::to_vec(&json!({"is_published": false})).unwrap(),
            ))
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let listing = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/worksheets/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(listing).await;
    assert_eq!(payload.get("count"), Some(&json!(3)));

    let detail = router
        .oneshot(
            axum::http::Request::get("/api/worksheets/animal-coloring-pages/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(detail.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn settings_routes_round_trip() {
    let (service, _, _) = build_service();
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/settings/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("worksheets_per_page"), Some(&json!(20)));

    let update = router
        .clone()
        .oneshot(
            axum::http::Request::put("/api/v1/admin/settings")
                .header(header::CONTENT_TYPE, "application/json")
                .body(axum::body::Body::from(
                    serde_json::to_vec(&json!({
                        "contact_email": "hello@example.com",
                        "worksheets_per_page": 30,
                    }))
                    .unwrap(),
                ))
                .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(update.status(), StatusCode::OK);

    let response = router
        .oneshot(
            axum::http::Request::get("/api/settings/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("worksheets_per_page"), Some(&json!(30)));
    assert_eq!(
        payload.get("contact_email"),
        Some(&json!("hello@example.com"))
    );
}

#[tokio::test]
async fn worksheet_deletion_returns_no_content() {
    let (service, _, _) = build_service();
    let seeded = seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::delete(format!(
                "/api/v1/admin/worksheets/{}",
                seeded.subtraction_up_to_ten.0
            ))
            .body(axum::body::Body::empty())
            .unwrap(),
        )
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let listing = router
        .oneshot(
            axum::http::Request::get("/api/worksheets/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(listing).await;
    assert_eq!(payload.get("count"), Some(&json!(3)));
}

#[tokio::test]
async fn tree_route_flattens_category_fields() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::get("/api/categories/tree/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["slug"], json!("mathematics"));
    assert_eq!(payload[0]["worksheets_count"], json!(3));
    assert_eq!(payload[0]["children"][0]["slug"], json!("addition"));
}

#[tokio::test]
async fn icon_uploads_take_their_extension_from_the_content_type() {
    let (service, _, media) = build_service();
    let seeded = seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::post(format!(
                "/api/v1/admin/categories/{}/icon",
                seeded.math.0
            ))
            .header(header::CONTENT_TYPE, "image/svg+xml")
            .body(axum::body::Body::from(&b"<svg/>"[..]))
            .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload.get("icon"),
        Some(&json!("/media/categories/icons/mathematics.svg"))
    );
    assert!(media.contains("categories/icons/mathematics.svg"));
}

#[tokio::test]
async fn search_and_popular_routes_serve_seeded_data() {
    let (service, _, _) = build_service();
    seed_catalog(&service);
    let router = full_router(service);

    let response = router
        .clone()
        .oneshot(
            axum::http::Request::get("/api/worksheets/search/?q=addition")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("count"), Some(&json!(2)));

    let response = router
        .oneshot(
            axum::http::Request::get("/api/tags/popular/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");
    let payload = read_json_body(response).await;
    assert_eq!(payload[0]["slug"], json!("addition-facts"));
}

#[tokio::test]
async fn category_worksheet_routes_serve_the_envelope() {
    let (service, _, _) = build_service();
    seed_catalog(&service);

    let response = full_router(service)
        .oneshot(
            axum::http::Request::get("/api/categories/mathematics/worksheets/")
                .body(axum::body::Body::empty())
                .unwrap(),
        )
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload.get("count"), Some(&json!(3)));
    assert_eq!(payload.get("next"), Some(&Value::Null));
}
