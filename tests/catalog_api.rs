/// HTTP tests for the catalog resources, driven through the router with the
/// in-memory store.
mod common;

use axum::http::StatusCode;
use common::{app, empty_request, json_request, raw_request, read_json};
use serde_json::json;
use tower::ServiceExt;

fn product_body(slug: &str) -> serde_json::Value {
    json!({
        "slug": slug,
        "name": "P2.5 Indoor",
        "type": "indoor",
        "purpose": ["retail", "conference", "retail"],
        "pixelPitch": "P2.5",
        "brightness": 800,
        "refreshRate": 3840,
        "ipRating": "IP30",
        "viewingDistanceMin": 2,
        "viewingDistanceMax": 25,
        "priceFrom": 450000.0,
        "shortDescription": "Fine pitch indoor screen",
        "fullDescription": "Long description",
        "images": ["front.jpg", "side.jpg"],
        "warranty": 24,
        "leadTime": 14,
        "isFeatured": true,
        "sortOrder": 1
    })
}

#[tokio::test]
async fn product_post_then_get_by_slug_round_trips() {
    let app = app();

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", product_body("p25-indoor")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert!(created["id"].as_i64().unwrap() > 0);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/products/p25-indoor"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let fetched = read_json(response).await;
    assert_eq!(fetched, created);
    assert_eq!(fetched["purpose"], json!(["retail", "conference", "retail"]));
    assert_eq!(fetched["images"], json!(["front.jpg", "side.jpg"]));
    assert_eq!(fetched["type"], "indoor");

    let response = app
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn product_list_is_empty_array_initially() {
    let response = app()
        .oneshot(empty_request("GET", "/api/products"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn unknown_slug_is_404_with_error_payload() {
    let response = app()
        .oneshot(empty_request("GET", "/api/products/missing"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = read_json(response).await;
    assert_eq!(body["error"], "Product not found");
}

#[tokio::test]
async fn post_with_id_replaces_whole_record() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", product_body("p3")))
        .await
        .unwrap();
    let id = read_json(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            json!({ "id": id, "slug": "p3", "name": "P3 Outdoor" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let replaced = read_json(response).await;
    assert_eq!(replaced["id"], id);
    assert_eq!(replaced["name"], "P3 Outdoor");
    // Full replace, not merge: omitted fields are back to their defaults
    assert_eq!(replaced["images"], json!([]));
    assert_eq!(replaced["isFeatured"], false);
    assert!(replaced["priceFrom"].is_null());
}

#[tokio::test]
async fn post_with_unknown_id_is_404() {
    let response = app()
        .oneshot(json_request(
            "POST",
            "/api/products",
            json!({ "id": 41, "slug": "p4", "name": "P4" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn duplicate_slug_is_conflict_and_keeps_original() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", product_body("dup")))
        .await
        .unwrap();
    let original = read_json(response).await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            json!({ "slug": "dup", "name": "Impostor" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert!(!read_json(response).await["error"]
        .as_str()
        .unwrap()
        .is_empty());

    // Renaming another record onto a taken slug is rejected too
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", product_body("other")))
        .await
        .unwrap();
    let other_id = read_json(response).await["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/products",
            json!({ "id": other_id, "slug": "dup", "name": "Impostor" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(empty_request("GET", "/api/products/dup"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, original);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/products", product_body("gone")))
        .await
        .unwrap();
    let id = read_json(response).await["id"].as_i64().unwrap();

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(empty_request("DELETE", &format!("/api/products/{}", id)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    let response = app
        .clone()
        .oneshot(empty_request("DELETE", "/api/products/987654"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", "/api/products/gone"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_is_400() {
    let response = app()
        .oneshot(empty_request("DELETE", "/api/products/abc"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn malformed_bodies_are_400_with_message() {
    let app = app();

    let cases = [
        raw_request("POST", "/api/products", "{not json"),
        raw_request("POST", "/api/products", r#"{"slug": "x"}"#),
        raw_request("POST", "/api/products", r#"{"slug": "x", "name": "y", "brightness": "bright"}"#),
        raw_request("POST", "/api/products", r#"{"slug": "", "name": "y"}"#),
        raw_request("POST", "/api/solutions", r#"{"name": "y"}"#),
        raw_request("POST", "/api/cases", r#"{"slug": "c"}"#),
    ];

    for request in cases {
        let response = app.clone().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = read_json(response).await;
        assert!(!body["error"].as_str().unwrap().is_empty());
    }
}

#[tokio::test]
async fn solution_area_is_derived_from_dimensions() {
    let app = app();
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/solutions",
            json!({
                "slug": "hall-4x2",
                "name": "Conference hall 4x2",
                "type": "indoor",
                "width": 4.0,
                "height": 2.5,
                "area": 1.0,
                "included": ["screen", "controller", "installation"],
                "priceFrom": 3200000.0,
                "isFeatured": true,
                "featuredOrder": 2
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["area"], 10.0);

    let response = app
        .clone()
        .oneshot(empty_request("GET", "/api/solutions/hall-4x2"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, created);

    let id = created["id"].as_i64().unwrap();
    let response = app
        .clone()
        .oneshot(empty_request("DELETE", &format!("/api/solutions/{}", id)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = app
        .oneshot(empty_request("GET", "/api/solutions"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, json!([]));
}

#[tokio::test]
async fn case_round_trip_and_conflict() {
    let app = app();
    let body = json!({
        "slug": "mega-almaty",
        "title": "Media facade for a mall",
        "city": "Almaty",
        "industry": "Retail",
        "task": "Replace the old billboard",
        "solution": "Outdoor P6 facade screen",
        "specs": ["P6", "60 m2", "IP65"],
        "duration": 21,
        "result": "Ad revenue doubled",
        "images": ["case1.jpg"],
        "testimonial": "Great work"
    });

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/cases", body.clone()))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let created = read_json(response).await;
    assert_eq!(created["solution"], "Outdoor P6 facade screen");
    assert_eq!(created["specs"], json!(["P6", "60 m2", "IP65"]));
    assert!(created["videoUrl"].is_null());

    let response = app
        .clone()
        .oneshot(json_request("POST", "/api/cases", body))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .oneshot(empty_request("GET", "/api/cases/mega-almaty"))
        .await
        .unwrap();
    assert_eq!(read_json(response).await, created);
}

#[tokio::test]
async fn cors_preflight_is_204() {
    let request = axum::http::Request::builder()
        .method("OPTIONS")
        .uri("/api/leads")
        .header("origin", "https://ledvision.kz")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(axum::body::Body::empty())
        .unwrap();

    let response = app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        "*"
    );
}

#[tokio::test]
async fn health_reports_store_backend() {
    let response = app()
        .oneshot(empty_request("GET", "/health"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["notifications"], false);
}

#[tokio::test]
async fn bare_options_is_204() {
    for uri in ["/api/products", "/api/leads/5", "/health"] {
        let response = app()
            .oneshot(empty_request("OPTIONS", uri))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT, "{}", uri);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(bytes.is_empty());
    }
}
