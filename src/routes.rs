use axum::{
    body::Body,
    extract::{DefaultBodyLimit, Request},
    http::{header, Method, StatusCode},
    middleware::{self, Next},
    response::Response,
    routing::{get, patch},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::handlers::{self, AppState};
use crate::{lead_intake, openapi};

/// Largest accepted request body: 5MB.
pub const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Builds the full application: `/api` resources, health, docs and the
/// CORS/trace/body-limit layers.
pub fn build_router(state: Arc<AppState>) -> Router {
    // The slug lookup and the id delete share one path pattern per resource
    let api = Router::new()
        .route(
            "/products",
            get(handlers::list_products).post(handlers::create_product),
        )
        .route(
            "/products/:key",
            get(handlers::get_product).delete(handlers::delete_product),
        )
        .route(
            "/solutions",
            get(handlers::list_solutions).post(handlers::create_solution),
        )
        .route(
            "/solutions/:key",
            get(handlers::get_solution).delete(handlers::delete_solution),
        )
        .route(
            "/cases",
            get(handlers::list_cases).post(handlers::create_case),
        )
        .route(
            "/cases/:key",
            get(handlers::get_case).delete(handlers::delete_case),
        )
        .route(
            "/leads",
            get(lead_intake::list_leads).post(lead_intake::create_lead),
        )
        .route("/leads/:id", patch(lead_intake::update_lead))
        // Enforced by the body extractors, so overflow is reported as AppError
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/docs", get(openapi::serve_swagger_ui))
        .route("/api-docs/openapi.json", get(openapi::serve_openapi_json))
        .nest("/api", api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer())
        .layer(middleware::from_fn(options_no_content))
}

/// Any origin, the verbs the API uses, and `Content-Type`.
fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE])
}

/// Every `OPTIONS` request answers 204 with an empty body. `CorsLayer` replies
/// 200 to pre-flights, and a bare `OPTIONS` would otherwise get the router's 405.
async fn options_no_content(request: Request, next: Next) -> Response {
    if request.method() != Method::OPTIONS {
        return next.run(request).await;
    }

    let mut response = next.run(request).await;
    *response.status_mut() = StatusCode::NO_CONTENT;
    *response.body_mut() = Body::empty();
    response.headers_mut().remove(header::CONTENT_LENGTH);
    response.headers_mut().remove(header::CONTENT_TYPE);
    response
}
