use axum::{extract::State, http::StatusCode, Json};
use serde_json::json;
use std::sync::Arc;

use crate::dispatch::NotificationDispatcher;
use crate::errors::AppError;
use crate::extract::{AppJson, AppPath};
use crate::models::{Case, CaseInput, Product, ProductInput, Solution, SolutionInput};
use crate::store::RecordStore;

/// Shared application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    /// Record store for catalog entries and leads.
    pub store: Arc<dyn RecordStore>,
    /// Background delivery of new-lead notifications.
    pub notifications: NotificationDispatcher,
}

/// Health check endpoint.
///
/// Returns 200 with the service status, or 503 when the store does not answer.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<serde_json::Value>) {
    let (status, store_status) = match state.store.health_check().await {
        Ok(()) => (StatusCode::OK, "ok"),
        Err(e) => {
            tracing::error!("Store health check failed: {}", e);
            (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
        }
    };

    let overall = if status == StatusCode::OK {
        "healthy"
    } else {
        "degraded"
    };

    (
        status,
        Json(json!({
            "status": overall,
            "service": "ledvision-api",
            "version": env!("CARGO_PKG_VERSION"),
            "store": state.store.backend_name(),
            "storeStatus": store_status,
            "notifications": state.notifications.is_enabled(),
        })),
    )
}

// ============ Products ============

/// GET /api/products
#[utoipa::path(
    get,
    path = "/api/products",
    tag = "products",
    responses((status = 200, description = "All products", body = [Product]))
)]
pub async fn list_products(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.store.list_products().await?))
}

/// GET /api/products/:slug
#[utoipa::path(
    get,
    path = "/api/products/{slug}",
    tag = "products",
    params(("slug" = String, Path, description = "Product slug")),
    responses(
        (status = 200, description = "Product", body = Product),
        (status = 404, description = "Product not found")
    )
)]
pub async fn get_product(
    State(state): State<Arc<AppState>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.store.get_product_by_slug(&slug).await?))
}

/// POST /api/products
///
/// Creates a product, or replaces it in full when the body carries an `id`.
#[utoipa::path(
    post,
    path = "/api/products",
    tag = "products",
    request_body = ProductInput,
    responses(
        (status = 201, description = "Stored product", body = Product),
        (status = 400, description = "Body does not describe a product"),
        (status = 409, description = "Slug already used by another product")
    )
)]
pub async fn create_product(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<ProductInput>,
) -> Result<(StatusCode, Json<Product>), AppError> {
    input.validate()?;
    let product = state.store.upsert_product(input).await?;
    tracing::info!("Saved product id={} slug={}", product.id, product.slug);
    Ok((StatusCode::CREATED, Json(product)))
}

/// DELETE /api/products/:id
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    tag = "products",
    params(("id" = i64, Path, description = "Product id")),
    responses((status = 204, description = "Deleted, or did not exist"))
)]
pub async fn delete_product(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ Solutions ============

#[utoipa::path(
    get,
    path = "/api/solutions",
    tag = "solutions",
    responses((status = 200, description = "All solutions", body = [Solution]))
)]
pub async fn list_solutions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Solution>>, AppError> {
    Ok(Json(state.store.list_solutions().await?))
}

#[utoipa::path(
    get,
    path = "/api/solutions/{slug}",
    tag = "solutions",
    params(("slug" = String, Path, description = "Solution slug")),
    responses(
        (status = 200, description = "Solution", body = Solution),
        (status = 404, description = "Solution not found")
    )
)]
pub async fn get_solution(
    State(state): State<Arc<AppState>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Solution>, AppError> {
    Ok(Json(state.store.get_solution_by_slug(&slug).await?))
}

/// POST /api/solutions
///
/// `area` in the body is ignored and recomputed from `width` and `height`.
#[utoipa::path(
    post,
    path = "/api/solutions",
    tag = "solutions",
    request_body = SolutionInput,
    responses(
        (status = 201, description = "Stored solution", body = Solution),
        (status = 400, description = "Body does not describe a solution"),
        (status = 409, description = "Slug already used by another solution")
    )
)]
pub async fn create_solution(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<SolutionInput>,
) -> Result<(StatusCode, Json<Solution>), AppError> {
    input.validate()?;
    let solution = state
        .store
        .upsert_solution(input.with_derived_area())
        .await?;
    tracing::info!("Saved solution id={} slug={}", solution.id, solution.slug);
    Ok((StatusCode::CREATED, Json(solution)))
}

#[utoipa::path(
    delete,
    path = "/api/solutions/{id}",
    tag = "solutions",
    params(("id" = i64, Path, description = "Solution id")),
    responses((status = 204, description = "Deleted, or did not exist"))
)]
pub async fn delete_solution(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete_solution(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ============ Cases ============

#[utoipa::path(
    get,
    path = "/api/cases",
    tag = "cases",
    responses((status = 200, description = "All case studies", body = [Case]))
)]
pub async fn list_cases(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Case>>, AppError> {
    Ok(Json(state.store.list_cases().await?))
}

#[utoipa::path(
    get,
    path = "/api/cases/{slug}",
    tag = "cases",
    params(("slug" = String, Path, description = "Case slug")),
    responses(
        (status = 200, description = "Case study", body = Case),
        (status = 404, description = "Case not found")
    )
)]
pub async fn get_case(
    State(state): State<Arc<AppState>>,
    AppPath(slug): AppPath<String>,
) -> Result<Json<Case>, AppError> {
    Ok(Json(state.store.get_case_by_slug(&slug).await?))
}

#[utoipa::path(
    post,
    path = "/api/cases",
    tag = "cases",
    request_body = CaseInput,
    responses(
        (status = 201, description = "Stored case study", body = Case),
        (status = 400, description = "Body does not describe a case study"),
        (status = 409, description = "Slug already used by another case")
    )
)]
pub async fn create_case(
    State(state): State<Arc<AppState>>,
    AppJson(input): AppJson<CaseInput>,
) -> Result<(StatusCode, Json<Case>), AppError> {
    input.validate()?;
    let case = state.store.upsert_case(input).await?;
    tracing::info!("Saved case id={} slug={}", case.id, case.slug);
    Ok((StatusCode::CREATED, Json(case)))
}

#[utoipa::path(
    delete,
    path = "/api/cases/{id}",
    tag = "cases",
    params(("id" = i64, Path, description = "Case id")),
    responses((status = 204, description = "Deleted, or did not exist"))
)]
pub async fn delete_case(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
) -> Result<StatusCode, AppError> {
    state.store.delete_case(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
