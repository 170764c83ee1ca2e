use axum::{http::StatusCode, response::IntoResponse, Json};
use utoipa::OpenApi;

use crate::models::{
    Case, CaseInput, Lead, LeadUpdate, NewLead, Product, ProductInput, Solution, SolutionInput,
};
use crate::{handlers, lead_intake};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "LEDVision API",
        description = "Catalog of LED screens, ready solutions and case studies, plus lead capture."
    ),
    paths(
        handlers::list_products,
        handlers::get_product,
        handlers::create_product,
        handlers::delete_product,
        handlers::list_solutions,
        handlers::get_solution,
        handlers::create_solution,
        handlers::delete_solution,
        handlers::list_cases,
        handlers::get_case,
        handlers::create_case,
        handlers::delete_case,
        lead_intake::list_leads,
        lead_intake::create_lead,
        lead_intake::update_lead,
    ),
    components(schemas(
        Product,
        ProductInput,
        Solution,
        SolutionInput,
        Case,
        CaseInput,
        Lead,
        NewLead,
        LeadUpdate
    )),
    tags(
        (name = "products", description = "LED screen models"),
        (name = "solutions", description = "Ready-made screen configurations"),
        (name = "cases", description = "Completed installations"),
        (name = "leads", description = "Contact requests from the site")
    )
)]
pub struct ApiDoc;

/// Serves the OpenAPI document generated from the handler annotations.
pub async fn serve_openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Serves the Swagger UI HTML page.
///
/// The page loads the document served by `serve_openapi_json`.
pub async fn serve_swagger_ui() -> impl IntoResponse {
    let html = r#"
<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>LEDVision API - Swagger UI</title>
    <link rel="stylesheet" type="text/css" href="https://unpkg.com/swagger-ui-dist@5/swagger-ui.css">
    <style>
        body { margin: 0; padding: 0; }
    </style>
</head>
<body>
    <div id="swagger-ui"></div>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
    <script src="https://unpkg.com/swagger-ui-dist@5/swagger-ui-standalone-preset.js"></script>
    <script>
        window.onload = function() {
            window.ui = SwaggerUIBundle({
                url: "/api-docs/openapi.json",
                dom_id: '#swagger-ui',
                deepLinking: true,
                presets: [
                    SwaggerUIBundle.presets.apis,
                    SwaggerUIStandalonePreset
                ],
                layout: "StandaloneLayout"
            });
        };
    </script>
</body>
</html>
"#;
    (
        StatusCode::OK,
        [(axum::http::header::CONTENT_TYPE, "text/html; charset=utf-8")],
        html,
    )
}
