//! Lead capture endpoints.
//!
//! Intake order for `POST /api/leads`:
//! 1. Decode the body into [`NewLead`] (400 on a bad shape). The type has no
//!    `id`, so a client-supplied id never reaches the store.
//! 2. Check required fields (400).
//! 3. Insert through the store, which assigns id and `createdAt` (500 if the
//!    insert fails, nothing else has happened at that point).
//! 4. Hand the stored lead to the [`NotificationDispatcher`] and answer 201
//!    without waiting for delivery. Notification failures only reach the logs.
//!
//! [`NotificationDispatcher`]: crate::dispatch::NotificationDispatcher

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::errors::{AppError, ResultExt};
use crate::extract::{AppJson, AppPath};
use crate::handlers::AppState;
use crate::models::{Lead, LeadUpdate, NewLead};

/// GET /api/leads
#[utoipa::path(
    get,
    path = "/api/leads",
    tag = "leads",
    responses((status = 200, description = "All leads, newest first", body = [Lead]))
)]
pub async fn list_leads(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Lead>>, AppError> {
    Ok(Json(state.store.list_leads().await?))
}

/// POST /api/leads
#[utoipa::path(
    post,
    path = "/api/leads",
    tag = "leads",
    request_body = NewLead,
    responses(
        (status = 201, description = "Stored lead", body = Lead),
        (status = 400, description = "Body does not describe a lead"),
        (status = 500, description = "Lead could not be stored")
    )
)]
pub async fn create_lead(
    State(state): State<Arc<AppState>>,
    AppJson(submission): AppJson<NewLead>,
) -> Result<(StatusCode, Json<Lead>), AppError> {
    submission.validate()?;

    let lead = state
        .store
        .create_lead(submission)
        .await
        .context("storing lead")?;

    tracing::info!(
        "🆕 New lead id={} source={} city={}",
        lead.id,
        lead.source,
        lead.city
    );

    state.notifications.dispatch(lead.clone());

    Ok((StatusCode::CREATED, Json(lead)))
}

/// PATCH /api/leads/:id
///
/// Updates `status` and/or `managerNote`; other keys are rejected.
#[utoipa::path(
    patch,
    path = "/api/leads/{id}",
    tag = "leads",
    params(("id" = i64, Path, description = "Lead id")),
    request_body = LeadUpdate,
    responses(
        (status = 204, description = "Lead updated"),
        (status = 400, description = "Unknown key, empty update or bad id"),
        (status = 404, description = "Lead not found")
    )
)]
pub async fn update_lead(
    State(state): State<Arc<AppState>>,
    AppPath(id): AppPath<i64>,
    AppJson(update): AppJson<LeadUpdate>,
) -> Result<StatusCode, AppError> {
    update.validate()?;

    let updated = state
        .store
        .patch_lead(id, &update)
        .await
        .with_context(|| format!("patching lead {}", id))?;
    if !updated {
        return Err(AppError::NotFound(format!("Lead with id {} not found", id)));
    }

    tracing::info!(
        "Updated lead id={} status={:?} note_changed={}",
        id,
        update.status,
        update.manager_note.is_some()
    );
    Ok(StatusCode::NO_CONTENT)
}
