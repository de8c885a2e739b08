use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::error::{AppError, Result};
use crate::models::{AttendanceState, CreateGuestRequest, Guest, RsvpRequest, UpdateGuestRequest};
use crate::state::AppState;

/// Guest routes
pub fn guest_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_guests).post(create_guest))
        .route(
            "/{guest_id}",
            get(get_guest).put(update_guest).delete(delete_guest),
        )
        .route("/{guest_id}/rsvp", post(submit_rsvp))
}

/// GET /api/v1/guests - List the guest book
async fn list_guests(State(state): State<AppState>) -> Result<Json<Vec<Guest>>> {
    let guests = state.guest_repo.list_guests().await?;
    Ok(Json(guests))
}

/// POST /api/v1/guests - Add a guest
async fn create_guest(
    State(state): State<AppState>,
    Json(request): Json<CreateGuestRequest>,
) -> Result<Json<Guest>> {
    if request.name.trim().is_empty() {
        return Err(AppError::BadRequest("Guest name is required".to_string()));
    }

    let guest = Guest::new(request.name, request.email);
    state.guest_repo.create_guest(&guest).await?;

    Ok(Json(guest))
}

/// GET /api/v1/guests/{guest_id} - Get one guest
async fn get_guest(
    State(state): State<AppState>,
    Path(guest_id): Path<String>,
) -> Result<Json<Guest>> {
    let guest = state
        .guest_repo
        .get_guest(&guest_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Guest not found".to_string()))?;

    Ok(Json(guest))
}

/// PUT /api/v1/guests/{guest_id} - Update contact details
async fn update_guest(
    State(state): State<AppState>,
    Path(guest_id): Path<String>,
    Json(request): Json<UpdateGuestRequest>,
) -> Result<Json<Guest>> {
    if let Some(name) = &request.name {
        if name.trim().is_empty() {
            return Err(AppError::BadRequest(
                "Guest name must not be empty".to_string(),
            ));
        }
    }

    let guest = state
        .guest_repo
        .update_guest(&guest_id, request.name, request.email)
        .await?;

    Ok(Json(guest))
}

/// DELETE /api/v1/guests/{guest_id} - Remove a guest
async fn delete_guest(
    State(state): State<AppState>,
    Path(guest_id): Path<String>,
) -> Result<Json<serde_json::Value>> {
    state
        .guest_repo
        .get_guest(&guest_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Guest not found".to_string()))?;

    state.guest_repo.delete_guest(&guest_id).await?;

    Ok(Json(json!({ "deleted": true })))
}

/// POST /api/v1/guests/{guest_id}/rsvp - Record a guest's RSVP
async fn submit_rsvp(
    State(state): State<AppState>,
    Path(guest_id): Path<String>,
    Json(request): Json<RsvpRequest>,
) -> Result<Json<Guest>> {
    let attendance = if request.attending {
        AttendanceState::Attending
    } else {
        AttendanceState::Declined
    };

    let guest = state
        .guest_repo
        .record_rsvp(&guest_id, attendance, request.response)
        .await?;

    Ok(Json(guest))
}
