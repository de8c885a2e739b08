use axum::{extract::State, routing::post, Json, Router};
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::dispatch;
use crate::error::{AppError, Result};
use crate::models::{CancelDispatchResponse, DispatchRequest, DispatchResponse};
use crate::state::AppState;

/// Notification routes
pub fn notification_routes() -> Router<AppState> {
    Router::new()
        .route("/dispatch", post(send_invitations))
        .route("/cancel", post(cancel_dispatch))
}

/// POST /api/v1/notifications/dispatch - Send invitation emails
///
/// Targets the listed guests, or the whole guest book when no ids are given.
/// One run at a time; an overlapping request gets a 409.
async fn send_invitations(
    State(state): State<AppState>,
    Json(request): Json<DispatchRequest>,
) -> Result<Json<DispatchResponse>> {
    let cancel = {
        let mut active = state.active_dispatch.lock().await;
        if active.is_some() {
            return Err(AppError::DispatchInFlight);
        }
        let token = CancellationToken::new();
        *active = Some(token.clone());
        token
    };

    // Release the in-flight slot whatever the run's outcome
    let result = run_dispatch(&state, request, &cancel).await;
    *state.active_dispatch.lock().await = None;

    result.map(Json)
}

async fn run_dispatch(
    state: &AppState,
    request: DispatchRequest,
    cancel: &CancellationToken,
) -> Result<DispatchResponse> {
    let guests = match request.guest_ids {
        Some(ids) => {
            let mut selected = Vec::with_capacity(ids.len());
            for id in &ids {
                let guest = state
                    .guest_repo
                    .get_guest(id)
                    .await?
                    .ok_or_else(|| AppError::NotFound(format!("Guest {} not found", id)))?;
                selected.push(guest);
            }
            selected
        }
        None => state.guest_repo.list_guests().await?,
    };

    let targeted = guests.iter().filter(|g| dispatch::is_eligible(g)).count();

    let report = dispatch::dispatch_invitations(
        state.mailer.as_ref(),
        guests,
        &state.config.invite_base_url,
        state.config.dispatcher_config(),
        cancel,
        |sent| info!(sent, targeted, "Invitation dispatch progress"),
    )
    .await;

    let reconciled = dispatch::reconcile_notified(&state.guest_repo, &report).await;

    info!(
        targeted,
        sent = report.sent,
        failed = report.failed(),
        reconciled,
        "Invitation dispatch settled"
    );

    Ok(DispatchResponse {
        targeted,
        sent: report.sent,
        failed: report.failed(),
        reconciled,
    })
}

/// POST /api/v1/notifications/cancel - Stop the in-flight run
///
/// The current batch settles; no further batch starts. Sends already
/// acknowledged stay reconciled.
async fn cancel_dispatch(State(state): State<AppState>) -> Result<Json<CancelDispatchResponse>> {
    let active = state.active_dispatch.lock().await;

    match active.as_ref() {
        Some(token) => {
            token.cancel();
            info!("Dispatch cancellation requested");
            Ok(Json(CancelDispatchResponse { cancelled: true }))
        }
        None => Err(AppError::NotFound("No dispatch run in flight".to_string())),
    }
}
