use std::sync::Arc;

use tokio::sync::Mutex;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::mail::InvitationMailer;
use crate::redis::GuestRepository;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub guest_repo: Arc<GuestRepository>,
    pub mailer: Arc<dyn InvitationMailer>,
    /// Cancellation token of the dispatch run in flight, if any.
    /// One run at a time; the dispatch handler claims this slot.
    pub active_dispatch: Arc<Mutex<Option<CancellationToken>>>,
}

impl AppState {
    pub fn new(
        config: Config,
        guest_repo: GuestRepository,
        mailer: impl InvitationMailer + 'static,
    ) -> Self {
        Self {
            config: Arc::new(config),
            guest_repo: Arc::new(guest_repo),
            mailer: Arc::new(mailer),
            active_dispatch: Arc::new(Mutex::new(None)),
        }
    }
}
