use std::time::Duration;

use tracing::warn;

use crate::dispatch::SendOutcome;
use crate::mail::{InvitationEmail, InvitationMailer};
use crate::models::Guest;

/// Sends exactly one personalized invitation per call
///
/// The base URL is supplied by the caller; this component only appends the
/// guest id to it. Callers are expected to have checked eligibility already —
/// a guest without an address simply fails at the relay.
pub struct InvitationSender<'a> {
    mailer: &'a dyn InvitationMailer,
    base_url: &'a str,
    timeout: Duration,
}

impl<'a> InvitationSender<'a> {
    pub fn new(mailer: &'a dyn InvitationMailer, base_url: &'a str, timeout: Duration) -> Self {
        Self {
            mailer,
            base_url,
            timeout,
        }
    }

    /// One relay call; errors and timeouts normalize to an outcome.
    ///
    /// Never retries. Retrying is a caller decision, and the batching layer
    /// deliberately makes none.
    pub async fn send(&self, guest: &Guest) -> SendOutcome {
        let invitation = InvitationEmail {
            to: guest.email.clone().unwrap_or_default(),
            name: guest.name.clone(),
            link: format!("{}/invitation/{}", self.base_url, guest.id),
        };

        match tokio::time::timeout(self.timeout, self.mailer.send_invitation(&invitation)).await {
            Ok(Ok(())) => SendOutcome::Sent,
            Ok(Err(e)) => {
                warn!(guest_id = %guest.id, error = %e, "Failed to send invitation");
                SendOutcome::Failed(e.to_string())
            }
            Err(_) => {
                warn!(
                    guest_id = %guest.id,
                    timeout_secs = self.timeout.as_secs(),
                    "Invitation send timed out"
                );
                SendOutcome::Failed(format!("send timed out after {:?}", self.timeout))
            }
        }
    }
}
