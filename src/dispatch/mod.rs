//! Bulk invitation dispatch
//!
//! Takes a guest list, filters it down to guests with a usable address, and
//! sends one personalized email per guest through the relay in small
//! concurrent batches with a fixed pause in between. Per-guest outcomes are
//! collected so reconciliation can mark exactly the guests whose send the
//! relay acknowledged.

pub mod batcher;
pub mod eligibility;
pub mod reconcile;
pub mod sender;

#[cfg(test)]
pub(crate) mod test_support;

pub use batcher::{BatchDispatcher, DispatcherConfig};
pub use eligibility::{is_eligible, is_valid_email};
pub use reconcile::reconcile_notified;
pub use sender::InvitationSender;

use tokio_util::sync::CancellationToken;

use crate::mail::InvitationMailer;
use crate::models::Guest;

/// Result of one relay send
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    Sent,
    Failed(String),
}

impl SendOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, SendOutcome::Sent)
    }
}

/// Outcome for one guest in a dispatch run
#[derive(Debug, Clone)]
pub struct GuestOutcome {
    pub guest_id: String,
    pub outcome: SendOutcome,
}

/// Settled results of a dispatch run
#[derive(Debug, Default)]
pub struct DispatchReport {
    pub outcomes: Vec<GuestOutcome>,
    pub sent: usize,
}

impl DispatchReport {
    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.sent
    }
}

/// Dispatch invitations to every eligible guest in `guests`.
///
/// Guests without a usable address are excluded once, up front; they never
/// reach the relay and never appear in the report, so the progress callback
/// counts against the eligible population rather than the raw input.
pub async fn dispatch_invitations(
    mailer: &dyn InvitationMailer,
    guests: Vec<Guest>,
    base_url: &str,
    config: DispatcherConfig,
    cancel: &CancellationToken,
    on_progress: impl FnMut(usize),
) -> DispatchReport {
    let eligible: Vec<Guest> = guests.into_iter().filter(is_eligible).collect();

    if eligible.is_empty() {
        tracing::warn!("No guests with a valid email address to dispatch to");
        return DispatchReport::default();
    }

    tracing::info!(eligible = eligible.len(), "Starting invitation dispatch");

    BatchDispatcher::new(mailer, config)
        .dispatch(&eligible, base_url, cancel, on_progress)
        .await
}
