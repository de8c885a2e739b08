use serde::{Deserialize, Serialize};

/// Request to dispatch invitation emails
///
/// With no `guest_ids` the whole guest list is targeted; ineligible guests
/// (missing or malformed address) are excluded before any send.
#[derive(Debug, Default, Deserialize)]
pub struct DispatchRequest {
    #[serde(default)]
    pub guest_ids: Option<Vec<String>>,
}

/// Summary returned once a dispatch run has settled
#[derive(Debug, Serialize)]
pub struct DispatchResponse {
    /// Eligible guests the run attempted to reach
    pub targeted: usize,
    /// Sends acknowledged by the relay
    pub sent: usize,
    /// Sends that failed or timed out
    pub failed: usize,
    /// Guest records marked notified afterwards
    pub reconciled: usize,
}

/// Response after cancelling an in-flight run
#[derive(Debug, Serialize)]
pub struct CancelDispatchResponse {
    pub cancelled: bool,
}
