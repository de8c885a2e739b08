use std::sync::Mutex;

use async_trait::async_trait;
use futures::future;

use crate::error::{AppError, Result};
use crate::mail::{InvitationEmail, InvitationMailer};

/// Relay double; records every payload it is asked to deliver
pub(crate) struct FakeMailer {
    pub calls: Mutex<Vec<InvitationEmail>>,
    behavior: Behavior,
}

enum Behavior {
    Accept,
    RejectAll,
    Reject(Vec<String>),
    Hang,
}

impl FakeMailer {
    pub fn accepting() -> Self {
        Self::with(Behavior::Accept)
    }

    pub fn rejecting_all() -> Self {
        Self::with(Behavior::RejectAll)
    }

    pub fn rejecting(addresses: &[&str]) -> Self {
        Self::with(Behavior::Reject(
            addresses.iter().map(|a| a.to_string()).collect(),
        ))
    }

    pub fn hanging() -> Self {
        Self::with(Behavior::Hang)
    }

    fn with(behavior: Behavior) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            behavior,
        }
    }

    /// Addresses attempted, in relay-call order
    pub fn recipients(&self) -> Vec<String> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .map(|i| i.to.clone())
            .collect()
    }
}

#[async_trait]
impl InvitationMailer for FakeMailer {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()> {
        self.calls.lock().unwrap().push(invitation.clone());

        match &self.behavior {
            Behavior::Accept => Ok(()),
            Behavior::Hang => {
                future::pending::<()>().await;
                Ok(())
            }
            Behavior::RejectAll => Err(AppError::MailError(
                "relay rejected the message".to_string(),
            )),
            Behavior::Reject(addresses) if addresses.contains(&invitation.to) => Err(
                AppError::MailError("relay rejected the message".to_string()),
            ),
            Behavior::Reject(_) => Ok(()),
        }
    }
}
