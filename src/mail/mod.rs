pub mod emailjs;

pub use emailjs::EmailJsMailer;

use async_trait::async_trait;
use serde::Serialize;

use crate::error::Result;

/// One personalized invitation, ready for the relay
///
/// The field names mirror the relay template variables.
#[derive(Debug, Clone, Serialize)]
pub struct InvitationEmail {
    #[serde(rename = "email")]
    pub to: String,
    pub name: String,
    pub link: String,
}

/// Mailer abstraction (currently backed by EmailJS)
///
/// One message per call; the relay offers no batch-send primitive.
#[async_trait]
pub trait InvitationMailer: Send + Sync {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()>;
}
