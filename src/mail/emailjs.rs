use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use crate::config::Config;
use crate::error::{AppError, Result};
use crate::mail::{InvitationEmail, InvitationMailer};

const EMAILJS_SEND_URL: &str = "https://api.emailjs.com/api/v1.0/email/send";

/// EmailJS transactional mail client
#[derive(Clone)]
pub struct EmailJsMailer {
    client: Client,
    service_id: String,
    template_id: String,
    public_key: String,
}

#[derive(Serialize)]
struct SendPayload<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a InvitationEmail,
}

impl EmailJsMailer {
    pub fn new(config: &Config) -> Self {
        Self {
            client: Client::new(),
            service_id: config.emailjs_service_id.clone(),
            template_id: config.emailjs_template_id.clone(),
            public_key: config.emailjs_public_key.clone(),
        }
    }
}

#[async_trait]
impl InvitationMailer for EmailJsMailer {
    async fn send_invitation(&self, invitation: &InvitationEmail) -> Result<()> {
        let payload = SendPayload {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: invitation,
        };

        let res = self
            .client
            .post(EMAILJS_SEND_URL)
            .json(&payload)
            .send()
            .await
            .map_err(|e| AppError::MailError(format!("Mail send failed: {}", e)))?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::MailError(format!(
                "EmailJS API error {}: {}",
                status, body
            )));
        }

        Ok(())
    }
}
