use std::env;
use std::time::Duration;

use crate::dispatch::DispatcherConfig;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub redis_url: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub invite_base_url: String,
    pub dispatch_batch_size: usize,
    pub dispatch_batch_delay_secs: u64,
    pub dispatch_send_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            redis_url: env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            emailjs_service_id: env::var("EMAILJS_SERVICE_ID")
                .map_err(|_| ConfigError::MissingRelayCredential("EMAILJS_SERVICE_ID"))?,
            emailjs_template_id: env::var("EMAILJS_TEMPLATE_ID")
                .map_err(|_| ConfigError::MissingRelayCredential("EMAILJS_TEMPLATE_ID"))?,
            emailjs_public_key: env::var("EMAILJS_PUBLIC_KEY")
                .map_err(|_| ConfigError::MissingRelayCredential("EMAILJS_PUBLIC_KEY"))?,
            invite_base_url: env::var("INVITE_BASE_URL")
                .unwrap_or_else(|_| "http://localhost:3000".to_string()),
            dispatch_batch_size: env::var("DISPATCH_BATCH_SIZE")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
            dispatch_batch_delay_secs: env::var("DISPATCH_BATCH_DELAY_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            dispatch_send_timeout_secs: env::var("DISPATCH_SEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// Dispatcher settings derived from the environment.
    pub fn dispatcher_config(&self) -> DispatcherConfig {
        DispatcherConfig {
            batch_size: self.dispatch_batch_size.max(1),
            batch_delay: Duration::from_secs(self.dispatch_batch_delay_secs),
            send_timeout: Duration::from_secs(self.dispatch_send_timeout_secs),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid server port")]
    InvalidPort,
    #[error("{0} environment variable is required")]
    MissingRelayCredential(&'static str),
}
