//! Outbound mail: the single point of entry for transactional email.
//!
//! The pipeline only ever sees `Notifier`, which is built once at startup
//! and is a silent no-op when no provider key was configured.
use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod templates;

const RESEND_API_URL: &str = "https://api.resend.com/emails";
const SEND_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum MailError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },
}

/// Provider-assigned identifier of an accepted message.
pub type MessageId = String;

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<MessageId, MailError>;
}

#[derive(Debug, Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct ResendResponse {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ResendError {
    message: String,
}

/// Sends through the Resend HTTP API. Failed sends are reported, never retried.
#[derive(Clone)]
pub struct ResendMailer {
    client: Client,
    api_key: String,
    from: String,
}

impl ResendMailer {
    pub fn new(api_key: String, from: String) -> Result<Self, MailError> {
        Ok(Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(SEND_TIMEOUT_SECS))
                .build()?,
            api_key,
            from,
        })
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, to: &str, subject: &str, html: &str) -> Result<MessageId, MailError> {
        let response = self
            .client
            .post(RESEND_API_URL)
            .bearer_auth(&self.api_key)
            .json(&ResendRequest {
                from: &self.from,
                to: [to],
                subject,
                html,
            })
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ResendError>(&body)
                .map(|e| e.message)
                .unwrap_or(body);
            return Err(MailError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let sent: ResendResponse = response.json().await?;
        debug!("Resend accepted message {}", sent.id);
        Ok(sent.id)
    }
}

/// Outcome of a single notification attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Sent(MessageId),
    Skipped,
}

/// Mail capability decided once at startup.
#[derive(Clone)]
pub struct Notifier {
    mailer: Option<Arc<dyn Mailer>>,
    recruiting_address: String,
}

impl Notifier {
    pub fn new(mailer: Arc<dyn Mailer>, recruiting_address: String) -> Self {
        Self {
            mailer: Some(mailer),
            recruiting_address,
        }
    }

    pub fn disabled() -> Self {
        Self {
            mailer: None,
            recruiting_address: String::new(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.mailer.is_some()
    }

    pub fn recruiting_address(&self) -> &str {
        &self.recruiting_address
    }

    pub async fn send(&self, to: &str, subject: &str, html: &str) -> Result<Delivery, MailError> {
        match &self.mailer {
            Some(mailer) => mailer.send(to, subject, html).await.map(Delivery::Sent),
            None => {
                debug!("Mail disabled, skipping '{subject}'");
                Ok(Delivery::Skipped)
            }
        }
    }
}
