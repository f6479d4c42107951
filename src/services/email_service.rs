use async_trait::async_trait;
use serde::Serialize;
use std::sync::Arc;

use crate::config::EmailSettings;
use crate::utils::AppError;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmailMessage {
    pub to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_to: Option<String>,
    pub subject: String,
    pub text: String,
    pub html: String,
}

/// Outbound email collaborator used by the contact form.
#[async_trait]
pub trait EmailSender: Send + Sync {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError>;
}

/// Picks the HTTP sender when an API key is configured, the logging one
/// otherwise.
pub fn sender_from_settings(settings: &EmailSettings) -> Arc<dyn EmailSender> {
    match &settings.api_key {
        Some(api_key) => Arc::new(HttpEmailSender::new(
            settings.api_url.clone(),
            api_key.clone(),
            settings.from.clone(),
        )),
        None => {
            log::warn!("⚠️  EMAIL_API_KEY not set, contact messages will only be logged");
            Arc::new(LogEmailSender)
        }
    }
}

#[derive(Serialize)]
struct OutboundEmail<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    text: &'a str,
    html: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<&'a str>,
}

/// Sends through a transactional email HTTP API (Resend-compatible payload).
pub struct HttpEmailSender {
    client: reqwest::Client,
    api_url: String,
    api_key: String,
    from: String,
}

impl HttpEmailSender {
    pub fn new(api_url: String, api_key: String, from: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_url,
            api_key,
            from,
        }
    }
}

#[async_trait]
impl EmailSender for HttpEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        let payload = OutboundEmail {
            from: &self.from,
            to: [message.to.as_str()],
            subject: &message.subject,
            text: &message.text,
            html: &message.html,
            reply_to: message.reply_to.as_deref(),
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(std::time::Duration::from_secs(10))
            .send()
            .await
            .map_err(|e| AppError::EmailError(format!("Failed to reach email API: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::EmailError(format!("Email API error {}: {}", status, body)));
        }

        log::info!("📧 Email sent to {}", message.to);
        Ok(())
    }
}

/// Development sender: writes the message to the log.
pub struct LogEmailSender;

#[async_trait]
impl EmailSender for LogEmailSender {
    async fn send(&self, message: &EmailMessage) -> Result<(), AppError> {
        log::info!(
            "📧 [log-only] to={} reply_to={:?} subject={:?}\n{}",
            message.to,
            message.reply_to,
            message.subject,
            message.text
        );
        Ok(())
    }
}
