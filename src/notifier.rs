use async_trait::async_trait;
use failsafe::futures::CircuitBreaker;
use serde_json::json;
use std::time::Duration;

use crate::circuit_breaker::{create_notify_circuit_breaker, NotifyCircuitBreaker};
use crate::config::TelegramConfig;
use crate::errors::AppError;
use crate::models::Lead;

/// Delivers a summary of a freshly stored lead to the sales team.
#[async_trait]
pub trait LeadNotifier: Send + Sync {
    async fn notify(&self, lead: &Lead) -> Result<(), AppError>;
}

/// Message sent for every new lead.
pub fn format_lead_message(lead: &Lead) -> String {
    format!(
        "🆕 НОВАЯ ЗАЯВКА:\nИмя: {}\nТел: {}\nГород: {}\nИсточник: {}\nURL: {}",
        lead.name, lead.phone, lead.city, lead.source, lead.page_url
    )
}

/// Sends lead summaries to a Telegram chat through the Bot API.
pub struct TelegramNotifier {
    client: reqwest::Client,
    /// `{base}/bot{token}/sendMessage`. Contains the token, never log it.
    send_message_url: String,
    chat_id: String,
    breaker: NotifyCircuitBreaker,
}

impl TelegramNotifier {
    /// Creates a new `TelegramNotifier`.
    ///
    /// # Arguments
    ///
    /// * `config` - Bot token, destination chat and client timeout.
    pub fn new(config: &TelegramConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                AppError::ExternalApiError(format!("Failed to create Telegram client: {}", e))
            })?;

        Ok(Self {
            client,
            send_message_url: format!(
                "{}/bot{}/sendMessage",
                config.api_base_url.trim_end_matches('/'),
                config.bot_token
            ),
            chat_id: config.chat_id.clone(),
            breaker: create_notify_circuit_breaker(),
        })
    }

    async fn send_message(&self, text: &str) -> Result<(), AppError> {
        let response = self
            .client
            .post(&self.send_message_url)
            .json(&json!({
                "chat_id": self.chat_id,
                "text": text,
            }))
            .send()
            .await
            .map_err(|e| AppError::from(e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::ExternalApiError(format!(
                "Telegram returned {}: {}",
                status, error_text
            )));
        }

        Ok(())
    }
}

#[async_trait]
impl LeadNotifier for TelegramNotifier {
    async fn notify(&self, lead: &Lead) -> Result<(), AppError> {
        let text = format_lead_message(lead);

        match self.breaker.call(self.send_message(&text)).await {
            Ok(()) => Ok(()),
            Err(failsafe::Error::Rejected) => Err(AppError::ExternalApiError(
                "Telegram circuit open, message dropped".to_string(),
            )),
            Err(failsafe::Error::Inner(e)) => Err(e),
        }
    }
}
