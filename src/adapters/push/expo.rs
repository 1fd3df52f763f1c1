use crate::adapters::push::{PushError, PushProvider};
use crate::config::ExpoConfig;
use crate::domain::notification::{PushMessage, PushTicket};
use async_trait::async_trait;
use reqwest::{Client, header};
use serde::Deserialize;
use std::time::Duration;

/// Maximum number of messages Expo accepts per push request.
pub const PUSH_NOTIFICATION_CHUNK_LIMIT: usize = 100;

const SEND_PATH: &str = "/--/api/v2/push/send";

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    data: Option<Vec<PushTicket>>,
    #[serde(default)]
    errors: Option<Vec<ApiError>>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    code: Option<String>,
    message: String,
}

/// Client for the Expo push service.
#[derive(Debug, Clone)]
pub struct ExpoPushProvider {
    client: Client,
    send_url: String,
    access_token: Option<String>,
}

impl ExpoPushProvider {
    /// Builds a provider from configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &ExpoConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            send_url: format!("{}{SEND_PATH}", config.base_url.trim_end_matches('/')),
            access_token: config.access_token.clone().filter(|t| !t.is_empty()),
        })
    }
}

#[async_trait]
impl PushProvider for ExpoPushProvider {
    fn is_valid_token(&self, token: &str) -> bool {
        is_expo_push_token(token)
    }

    fn max_batch_size(&self) -> usize {
        PUSH_NOTIFICATION_CHUNK_LIMIT
    }

    #[tracing::instrument(level = "debug", skip_all, fields(batch_size = messages.len()), err)]
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError> {
        let mut request = self.client.post(&self.send_url).header(header::ACCEPT, "application/json").json(messages);
        if let Some(token) = &self.access_token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        let parsed = serde_json::from_str::<SendResponse>(&text);

        if let Ok(SendResponse { errors: Some(errors), .. }) = &parsed
            && !errors.is_empty()
        {
            let message = errors
                .iter()
                .map(|e| match &e.code {
                    Some(code) => format!("{code}: {}", e.message),
                    None => e.message.clone(),
                })
                .collect::<Vec<_>>()
                .join("; ");
            return Err(PushError::Api { status: status.as_u16(), message });
        }

        if !status.is_success() {
            return Err(PushError::Api { status: status.as_u16(), message: text });
        }

        let tickets = parsed?
            .data
            .ok_or_else(|| anyhow::anyhow!("Push service response did not contain a ticket list"))?;

        if tickets.len() != messages.len() {
            return Err(PushError::TicketMismatch { expected: messages.len(), actual: tickets.len() });
        }

        Ok(tickets)
    }
}

/// Whether `token` looks like a token issued by Expo.
#[must_use]
pub fn is_expo_push_token(token: &str) -> bool {
    let bracketed = (token.starts_with("ExponentPushToken[") || token.starts_with("ExpoPushToken["))
        && token.ends_with(']');
    bracketed || is_uuid_shaped(token)
}

fn is_uuid_shaped(token: &str) -> bool {
    const GROUPS: [usize; 5] = [8, 4, 4, 4, 12];
    let parts: Vec<&str> = token.split('-').collect();
    parts.len() == GROUPS.len()
        && parts
            .iter()
            .zip(GROUPS)
            .all(|(part, len)| part.len() == len && part.bytes().all(|b| b.is_ascii_alphanumeric()))
}
