use crate::domain::notification::{PushMessage, PushTicket};
use async_trait::async_trait;
use thiserror::Error;

pub mod expo;

pub use expo::ExpoPushProvider;

#[derive(Error, Debug)]
pub enum PushError {
    #[error("Push request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("Push service rejected the request ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("Malformed push service response: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("Expected {expected} push tickets but received {actual}")]
    TicketMismatch { expected: usize, actual: usize },
    #[error("External service error: {0}")]
    Other(#[from] anyhow::Error),
}

#[async_trait]
pub trait PushProvider: Send + Sync + std::fmt::Debug {
    /// Whether the token has the shape this provider issues.
    fn is_valid_token(&self, token: &str) -> bool;

    /// Largest number of messages accepted by a single `send_batch` call.
    fn max_batch_size(&self) -> usize;

    /// Submits one batch and returns one ticket per message, in submission order.
    ///
    /// # Errors
    /// Returns `PushError` if the batch as a whole could not be delivered to the provider.
    async fn send_batch(&self, messages: &[PushMessage]) -> Result<Vec<PushTicket>, PushError>;
}
