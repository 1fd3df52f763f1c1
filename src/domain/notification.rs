use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The resolved title and body of a notification, echoed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationContent {
    pub title: String,
    pub body: String,
}

impl NotificationContent {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self { title: title.into(), body: body.into() }
    }
}

/// One message record as submitted to the push provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PushMessage {
    pub to: String,
    pub sound: &'static str,
    pub title: String,
    pub body: String,
    pub data: Map<String, Value>,
}

impl PushMessage {
    pub fn new(to: impl Into<String>, content: &NotificationContent, data: Map<String, Value>) -> Self {
        Self { to: to.into(), sound: "default", title: content.title.clone(), body: content.body.clone(), data }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TicketStatus {
    Ok,
    Error,
    /// Any status the provider may add later; counted as a failure.
    #[serde(other)]
    Unknown,
}

/// Per-message acknowledgment returned by the provider, in submission order.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct PushTicket {
    pub status: TicketStatus,
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<Value>,
}

impl PushTicket {
    #[must_use]
    pub fn ok(id: impl Into<String>) -> Self {
        Self { status: TicketStatus::Ok, id: Some(id.into()), message: None, details: None }
    }

    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self { status: TicketStatus::Error, id: None, message: Some(message.into()), details: None }
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.status == TicketStatus::Ok
    }
}

/// Aggregated outcome of one fan-out.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Tickets with status `ok`.
    pub delivered: usize,
    /// Tickets with any other status.
    pub failed: usize,
    /// Messages built for tokens that passed the provider's shape check.
    pub attempted: usize,
    /// Tokens removed from the registry for failing the shape check.
    pub evicted: usize,
}

impl DeliveryReport {
    #[must_use]
    pub const fn has_valid_targets(&self) -> bool {
        self.attempted > 0
    }
}
