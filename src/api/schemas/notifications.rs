use crate::domain::notification::{DeliveryReport, NotificationContent};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const DEFAULT_TITLE: &str = "Notification";
pub const DEFAULT_BODY: &str = "Event triggered";
pub const APPWIDE_TITLE: &str = "📢 Announcement";
pub const APPWIDE_BODY: &str = "Important update!";
pub const PREMIUM_TITLE: &str = "⭐ Premium Message";
pub const PERSONAL_TITLE: &str = "Hey there!";

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Broadcast payload. Any field beyond the named ones is kept, in the order the
/// client sent it, as a fallback source for the body.
#[derive(Debug, Default, Deserialize)]
pub struct SendNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub text: Option<String>,
    pub color: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SendNotificationRequest {
    /// Resolves the title and body.
    ///
    /// The body is the first non-empty of `message`, `text` and `color`, then the
    /// first non-empty string among the remaining fields, then a fixed default.
    pub fn content(&self) -> NotificationContent {
        let title = non_empty(self.title.as_deref()).unwrap_or(DEFAULT_TITLE);
        let body = [&self.message, &self.text, &self.color]
            .into_iter()
            .find_map(|field| non_empty(field.as_deref()))
            .or_else(|| self.extra.values().find_map(|v| non_empty(v.as_str())))
            .unwrap_or(DEFAULT_BODY);

        NotificationContent::new(title, body)
    }

    pub fn data(&self) -> Map<String, Value> {
        let mut data = Map::new();
        if let Some(color) = &self.color {
            data.insert("color".into(), Value::from(color.as_str()));
        }
        if let Some(message) = &self.message {
            data.insert("message".into(), Value::from(message.as_str()));
        }
        data
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct AppwideNotificationRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    pub text: Option<String>,
}

impl AppwideNotificationRequest {
    pub fn content(&self) -> NotificationContent {
        let title = non_empty(self.title.as_deref()).unwrap_or(APPWIDE_TITLE);
        let body = non_empty(self.message.as_deref())
            .or_else(|| non_empty(self.text.as_deref()))
            .unwrap_or(APPWIDE_BODY);

        NotificationContent::new(title, body)
    }

    pub fn data() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("type".into(), Value::from("appwide"));
        data
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersonalizedNotificationRequest {
    pub user_id: Option<String>,
    pub username: Option<String>,
    pub is_premium: Option<bool>,
    pub message: Option<String>,
}

impl PersonalizedNotificationRequest {
    /// Validates the payload and returns the target user.
    ///
    /// # Errors
    /// Returns an error if `userId` is missing or empty.
    pub fn validate(&self) -> Result<&str, String> {
        non_empty(self.user_id.as_deref()).ok_or_else(|| "userId is required".to_string())
    }

    pub fn content(&self) -> NotificationContent {
        let title = if self.is_premium.unwrap_or(false) { PREMIUM_TITLE } else { PERSONAL_TITLE };
        let body = non_empty(self.message.as_deref()).map_or_else(
            || format!("Hey {}, thanks for clicking!", non_empty(self.username.as_deref()).unwrap_or("there")),
            str::to_owned,
        );

        NotificationContent::new(title, body)
    }

    pub fn data(&self, user_id: &str) -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("userId".into(), Value::from(user_id));
        if let Some(username) = &self.username {
            data.insert("username".into(), Value::from(username.as_str()));
        }
        if let Some(is_premium) = self.is_premium {
            data.insert("isPremium".into(), Value::from(is_premium));
        }
        data.insert("type".into(), Value::from("personalized"));
        data
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationResponse {
    pub success: bool,
    pub message: String,
    pub devices_notified: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notification: Option<NotificationContent>,
}

impl SendNotificationResponse {
    /// Nothing was sent; the request is still considered successful.
    pub fn queued(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            devices_notified: 0,
            errors: None,
            user_id: None,
            username: None,
            notification: None,
        }
    }

    pub fn sent(message: impl Into<String>, report: &DeliveryReport, content: NotificationContent) -> Self {
        Self {
            success: true,
            message: message.into(),
            devices_notified: report.delivered,
            errors: Some(report.failed),
            user_id: None,
            username: None,
            notification: Some(content),
        }
    }

    #[must_use]
    pub fn for_user(mut self, user_id: &str, username: Option<String>) -> Self {
        self.user_id = Some(user_id.to_owned());
        self.username = username;
        self
    }
}
