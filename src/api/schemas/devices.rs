use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceRequest {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
}

impl RegisterDeviceRequest {
    /// The owning user, treating an empty id as anonymous.
    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterDeviceResponse {
    pub success: bool,
    pub message: String,
    pub total_devices: usize,
    pub user_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DevicesResponse {
    pub count: usize,
    pub devices: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_user_id_is_anonymous() {
        let req: RegisterDeviceRequest = serde_json::from_str(r#"{"token":"t","userId":""}"#).unwrap();
        assert_eq!(req.user_id(), None);
    }

    #[test]
    fn test_missing_token_deserializes() {
        let req: RegisterDeviceRequest = serde_json::from_str(r#"{"userId":"u1"}"#).unwrap();
        assert!(req.token.is_none());
        assert_eq!(req.user_id(), Some("u1"));
    }
}
