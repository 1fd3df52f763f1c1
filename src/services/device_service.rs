use crate::domain::device::DeviceToken;
use crate::error::Result;
use crate::storage::device_registry::DeviceRegistry;
use std::collections::BTreeSet;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct DeviceService {
    registry: Arc<DeviceRegistry>,
}

impl DeviceService {
    pub const fn new(registry: Arc<DeviceRegistry>) -> Self {
        Self { registry }
    }

    /// Registers a device, optionally under a user, and returns the total device count.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the token is missing or malformed.
    pub fn register_device(&self, token: &str, user_id: Option<&str>) -> Result<usize> {
        let total = self.registry.register(token, user_id)?;
        match user_id {
            Some(user_id) => tracing::info!(user_id = %user_id, token = %token, "Device registered for user"),
            None => tracing::info!(token = %token, "Device registered (anonymous)"),
        }
        tracing::debug!(total_devices = total, "Registry size");
        Ok(total)
    }

    #[must_use]
    pub fn resolve_targets(&self, user_id: Option<&str>) -> BTreeSet<DeviceToken> {
        self.registry.resolve_targets(user_id)
    }

    #[must_use]
    pub fn device_count(&self) -> usize {
        self.registry.device_count()
    }

    #[must_use]
    pub fn devices(&self) -> Vec<DeviceToken> {
        self.registry.devices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_reads_through_to_registry() {
        let registry = Arc::new(DeviceRegistry::new());
        let service = DeviceService::new(Arc::clone(&registry));

        assert_eq!(service.register_device("ExponentPushToken[a]", Some("u1")).unwrap(), 1);
        assert_eq!(service.register_device("ExponentPushToken[b]", None).unwrap(), 2);

        assert_eq!(service.device_count(), registry.device_count());
        assert_eq!(service.devices(), vec!["ExponentPushToken[a]".to_string(), "ExponentPushToken[b]".to_string()]);
        assert_eq!(service.resolve_targets(Some("u1")).len(), 1);
        assert!(service.register_device("", None).is_err());
    }
}
