use crate::domain::device::{DeviceToken, UserId, validate_token};
use crate::error::{AppError, Result};
use std::collections::{BTreeSet, HashMap};
use std::sync::{Mutex, MutexGuard, PoisonError};

#[derive(Debug, Default)]
struct Registrations {
    devices: BTreeSet<DeviceToken>,
    by_user: HashMap<UserId, BTreeSet<DeviceToken>>,
}

/// In-memory registry of device tokens, optionally grouped by user.
///
/// Both collections sit behind one mutex so a token is never visible in a
/// user's set while missing from the global set. The lock is only held for the
/// duration of a single call.
#[derive(Debug, Default)]
pub struct DeviceRegistry {
    inner: Mutex<Registrations>,
}

impl DeviceRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // Every operation leaves both sets consistent, so a poisoned lock is safe to reuse.
    fn lock(&self) -> MutexGuard<'_, Registrations> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Adds a token to the global set and, when given, to the user's set.
    /// Returns the number of registered devices afterwards.
    ///
    /// # Errors
    /// Returns `AppError::BadRequest` if the token is empty or too long.
    pub fn register(&self, token: &str, user_id: Option<&str>) -> Result<usize> {
        validate_token(token).map_err(AppError::BadRequest)?;

        let mut inner = self.lock();
        inner.devices.insert(token.to_owned());
        if let Some(user_id) = user_id {
            inner.by_user.entry(user_id.to_owned()).or_default().insert(token.to_owned());
        }
        Ok(inner.devices.len())
    }

    /// Returns every registered token, or only the given user's tokens.
    /// Unknown users resolve to an empty set.
    #[must_use]
    pub fn resolve_targets(&self, user_id: Option<&str>) -> BTreeSet<DeviceToken> {
        let inner = self.lock();
        match user_id {
            None => inner.devices.clone(),
            Some(user_id) => inner.by_user.get(user_id).cloned().unwrap_or_default(),
        }
    }

    /// Removes a token from the global set and, when given, from the user's set.
    /// Returns whether the token was present anywhere.
    pub fn evict(&self, token: &str, user_id: Option<&str>) -> bool {
        let mut inner = self.lock();
        let mut removed = inner.devices.remove(token);
        if let Some(user_id) = user_id
            && let Some(tokens) = inner.by_user.get_mut(user_id)
        {
            removed |= tokens.remove(token);
        }
        removed
    }

    #[must_use]
    pub fn device_count(&self) -> usize {
        self.lock().devices.len()
    }

    /// Snapshot of all registered tokens in sorted order.
    #[must_use]
    pub fn devices(&self) -> Vec<DeviceToken> {
        self.lock().devices.iter().cloned().collect()
    }
}
