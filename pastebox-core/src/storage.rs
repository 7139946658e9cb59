use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::StoreError;
use crate::store::Store;

/// The contract a paste backend offers to the layers above it.
///
/// HTTP handlers and similar collaborators should depend on this trait rather
/// than on [`Store`] so another backend can be swapped in. The methods are
/// generic, so use it as a bound (`S: Storage`) rather than as `dyn Storage`.
pub trait Storage: Send + Sync {
    /// Stores `payload` until `expires_at` (epoch seconds) and returns its new identifier
    fn store<T>(&self, payload: &T, expires_at: i64) -> Result<String, StoreError>
    where
        T: Serialize + ?Sized;

    /// Returns the live payload stored under `id`
    fn fetch<T>(&self, id: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned;

    /// Removes the payload stored under `id`, if any.
    ///
    /// Removal cannot fail: implementations must treat an unknown or expired
    /// `id` as a no-op, never as an error. The return value only reports
    /// whether something was physically removed and callers may ignore it.
    fn remove(&self, id: &str) -> bool;
}

impl Storage for Store {
    fn store<T>(&self, payload: &T, expires_at: i64) -> Result<String, StoreError>
    where
        T: Serialize + ?Sized,
    {
        Store::store(self, payload, expires_at)
    }

    fn fetch<T>(&self, id: &str) -> Result<T, StoreError>
    where
        T: DeserializeOwned,
    {
        Store::fetch(self, id)
    }

    fn remove(&self, id: &str) -> bool {
        Store::remove(self, id)
    }
}
