mod http;

pub use http::HttpStateClient;

use std::sync::Arc;

use async_trait::async_trait;
use plantbuddy_api::{DeviceState, DeviceStatePatch, Id};

use crate::error::RemoteError;

/// Access to the shared device-state record.
///
/// Every call is independent; a fetch returns the latest stored snapshot with
/// no cross-field transactional guarantee, since the device and other clients
/// write the same record concurrently.
#[async_trait]
pub trait RemoteStateClient: Send + Sync {
    async fn fetch_state(&self, device_id: Id) -> Result<DeviceState, RemoteError>;

    /// Writes the named fields of `patch`; every other field keeps its stored value.
    async fn update_state(
        &self,
        device_id: Id,
        patch: &DeviceStatePatch,
    ) -> Result<(), RemoteError>;
}

#[async_trait]
impl<T: RemoteStateClient + ?Sized> RemoteStateClient for Arc<T> {
    async fn fetch_state(&self, device_id: Id) -> Result<DeviceState, RemoteError> {
        (**self).fetch_state(device_id).await
    }

    async fn update_state(
        &self,
        device_id: Id,
        patch: &DeviceStatePatch,
    ) -> Result<(), RemoteError> {
        (**self).update_state(device_id, patch).await
    }
}
