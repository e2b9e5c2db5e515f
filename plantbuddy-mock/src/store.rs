use std::collections::HashMap;
use std::sync::Arc;

use plantbuddy_api::{DeviceState, DeviceStatePatch, Id};
use tokio::sync::RwLock;

/// In-memory stand-in for the shared device-state table.
#[derive(Clone, Default)]
pub struct Store {
    records: Arc<RwLock<HashMap<Id, DeviceState>>>,
}

impl Store {
    pub async fn insert(&self, id: Id, state: DeviceState) {
        let mut records = self.records.write().await;
        records.insert(id, state);
    }

    pub async fn get(&self, id: Id) -> Option<DeviceState> {
        let records = self.records.read().await;
        records.get(&id).cloned()
    }

    /// Applies a partial update and returns the stored record, or `None` when absent.
    pub async fn patch(&self, id: Id, patch: &DeviceStatePatch) -> Option<DeviceState> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&id)?;
        record.apply(patch);

        Some(record.clone())
    }

    /// Runs `f` on the record under the write lock.
    pub async fn update_with<F, R>(&self, id: Id, f: F) -> Option<R>
    where
        F: FnOnce(&mut DeviceState) -> R,
    {
        let mut records = self.records.write().await;
        records.get_mut(&id).map(f)
    }
}
