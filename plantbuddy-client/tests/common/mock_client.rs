use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use plantbuddy_api::{DeviceState, DeviceStatePatch, Id};
use plantbuddy_client::RemoteError;
use plantbuddy_client::remote::RemoteStateClient;
use tokio::sync::Notify;

/// Scripted in-memory store for a single device.
pub struct MockStateClient {
    pub device_id: Id,
    state: Mutex<DeviceState>,
    fetch_failures: Mutex<VecDeque<RemoteError>>,
    update_failures: Mutex<VecDeque<RemoteError>>,
    fetch_gate: Mutex<Option<Arc<Notify>>>,
    update_gate: Mutex<Option<Arc<Notify>>>,
    fetch_calls: AtomicUsize,
    update_calls: AtomicUsize,
    patches: Mutex<Vec<DeviceStatePatch>>,
}

impl MockStateClient {
    pub fn new(device_id: Id, state: DeviceState) -> Arc<Self> {
        Arc::new(Self {
            device_id,
            state: Mutex::new(state),
            fetch_failures: Mutex::new(VecDeque::new()),
            update_failures: Mutex::new(VecDeque::new()),
            fetch_gate: Mutex::new(None),
            update_gate: Mutex::new(None),
            fetch_calls: AtomicUsize::new(0),
            update_calls: AtomicUsize::new(0),
            patches: Mutex::new(Vec::new()),
        })
    }

    pub fn stored(&self) -> DeviceState {
        self.state.lock().unwrap().clone()
    }

    /// Simulates a write by another actor (the device, another client).
    pub fn external_write(&self, patch: DeviceStatePatch) {
        self.state.lock().unwrap().apply(&patch);
    }

    pub fn fail_next_fetches(&self, count: usize, error: RemoteError) {
        let mut failures = self.fetch_failures.lock().unwrap();
        for _ in 0..count {
            failures.push_back(error.clone());
        }
    }

    pub fn fail_next_update(&self, error: RemoteError) {
        self.update_failures.lock().unwrap().push_back(error);
    }

    /// Holds every following fetch until the returned gate is notified.
    pub fn gate_fetches(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.fetch_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    /// Holds every following update until the returned gate is notified.
    pub fn gate_updates(&self) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        *self.update_gate.lock().unwrap() = Some(Arc::clone(&gate));
        gate
    }

    pub fn open_gates(&self) {
        self.fetch_gate.lock().unwrap().take();
        self.update_gate.lock().unwrap().take();
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn patches(&self) -> Vec<DeviceStatePatch> {
        self.patches.lock().unwrap().clone()
    }
}

#[async_trait]
impl RemoteStateClient for MockStateClient {
    async fn fetch_state(&self, device_id: Id) -> Result<DeviceState, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.fetch_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(error) = self.fetch_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        if device_id != self.device_id {
            return Err(RemoteError::NotFound(device_id));
        }

        Ok(self.stored())
    }

    async fn update_state(
        &self,
        device_id: Id,
        patch: &DeviceStatePatch,
    ) -> Result<(), RemoteError> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);

        let gate = self.update_gate.lock().unwrap().clone();
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if let Some(error) = self.update_failures.lock().unwrap().pop_front() {
            return Err(error);
        }
        if device_id != self.device_id {
            return Err(RemoteError::NotFound(device_id));
        }

        self.patches.lock().unwrap().push(patch.clone());
        self.state.lock().unwrap().apply(patch);

        Ok(())
    }
}
