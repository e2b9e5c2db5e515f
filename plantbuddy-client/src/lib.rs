use std::sync::Arc;

use crate::configs::Settings;
use crate::remote::HttpStateClient;
use crate::session::{SessionConfig, SessionController};
use crate::state::LocalUiState;

pub mod configs;
pub mod error;
pub mod gesture;
pub mod guard;
pub mod normalizer;
pub mod remote;
pub mod scheduler;
pub mod session;
pub mod state;

pub use error::{Error, RemoteError, Result};

/// Runs one headless session until Ctrl-C, logging every state change.
pub async fn run(settings: &Arc<Settings>) -> Result<()> {
    let client = Arc::new(HttpStateClient::new(&settings.remote)?);
    let mut session = SessionController::new(client, SessionConfig::from(settings.as_ref()));
    let mut updates = session.subscribe();

    tracing::info!(
        "Controlling device {} via {}",
        session.device_id(),
        settings.remote.base_url
    );

    session.start();

    let shutdown = tokio::signal::ctrl_c();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => break,
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                render(&updates.borrow_and_update());
            }
        }
    }

    session.stop().await;

    Ok(())
}

fn render(state: &LocalUiState) {
    let button = state.pump_button();

    tracing::info!(
        water = state.water_level_percent,
        light = state.light_intensity_percent,
        soil = state.soil_label(),
        temperature = ?state.temperature,
        humidity = ?state.humidity,
        mode = %state.light_mode,
        pump = button.label,
        "Device state"
    );
}
