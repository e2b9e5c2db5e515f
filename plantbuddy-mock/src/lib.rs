use std::error::Error;
use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use plantbuddy_api::{DeviceState, Id};
use rand::Rng;
use time::OffsetDateTime;
use tokio::net::TcpListener;

use crate::app::create_app;
use crate::settings::{Mock, Settings};
use crate::simulate::{PumpEvent, Simulator};
use crate::store::Store;

pub mod app;
pub mod settings;
pub mod simulate;
pub mod store;

pub async fn run(settings: &Arc<Settings>) -> Result<(), Box<dyn Error>> {
    let store = Store::default();
    store
        .insert(settings.device.id, initial_state(settings.device.adc_max))
        .await;

    tokio::spawn(simulate_device(
        store.clone(),
        settings.device.id,
        settings.mock.clone(),
    ));

    let app = create_app(store, &settings.remote.table);

    let ip_addr = settings.mock.host.parse::<IpAddr>()?;
    let address = SocketAddr::from((ip_addr, settings.mock.port));
    let listener = TcpListener::bind(&address).await?;

    tracing::info!(
        "Mock store listening on http://{}/{}/{}",
        address,
        settings.remote.table,
        settings.device.id
    );
    axum::serve(listener, app).await?;

    Ok(())
}

/// Three quarters full, soil moist, pump idle.
pub fn initial_state(adc_max: u16) -> DeviceState {
    DeviceState {
        raw_water_level: i32::from(adc_max) * 3 / 4,
        light_level: 65,
        is_soil_moist: true,
        is_pump_requested: false,
        ..Default::default()
    }
}

async fn simulate_device(store: Store, device_id: Id, mock: Mock) {
    let tick = Duration::from_millis(mock.tick_ms.max(1));
    let watering_ticks = (mock.watering_secs * 1000 / tick.as_millis() as u64).max(1) as u32;
    let mut simulator = Simulator::new(watering_ticks, mock.drain_per_tick);

    let mut interval = tokio::time::interval(tick);
    loop {
        interval.tick().await;

        let jitter = rand::rng().random_range(-3.0..3.0);
        let fraction = day_fraction(OffsetDateTime::now_utc());

        let event = store
            .update_with(device_id, |state| simulator.step(state, fraction, jitter))
            .await;

        match event {
            Some(PumpEvent::Started) => tracing::info!("Pump started for device {}", device_id),
            Some(PumpEvent::Finished) => tracing::info!("Pump finished for device {}", device_id),
            Some(_) => {}
            None => tracing::warn!("Device {} missing from store", device_id),
        }
    }
}

fn day_fraction(now: OffsetDateTime) -> f64 {
    let (hour, minute, second) = now.time().as_hms();
    let seconds_since_midnight =
        u32::from(hour) * 3600 + u32::from(minute) * 60 + u32::from(second);

    seconds_since_midnight as f64 / 86400.0
}
