use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::{Json, Router};
use plantbuddy_api::{DeviceState, DeviceStatePatch, Id};

use crate::store::Store;

#[derive(Clone)]
pub struct StoreState {
    pub store: Store,
}

pub fn create_app(store: Store, table: &str) -> Router {
    Router::new()
        .route(
            &format!("/{}/:device_id", table.trim_matches('/')),
            get(get_device_state).patch(update_device_state),
        )
        .with_state(StoreState { store })
}

pub async fn get_device_state(
    State(state): State<StoreState>,
    Path(device_id): Path<Id>,
) -> Result<Json<DeviceState>, StatusCode> {
    state
        .store
        .get(device_id)
        .await
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

pub async fn update_device_state(
    State(state): State<StoreState>,
    Path(device_id): Path<Id>,
    Json(patch): Json<DeviceStatePatch>,
) -> Result<Json<DeviceState>, StatusCode> {
    if patch.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }

    let updated = state
        .store
        .patch(device_id, &patch)
        .await
        .ok_or(StatusCode::NOT_FOUND)?;

    tracing::debug!("Device {} patched with {:?}", device_id, patch);

    Ok(Json(updated))
}
