use async_trait::async_trait;
use plantbuddy_api::{DeviceState, DeviceStatePatch, Id};
use reqwest::{Response, StatusCode};

use crate::configs::Remote;
use crate::error::RemoteError;

use super::RemoteStateClient;

/// REST client for a store exposing one JSON record per device at
/// `{base_url}/{table}/{id}`.
pub struct HttpStateClient {
    http_client: reqwest::Client,
    base_url: String,
    table: String,
}

impl HttpStateClient {
    pub fn new(remote: &Remote) -> Result<Self, RemoteError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = remote.timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            http_client: builder.build()?,
            base_url: remote.base_url.trim_end_matches('/').to_string(),
            table: remote.table.clone(),
        })
    }

    fn record_url(&self, device_id: Id) -> String {
        format!("{}/{}/{}", self.base_url, self.table, device_id)
    }

    fn check_status(response: Response, device_id: Id) -> Result<Response, RemoteError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(RemoteError::NotFound(device_id)),
            StatusCode::CONFLICT => Err(RemoteError::Conflict),
            status => Err(RemoteError::network(format!(
                "Unexpected status {} for device {}",
                status, device_id
            ))),
        }
    }
}

#[async_trait]
impl RemoteStateClient for HttpStateClient {
    async fn fetch_state(&self, device_id: Id) -> Result<DeviceState, RemoteError> {
        let response = self.http_client.get(self.record_url(device_id)).send().await?;
        let response = Self::check_status(response, device_id)?;

        response
            .json::<DeviceState>()
            .await
            .map_err(|e| RemoteError::network(format!("Invalid device state body: {}", e)))
    }

    async fn update_state(
        &self,
        device_id: Id,
        patch: &DeviceStatePatch,
    ) -> Result<(), RemoteError> {
        let response = self
            .http_client
            .patch(self.record_url(device_id))
            .json(patch)
            .send()
            .await?;
        Self::check_status(response, device_id)?;

        tracing::debug!("Updated device {} with {:?}", device_id, patch);

        Ok(())
    }
}
