//! Client for the Mercedes-Benz Connected Vehicle API.
//!
//! Every endpoint answers with a small JSON document whose shape depends on
//! the vehicle part. Bodies are handed back untouched as [`serde_json::Value`];
//! turning them into sentences is the job of [`crate::formatter`].

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, error, instrument};

use crate::constants;
use crate::error::VehicleApiError;
use crate::intent::DoorCommand;

pub type Result<T> = std::result::Result<T, VehicleApiError>;

/// Operations offered by the vehicle API. Each takes the vehicle id and
/// returns the raw JSON answer.
#[async_trait]
pub trait VehicleApi: Send + Sync {
    /// Vehicles visible to the current token.
    async fn vehicles(&self) -> Result<Value>;
    async fn vehicle_info(&self, vehicle_id: &str) -> Result<Value>;
    async fn tires_pressure(&self, vehicle_id: &str) -> Result<Value>;
    async fn doors_status(&self, vehicle_id: &str) -> Result<Value>;
    /// Locks or unlocks the doors. The answer only says whether the command
    /// was accepted (`{"status": "INITIATED"}`), not whether it completed.
    async fn set_doors_status(&self, vehicle_id: &str, command: &DoorCommand) -> Result<Value>;
    async fn location(&self, vehicle_id: &str) -> Result<Value>;
    async fn odometer_info(&self, vehicle_id: &str) -> Result<Value>;
    async fn fuel_level(&self, vehicle_id: &str) -> Result<Value>;
    async fn state_of_charge(&self, vehicle_id: &str) -> Result<Value>;
}

/// Bearer-token authenticated HTTP implementation of [`VehicleApi`].
pub struct MercedesClient {
    client: Client,
    base_url: String,
    auth_token: String,
}

impl MercedesClient {
    /// Client against the configured API endpoint.
    pub fn new(auth_token: impl Into<String>) -> Result<Self> {
        Self::with_base_url(auth_token, constants::MERCEDES_API_URL.as_str())
    }

    pub fn with_base_url(auth_token: impl Into<String>, base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(*constants::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(VehicleApiError::Transport)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token: auth_token.into(),
        })
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        request
            .header("Accept", "application/json")
            .bearer_auth(&self.auth_token)
    }

    async fn get(&self, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "GET vehicle API");
        let request = self.authorized(self.client.get(&url));
        Self::send(request).await
    }

    async fn send(request: RequestBuilder) -> Result<Value> {
        let response = request.send().await.map_err(VehicleApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            error!(%status, %body, "Vehicle API request failed");
            return Err(VehicleApiError::Status { status, body });
        }

        response.json::<Value>().await.map_err(VehicleApiError::Decode)
    }
}

#[async_trait]
impl VehicleApi for MercedesClient {
    #[instrument(skip(self))]
    async fn vehicles(&self) -> Result<Value> {
        self.get("/vehicles").await
    }

    #[instrument(skip(self))]
    async fn vehicle_info(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn tires_pressure(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/tires", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn doors_status(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/doors", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn set_doors_status(&self, vehicle_id: &str, command: &DoorCommand) -> Result<Value> {
        let url = format!("{}/vehicles/{}/doors", self.base_url, vehicle_id);
        debug!(%url, %command, "POST door command");
        let request = self
            .authorized(self.client.post(&url))
            .json(&json!({ "command": command }));
        Self::send(request).await
    }

    #[instrument(skip(self))]
    async fn location(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/location", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn odometer_info(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/odometer", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn fuel_level(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/fuel", vehicle_id)).await
    }

    #[instrument(skip(self))]
    async fn state_of_charge(&self, vehicle_id: &str) -> Result<Value> {
        self.get(&format!("/vehicles/{}/stateofcharge", vehicle_id))
            .await
    }
}
