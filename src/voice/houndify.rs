//! Houndify client with request signing.
//!
//! Each request is authenticated with an HMAC-SHA256 signature over the user
//! id, a fresh request id and the current unix time, keyed with the
//! (base64url encoded) client key issued by the Houndify console.

use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE;
use base64::Engine;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use sha2::Sha256;
use std::time::Duration;
use tracing::{debug, error, instrument, warn};
use uuid::Uuid;

use super::{VoiceApi, VoiceResponse, DAILY_LIMIT_MARKER};
use crate::constants;
use crate::error::VoiceApiError;

type HmacSha256 = Hmac<Sha256>;

#[derive(Debug, Clone)]
pub struct HoundifyConfig {
    pub client_id: String,
    /// Client key as shown in the Houndify console (base64url).
    pub client_key: String,
    pub user_id: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub base_url: String,
}

impl HoundifyConfig {
    pub fn new(client_id: impl Into<String>, client_key: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_key: client_key.into(),
            user_id: user_id.into(),
            latitude: None,
            longitude: None,
            base_url: constants::HOUNDIFY_API_URL.clone(),
        }
    }
}

pub struct HoundifyClient {
    client: Client,
    config: HoundifyConfig,
    key: Vec<u8>,
}

/// `base64url(HMAC-SHA256(key, "<user_id>;<request_id><timestamp>"))`
pub fn sign(key: &[u8], user_id: &str, request_id: &str, timestamp: i64) -> String {
    let mut mac = HmacSha256::new_from_slice(key).expect("HMAC accepts keys of any length");
    mac.update(format!("{};{}{}", user_id, request_id, timestamp).as_bytes());
    URL_SAFE.encode(mac.finalize().into_bytes())
}

impl HoundifyClient {
    pub fn new(config: HoundifyConfig) -> Result<Self, VoiceApiError> {
        let key = URL_SAFE.decode(config.client_key.trim())?;
        let client = Client::builder()
            .timeout(Duration::from_secs(*constants::REQUEST_TIMEOUT_SECS))
            .build()
            .map_err(VoiceApiError::Transport)?;
        Ok(Self {
            client,
            config: HoundifyConfig {
                base_url: config.base_url.trim_end_matches('/').to_string(),
                ..config
            },
            key,
        })
    }

    fn request_info(&self, request_id: &str, timestamp: i64) -> Value {
        let mut info = json!({
            "ClientID": self.config.client_id,
            "UserID": self.config.user_id,
            "RequestID": request_id,
            "TimeStamp": timestamp,
        });
        if let (Some(lat), Some(lon)) = (self.config.latitude, self.config.longitude) {
            info["Latitude"] = json!(lat);
            info["Longitude"] = json!(lon);
        }
        info
    }

    /// Adds the three Houndify headers for a new request.
    fn signed(&self, request: RequestBuilder) -> RequestBuilder {
        let request_id = Uuid::new_v4().to_string();
        let timestamp = Utc::now().timestamp();
        let signature = sign(&self.key, &self.config.user_id, &request_id, timestamp);

        request
            .header(
                "Hound-Request-Authentication",
                format!("{};{}", self.config.user_id, request_id),
            )
            .header(
                "Hound-Client-Authentication",
                format!("{};{};{}", self.config.client_id, timestamp, signature),
            )
            .header(
                "Hound-Request-Info",
                self.request_info(&request_id, timestamp).to_string(),
            )
    }

    async fn send(request: RequestBuilder) -> Result<VoiceResponse, VoiceApiError> {
        let response = request.send().await.map_err(VoiceApiError::Transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error body".to_string());
            // Quota exhaustion comes back as an error status; report it the
            // way a regular answer would so the chat can tell the user.
            if body.contains(DAILY_LIMIT_MARKER) {
                warn!(%status, "Houndify daily limit reached");
                return Ok(VoiceResponse::new(json!({ "Error": body })));
            }
            error!(%status, %body, "Houndify request failed");
            return Err(VoiceApiError::Status { status, body });
        }

        let raw = response
            .json::<Value>()
            .await
            .map_err(VoiceApiError::Decode)?;
        debug!(response = %raw, "Received Houndify response");
        Ok(VoiceResponse::new(raw))
    }
}

#[async_trait]
impl VoiceApi for HoundifyClient {
    #[instrument(skip(self))]
    async fn query(&self, text: &str) -> Result<VoiceResponse, VoiceApiError> {
        let url = format!("{}/v1/text", self.config.base_url);
        let request = self.signed(self.client.get(&url).query(&[("query", text)]));
        Self::send(request).await
    }

    #[instrument(skip(self, wav), fields(bytes = wav.len()))]
    async fn query_audio(&self, wav: Vec<u8>) -> Result<VoiceResponse, VoiceApiError> {
        let url = format!("{}/v1/audio", self.config.base_url);
        let request = self.signed(
            self.client
                .post(&url)
                .header("Content-Type", "audio/wav")
                .body(wav),
        );
        Self::send(request).await
    }
}
