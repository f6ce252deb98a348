//! Command line / environment settings shared by the CLI and the TUI.

use clap::Args;

use crate::chat::ChatSession;
use crate::constants::{TRYOUT_AUTH_TOKEN, TRYOUT_VEHICLE_ID};
use crate::error::ConfigError;
use crate::vehicle::MercedesClient;
use crate::voice::{HoundifyClient, HoundifyConfig};

#[derive(Args, Debug, Clone)]
pub struct Settings {
    /// Houndify client ID.
    #[arg(long, env = "HOUNDIFY_CLIENT_ID", global = true, hide_env_values = true)]
    pub houndify_client_id: Option<String>,

    /// Houndify client key (URL-safe base64).
    #[arg(long, env = "HOUNDIFY_CLIENT_KEY", global = true, hide_env_values = true)]
    pub houndify_client_key: Option<String>,

    /// User ID sent with every Houndify request.
    #[arg(long, env = "HOUNDIFY_USER_ID", global = true, default_value = "carchat")]
    pub houndify_user_id: String,

    #[arg(long, env = "HOUNDIFY_LATITUDE", global = true, allow_hyphen_values = true)]
    pub latitude: Option<f64>,

    #[arg(long, env = "HOUNDIFY_LONGITUDE", global = true, allow_hyphen_values = true)]
    pub longitude: Option<f64>,

    /// Bearer token for the Mercedes API. Defaults to the tryout sandbox token.
    #[arg(
        long,
        env = "MERCEDES_AUTH_TOKEN",
        global = true,
        hide_env_values = true,
        default_value = TRYOUT_AUTH_TOKEN
    )]
    pub mercedes_auth_token: String,

    /// Vehicle to talk to.
    #[arg(long, env = "VEHICLE_ID", global = true, default_value = TRYOUT_VEHICLE_ID)]
    pub vehicle_id: String,
}

impl Settings {
    pub fn houndify_config(&self) -> Result<HoundifyConfig, ConfigError> {
        let (Some(client_id), Some(client_key)) =
            (&self.houndify_client_id, &self.houndify_client_key)
        else {
            return Err(ConfigError::MissingHoundifyCredentials);
        };

        let mut config = HoundifyConfig::new(
            client_id.clone(),
            client_key.clone(),
            self.houndify_user_id.clone(),
        );
        config.latitude = self.latitude;
        config.longitude = self.longitude;
        Ok(config)
    }

    pub fn voice_client(&self) -> Result<HoundifyClient, ConfigError> {
        Ok(HoundifyClient::new(self.houndify_config()?)?)
    }

    pub fn vehicle_client(&self) -> Result<MercedesClient, ConfigError> {
        Ok(MercedesClient::new(self.mercedes_auth_token.clone())?)
    }

    /// Both clients wired into a session for [`Settings::vehicle_id`].
    pub fn chat_session(&self) -> Result<ChatSession, ConfigError> {
        Ok(ChatSession::new(
            Box::new(self.voice_client()?),
            Box::new(self.vehicle_client()?),
            self.vehicle_id.clone(),
        ))
    }
}
