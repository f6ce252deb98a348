use thiserror::Error;

/// Failures talking to the vehicle telemetry/control API.
#[derive(Error, Debug)]
pub enum VehicleApiError {
    #[error("vehicle API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("vehicle API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("vehicle API response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),
}

/// Failures talking to the voice assistant API.
///
/// Quota exhaustion is not in here: Houndify reports it inside a regular
/// response body, see [`crate::voice::VoiceResponse::quota_exceeded`].
#[derive(Error, Debug)]
pub enum VoiceApiError {
    #[error("voice API request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("voice API returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("voice API response is not valid JSON: {0}")]
    Decode(#[source] reqwest::Error),

    #[error("Houndify client key is not valid base64: {0}")]
    InvalidClientKey(#[from] base64::DecodeError),
}

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Unsupported WAV file: {0}")]
    UnsupportedWav(String),

    #[error("Audio device error: {0}")]
    Device(String),
}

/// Settings that do not add up to working clients.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Houndify credentials missing: set HOUNDIFY_CLIENT_ID and HOUNDIFY_CLIENT_KEY")]
    MissingHoundifyCredentials,

    #[error(transparent)]
    Voice(#[from] VoiceApiError),

    #[error(transparent)]
    Vehicle(#[from] VehicleApiError),
}
