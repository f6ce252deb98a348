// API endpoints and sandbox defaults, each overridable from the environment.

use std::env;
use std::str::FromStr;

/// Reads `name` from the environment, falling back to `default` when it is
/// unset or does not parse.
pub fn env_or<T: FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

lazy_static::lazy_static! {
    pub static ref MERCEDES_API_URL: String = env::var("MERCEDES_API_URL")
        .unwrap_or_else(|_| "https://api.mercedes-benz.com/experimental/connectedvehicle_tryout/v1".to_string());
    pub static ref HOUNDIFY_API_URL: String = env::var("HOUNDIFY_API_URL")
        .unwrap_or_else(|_| "https://api.houndify.com".to_string());
    pub static ref REQUEST_TIMEOUT_SECS: u64 = env_or("CARCHAT_REQUEST_TIMEOUT_SECS", 30);

    // End-of-utterance detection for spoken requests.
    pub static ref SPEECH_THRESHOLD: f64 = env_or("CARCHAT_SPEECH_THRESHOLD", 500.0);
    pub static ref TRAILING_SILENCE_MS: u64 = env_or("CARCHAT_TRAILING_SILENCE_MS", 1200);
    pub static ref MAX_UTTERANCE_SECS: u64 = env_or("CARCHAT_MAX_UTTERANCE_SECS", 10);
}

/// Access token accepted by the Mercedes-Benz tryout sandbox.
pub const TRYOUT_AUTH_TOKEN: &str = "a1b2c3d4-a1b2-a1b2-a1b2-a1b2c3d4e5f6";
/// Vehicle id known to the Mercedes-Benz tryout sandbox.
pub const TRYOUT_VEHICLE_ID: &str = "1234567890ABCD1234";

pub const GREETING: &str = "How can I help you?";
