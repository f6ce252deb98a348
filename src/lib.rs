pub mod audio;
pub mod chat;
pub mod config;
pub mod constants;
pub mod error;
pub mod formatter;
pub mod intent;
pub mod router;
pub mod vehicle;
pub mod voice;

pub use chat::{ask_vehicle, ChatLine, ChatSession, ChatSink, PrintSink, Role};
pub use config::Settings;
pub use error::{AudioError, ConfigError, VehicleApiError, VoiceApiError};
pub use intent::{Category, DoorCommand, Intent};
pub use router::{route, RouteOutcome};
pub use vehicle::{MercedesClient, VehicleApi};
pub use voice::{HoundifyClient, HoundifyConfig, VoiceApi, VoiceResponse};
