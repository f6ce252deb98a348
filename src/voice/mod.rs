//! Voice assistant access: plain text queries, recorded speech, and the JSON
//! answer both of them produce.

pub mod houndify;
pub mod speech;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::VoiceApiError;
use crate::intent::Intent;

pub use houndify::{HoundifyClient, HoundifyConfig};
pub use speech::{SpeechConfig, SpeechSession};

/// Marker Houndify puts into `Error` once the daily request budget is spent.
pub const DAILY_LIMIT_MARKER: &str = "Over daily limit";

#[async_trait]
pub trait VoiceApi: Send + Sync {
    /// Asks the assistant a typed question.
    async fn query(&self, text: &str) -> Result<VoiceResponse, VoiceApiError>;
    /// Asks the assistant a spoken question, `wav` being a complete WAV file.
    async fn query_audio(&self, wav: Vec<u8>) -> Result<VoiceResponse, VoiceApiError>;
}

/// Answer of the voice assistant. Only a handful of fields are of interest,
/// the rest of the document is kept around for logging.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct VoiceResponse(Value);

impl VoiceResponse {
    pub fn new(raw: Value) -> Self {
        VoiceResponse(raw)
    }

    pub fn raw(&self) -> &Value {
        &self.0
    }

    fn text_at(&self, pointer: &str) -> Option<&str> {
        self.0.pointer(pointer).and_then(Value::as_str)
    }

    /// Full sentence answer, shown to the user.
    pub fn written_response_long(&self) -> Option<&str> {
        self.text_at("/AllResults/0/WrittenResponseLong")
    }

    /// Short answer, shown when there is no long one.
    pub fn written_response(&self) -> Option<&str> {
        self.text_at("/AllResults/0/WrittenResponse")
    }

    /// Vehicle intent of the first result, if the request was about the car.
    pub fn car_intent(&self) -> Option<Intent> {
        self.0
            .pointer("/AllResults/0/Result/car")
            .map(Intent::from_value)
    }

    /// What the assistant understood from a spoken request.
    pub fn transcription(&self) -> Option<&str> {
        self.text_at("/Disambiguation/ChoiceData/0/Transcription")
    }

    pub fn error(&self) -> Option<&str> {
        self.text_at("/Error")
    }

    pub fn quota_exceeded(&self) -> bool {
        self.error()
            .map(|e| e.contains(DAILY_LIMIT_MARKER))
            .unwrap_or(false)
    }
}
