#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use carchat::intent::DoorCommand;
use carchat::{VehicleApi, VehicleApiError, VoiceApi, VoiceApiError, VoiceResponse};
use serde_json::{json, Value};

pub const VEHICLE_ID: &str = "WDD2221591A123456";

/// `(method, vehicle id)` pairs, shared with the test after the double is boxed.
pub type CallLog = Arc<Mutex<Vec<(String, String)>>>;

/// Vehicle double that records every call and answers with canned JSON.
pub struct RecordingVehicle {
    pub calls: CallLog,
    pub door_status: String,
    pub fail: bool,
    /// Every read answers `{}`.
    pub empty: bool,
}

impl RecordingVehicle {
    pub fn new() -> Self {
        Self {
            calls: CallLog::default(),
            door_status: "INITIATED".to_string(),
            fail: false,
            empty: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub fn answering_empty() -> Self {
        Self {
            empty: true,
            ..Self::new()
        }
    }

    pub fn with_door_status(status: &str) -> Self {
        Self {
            door_status: status.to_string(),
            ..Self::new()
        }
    }

    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().unwrap().clone()
    }

    pub fn log(&self) -> CallLog {
        Arc::clone(&self.calls)
    }

    fn record(&self, method: &str, vehicle_id: &str, answer: Value) -> Result<Value, VehicleApiError> {
        self.calls
            .lock()
            .unwrap()
            .push((method.to_string(), vehicle_id.to_string()));
        if self.fail {
            return Err(VehicleApiError::Status {
                status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                body: "vehicle offline".to_string(),
            });
        }
        if self.empty {
            return Ok(json!({}));
        }
        Ok(answer)
    }
}

pub fn tires_answer() -> Value {
    json!({
        "tirepressurefrontleft": {"value": "230", "unit": "kPa"},
        "tirepressurefrontright": {"value": "231", "unit": "kPa"},
        "tirepressurerearleft": {"value": "240", "unit": "kPa"},
        "tirepressurerearright": {"value": "241", "unit": "kPa"}
    })
}

pub fn doors_answer() -> Value {
    json!({
        "doorstatusfrontleft": {"value": "OPEN"},
        "doorstatusfrontright": {"value": "CLOSED"},
        "doorstatusrearleft": {"value": "OPEN"},
        "doorstatusrearright": {"value": "CLOSED"},
        "doorlockstatusvehicle": {"value": "LOCKED"}
    })
}

#[async_trait]
impl VehicleApi for RecordingVehicle {
    async fn vehicles(&self) -> Result<Value, VehicleApiError> {
        self.record("vehicles", "", json!([{"id": VEHICLE_ID}]))
    }

    async fn vehicle_info(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record("vehicle_info", vehicle_id, json!({"id": vehicle_id}))
    }

    async fn tires_pressure(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record("tires_pressure", vehicle_id, tires_answer())
    }

    async fn doors_status(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record("doors_status", vehicle_id, doors_answer())
    }

    async fn set_doors_status(
        &self,
        vehicle_id: &str,
        command: &DoorCommand,
    ) -> Result<Value, VehicleApiError> {
        let method = format!("set_doors_status:{}", command);
        self.record(&method, vehicle_id, json!({"status": self.door_status}))
    }

    async fn location(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record(
            "location",
            vehicle_id,
            json!({
                "latitude": {"value": 48.7784, "retrievalstatus": "VALID"},
                "longitude": {"value": 9.1800, "retrievalstatus": "VALID"}
            }),
        )
    }

    async fn odometer_info(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record(
            "odometer_info",
            vehicle_id,
            json!({
                "odometer": {"value": 1700, "unit": "KILOMETERS"},
                "distancesincereset": {"value": 1200, "unit": "KILOMETERS"},
                "distancesincestart": {"value": 50, "unit": "KILOMETERS"}
            }),
        )
    }

    async fn fuel_level(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record(
            "fuel_level",
            vehicle_id,
            json!({"fuellevelpercent": {"value": 90, "unit": "PERCENT"}}),
        )
    }

    async fn state_of_charge(&self, vehicle_id: &str) -> Result<Value, VehicleApiError> {
        self.record(
            "state_of_charge",
            vehicle_id,
            json!({"stateofcharge": {"value": 75, "unit": "PERCENT"}}),
        )
    }
}

/// Voice assistant double answering every request with the same JSON.
pub struct CannedVoice {
    pub answer: Option<Value>,
    pub queries: Arc<Mutex<Vec<String>>>,
    pub audio_bytes: Arc<Mutex<Vec<usize>>>,
}

impl CannedVoice {
    pub fn answering(answer: Value) -> Self {
        Self {
            answer: Some(answer),
            queries: Arc::default(),
            audio_bytes: Arc::default(),
        }
    }

    /// Every request fails with a server error.
    pub fn unreachable() -> Self {
        Self {
            answer: None,
            queries: Arc::default(),
            audio_bytes: Arc::default(),
        }
    }

    fn respond(&self) -> Result<VoiceResponse, VoiceApiError> {
        match &self.answer {
            Some(answer) => Ok(VoiceResponse::new(answer.clone())),
            None => Err(VoiceApiError::Status {
                status: reqwest::StatusCode::BAD_GATEWAY,
                body: "upstream down".to_string(),
            }),
        }
    }
}

#[async_trait]
impl VoiceApi for CannedVoice {
    async fn query(&self, text: &str) -> Result<VoiceResponse, VoiceApiError> {
        self.queries.lock().unwrap().push(text.to_string());
        self.respond()
    }

    async fn query_audio(&self, wav: Vec<u8>) -> Result<VoiceResponse, VoiceApiError> {
        self.audio_bytes.lock().unwrap().push(wav.len());
        self.respond()
    }
}

/// A Houndify-shaped answer with a spoken reply and an optional car intent.
pub fn assistant_answer(written: &str, car: Option<Value>) -> Value {
    let mut result = json!({});
    if let Some(car) = car {
        result["car"] = car;
    }
    json!({
        "Status": "OK",
        "AllResults": [{
            "WrittenResponseLong": written,
            "Result": result
        }],
        "Disambiguation": {
            "ChoiceData": [{"Transcription": "what is my fuel level"}]
        }
    })
}
