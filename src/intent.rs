//! Vehicle intents as extracted by the voice assistant.
//!
//! Houndify hands back the car-related part of a parsed request as a small
//! JSON object such as `{"tires": "information"}` or `{"doors": "LOCK"}`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

/// Value used by every category for a read-only request.
pub const INFORMATION: &str = "information";

/// The vehicle parts the assistant knows how to talk about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Tires,
    Doors,
    Location,
    Odometer,
    Fuel,
    Charge,
}

impl Category {
    /// Key of this category inside an intent payload.
    pub fn key(self) -> &'static str {
        match self {
            Category::Tires => "tires",
            Category::Doors => "doors",
            Category::Location => "location",
            Category::Odometer => "odometer",
            Category::Fuel => "fuel",
            Category::Charge => "charge",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown vehicle part '{}' (expected one of tires, doors, location, odometer, fuel, charge)",
            self.0
        )
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tires" => Ok(Category::Tires),
            "doors" => Ok(Category::Doors),
            "location" => Ok(Category::Location),
            "odometer" => Ok(Category::Odometer),
            "fuel" => Ok(Category::Fuel),
            "charge" => Ok(Category::Charge),
            other => Err(UnknownCategory(other.to_string())),
        }
    }
}

/// Door lock directive, the only command that changes vehicle state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DoorCommand {
    Lock,
    Unlock,
    /// Anything else the assistant produced. Forwarded verbatim, the vendor
    /// API decides what to do with it.
    Other(String),
}

impl DoorCommand {
    pub fn as_str(&self) -> &str {
        match self {
            DoorCommand::Lock => "LOCK",
            DoorCommand::Unlock => "UNLOCK",
            DoorCommand::Other(raw) => raw,
        }
    }
}

impl From<&str> for DoorCommand {
    fn from(raw: &str) -> Self {
        match raw {
            "LOCK" => DoorCommand::Lock,
            "UNLOCK" => DoorCommand::Unlock,
            other => DoorCommand::Other(other.to_string()),
        }
    }
}

impl fmt::Display for DoorCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for DoorCommand {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A parsed car intent. Only the keys named by [`Category`] are meaningful.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Intent(Map<String, Value>);

impl Intent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder used mostly by tests and the CLI shortcuts.
    pub fn with(mut self, category: Category, value: &str) -> Self {
        self.0
            .insert(category.key().to_string(), Value::String(value.to_string()));
        self
    }

    /// Interprets an arbitrary JSON value as an intent. Anything that is not
    /// an object yields an empty intent.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Intent(map.clone()),
            _ => Intent::default(),
        }
    }

    pub fn contains(&self, category: Category) -> bool {
        self.0.contains_key(category.key())
    }

    /// String value stored under `category`. Non-string values read as `None`.
    pub fn value(&self, category: Category) -> Option<&str> {
        self.0.get(category.key()).and_then(Value::as_str)
    }

    /// Categories present in this intent, in no particular order.
    pub fn categories(&self) -> Vec<Category> {
        self.0.keys().filter_map(|k| k.parse().ok()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Map<String, Value>> for Intent {
    fn from(map: Map<String, Value>) -> Self {
        Intent(map)
    }
}
