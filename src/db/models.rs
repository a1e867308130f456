use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Parking spots seeded into a fresh document.
pub const SPOT_IDS: [&str; 4] = ["1", "2", "3", "4"];

/// Top-level key that must never reach storage.
pub const TOKENS_KEY: &str = "tokens";

/// Apartment identifiers are opaque to this service.
pub type Apartment = Value;

pub type TokenMap = BTreeMap<String, Apartment>;

/// The single shared parking state.
///
/// Only the top level is typed (it must be a JSON object). Everything below it
/// passes through untouched, so existing documents round-trip verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParkingDocument(Map<String, Value>);

impl ParkingDocument {
    /// The document served and stored when nothing exists yet: one empty
    /// reservation per spot, no penalties, no reports, no logs.
    pub fn initial() -> Self {
        let reservations: Map<String, Value> = SPOT_IDS
            .iter()
            .map(|id| (id.to_string(), Value::Object(Map::new())))
            .collect();

        let mut document = Map::new();
        document.insert("reservations".to_string(), Value::Object(reservations));
        document.insert("penalties".to_string(), Value::Object(Map::new()));
        document.insert("reports".to_string(), Value::Object(Map::new()));
        document.insert("logs".to_string(), Value::Array(Vec::new()));
        Self(document)
    }

    /// Wraps `value` if it is a JSON object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self(map)),
            _ => None,
        }
    }

    pub fn without_tokens(mut self) -> Self {
        self.0.remove(TOKENS_KEY);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for ParkingDocument {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<ParkingDocument> for Value {
    fn from(document: ParkingDocument) -> Self {
        Value::Object(document.0)
    }
}
