use serde::de::Error as _;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Capacity of the request and response channels.
    pub channel_capacity: usize,
    /// Maximum number of requests computed at the same time.
    pub max_in_flight: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: 256,
            max_in_flight: 4,
        }
    }
}

impl EngineConfig {
    /// Parses a JSON config object. Missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(serde_json::Error::custom(
                "engine config must be a JSON object",
            ));
        }
        serde_json::from_value(value)
    }
}
