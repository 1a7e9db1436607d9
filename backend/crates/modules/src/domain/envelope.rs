//! Request Envelope
//!
//! Wire shape: `{"module": "...", "type": "...", "data": {...}}`. The
//! boundary stays dynamic so an unknown module tag is a routable error
//! rather than a deserialization failure; each module immediately parses
//! the `(type, data)` pair into its own tagged request enum, which keeps
//! per-module dispatch compile-time exhaustive.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{ModuleError, ModuleResult};

/// Loosely typed request envelope passed from the HTTP layer to the
/// dispatcher
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Module tag; the dispatcher falls back to the prayer assistant when
    /// absent
    #[serde(default)]
    pub module: Option<String>,
    /// Operation tag
    #[serde(rename = "type")]
    pub op: String,
    /// Operation-specific fields
    #[serde(default)]
    pub data: Value,
    /// Locale of the resolved user, injected by the dispatcher
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_language: Option<String>,
}

impl RequestEnvelope {
    pub fn new(module: Option<&str>, op: impl Into<String>, data: Value) -> Self {
        Self {
            module: module.map(str::to_string),
            op: op.into(),
            data,
            user_language: None,
        }
    }

    /// Parse `(op, data)` into a module's tagged request enum
    ///
    /// The target type is expected to carry `#[serde(tag = "type")]`; the
    /// operation tag is merged into the payload before deserializing. A
    /// mismatch is a cooperative failure, not a fault.
    pub fn parse_op<T: DeserializeOwned>(&self) -> ModuleResult<T> {
        let mut payload = match &self.data {
            Value::Object(map) => map.clone(),
            Value::Null => Map::new(),
            _ => {
                return Err(ModuleError::domain("Request data must be a JSON object"));
            }
        };
        payload.insert("type".to_string(), Value::String(self.op.clone()));

        serde_json::from_value(Value::Object(payload)).map_err(|e| {
            ModuleError::domain(format!("Unsupported or malformed request: {}", e))
        })
    }
}
