//! Payload layouts of the two platforms.
//!
//! Incoming payloads are decoded laxly: a payload that is not a JSON object,
//! or a field with an unexpected type, is replaced by zero values and a warning is logged.
//! Outgoing payloads are JSON, base64 encoded so they fit in a single string field.

use crate::error::ConversionError;
use base64::prelude::*;
use serde::Deserialize;
use serde::Serialize;
use serde_json::Map;
use serde_json::Value;
use tracing::warn;

/// A fogcloud payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FogJson {
    pub id: u32,
    pub version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub method: String,
    pub timestamp: i64,
    pub params: Map<String, Value>,
}

/// An Aliyun Alink payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AliyunJson {
    pub id: String,
    pub version: String,
    pub params: Map<String, Value>,
    pub method: String,
}

impl FogJson {
    pub fn from_lax_str(raw: &str) -> Self {
        let mut fields = LaxFields::parse(raw);
        FogJson {
            id: fields.fog_id(),
            version: fields.string("version"),
            method: fields.string("method"),
            timestamp: fields.integer("timestamp"),
            params: fields.object("params"),
        }
    }

    /// Remap this payload to the Aliyun layout, keeping the version and params untouched.
    pub fn into_aliyun(self, method: String) -> AliyunJson {
        AliyunJson {
            id: self.id.to_string(),
            version: self.version,
            params: self.params,
            method,
        }
    }
}

impl AliyunJson {
    pub fn from_lax_str(raw: &str) -> Self {
        let mut fields = LaxFields::parse(raw);
        AliyunJson {
            id: fields.aliyun_id(),
            version: fields.string("version"),
            params: fields.object("params"),
            method: fields.string("method"),
        }
    }

    /// Remap this payload to the fogcloud layout, keeping the version and params untouched.
    ///
    /// The Aliyun message id is not carried over: the fogcloud id is left to its default.
    pub fn into_fog(self, method: String, timestamp: i64) -> FogJson {
        FogJson {
            id: u32::default(),
            version: self.version,
            method,
            timestamp,
            params: self.params,
        }
    }
}

/// Serialize a payload as JSON, then base64 encode it
pub fn encode_payload<T: Serialize>(payload: &T) -> Result<String, ConversionError> {
    let json = serde_json::to_vec(payload)?;
    Ok(BASE64_STANDARD.encode(json))
}

struct LaxFields(Map<String, Value>);

impl LaxFields {
    fn parse(raw: &str) -> Self {
        match serde_json::from_str(raw) {
            Ok(Value::Object(fields)) => LaxFields(fields),
            Ok(_) => {
                warn!("The payload is not a JSON object, using default values: {raw}");
                LaxFields(Map::new())
            }
            Err(err) => {
                warn!("The payload is not valid JSON, using default values: {err}");
                LaxFields(Map::new())
            }
        }
    }

    fn take(&mut self, field: &str) -> Option<Value> {
        self.0.remove(field).filter(|value| !value.is_null())
    }

    fn string(&mut self, field: &str) -> String {
        match self.take(field) {
            Some(Value::String(value)) => value,
            Some(other) => {
                unexpected_type(field, &other);
                String::new()
            }
            None => String::new(),
        }
    }

    fn integer(&mut self, field: &str) -> i64 {
        match self.take(field) {
            Some(Value::Number(n)) if n.is_i64() => n.as_i64().unwrap_or_default(),
            Some(other) => {
                unexpected_type(field, &other);
                0
            }
            None => 0,
        }
    }

    fn object(&mut self, field: &str) -> Map<String, Value> {
        match self.take(field) {
            Some(Value::Object(value)) => value,
            Some(other) => {
                unexpected_type(field, &other);
                Map::new()
            }
            None => Map::new(),
        }
    }

    // Aliyun ids are strings, but some devices send them as numbers
    fn aliyun_id(&mut self) -> String {
        match self.take("id") {
            Some(Value::String(id)) => id,
            Some(Value::Number(id)) => id.to_string(),
            Some(other) => {
                unexpected_type("id", &other);
                String::new()
            }
            None => String::new(),
        }
    }

    fn fog_id(&mut self) -> u32 {
        let id = match self.take("id") {
            Some(Value::Number(id)) => id.as_u64().and_then(|id| u32::try_from(id).ok()),
            Some(Value::String(id)) => id.parse().ok(),
            Some(_) => None,
            None => Some(0),
        };
        id.unwrap_or_else(|| {
            warn!("Unexpected fogcloud message id, using 0");
            0
        })
    }
}

fn unexpected_type(field: &str, value: &Value) {
    warn!("Unexpected value for the {field:?} field, using a default value: {value}");
}
