//! The extraction service's answer, kept exactly as received.
//!
//! [`ExtractionResult`] wraps the raw JSON body instead of deserialising into
//! a fixed struct: the service adds fields over time and may send malformed
//! ones, and the user must see (and download) the complete response either
//! way. The accessors below read the three well-known fields leniently.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Label used when the service did not classify the document.
pub const UNKNOWN_DOCUMENT_TYPE: &str = "Unknown";

/// Structured data returned by a successful upload. Immutable once received.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExtractionResult(Value);

impl ExtractionResult {
    pub fn new(raw: Value) -> Self {
        Self(raw)
    }

    /// The complete response body, including fields this crate does not know.
    pub fn raw(&self) -> &Value {
        &self.0
    }

    /// `document_type`, or [`UNKNOWN_DOCUMENT_TYPE`] when absent or falsy
    /// (`null`, `false`, `0`, `""`).
    pub fn document_type(&self) -> String {
        match self.0.get("document_type") {
            Some(v) if is_falsy(v) => UNKNOWN_DOCUMENT_TYPE.to_string(),
            Some(Value::String(s)) => s.clone(),
            Some(v) => v.to_string(),
            None => UNKNOWN_DOCUMENT_TYPE.to_string(),
        }
    }

    /// `keyword_matches` when it is a JSON object, in response order.
    pub fn keyword_matches(&self) -> Option<&Map<String, Value>> {
        self.0.get("keyword_matches").and_then(Value::as_object)
    }

    /// `structured_data`, falling back to the whole response when it is
    /// absent or falsy.
    pub fn structured_data(&self) -> &Value {
        match self.0.get("structured_data") {
            Some(v) if !is_falsy(v) => v,
            _ => &self.0,
        }
    }
}

/// Values a browser front end treats as "no value": `null`, `false`, zero and
/// the empty string. Empty arrays and objects are real values.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}

impl From<Value> for ExtractionResult {
    fn from(raw: Value) -> Self {
        Self(raw)
    }
}
