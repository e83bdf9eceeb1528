//! Value Codec Module
//!
//! Encoding rules shared by the backends: the envelope format structured
//! objects travel in on the remote store, and the projection of a stored
//! JSON value back to text for the plain string getter.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Result;

// == Object Envelope ==
/// Wire wrapper for structured values: `{"json": <value>}`.
#[derive(Serialize)]
struct Envelope<'a> {
    json: &'a Value,
}

/// Decode-side shape: either the envelope, or any bare JSON value written
/// by an older or foreign producer.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredObject {
    Envelope { json: Value },
    Plain(Value),
}

/// Encodes a structured value for storage as text.
pub fn encode_object(value: &Value) -> Result<String> {
    Ok(serde_json::to_string(&Envelope { json: value })?)
}

/// Decodes stored text back into a structured value.
///
/// Accepts the envelope produced by [`encode_object`] as well as bare JSON.
/// Text that is not valid JSON at all is a serialization error, never a
/// panic.
pub fn decode_object(text: &str) -> Result<Value> {
    match serde_json::from_str::<StoredObject>(text)? {
        StoredObject::Envelope { json } => Ok(json),
        StoredObject::Plain(value) => Ok(value),
    }
}

// == Text Projection ==
/// Renders a stored JSON value as the text the plain getter returns.
///
/// Strings come back verbatim; any other value is rendered as compact JSON.
pub fn value_as_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}
