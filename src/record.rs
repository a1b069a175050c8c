use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use thiserror::Error;

/// One delivered transport message. Lives only until it is decoded.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub topic: String,
    pub payload: Bytes,
}

#[derive(Debug, Error)]
pub enum DecodeError {
    /// Payload is not a parseable JSON object. The message is dropped;
    /// there is no retry and no dead-letter.
    #[error("malformed payload: {0}")]
    MalformedPayload(String),
}

/// A decoded message body plus its origin. Immutable after decode and
/// discarded once every sink has seen it; never persisted as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRecord {
    pub topic: String,
    pub body: Map<String, Value>,
    pub received_at: DateTime<Utc>,
}

impl DecodedRecord {
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.body.get(key) {
            Some(Value::Null) | None => None,
            Some(v) => Some(v),
        }
    }

    /// Field as text. Accepts strings and bare numbers (scanner ids show up
    /// both ways across publishers); everything else is absent.
    pub fn text(&self, key: &str) -> Option<String> {
        match self.get(key)? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    /// Field as a 64-bit float. Only JSON numbers qualify; a numeric-looking
    /// string does not count as a metric value.
    pub fn number(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            _ => None,
        }
    }

    pub fn array(&self, key: &str) -> Option<&Vec<Value>> {
        match self.get(key)? {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }
}

/// Parse a raw topic+payload pair into a [`DecodedRecord`].
///
/// Pure: the receipt timestamp is supplied by the caller so the same inputs
/// always yield the same record. Only structural parseability is checked;
/// absent fields are resolved to defaults by the sink transforms, never here.
pub fn decode(
    topic: &str,
    payload: &[u8],
    received_at: DateTime<Utc>,
) -> Result<DecodedRecord, DecodeError> {
    let value: Value = serde_json::from_slice(payload)
        .map_err(|e| DecodeError::MalformedPayload(e.to_string()))?;
    let Value::Object(body) = value else {
        return Err(DecodeError::MalformedPayload(
            "top-level JSON value is not an object".into(),
        ));
    };
    Ok(DecodedRecord {
        topic: topic.to_string(),
        body,
        received_at,
    })
}
