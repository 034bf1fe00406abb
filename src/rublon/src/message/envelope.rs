use crate::error::message::MessageError;
use serde_json::{Map, Value};
use time::OffsetDateTime;

/// Message lifetime in seconds; bounds the replay window for inbound
/// envelopes.
pub const MESSAGE_LIFETIME: i64 = 300;

/// Tolerance for envelopes stamped slightly in the future by a skewed
/// remote clock.
pub(crate) const CLOCK_SKEW_TOLERANCE: i64 = 60;

pub(crate) const FIELD_HEAD: &str = "head";
pub(crate) const FIELD_BODY: &str = "body";
pub(crate) const FIELD_HEAD_TIME: &str = "time";
pub(crate) const FIELD_HEAD_SIZE: &str = "size";

/// Current unix timestamp in seconds.
pub(crate) fn unix_time() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Header-and-body wire structure carrying a timestamp for freshness
/// checking.
///
/// The `size` header always tracks the byte length of the body. The `time`
/// header is stamped by [`super::SignedMessage::sign`] immediately before
/// signing, never ahead of time.
#[derive(Debug, Clone, Default)]
pub struct Envelope {
    head: Map<String, Value>,
    body: String,
}

impl Envelope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an envelope from its raw serialized form, enforcing the
    /// freshness window.
    ///
    /// The header time must be a positive integer strictly below
    /// `now + 60` and strictly above `now - lifetime`.
    pub fn parse(raw: &str, lifetime: i64) -> Result<Envelope, MessageError> {
        let message: Value = serde_json::from_str(raw)?;
        let head = message
            .get(FIELD_HEAD)
            .and_then(Value::as_object)
            .filter(|head| !head.is_empty())
            .ok_or_else(|| MessageError::InvalidEnvelope("empty header".to_string()))?
            .clone();

        let time = head.get(FIELD_HEAD_TIME).and_then(Value::as_i64).unwrap_or(0);
        let now = unix_time();
        if time <= 0 || time >= now + CLOCK_SKEW_TOLERANCE || time <= now - lifetime {
            return Err(MessageError::ExpiredEnvelope(time));
        }

        let body = message.get(FIELD_BODY).and_then(Value::as_str).unwrap_or("");
        if body.is_empty() {
            return Err(MessageError::InvalidEnvelope("empty body".to_string()));
        }

        Ok(Envelope {
            head,
            body: body.to_string(),
        })
    }

    /// Store the body and recompute the `size` header from its byte length.
    pub fn set_body(&mut self, body: impl Into<String>) -> &mut Self {
        self.body = body.into();
        let size = self.body.len();
        self.set_head(FIELD_HEAD_SIZE, size as u64)
    }

    /// Serialize a JSON value and store it as the body.
    pub fn set_body_object(&mut self, body: &Value) -> &mut Self {
        self.set_body(body.to_string())
    }

    /// Arbitrary header extension point.
    pub fn set_head(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.head.insert(name.to_string(), value.into());
        self
    }

    pub fn head(&self) -> &Map<String, Value> {
        &self.head
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Decode the body as a JSON value.
    pub fn body_object(&self) -> Result<Value, MessageError> {
        Ok(serde_json::from_str(&self.body)?)
    }

    /// Canonical serialized form: a JSON object with exactly the `head` and
    /// `body` keys.
    pub fn serialize(&self) -> String {
        let mut message = Map::new();
        message.insert(FIELD_HEAD.to_string(), Value::Object(self.head.clone()));
        message.insert(FIELD_BODY.to_string(), Value::String(self.body.clone()));
        Value::Object(message).to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw_envelope(time: i64, body: &str) -> String {
        json!({"head": {"time": time, "size": body.len()}, "body": body}).to_string()
    }

    #[test]
    fn set_body_tracks_byte_length() {
        let mut envelope = Envelope::new();
        envelope.set_body("hello");
        assert_eq!(envelope.head().get(FIELD_HEAD_SIZE), Some(&json!(5)));

        envelope.set_body("zażółć");
        assert_eq!(
            envelope.head().get(FIELD_HEAD_SIZE),
            Some(&json!("zażółć".len()))
        );
    }

    #[test]
    fn serialize_has_exactly_head_and_body() {
        let mut envelope = Envelope::new();
        envelope.set_body("{\"a\":1}");
        let raw: Value = serde_json::from_str(&envelope.serialize()).unwrap();
        let object = raw.as_object().unwrap();
        assert_eq!(object.len(), 2);
        assert!(object.contains_key(FIELD_HEAD));
        assert!(object.contains_key(FIELD_BODY));
    }

    #[test]
    fn parse_accepts_current_time() {
        let raw = raw_envelope(unix_time(), "{\"a\":1}");
        let envelope = Envelope::parse(&raw, MESSAGE_LIFETIME).unwrap();
        assert_eq!(envelope.body(), "{\"a\":1}");
    }

    #[test]
    fn parse_accepts_slight_clock_skew() {
        let raw = raw_envelope(unix_time() + 59, "{\"a\":1}");
        assert!(Envelope::parse(&raw, MESSAGE_LIFETIME).is_ok());
    }

    #[test]
    fn parse_rejects_future_time_beyond_tolerance() {
        let raw = raw_envelope(unix_time() + 61, "{\"a\":1}");
        match Envelope::parse(&raw, MESSAGE_LIFETIME) {
            Err(MessageError::ExpiredEnvelope(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_expired_time() {
        let raw = raw_envelope(unix_time() - MESSAGE_LIFETIME - 1, "{\"a\":1}");
        match Envelope::parse(&raw, MESSAGE_LIFETIME) {
            Err(MessageError::ExpiredEnvelope(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_missing_time() {
        let raw = json!({"head": {"size": 2}, "body": "{}"}).to_string();
        match Envelope::parse(&raw, MESSAGE_LIFETIME) {
            Err(MessageError::ExpiredEnvelope(0)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_header() {
        let raw = json!({"head": {}, "body": "{}"}).to_string();
        match Envelope::parse(&raw, MESSAGE_LIFETIME) {
            Err(MessageError::InvalidEnvelope(reason)) => assert_eq!(reason, "empty header"),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn parse_rejects_empty_body() {
        let raw = json!({"head": {"time": unix_time()}, "body": ""}).to_string();
        match Envelope::parse(&raw, MESSAGE_LIFETIME) {
            Err(MessageError::InvalidEnvelope(reason)) => assert_eq!(reason, "empty body"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
