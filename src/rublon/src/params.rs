//! Request parameter composition.
//!
//! The protocol vocabulary lives here as field-name constants, together
//! with the deep-merge used to compose a request payload from independent
//! sources and the [`AuthParams`] wrapper for consumer-supplied fields.

use crate::consumer::Consumer;
use crate::error::message::MessageError;
use crate::message::{Envelope, SignedMessage};
use serde_json::{Map, Value};

pub const FIELD_SYSTEM_TOKEN: &str = "systemToken";
pub const FIELD_ACCESS_TOKEN: &str = "accessToken";
pub const FIELD_APP_VER: &str = "appVer";
pub const FIELD_SDK_VER: &str = "sdkVer";
pub const FIELD_PARAMS: &str = "params";
pub const FIELD_LANG: &str = "lang";
pub const FIELD_CALLBACK_URL: &str = "callbackUrl";
pub const FIELD_USER_EMAIL: &str = "userEmail";
pub const FIELD_USER_NAME: &str = "username";
pub const FIELD_USER_EMAIL_HASH: &str = "userEmailHash";
pub const FIELD_CONSUMER_PARAMS: &str = "consumerParams";
pub const FIELD_FORCE_MOBILE_APP: &str = "forceMobileApp";

/// URL path of the hosted authentication code window.
const URL_PATH_CODE: &str = "/code/native/";

/// Deep-merge an ordered sequence of parameter objects into a new object.
///
/// Processed left to right. When a key occurs on both sides: two objects
/// merge recursively, two arrays accumulate (the right-hand array is pushed
/// as one additional nested element, not concatenated element-wise), and
/// any other combination is overwritten by the right side. The inputs are
/// never mutated.
pub fn merge(objects: &[Map<String, Value>]) -> Map<String, Value> {
    let mut result = Map::new();
    for object in objects {
        merge_into(&mut result, object);
    }
    result
}

fn merge_into(result: &mut Map<String, Value>, object: &Map<String, Value>) {
    for (key, value) in object {
        let merged = match (result.get_mut(key), value) {
            (Some(Value::Object(left)), Value::Object(right)) => {
                merge_into(left, right);
                true
            }
            (Some(Value::Array(left)), Value::Array(right)) => {
                left.push(Value::Array(right.clone()));
                true
            }
            _ => false,
        };
        if !merged {
            result.insert(key.clone(), value.clone());
        }
    }
}

/// Consumer-supplied parameters of an authentication process.
///
/// Distinct from the protocol-mandated fields; the integrated website sets
/// these and may retrieve them again in its callback. When a flow requires
/// the consumer data to be opaque to the transport layer, the parameters
/// are wrapped in an [`Envelope`] and signed with the website's secret key.
pub struct AuthParams<'a> {
    consumer: &'a Consumer,
    consumer_params: Map<String, Value>,
}

impl<'a> AuthParams<'a> {
    pub fn new(consumer: &'a Consumer) -> AuthParams<'a> {
        AuthParams {
            consumer,
            consumer_params: Map::new(),
        }
    }

    /// Replace the consumer parameters wholesale.
    pub fn set_consumer_params(&mut self, params: Map<String, Value>) -> &mut Self {
        self.consumer_params = params;
        self
    }

    /// Add a single consumer parameter.
    pub fn set_consumer_param(&mut self, name: &str, value: impl Into<Value>) -> &mut Self {
        self.consumer_params.insert(name.to_string(), value.into());
        self
    }

    /// The consumer parameters with the required defaults applied: the
    /// language code and the system token.
    pub fn consumer_params(&self) -> Map<String, Value> {
        let mut params = self.consumer_params.clone();
        params.insert(
            FIELD_LANG.to_string(),
            Value::String(self.consumer.lang().to_string()),
        );
        params.insert(
            FIELD_SYSTEM_TOKEN.to_string(),
            Value::String(self.consumer.system_token().to_string()),
        );
        params
    }

    /// The consumer parameters wrapped in a signed envelope, or `None` when
    /// no parameters have been set.
    pub fn signed_consumer_params(&self) -> Result<Option<SignedMessage>, MessageError> {
        if self.consumer_params.is_empty() {
            return Ok(None);
        }
        let mut envelope = Envelope::new();
        envelope.set_body_object(&Value::Object(self.consumer_params()));
        let signed =
            SignedMessage::sign(envelope, self.consumer.secret_key()).map_err(MessageError::from)?;
        Ok(Some(signed))
    }

    /// URL of the authentication request, for a plain HTTP redirection to
    /// the hosted code window. Carries the signed consumer parameters as a
    /// base64-encoded, URL-encoded JSON payload.
    pub fn authentication_url(&self) -> Result<String, MessageError> {
        let mut params = Map::new();
        if let Some(signed) = self.signed_consumer_params()? {
            params.insert(FIELD_CONSUMER_PARAMS.to_string(), signed.to_value());
        }
        let encoded = crate::codec::base64_encode(&Value::Object(params).to_string());
        let encoded: String = url::form_urlencoded::byte_serialize(encoded.as_bytes()).collect();
        Ok(format!(
            "{}{}{}",
            self.consumer.api_server(),
            URL_PATH_CODE,
            encoded
        ))
    }
}
