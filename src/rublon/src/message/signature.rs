use crate::codec::{self, HashAlgorithm};
use crate::error::codec::CodecError;
use crate::error::message::MessageError;
use crate::message::envelope::{self, Envelope, MESSAGE_LIFETIME};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire form of a signed pair: `{"data": ..., "sign": ...}` with an
/// optional `status` on response-side variants.
#[derive(Debug, Serialize, Deserialize)]
struct SignedData {
    #[serde(default)]
    data: String,
    #[serde(rename = "sign", default)]
    sign: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
}

/// A serialized [`Envelope`] bound to its HMAC-SHA-256 signature.
///
/// Owns exactly one envelope. Signing stamps the envelope time; parsing
/// verifies the signature before the envelope content is interpreted.
#[derive(Debug)]
pub struct SignedMessage {
    data: String,
    signature: String,
    status: Option<String>,
    envelope: Envelope,
}

impl SignedMessage {
    /// Sign an envelope with the shared secret key.
    ///
    /// The `time` header is set here, exactly once, immediately before the
    /// envelope is serialized, so the signed timestamp always reflects
    /// signing time rather than construction time.
    pub fn sign(mut envelope: Envelope, secret_key: &str) -> Result<SignedMessage, CodecError> {
        envelope.set_head(envelope::FIELD_HEAD_TIME, envelope::unix_time());
        let data = envelope.serialize();
        let signature = sign_data(&data, secret_key)?;
        Ok(SignedMessage {
            data,
            signature,
            status: None,
            envelope,
        })
    }

    /// Parse and verify an inbound signed pair under the default message
    /// lifetime.
    pub fn parse(raw: &str, secret_key: &str) -> Result<SignedMessage, MessageError> {
        Self::parse_with_lifetime(raw, secret_key, MESSAGE_LIFETIME)
    }

    /// Parse and verify an inbound signed pair.
    ///
    /// Fails with [`MessageError::MalformedPair`] when `data` or `sign` is
    /// empty, [`MessageError::SignatureMismatch`] when the recomputed HMAC
    /// disagrees, and the envelope errors of [`Envelope::parse`] otherwise.
    pub fn parse_with_lifetime(
        raw: &str,
        secret_key: &str,
        lifetime: i64,
    ) -> Result<SignedMessage, MessageError> {
        let pair: SignedData = serde_json::from_str(raw)?;
        if pair.data.is_empty() || pair.sign.is_empty() {
            return Err(MessageError::MalformedPair(
                "no data or sign field".to_string(),
            ));
        }
        if !verify_data(&pair.data, secret_key, &pair.sign) {
            return Err(MessageError::SignatureMismatch);
        }
        let envelope = Envelope::parse(&pair.data, lifetime)?;
        Ok(SignedMessage {
            data: pair.data,
            signature: pair.sign,
            status: pair.status,
            envelope,
        })
    }

    pub fn data(&self) -> &str {
        &self.data
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    pub fn envelope(&self) -> &Envelope {
        &self.envelope
    }

    pub fn into_envelope(self) -> Envelope {
        self.envelope
    }

    /// The pair as a JSON value, for embedding in a larger parameter
    /// object.
    pub fn to_value(&self) -> Value {
        serde_json::json!({
            "data": self.data,
            "sign": self.signature,
        })
    }

    /// The pair in its serialized wire form.
    pub fn serialize(&self) -> String {
        self.to_value().to_string()
    }
}

/// Sign raw data with the secret key, returning the hex digest.
pub fn sign_data(data: &str, secret_key: &str) -> Result<String, CodecError> {
    codec::hmac_hex(HashAlgorithm::Sha256, secret_key, data)
}

/// Verify raw data against a supplied signature.
///
/// Pure recompute-and-compare; used both for pair verification and for
/// standalone payloads (remote-logout callbacks) that carry no envelope.
/// An unusable key can never verify.
pub fn verify_data(data: &str, secret_key: &str, signature: &str) -> bool {
    match sign_data(data, secret_key) {
        Ok(expected) => !signature.is_empty() && expected == signature,
        Err(_) => false,
    }
}
