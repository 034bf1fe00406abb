use crate::error::codec::CodecError;
use thiserror::Error;

/// Protocol/integrity-tier failures of the signed message envelope. Any of
/// these means a bug, tampering, or clock skew; the message is rejected
/// outright.
#[derive(Error, Debug)]
pub enum MessageError {
    #[error("Invalid message: {0}")]
    InvalidEnvelope(String),

    #[error("Invalid message time: {0}")]
    ExpiredEnvelope(i64),

    #[error("Invalid signed message: {0}")]
    MalformedPair(String),

    #[error("Signature mismatch for the signed message")]
    SignatureMismatch,

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error("Failed to decode message JSON: {0}")]
    Json(#[from] serde_json::Error),
}
