use crate::error::codec::CodecError;
use thiserror::Error;

/// Transport-tier failures. These never carry API semantics; they tell the
/// caller the exchange did not complete and may be retried at its
/// discretion.
#[derive(Error, Debug)]
pub enum ConnectionError {
    #[error("Failed to build the HTTP client: {0}")]
    BuildClientFailed(reqwest::Error),

    #[error("Failed to parse request url '{0}': {1}")]
    InvalidUrl(String, url::ParseError),

    #[error("Failed to perform HTTP request: {0}")]
    RequestFailed(reqwest::Error),

    #[error("Failed to read the HTTP response body: {0}")]
    ReadBodyFailed(reqwest::Error),

    #[error("Failed to sign the outgoing request body: {0}")]
    SignRequestFailed(#[from] CodecError),

    #[error("Computed request signature is not a valid header value: {0}")]
    InvalidSignatureHeader(String),
}
