//! Hash primitives for communication with the Rublon API.

use crate::error::codec::CodecError;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256, Sha512};

/// Digest algorithms accepted by [`hmac_hex`]. The protocol itself is fixed
/// to HMAC-SHA-256; SHA-512 is available for forward compatibility only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

/// Compute the hex-encoded HMAC digest of `input` under `secret_key`.
///
/// Deterministic and side-effect free. An unusable key surfaces as a
/// [`CodecError`] so that it can never be confused with a valid signature.
pub fn hmac_hex(
    algorithm: HashAlgorithm,
    secret_key: &str,
    input: &str,
) -> Result<String, CodecError> {
    match algorithm {
        HashAlgorithm::Sha256 => {
            let mut mac = Hmac::<Sha256>::new_from_slice(secret_key.as_bytes())
                .map_err(CodecError::UnusableKey)?;
            mac.update(input.as_bytes());
            Ok(hex::encode(mac.finalize().into_bytes()))
        }
        HashAlgorithm::Sha512 => {
            let mut mac = Hmac::<Sha512>::new_from_slice(secret_key.as_bytes())
                .map_err(CodecError::UnusableKey)?;
            mac.update(input.as_bytes());
            Ok(hex::encode(mac.finalize().into_bytes()))
        }
    }
}

/// Hex-encoded SHA-256 content hash, used for the user identity hashes sent
/// alongside plain identifiers.
pub fn sha256_hex(input: &str) -> String {
    hex::encode(Sha256::digest(input.as_bytes()))
}

/// Base64-encode a string.
pub fn base64_encode(input: &str) -> String {
    base64::encode(input.as_bytes())
}
