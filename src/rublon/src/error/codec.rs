use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("HMAC key is unusable: {0}")]
    UnusableKey(hmac::digest::InvalidLength),
}
