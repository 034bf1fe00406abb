pub mod api;
pub mod callback;
pub mod codec;
pub mod config;
pub mod connection;
pub mod message;

pub use api::ApiError;
pub use callback::CallbackError;
pub use codec::CodecError;
pub use config::ConfigurationError;
pub use connection::ConnectionError;
pub use message::MessageError;

use thiserror::Error;

/// Umbrella error for the SDK's public entry points.
///
/// The three tiers stay distinct: [`ConnectionError`] is the transport tier
/// (retry at the caller's discretion), [`MessageError`] and [`CodecError`]
/// are the protocol/integrity tier (fail closed), and [`ApiError`] is the
/// application tier communicated by the Rublon server.
#[derive(Error, Debug)]
pub enum RublonError {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    Connection(#[from] ConnectionError),

    #[error(transparent)]
    Message(#[from] MessageError),

    #[error("Invalid access token")]
    InvalidAccessToken,
}
