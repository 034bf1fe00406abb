//! Signed message envelope protocol.
//!
//! An [`envelope::Envelope`] wraps an opaque JSON body with a header that
//! carries the signing time and the body size. A
//! [`signature::SignedMessage`] binds a serialized envelope to its HMAC
//! signature; parsing an inbound pair checks the signature first and the
//! envelope freshness second, so bytes that don't match the secret are
//! rejected before their content is ever interpreted.

pub mod envelope;
pub mod signature;

pub use envelope::{Envelope, MESSAGE_LIFETIME};
pub use signature::SignedMessage;
