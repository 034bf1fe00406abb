//! Rublon SDK for Rust.
//!
//! This library lets a web application delegate user authentication to the
//! Rublon API over signed HTTP messages. The integrated application shares a
//! system token and a secret key with the Rublon server; every request body
//! is signed with an HMAC and every successful response must carry a
//! matching signature header before it is trusted.
//!
//! The typical flow:
//!
//! 1. Construct a [`twofactor::Rublon`] instance with the system token and
//!    secret key.
//! 2. Call [`twofactor::Rublon::auth`] to begin a transaction; redirect the
//!    user's browser to the returned web URI (or sign the user in directly
//!    when the account is not protected by Rublon).
//! 3. In the callback, exchange the one-time access token for the
//!    authentication credentials with [`twofactor::Rublon::get_credentials`].

pub mod api;
pub mod codec;
pub mod consumer;
pub mod error;
pub mod logout;
pub mod message;
pub mod params;
pub mod rest;
pub mod twofactor;

pub use consumer::{Consumer, ConsumerConfig};
pub use error::RublonError;
