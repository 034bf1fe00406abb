use crate::error::RublonError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CallbackError {
    #[error("Missing access token in the callback request")]
    MissingAccessToken,

    #[error("Failed to get auth credentials in the callback: {0}")]
    CredentialsFailed(#[source] Box<RublonError>),
}
