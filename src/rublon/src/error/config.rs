use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error(
        "System token and secret key must be provided to the consumer before calling this method"
    )]
    NotConfigured,
}
