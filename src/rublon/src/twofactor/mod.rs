//! Rublon 2-factor service.

pub mod api;
pub mod callback;

use crate::consumer::{Consumer, ConsumerConfig};
use crate::error::api::ApiError;
use crate::error::RublonError;
use crate::params::FIELD_LANG;
use crate::rest::{RequestExecutor, RestClient};
use serde_json::{Map, Value};
use slog::debug;

pub use api::begin_transaction::Transaction;
pub use api::credentials::Credentials;

/// Rublon 2-factor service provider.
///
/// Owns the consumer credentials and the REST client. One instance may be
/// shared across threads; every call owns its own request/response state.
pub struct Rublon {
    consumer: Consumer,
    client: RestClient,
}

impl Rublon {
    /// Construct an instance with the default configuration.
    pub fn new(
        system_token: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Result<Self, RublonError> {
        Self::with_config(system_token, secret_key, ConsumerConfig::default())
    }

    /// Construct an instance with a non-default configuration, e.g. a
    /// development API server.
    pub fn with_config(
        system_token: impl Into<String>,
        secret_key: impl Into<String>,
        config: ConsumerConfig,
    ) -> Result<Self, RublonError> {
        let secret_key = secret_key.into();
        let client = RestClient::new(secret_key.clone(), config.timeout)?;
        let consumer = Consumer::with_config(system_token, secret_key, config);
        Ok(Rublon { consumer, client })
    }

    /// Construct an instance with a custom transport.
    pub fn with_executor(
        system_token: impl Into<String>,
        secret_key: impl Into<String>,
        config: ConsumerConfig,
        executor: Box<dyn RequestExecutor>,
    ) -> Self {
        let secret_key = secret_key.into();
        let client = RestClient::with_executor(secret_key.clone(), executor);
        let consumer = Consumer::with_config(system_token, secret_key, config);
        Rublon { consumer, client }
    }

    pub fn consumer(&self) -> &Consumer {
        &self.consumer
    }

    pub(crate) fn client(&self) -> &RestClient {
        &self.client
    }

    /// Validate the application configuration against the API.
    pub fn check_application(
        &self,
        app_ver: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<(), RublonError> {
        self.consumer.check_configuration()?;
        api::init::Init::new(self, app_ver, params).perform()?;
        Ok(())
    }

    /// Initialize a 2-factor transaction and return the URL address to
    /// redirect the user's browser to, or `None` when the user's account
    /// is not protected by Rublon.
    ///
    /// A `UserNotFound` answer from the server is the documented bypass:
    /// the account carries no second factor, so sign the user in without
    /// one. Every other failure propagates.
    pub fn auth(
        &self,
        callback_url: &str,
        username: &str,
        user_email: &str,
        params: Option<Map<String, Value>>,
    ) -> Result<Option<String>, RublonError> {
        self.consumer.check_configuration()?;

        let mut consumer_params = params.unwrap_or_default();
        consumer_params.insert(
            FIELD_LANG.to_string(),
            Value::String(self.consumer.lang().to_string()),
        );

        let begin = api::begin_transaction::BeginTransaction::new(
            self,
            callback_url,
            username,
            user_email,
            consumer_params,
        );
        match begin.perform() {
            Ok(transaction) => Ok(transaction.web_uri().map(str::to_string)),
            Err(RublonError::Api(ApiError::UserNotFound { .. })) => {
                debug!(
                    self.consumer.logger(),
                    "user not protected by Rublon, bypassing the second factor"
                );
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }

    /// Exchange a one-time access token for the authentication
    /// credentials. The token is a session identifier deleted after first
    /// use, so this can be called only once per transaction.
    pub fn get_credentials(&self, access_token: &str) -> Result<Credentials, RublonError> {
        self.consumer.check_configuration()?;
        if !valid_access_token(access_token) {
            return Err(RublonError::InvalidAccessToken);
        }
        api::credentials::CredentialsCall::new(self, access_token).perform()
    }
}

fn valid_access_token(token: &str) -> bool {
    token.len() == 60
        && token
            .bytes()
            .all(|byte| byte.is_ascii_lowercase() || byte.is_ascii_digit())
}
