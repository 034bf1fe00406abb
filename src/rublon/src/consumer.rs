use crate::error::config::ConfigurationError;
use slog::{o, Discard, Logger};
use std::time::Duration;

/// Default API server.
pub const DEFAULT_API_SERVER: &str = "https://core.rublon.net";

/// Default 2-letter language code (ISO 639-1).
pub const DEFAULT_LANG: &str = "en";

/// Version string reported to the API in the `sdkVer` parameter.
pub const SDK_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Configuration for a [`Consumer`].
///
/// Passed explicitly into the constructors; there is no global settings
/// object. The defaults are correct for production use against the public
/// Rublon API.
pub struct ConsumerConfig {
    /// API server URL, without a trailing slash.
    pub api_server: String,
    /// 2-letter language code (ISO 639-1).
    pub lang: String,
    /// Version string reported in the `sdkVer` parameter.
    pub sdk_version: String,
    /// Connection and read timeout for API calls.
    pub timeout: Duration,
    /// Logger for request/response lifecycle events. Discards everything
    /// unless the caller provides a drain.
    pub logger: Logger,
}

impl Default for ConsumerConfig {
    fn default() -> Self {
        Self {
            api_server: DEFAULT_API_SERVER.to_string(),
            lang: DEFAULT_LANG.to_string(),
            sdk_version: SDK_VERSION.to_string(),
            timeout: crate::rest::TIMEOUT,
            logger: Logger::root(Discard, o!()),
        }
    }
}

/// Credentials and settings shared by all Rublon services.
///
/// The system token and secret key are obtained from the developer
/// dashboard and shared with the server out of band; both are read-only
/// for the lifetime of the instance, so a `Consumer` may be referenced
/// from multiple threads without locking.
pub struct Consumer {
    system_token: String,
    secret_key: String,
    api_server: String,
    lang: String,
    sdk_version: String,
    logger: Logger,
}

impl Consumer {
    pub fn new(system_token: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self::with_config(system_token, secret_key, ConsumerConfig::default())
    }

    pub fn with_config(
        system_token: impl Into<String>,
        secret_key: impl Into<String>,
        config: ConsumerConfig,
    ) -> Self {
        Self {
            system_token: system_token.into(),
            secret_key: secret_key.into(),
            api_server: config.api_server,
            lang: config.lang,
            sdk_version: config.sdk_version,
            logger: config.logger,
        }
    }

    pub fn system_token(&self) -> &str {
        &self.system_token
    }

    pub fn secret_key(&self) -> &str {
        &self.secret_key
    }

    pub fn api_server(&self) -> &str {
        &self.api_server
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    pub fn sdk_version(&self) -> &str {
        &self.sdk_version
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    /// Whether both the system token and the secret key are present.
    pub fn is_configured(&self) -> bool {
        !self.system_token.is_empty() && !self.secret_key.is_empty()
    }

    /// Fail unless the consumer is fully configured.
    pub fn check_configuration(&self) -> Result<(), ConfigurationError> {
        if self.is_configured() {
            Ok(())
        } else {
            Err(ConfigurationError::NotConfigured)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_point_at_the_public_api() {
        let consumer = Consumer::new("token", "secret");
        assert_eq!(consumer.api_server(), DEFAULT_API_SERVER);
        assert_eq!(consumer.lang(), DEFAULT_LANG);
        assert!(consumer.is_configured());
        assert!(consumer.check_configuration().is_ok());
    }

    #[test]
    fn missing_credentials_fail_the_configuration_check() {
        let consumer = Consumer::new("", "secret");
        assert!(!consumer.is_configured());
        assert!(consumer.check_configuration().is_err());
    }
}
