//! REST client for the Rublon API.
//!
//! The transport is hidden behind the [`RequestExecutor`] trait; the
//! default implementation is a blocking reqwest client. Every outgoing
//! body is signed with the shared secret and the signature travels in the
//! `X-Rublon-Signature` header; the server echoes the scheme on its
//! responses.

use crate::error::connection::ConnectionError;
use crate::message::signature;
use reqwest::blocking::{Body, Client, Request, Response};
use reqwest::header::{HeaderValue, ACCEPT, CONTENT_TYPE, USER_AGENT};
use reqwest::Method;
use std::time::Duration;
use url::Url;

/// Connection and read timeout applied when the caller does not configure
/// one.
pub const TIMEOUT: Duration = Duration::from_secs(30);

/// User agent string.
pub const USER_AGENT_STRING: &str = "rublon-rust-sdk";

/// Value of the `Content-Type` HTTP header.
pub const HEADER_VALUE_CONTENT_TYPE: &str = "application/json; charset=UTF-8";

/// Value of the `Accept` HTTP header.
pub const HEADER_VALUE_ACCEPT: &str = "application/json, text/javascript, */*; q=0.01";

/// Name of the signature header on both requests and responses.
pub const HEADER_NAME_SIGNATURE: &str = "X-Rublon-Signature";

/// The transport capability: execute one prepared HTTP request.
pub trait RequestExecutor: Send + Sync {
    fn execute(&self, request: Request) -> Result<Response, ConnectionError>;
}

/// Default executor backed by a blocking reqwest [`Client`].
pub struct DefaultRequestExecutor {
    client: Client,
}

impl DefaultRequestExecutor {
    pub fn new(timeout: Duration) -> Result<Self, ConnectionError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ConnectionError::BuildClientFailed)?;
        Ok(Self { client })
    }
}

impl RequestExecutor for DefaultRequestExecutor {
    fn execute(&self, request: Request) -> Result<Response, ConnectionError> {
        self.client
            .execute(request)
            .map_err(ConnectionError::RequestFailed)
    }
}

/// Raw outcome of one HTTP exchange: status code, body, and the response's
/// signature header when present.
#[derive(Debug)]
pub struct RestResponse {
    pub status_code: u16,
    pub body: String,
    pub signature: Option<String>,
}

/// HTTP POST client that signs every outgoing body.
pub struct RestClient {
    executor: Box<dyn RequestExecutor>,
    secret_key: String,
}

impl RestClient {
    pub fn new(secret_key: impl Into<String>, timeout: Duration) -> Result<Self, ConnectionError> {
        Ok(Self::with_executor(
            secret_key,
            Box::new(DefaultRequestExecutor::new(timeout)?),
        ))
    }

    pub fn with_executor(
        secret_key: impl Into<String>,
        executor: Box<dyn RequestExecutor>,
    ) -> Self {
        Self {
            executor,
            secret_key: secret_key.into(),
        }
    }

    /// POST `raw_post_body` to `url` and collect the raw response.
    ///
    /// Transport failures surface as [`ConnectionError`]; interpreting the
    /// response is the API layer's job.
    pub fn perform_request(
        &self,
        url: &str,
        raw_post_body: &str,
    ) -> Result<RestResponse, ConnectionError> {
        let parsed_url = Url::parse(url)
            .map_err(|err| ConnectionError::InvalidUrl(url.to_string(), err))?;
        let signature = signature::sign_data(raw_post_body, &self.secret_key)?;

        let mut request = Request::new(Method::POST, parsed_url);
        let headers = request.headers_mut();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(HEADER_VALUE_CONTENT_TYPE));
        headers.insert(ACCEPT, HeaderValue::from_static(HEADER_VALUE_ACCEPT));
        headers.insert(USER_AGENT, HeaderValue::from_static(USER_AGENT_STRING));
        let signature_value = HeaderValue::from_str(&signature)
            .map_err(|_| ConnectionError::InvalidSignatureHeader(signature))?;
        headers.insert(HEADER_NAME_SIGNATURE, signature_value);
        *request.body_mut() = Some(Body::from(raw_post_body.to_string()));

        let response = self.executor.execute(request)?;
        let status_code = response.status().as_u16();
        let response_signature = response
            .headers()
            .get(HEADER_NAME_SIGNATURE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response.text().map_err(ConnectionError::ReadBodyFailed)?;

        Ok(RestResponse {
            status_code,
            body,
            signature: response_signature,
        })
    }
}
