//! API method request/response life cycle.
//!
//! An [`ApiRequest`] moves through build → send → validate. The build step
//! composes the request body from three sources with a fixed precedence;
//! the validate step accepts a response only when the transport status,
//! the JSON structure, and (for success) the response signature header all
//! check out. Anything else is a typed failure; no partial state escapes.


use crate::consumer::Consumer;
use crate::error::api::ApiError;
use crate::error::RublonError;
use crate::message::signature;
use crate::params::{self, FIELD_PARAMS, FIELD_SDK_VER, FIELD_SYSTEM_TOKEN};
use crate::rest::{RestClient, RestResponse, HEADER_NAME_SIGNATURE};
use serde_json::{Map, Value};
use slog::{debug, warn};

/// Success status value.
pub const STATUS_OK: &str = "OK";

/// Error status value.
pub const STATUS_ERROR: &str = "ERROR";

/// Field name for the result field.
pub const FIELD_RESULT: &str = "result";

/// Field name for the status field.
pub const FIELD_STATUS: &str = "status";

/// A single API call in the build state.
///
/// Parameters merge in fixed order: call-specific fields, then the
/// protocol-mandated fields, then the caller's consumer fields — later
/// sources win. The system token is re-applied after the merge so caller
/// input can never override it. This ordering is a contract; the
/// end-to-end tests assert it.
pub struct ApiRequest<'a> {
    consumer: &'a Consumer,
    client: &'a RestClient,
    url: String,
    call_params: Map<String, Value>,
    consumer_params: Map<String, Value>,
}

impl<'a> ApiRequest<'a> {
    pub fn new(consumer: &'a Consumer, client: &'a RestClient, url: impl Into<String>) -> Self {
        Self {
            consumer,
            client,
            url: url.into(),
            call_params: Map::new(),
            consumer_params: Map::new(),
        }
    }

    /// Call-specific fields (merge source one).
    pub fn with_call_params(mut self, params: Map<String, Value>) -> Self {
        self.call_params = params;
        self
    }

    /// Caller consumer fields (merge source three).
    pub fn with_consumer_params(mut self, params: Map<String, Value>) -> Self {
        self.consumer_params = params;
        self
    }

    /// Send the request and validate the response.
    pub fn perform(self) -> Result<ApiResponse, RublonError> {
        let ApiRequest {
            consumer,
            client,
            url,
            call_params,
            consumer_params,
        } = self;

        let mut protocol_params = Map::new();
        protocol_params.insert(
            FIELD_SYSTEM_TOKEN.to_string(),
            Value::String(consumer.system_token().to_string()),
        );
        let mut nested = Map::new();
        nested.insert(
            FIELD_SDK_VER.to_string(),
            Value::String(consumer.sdk_version().to_string()),
        );
        protocol_params.insert(FIELD_PARAMS.to_string(), Value::Object(nested));

        let mut merged = params::merge(&[call_params, protocol_params, consumer_params]);
        // The system token is not overridable by caller input.
        merged.insert(
            FIELD_SYSTEM_TOKEN.to_string(),
            Value::String(consumer.system_token().to_string()),
        );

        let raw_post_body = Value::Object(merged).to_string();
        debug!(consumer.logger(), "performing API request to {}", url);
        let response = client.perform_request(&url, &raw_post_body)?;
        debug!(
            consumer.logger(),
            "API response from {} with HTTP status {}", url, response.status_code
        );

        let validated = validate_response(consumer, response)?;
        Ok(validated)
    }
}

/// A validated success response; the `result` object is available to the
/// caller.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    raw: String,
    result: Map<String, Value>,
}

impl ApiResponse {
    /// The raw response body the signature was verified against.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The `result` object of the response.
    pub fn result(&self) -> &Map<String, Value> {
        &self.result
    }

    /// A string field of the `result` object.
    pub fn result_str(&self, name: &str) -> Option<&str> {
        self.result.get(name).and_then(Value::as_str)
    }
}

/// Validate one raw HTTP exchange against the protocol rules.
///
/// Only HTTP 200 and 400 are acceptable transport outcomes; 400 carries
/// structured application errors. The `result` object is required before
/// `status` is inspected. A success response is authentic only when the
/// signature header verifies against the exact response bytes.
fn validate_response(consumer: &Consumer, response: RestResponse) -> Result<ApiResponse, ApiError> {
    if response.status_code != 200 && response.status_code != 400 {
        return Err(ApiError::UnexpectedStatusCode(response.status_code));
    }
    if response.body.is_empty() {
        return Err(ApiError::EmptyResponse);
    }

    let decoded: Value = serde_json::from_str(&response.body).map_err(|err| {
        ApiError::InvalidJson {
            message: Some(err.to_string()),
        }
    })?;
    let object = decoded
        .as_object()
        .filter(|object| !object.is_empty())
        .ok_or(ApiError::InvalidJson { message: None })?;

    let result = object
        .get(FIELD_RESULT)
        .and_then(Value::as_object)
        .cloned()
        .ok_or_else(|| ApiError::MissingField {
            message: None,
            name: FIELD_RESULT.to_string(),
        })?;
    let status = object
        .get(FIELD_STATUS)
        .and_then(Value::as_str)
        .ok_or_else(|| ApiError::MissingField {
            message: None,
            name: FIELD_STATUS.to_string(),
        })?;

    match status {
        STATUS_OK => {
            let header = response
                .signature
                .as_deref()
                .ok_or_else(|| ApiError::MissingHeader {
                    message: None,
                    name: HEADER_NAME_SIGNATURE.to_string(),
                })?;
            if !signature::verify_data(&response.body, consumer.secret_key(), header) {
                warn!(
                    consumer.logger(),
                    "rejecting API response with an invalid signature"
                );
                return Err(ApiError::InvalidSignature {
                    message: Some(format!("Invalid response signature: {header}")),
                });
            }
            Ok(ApiResponse {
                raw: response.body,
                result,
            })
        }
        STATUS_ERROR => Err(ApiError::from_error_result(&result)),
        other => Err(ApiError::InvalidField {
            message: Some(format!("Invalid status field: {other}")),
            name: FIELD_STATUS.to_string(),
        }),
    }
}
