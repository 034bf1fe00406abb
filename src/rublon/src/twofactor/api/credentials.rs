use crate::api::{ApiRequest, ApiResponse};
use crate::error::RublonError;
use crate::params::{FIELD_ACCESS_TOKEN, FIELD_USER_NAME};
use crate::twofactor::Rublon;
use serde_json::{Map, Value};

/// API request URI path.
const REQUEST_URI_PATH: &str = "/api/transaction/credentials";

/// Field name for the user's device ID.
pub const FIELD_DEVICE_ID: &str = "deviceId";

/// Field name for the confirmation result.
pub const FIELD_CONFIRM_RESULT: &str = "answer";

/// Positive confirmation result value.
pub const CONFIRM_RESULT_YES: &str = "true";

/// Negative confirmation result value.
pub const CONFIRM_RESULT_NO: &str = "false";

/// API method to get the authentication credentials.
pub(crate) struct CredentialsCall<'a> {
    rublon: &'a Rublon,
    access_token: &'a str,
}

impl<'a> CredentialsCall<'a> {
    pub fn new(rublon: &'a Rublon, access_token: &'a str) -> Self {
        Self {
            rublon,
            access_token,
        }
    }

    pub fn perform(self) -> Result<Credentials, RublonError> {
        let mut call_params = Map::new();
        call_params.insert(
            FIELD_ACCESS_TOKEN.to_string(),
            Value::String(self.access_token.to_string()),
        );

        let url = format!("{}{}", self.rublon.consumer().api_server(), REQUEST_URI_PATH);
        let response = ApiRequest::new(self.rublon.consumer(), self.rublon.client(), url)
            .with_call_params(call_params)
            .perform()?;
        Ok(Credentials { response })
    }
}

/// Authentication credentials returned for a finished transaction.
#[derive(Debug, Clone)]
pub struct Credentials {
    response: ApiResponse,
}

impl Credentials {
    /// The user's device ID.
    pub fn device_id(&self) -> Option<&str> {
        self.response.result_str(FIELD_DEVICE_ID)
    }

    /// The confirmation result ([`CONFIRM_RESULT_YES`] or
    /// [`CONFIRM_RESULT_NO`]).
    pub fn confirm_result(&self) -> Option<&str> {
        self.response.result_str(FIELD_CONFIRM_RESULT)
    }

    /// The user's name.
    pub fn username(&self) -> Option<&str> {
        self.response.result_str(FIELD_USER_NAME)
    }

    pub fn response(&self) -> &ApiResponse {
        &self.response
    }
}
