use crate::api::{ApiRequest, ApiResponse};
use crate::codec;
use crate::error::RublonError;
use crate::params::{
    FIELD_CALLBACK_URL, FIELD_FORCE_MOBILE_APP, FIELD_USER_EMAIL, FIELD_USER_EMAIL_HASH,
    FIELD_USER_NAME,
};
use crate::twofactor::Rublon;
use serde_json::{Map, Value};

/// Field name for the web URI in the API response.
pub const FIELD_WEB_URI: &str = "webURI";

/// API request URI path.
const REQUEST_URI_PATH: &str = "/api/transaction/init";

/// API method to begin the 2-factor authentication transaction.
pub(crate) struct BeginTransaction<'a> {
    rublon: &'a Rublon,
    callback_url: &'a str,
    username: &'a str,
    user_email: &'a str,
    consumer_params: Map<String, Value>,
}

impl<'a> BeginTransaction<'a> {
    pub fn new(
        rublon: &'a Rublon,
        callback_url: &'a str,
        username: &'a str,
        user_email: &'a str,
        consumer_params: Map<String, Value>,
    ) -> Self {
        Self {
            rublon,
            callback_url,
            username,
            user_email,
            consumer_params,
        }
    }

    pub fn perform(self) -> Result<Transaction, RublonError> {
        let email = self.user_email.to_lowercase();
        let force_mobile_app = self
            .consumer_params
            .get(FIELD_FORCE_MOBILE_APP)
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let mut call_params = Map::new();
        call_params.insert(
            FIELD_CALLBACK_URL.to_string(),
            Value::String(self.callback_url.to_string()),
        );
        call_params.insert(
            FIELD_USER_NAME.to_string(),
            Value::String(self.username.to_string()),
        );
        call_params.insert(
            FIELD_USER_EMAIL_HASH.to_string(),
            Value::String(codec::sha256_hex(&email)),
        );
        if !email.is_empty() && !force_mobile_app {
            call_params.insert(FIELD_USER_EMAIL.to_string(), Value::String(email));
        }

        let url = format!("{}{}", self.rublon.consumer().api_server(), REQUEST_URI_PATH);
        let response = ApiRequest::new(self.rublon.consumer(), self.rublon.client(), url)
            .with_call_params(call_params)
            .with_consumer_params(self.consumer_params)
            .perform()?;
        Ok(Transaction { response })
    }
}

/// A started 2-factor transaction.
#[derive(Debug, Clone)]
pub struct Transaction {
    response: ApiResponse,
}

impl Transaction {
    /// The web URI to redirect the user's browser to.
    pub fn web_uri(&self) -> Option<&str> {
        self.response.result_str(FIELD_WEB_URI)
    }

    pub fn response(&self) -> &ApiResponse {
        &self.response
    }
}
