use crate::api::{ApiRequest, ApiResponse};
use crate::error::RublonError;
use crate::params::{FIELD_APP_VER, FIELD_PARAMS};
use crate::twofactor::Rublon;
use serde_json::{Map, Value};

/// API request URI path.
const REQUEST_URI_PATH: &str = "/api/app/init";

/// API method validating the application configuration.
pub(crate) struct Init<'a> {
    rublon: &'a Rublon,
    app_ver: &'a str,
    params: Option<Map<String, Value>>,
}

impl<'a> Init<'a> {
    pub fn new(rublon: &'a Rublon, app_ver: &'a str, params: Option<Map<String, Value>>) -> Self {
        Self {
            rublon,
            app_ver,
            params,
        }
    }

    pub fn perform(self) -> Result<ApiResponse, RublonError> {
        let mut call_params = Map::new();
        call_params.insert(
            FIELD_APP_VER.to_string(),
            Value::String(self.app_ver.to_string()),
        );
        if let Some(params) = self.params {
            call_params.insert(FIELD_PARAMS.to_string(), Value::Object(params));
        }

        let url = format!("{}{}", self.rublon.consumer().api_server(), REQUEST_URI_PATH);
        ApiRequest::new(self.rublon.consumer(), self.rublon.client(), url)
            .with_call_params(call_params)
            .perform()
    }
}
