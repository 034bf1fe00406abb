//! Remote logout handling.
//!
//! The Rublon server can order the integrated website to terminate a
//! user's session. The order arrives as a fire-and-forget POST whose body
//! is authenticated by the `X-Rublon-Signature` header alone — no
//! envelope, no freshness window — so verification uses the standalone
//! [`crate::message::signature::verify_data`] check.

use crate::api::{FIELD_STATUS, STATUS_ERROR, STATUS_OK};
use crate::consumer::Consumer;
use crate::message::signature;
use crate::rest::HEADER_NAME_SIGNATURE;
use serde_json::{Map, Value};
use slog::warn;

/// Access token field on the remote logout action.
pub const FIELD_LOGOUT_ACCESS_TOKEN: &str = "accessToken";

/// User ID field on the remote logout action.
pub const FIELD_LOGOUT_APP_USER_ID: &str = "appUserId";

/// Device ID field on the remote logout action.
pub const FIELD_LOGOUT_DEVICE_ID: &str = "deviceId";

/// Message field on the remote logout response.
const RESPONSE_FIELD_MSG: &str = "msg";

/// Field-name field on the remote logout response.
const RESPONSE_FIELD_FIELD: &str = "field";

/// Remote logout handler.
///
/// Implement the abstract accessors over your web framework's
/// request/response pair; the provided [`RemoteLogoutHandler::handle`]
/// verifies the signature, extracts the order and calls
/// [`RemoteLogoutHandler::logout_user`], then writes a JSON
/// `{status, msg[, field]}` response body.
pub trait RemoteLogoutHandler {
    fn consumer(&self) -> &Consumer;

    /// POST body of the current HTTP request.
    fn request_body(&self) -> Option<String>;

    /// First HTTP request header with the given name.
    fn request_header(&self, name: &str) -> Option<String>;

    /// Set the HTTP response body.
    fn set_response_body(&mut self, body: String);

    /// Terminate the local session of the given user on the given device.
    fn logout_user(&mut self, app_user_id: &str, device_id: i64);

    /// Handle the remote logout request.
    fn handle(&mut self) {
        let response = self.handle_inner();
        self.set_response_body(Value::Object(response).to_string());
    }

    #[doc(hidden)]
    fn handle_inner(&mut self) -> Map<String, Value> {
        let input = match self.request_body().filter(|body| !body.is_empty()) {
            Some(input) => input,
            None => return error_response("Empty POST body input.", None),
        };

        let header = self.request_header(HEADER_NAME_SIGNATURE).unwrap_or_default();
        if !signature::verify_data(&input, self.consumer().secret_key(), &header) {
            warn!(
                self.consumer().logger(),
                "rejecting remote logout request with an invalid signature"
            );
            return error_response("Invalid signature.", None);
        }

        let message: Map<String, Value> = match serde_json::from_str(&input) {
            Ok(Value::Object(message)) => message,
            _ => return error_response("Invalid JSON.", None),
        };

        let required = [
            FIELD_LOGOUT_ACCESS_TOKEN,
            FIELD_LOGOUT_APP_USER_ID,
            FIELD_LOGOUT_DEVICE_ID,
        ];
        for field in required {
            let present = match message.get(field) {
                Some(Value::String(value)) => !value.is_empty(),
                Some(Value::Null) | None => false,
                Some(_) => true,
            };
            if !present {
                return error_response("Missing field.", Some(field));
            }
        }

        let app_user_id = message
            .get(FIELD_LOGOUT_APP_USER_ID)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        let device_id = device_id_of(message.get(FIELD_LOGOUT_DEVICE_ID));
        self.logout_user(&app_user_id, device_id);

        let mut response = Map::new();
        response.insert(FIELD_STATUS.to_string(), Value::String(STATUS_OK.to_string()));
        response.insert(
            RESPONSE_FIELD_MSG.to_string(),
            Value::String("Success.".to_string()),
        );
        response
    }
}

fn device_id_of(value: Option<&Value>) -> i64 {
    match value {
        Some(Value::Number(number)) => number.as_i64().unwrap_or(0),
        Some(Value::String(text)) => text.parse().unwrap_or(0),
        _ => 0,
    }
}

fn error_response(message: &str, field: Option<&str>) -> Map<String, Value> {
    let mut response = Map::new();
    response.insert(
        FIELD_STATUS.to_string(),
        Value::String(STATUS_ERROR.to_string()),
    );
    response.insert(
        RESPONSE_FIELD_MSG.to_string(),
        Value::String(message.to_string()),
    );
    if let Some(field) = field {
        response.insert(
            RESPONSE_FIELD_FIELD.to_string(),
            Value::String(field.to_string()),
        );
    }
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "logout-secret";

    struct TestHandler {
        consumer: Consumer,
        body: Option<String>,
        signature: Option<String>,
        response: Option<String>,
        logged_out: Vec<(String, i64)>,
    }

    impl TestHandler {
        fn new(body: Option<String>, signature: Option<String>) -> Self {
            Self {
                consumer: Consumer::new("token", SECRET),
                body,
                signature,
                response: None,
                logged_out: Vec::new(),
            }
        }

        fn response(&self) -> Value {
            serde_json::from_str(self.response.as_deref().unwrap()).unwrap()
        }
    }

    impl RemoteLogoutHandler for TestHandler {
        fn consumer(&self) -> &Consumer {
            &self.consumer
        }

        fn request_body(&self) -> Option<String> {
            self.body.clone()
        }

        fn request_header(&self, name: &str) -> Option<String> {
            assert_eq!(name, HEADER_NAME_SIGNATURE);
            self.signature.clone()
        }

        fn set_response_body(&mut self, body: String) {
            self.response = Some(body);
        }

        fn logout_user(&mut self, app_user_id: &str, device_id: i64) {
            self.logged_out.push((app_user_id.to_string(), device_id));
        }
    }

    fn signed(body: &str) -> Option<String> {
        Some(signature::sign_data(body, SECRET).unwrap())
    }

    #[test]
    fn valid_order_logs_the_user_out() {
        let body = json!({
            "accessToken": "t",
            "appUserId": "user-7",
            "deviceId": 42,
        })
        .to_string();
        let mut handler = TestHandler::new(Some(body.clone()), signed(&body));
        handler.handle();

        assert_eq!(handler.logged_out, vec![("user-7".to_string(), 42)]);
        let response = handler.response();
        assert_eq!(response.get("status"), Some(&json!("OK")));
    }

    #[test]
    fn invalid_signature_fails_closed() {
        let body = json!({
            "accessToken": "t",
            "appUserId": "user-7",
            "deviceId": 42,
        })
        .to_string();
        let mut handler = TestHandler::new(Some(body), Some("bogus".to_string()));
        handler.handle();

        assert!(handler.logged_out.is_empty());
        let response = handler.response();
        assert_eq!(response.get("status"), Some(&json!("ERROR")));
        assert_eq!(response.get("msg"), Some(&json!("Invalid signature.")));
    }

    #[test]
    fn missing_signature_header_fails_closed() {
        let body = json!({"accessToken": "t", "appUserId": "u", "deviceId": 1}).to_string();
        let mut handler = TestHandler::new(Some(body), None);
        handler.handle();
        assert!(handler.logged_out.is_empty());
        assert_eq!(handler.response().get("status"), Some(&json!("ERROR")));
    }

    #[test]
    fn missing_field_is_reported_by_name() {
        let body = json!({"accessToken": "t", "deviceId": 42}).to_string();
        let mut handler = TestHandler::new(Some(body.clone()), signed(&body));
        handler.handle();

        assert!(handler.logged_out.is_empty());
        let response = handler.response();
        assert_eq!(response.get("msg"), Some(&json!("Missing field.")));
        assert_eq!(response.get("field"), Some(&json!("appUserId")));
    }

    #[test]
    fn empty_body_is_an_error() {
        let mut handler = TestHandler::new(None, None);
        handler.handle();
        let response = handler.response();
        assert_eq!(response.get("msg"), Some(&json!("Empty POST body input.")));
    }
}
