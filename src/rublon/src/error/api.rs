use serde_json::{Map, Value};
use thiserror::Error;

/// Name of the `exception` discriminator in an error result.
pub const FIELD_EXCEPTION: &str = "exception";

/// Name of the human-readable message in an error result.
pub const FIELD_ERROR_MESSAGE: &str = "errorMessage";

/// Name of the offending-field entry in an error result.
pub const FIELD_ITEM_NAME: &str = "name";

fn detail(message: &Option<String>) -> String {
    match message {
        Some(message) => format!(": {message}"),
        None => String::new(),
    }
}

fn exception_name(exception: &Option<String>) -> String {
    match exception {
        Some(exception) => format!(" ({exception})"),
        None => String::new(),
    }
}

/// Application-tier API failures.
///
/// The first group covers the local response validation; the rest mirrors
/// the exception names the Rublon server sends in an `ERROR` result. Server
/// discriminators outside this set degrade to [`ApiError::Unexpected`]
/// instead of failing a second time, so new server-side error kinds never
/// crash the client.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Empty response body")]
    EmptyResponse,

    #[error("Unexpected response HTTP status code: {0}")]
    UnexpectedStatusCode(u16),

    #[error("Invalid JSON response{}", detail(.message))]
    InvalidJson { message: Option<String> },

    #[error("Missing field: {name}")]
    MissingField {
        message: Option<String>,
        name: String,
    },

    #[error("Missing header: {name}")]
    MissingHeader {
        message: Option<String>,
        name: String,
    },

    #[error("Invalid field: {name}{}", detail(.message))]
    InvalidField {
        message: Option<String>,
        name: String,
    },

    #[error("Empty input{}", detail(.message))]
    EmptyInput { message: Option<String> },

    #[error("Invalid signature{}", detail(.message))]
    InvalidSignature { message: Option<String> },

    #[error("Unsupported version{}", detail(.message))]
    UnsupportedVersion { message: Option<String> },

    #[error("User not found{}", detail(.message))]
    UserNotFound { message: Option<String> },

    #[error("Access token expired{}", detail(.message))]
    AccessTokenExpired { message: Option<String> },

    #[error("Unknown access token{}", detail(.message))]
    UnknownAccessToken { message: Option<String> },

    #[error("Unauthorized user{}", detail(.message))]
    UnauthorizedUser { message: Option<String> },

    #[error("Forbidden method{}", detail(.message))]
    ForbiddenMethod { message: Option<String> },

    #[error("Personal edition limited{}", detail(.message))]
    PersonalEditionLimited { message: Option<String> },

    #[error("User bypassed{}", detail(.message))]
    UserBypassed { message: Option<String> },

    #[error("Business edition limit exceeded{}", detail(.message))]
    BusinessEditionLimitExceeded { message: Option<String> },

    #[error("Application denied{}", detail(.message))]
    ApplicationDenied { message: Option<String> },

    #[error("Application disabled{}", detail(.message))]
    ApplicationDisabled { message: Option<String> },

    #[error("Subscription expired{}", detail(.message))]
    SubscriptionExpired { message: Option<String> },

    #[error("User denied{}", detail(.message))]
    UserDenied { message: Option<String> },

    #[error("Unexpected API error{}{}", exception_name(.exception), detail(.message))]
    Unexpected {
        exception: Option<String>,
        message: Option<String>,
    },
}

impl ApiError {
    /// Map a server-sent exception discriminator to a typed error.
    ///
    /// Unknown discriminators fall through to [`ApiError::Unexpected`]
    /// carrying the raw name and message.
    pub fn factory(exception: &str, message: Option<String>, name: Option<String>) -> ApiError {
        match exception {
            "MissingFieldException" => ApiError::MissingField {
                message: message.clone(),
                name: name.or(message).unwrap_or_default(),
            },
            "MissingHeaderException" => ApiError::MissingHeader {
                message: message.clone(),
                name: name.or(message).unwrap_or_default(),
            },
            "InvalidFieldException" => ApiError::InvalidField {
                message: message.clone(),
                name: name.or(message).unwrap_or_default(),
            },
            // The server historically sends the misspelled name as well.
            "EmptyInputException" | "EmptyInputIException" => ApiError::EmptyInput { message },
            "InvalidJSONException" => ApiError::InvalidJson { message },
            "InvalidSignatureException" => ApiError::InvalidSignature { message },
            "UnsupportedVersionException" => ApiError::UnsupportedVersion { message },
            "UserNotFoundException" => ApiError::UserNotFound { message },
            "AccessTokenExpiredException" => ApiError::AccessTokenExpired { message },
            "UnknownAccessTokenException" => ApiError::UnknownAccessToken { message },
            "UnauthorizedUserException" => ApiError::UnauthorizedUser { message },
            "ForbiddenMethodException" => ApiError::ForbiddenMethod { message },
            "PersonalEditionLimitedException" => ApiError::PersonalEditionLimited { message },
            "UserBypassedException" => ApiError::UserBypassed { message },
            "BusinessEditionLimitExceededException" => {
                ApiError::BusinessEditionLimitExceeded { message }
            }
            "ApplicationDeniedException" => ApiError::ApplicationDenied { message },
            "ApplicationDisabledException" => ApiError::ApplicationDisabled { message },
            "SubscriptionExpiredException" => ApiError::SubscriptionExpired { message },
            "UserDeniedException" => ApiError::UserDenied { message },
            _ => ApiError::Unexpected {
                exception: Some(exception.to_string()),
                message,
            },
        }
    }

    /// Build the typed error for an `ERROR` result object.
    pub fn from_error_result(result: &Map<String, Value>) -> ApiError {
        let message = result
            .get(FIELD_ERROR_MESSAGE)
            .and_then(Value::as_str)
            .map(str::to_string);
        let name = result
            .get(FIELD_ITEM_NAME)
            .and_then(Value::as_str)
            .map(str::to_string);
        match result.get(FIELD_EXCEPTION).and_then(Value::as_str) {
            Some(exception) => ApiError::factory(exception, message, name),
            None => ApiError::Unexpected {
                exception: None,
                message,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn error_result(raw: Value) -> Map<String, Value> {
        raw.as_object().unwrap().clone()
    }

    #[test]
    fn factory_maps_known_discriminators() {
        let err = ApiError::factory("UserNotFoundException", Some("x".to_string()), None);
        match err {
            ApiError::UserNotFound { message } => assert_eq!(message.as_deref(), Some("x")),
            other => panic!("unexpected error: {other:?}"),
        }

        match ApiError::factory("SubscriptionExpiredException", None, None) {
            ApiError::SubscriptionExpired { message } => assert!(message.is_none()),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn factory_keeps_field_name() {
        let err = ApiError::factory(
            "MissingFieldException",
            Some("Missing field".to_string()),
            Some("accessToken".to_string()),
        );
        match err {
            ApiError::MissingField { name, .. } => assert_eq!(name, "accessToken"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn factory_falls_back_on_unknown_discriminator() {
        let err = ApiError::factory("BrandNewException", Some("soon".to_string()), None);
        match err {
            ApiError::Unexpected { exception, message } => {
                assert_eq!(exception.as_deref(), Some("BrandNewException"));
                assert_eq!(message.as_deref(), Some("soon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_result_without_exception_is_generic() {
        let result = error_result(json!({"errorMessage": "broken"}));
        match ApiError::from_error_result(&result) {
            ApiError::Unexpected { exception, message } => {
                assert!(exception.is_none());
                assert_eq!(message.as_deref(), Some("broken"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn error_result_dispatches_with_message_and_name() {
        let result = error_result(json!({
            "exception": "InvalidFieldException",
            "errorMessage": "Invalid status field",
            "name": "status",
        }));
        match ApiError::from_error_result(&result) {
            ApiError::InvalidField { message, name } => {
                assert_eq!(message.as_deref(), Some("Invalid status field"));
                assert_eq!(name, "status");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
