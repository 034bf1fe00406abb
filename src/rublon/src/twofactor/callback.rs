//! Callback handling for the 2-factor transaction.
//!
//! After the user finishes (or abandons) the hosted authentication, the
//! Rublon server redirects the browser back to the integrated website's
//! callback URL with a state and a one-time access token in the query
//! string. Implement [`Callback`] over your web framework's request to
//! finalize the transaction.

use crate::error::callback::CallbackError;
use crate::twofactor::{Credentials, Rublon};

/// State GET parameter name.
pub const PARAMETER_STATE: &str = "rublonState";

/// Access token GET parameter name.
pub const PARAMETER_ACCESS_TOKEN: &str = "rublonToken";

/// Custom URI param GET parameter name.
pub const PARAMETER_CUSTOM_URI_PARAM: &str = "custom";

/// Success state value.
pub const STATE_OK: &str = "ok";

/// Error state value.
pub const STATE_ERROR: &str = "error";

/// Callback handler for the 2-factor transaction.
///
/// The provided [`Callback::call`] dispatches on the state parameter:
/// `ok` finalizes the transaction by exchanging the access token for the
/// credentials, `error` and anything else go to the overridable hooks.
pub trait Callback {
    fn rublon(&self) -> &Rublon;

    /// The state from the HTTP GET parameters, when present.
    fn state(&self) -> Option<String>;

    /// The access token from the HTTP GET parameters, when present.
    fn access_token(&self) -> Option<String>;

    /// Handle a successfully authenticated user.
    fn user_authenticated(&mut self, credentials: &Credentials);

    /// Handle the `error` state.
    fn handle_error(&mut self);

    /// Handle the cancel state (anything that is neither `ok` nor
    /// `error`).
    fn handle_cancel(&mut self);

    /// Invoke the callback.
    fn call(&mut self) -> Result<(), CallbackError> {
        let state = self.state().unwrap_or_default().to_lowercase();
        if state == STATE_OK {
            self.finalize_transaction()
        } else if state == STATE_ERROR {
            self.handle_error();
            Ok(())
        } else {
            self.handle_cancel();
            Ok(())
        }
    }

    /// Finalize the transaction for the `ok` state.
    fn finalize_transaction(&mut self) -> Result<(), CallbackError> {
        let access_token = self
            .access_token()
            .filter(|token| !token.is_empty())
            .ok_or(CallbackError::MissingAccessToken)?;
        let credentials = self
            .rublon()
            .get_credentials(&access_token)
            .map_err(|err| CallbackError::CredentialsFailed(Box::new(err)))?;
        self.user_authenticated(&credentials);
        Ok(())
    }
}
