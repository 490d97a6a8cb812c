//! Request and response types for the passcode endpoints. These payloads carry
//! email addresses, passcodes and tokens, so they must never be logged.

use crate::app_lib::Session;
use serde::{Deserialize, Serialize};
use std::fmt;

const REDACTED: &str = "[REDACTED]";

/// Body of `POST /auth/request-otp`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CredentialRequest {
    pub email: String,
}

impl fmt::Debug for CredentialRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("CredentialRequest")
            .field("email", &REDACTED)
            .finish()
    }
}

/// Body of `POST /auth/verify-otp`.
#[derive(Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PasscodeVerification {
    pub email: String,
    pub otp: String,
}

impl fmt::Debug for PasscodeVerification {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PasscodeVerification")
            .field("email", &REDACTED)
            .field("otp", &REDACTED)
            .finish()
    }
}

/// `data` of a successful verification.
#[derive(Deserialize)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

impl From<TokenPair> for Session {
    fn from(tokens: TokenPair) -> Self {
        Session::new(tokens.access_token, tokens.refresh_token)
    }
}

#[cfg(test)]
mod tests {
    use super::{CredentialRequest, PasscodeVerification, TokenPair};
    use crate::app_lib::Session;
    use secrecy::ExposeSecret;
    use serde_json::json;

    #[test]
    fn verification_serializes_with_backend_field_names() {
        let request = PasscodeVerification {
            email: "a@b.com".to_string(),
            otp: "123456".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "email": "a@b.com", "otp": "123456" })
        );
        let debug = format!("{request:?}");
        assert!(!debug.contains("123456"));
        assert!(!debug.contains("a@b.com"));
    }

    #[test]
    fn credential_request_debug_hides_the_email() {
        let request = CredentialRequest {
            email: "a@b.com".to_string(),
        };

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({ "email": "a@b.com" })
        );
        assert!(!format!("{request:?}").contains("a@b.com"));
    }

    #[test]
    fn token_pair_becomes_a_session() {
        let tokens: TokenPair = serde_json::from_value(json!({
            "access_token": "A",
            "refresh_token": "B"
        }))
        .unwrap();

        let session = Session::from(tokens);
        assert_eq!(session.access_token().expose_secret(), "A");
        assert_eq!(session.refresh_token().expose_secret(), "B");
    }
}
