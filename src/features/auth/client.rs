//! Client wrappers for the passcode endpoints. Both calls go through the shared
//! `ResourceClient`, so a stored bearer token is attached even though the
//! backend ignores it here. Neither call retries.

use crate::{
    app_lib::{AppConfig, AppError, Endpoints, Envelope, HttpTransport, ResourceClient, Session},
    features::auth::types::{CredentialRequest, PasscodeVerification, TokenPair},
};
use serde_json::Value;
use tracing::info;

#[derive(Clone, Debug)]
pub struct AuthClient<T> {
    api: ResourceClient<T>,
    endpoints: Endpoints,
}

impl<T: HttpTransport> AuthClient<T> {
    pub fn new(api: ResourceClient<T>, config: &AppConfig) -> Self {
        Self {
            api,
            endpoints: config.endpoints(),
        }
    }

    /// Asks the backend to email a passcode.
    ///
    /// # Errors
    /// Returns transport errors, `AppError::Http` for non-2xx statuses and
    /// `AppError::Rejected` when the envelope reports failure.
    pub async fn request_passcode(&self, request: &CredentialRequest) -> Result<(), AppError> {
        let envelope: Envelope<Value> = self
            .api
            .post_json(&self.endpoints.request_otp, request)
            .await?;
        envelope.into_result()?;
        info!("passcode requested");
        Ok(())
    }

    /// Exchanges email + passcode for a session. The caller persists it.
    ///
    /// # Errors
    /// Same as `request_passcode`, plus `AppError::Parse` when the tokens are
    /// missing. Wrong and expired codes are indistinguishable.
    pub async fn verify_passcode(
        &self,
        request: &PasscodeVerification,
    ) -> Result<Session, AppError> {
        let envelope: Envelope<TokenPair> = self
            .api
            .post_json(&self.endpoints.verify_otp, request)
            .await?;
        let tokens = envelope.into_data()?;
        info!("passcode verified");
        Ok(Session::from(tokens))
    }
}
