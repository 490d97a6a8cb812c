//! HTTP helpers for the JSON backend with consistent headers and error handling.
//! Every call goes through `ResourceClient`, which is built with an explicit
//! transport and session store: it attaches the bearer token when one is
//! stored, encodes JSON bodies and maps any non-2xx status to
//! `AppError::Http`. Request and response bodies may contain emails and tokens,
//! so only methods, URLs and statuses are ever logged.

use super::{errors::AppError, session::SessionStore};
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use std::fmt;
use tracing::{debug, warn};

/// Maximum number of error body characters surfaced to the UI.
const MAX_ERROR_CHARS: usize = 200;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// A fully prepared request handed to a transport.
#[derive(Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl fmt::Debug for ApiRequest {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let header_names: Vec<&str> = self.headers.iter().map(|(name, _)| name.as_str()).collect();
        formatter
            .debug_struct("ApiRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &header_names)
            .field("has_body", &self.body.is_some())
            .finish()
    }
}

impl ApiRequest {
    /// Value of a header, matched case-insensitively.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Status and raw body of a completed exchange.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: u16,
    pub body: String,
}

impl ApiResponse {
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Passes 2xx responses through and turns anything else into `AppError::Http`.
    ///
    /// # Errors
    /// Returns `AppError::Http` with the backend's message for non-2xx statuses.
    pub fn error_for_status(self) -> Result<Self, AppError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(AppError::Http {
                status: self.status,
                message: error_message(&self.body),
            })
        }
    }
}

/// Sends one request. Implementations only report transport failures; HTTP
/// error statuses come back as ordinary responses.
#[allow(async_fn_in_trait)]
pub trait HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError>;
}

/// `{ success, data?, message?, error? }` wrapper used by every backend route.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub error: Option<Value>,
}

impl<T> Envelope<T> {
    /// Returns the optional payload of a successful envelope.
    ///
    /// # Errors
    /// Returns `AppError::Rejected` when `success` is false.
    pub fn into_result(self) -> Result<Option<T>, AppError> {
        if self.success {
            Ok(self.data)
        } else {
            let reason = self
                .error
                .as_ref()
                .and_then(describe_error)
                .or(self.message)
                .unwrap_or_else(|| "The server rejected the request.".to_string());
            Err(AppError::Rejected(reason))
        }
    }

    /// Returns the payload, which must be present.
    ///
    /// # Errors
    /// Returns `AppError::Rejected` when `success` is false and
    /// `AppError::Parse` when `data` is missing.
    pub fn into_data(self) -> Result<T, AppError> {
        self.into_result()?
            .ok_or_else(|| AppError::Parse("Response is missing data.".to_string()))
    }
}

/// Authenticated JSON client shared by the auth and voter features.
#[derive(Clone, Debug)]
pub struct ResourceClient<T> {
    transport: T,
    session: SessionStore,
}

impl<T: HttpTransport> ResourceClient<T> {
    pub fn new(transport: T, session: SessionStore) -> Self {
        Self { transport, session }
    }

    #[must_use]
    pub fn session(&self) -> &SessionStore {
        &self.session
    }

    /// Fetches JSON from `url`.
    ///
    /// # Errors
    /// Returns transport errors, `AppError::Http` for non-2xx statuses and
    /// `AppError::Parse` for undecodable bodies.
    pub async fn get_json<R: DeserializeOwned>(&self, url: &str) -> Result<R, AppError> {
        let request = self.build_request(Method::Get, url, None);
        self.execute(request).await
    }

    /// Posts a JSON body to `url` and parses a JSON response.
    ///
    /// # Errors
    /// Returns `AppError::Serialization` if the body cannot be encoded, plus
    /// everything `get_json` can return.
    pub async fn post_json<B: Serialize + ?Sized, R: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<R, AppError> {
        let payload = serde_json::to_string(body)
            .map_err(|err| AppError::Serialization(format!("Failed to encode request: {err}")))?;
        let request = self.build_request(Method::Post, url, Some(payload));
        self.execute(request).await
    }

    /// Fetches an envelope and returns its `data`.
    ///
    /// # Errors
    /// Same as `get_json`, plus the envelope errors of `Envelope::into_data`.
    pub async fn get_data<R: DeserializeOwned>(&self, url: &str) -> Result<R, AppError> {
        self.get_json::<Envelope<R>>(url).await?.into_data()
    }

    /// `Authorization` header for the stored access token, if any.
    #[must_use]
    pub fn auth_headers(&self) -> Vec<(String, String)> {
        self.session
            .access_token()
            .map(|token| {
                (
                    "Authorization".to_string(),
                    format!("Bearer {}", token.expose_secret()),
                )
            })
            .into_iter()
            .collect()
    }

    fn build_request(&self, method: Method, url: &str, body: Option<String>) -> ApiRequest {
        let mut headers = vec![("Content-Type".to_string(), "application/json".to_string())];
        headers.extend(self.auth_headers());

        ApiRequest {
            method,
            url: url.to_string(),
            headers,
            body,
        }
    }

    async fn execute<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, AppError> {
        let method = request.method;
        let url = request.url.clone();
        debug!(method = method.as_str(), url = %url, "sending request");

        let response = self.transport.send(request).await.inspect_err(|err| {
            warn!(method = method.as_str(), url = %url, error = %err, "request did not complete");
        })?;

        handle_json_response(response).inspect_err(|err| {
            if let Some(status) = err.status() {
                warn!(method = method.as_str(), url = %url, status, "request failed");
            }
        })
    }
}

/// Parses JSON responses and surfaces HTTP errors with sanitized bodies.
fn handle_json_response<R: DeserializeOwned>(response: ApiResponse) -> Result<R, AppError> {
    let response = response.error_for_status()?;
    serde_json::from_str(&response.body)
        .map_err(|err| AppError::Parse(format!("Failed to decode response: {err}")))
}

/// Prefers the backend's `error`/`message` field, falling back to the raw body.
fn error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("error")
                .and_then(describe_error)
                .or_else(|| value.get("message").and_then(describe_error))
                .or_else(|| value.get("detail").and_then(describe_error))
        })
        .map_or_else(|| sanitize_body(body), |message| sanitize_body(&message))
}

/// Flattens string, list and field-map error payloads into one line.
fn describe_error(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(message) => message.clone(),
        Value::Array(items) => items
            .iter()
            .filter_map(describe_error)
            .collect::<Vec<_>>()
            .join(" "),
        Value::Object(fields) => fields
            .iter()
            .filter_map(|(field, detail)| {
                describe_error(detail).map(|detail| format!("{field}: {detail}"))
            })
            .collect::<Vec<_>>()
            .join("; "),
        _ => String::new(),
    };

    let trimmed = text.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Sanitizes HTTP error bodies for user-facing messages by trimming and truncating.
fn sanitize_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

#[cfg(test)]
pub(crate) mod testing {
    //! Scripted in-process transport for exercising clients without a server.

    use super::{ApiRequest, ApiResponse, HttpTransport};
    use crate::app_lib::errors::AppError;
    use std::{
        collections::VecDeque,
        sync::{Arc, Mutex},
    };

    #[derive(Clone, Default)]
    pub(crate) struct ScriptedTransport {
        replies: Arc<Mutex<VecDeque<Result<ApiResponse, AppError>>>>,
        sent: Arc<Mutex<Vec<ApiRequest>>>,
    }

    impl ScriptedTransport {
        pub(crate) fn reply(&self, status: u16, body: &str) -> &Self {
            self.replies.lock().unwrap().push_back(Ok(ApiResponse {
                status,
                body: body.to_string(),
            }));
            self
        }

        pub(crate) fn fail(&self, error: AppError) -> &Self {
            self.replies.lock().unwrap().push_back(Err(error));
            self
        }

        pub(crate) fn sent(&self) -> Vec<ApiRequest> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl HttpTransport for ScriptedTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
            self.sent.lock().unwrap().push(request);
            self.replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(AppError::Network("no scripted reply".to_string())))
        }
    }
}
