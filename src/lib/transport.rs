//! Transports behind `HttpTransport`. In the browser requests go through
//! `fetch` (via `gloo-net`) with an abort-signal timeout so a stalled backend
//! cannot leave the UI pending forever. Host builds use `reqwest` with the same
//! timeout policy.

#[cfg(target_arch = "wasm32")]
pub use browser::{FetchTransport, post_form};
#[cfg(not(target_arch = "wasm32"))]
pub use host::ReqwestTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use crate::app_lib::{
        api::{ApiRequest, ApiResponse, HttpTransport, Method},
        config::REQUEST_TIMEOUT,
        errors::AppError,
    };
    use gloo_net::http::{Request, Response};
    use gloo_timers::callback::Timeout;
    use web_sys::{AbortController, AbortSignal, FormData};

    /// `fetch`-backed transport for the browser.
    #[derive(Clone, Copy, Debug, Default)]
    pub struct FetchTransport;

    impl HttpTransport for FetchTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
            let response = send_with_timeout(|signal| build_request(&request, signal)).await?;
            read_response(response).await
        }
    }

    /// Posts a multipart form; used for voter file uploads where the body is a
    /// browser `FormData` rather than JSON.
    ///
    /// # Errors
    /// Returns transport errors; HTTP statuses are left to the caller.
    pub async fn post_form(
        url: &str,
        headers: &[(String, String)],
        form: FormData,
    ) -> Result<ApiResponse, AppError> {
        let response = send_with_timeout(move |signal| {
            let mut builder = Request::post(url).abort_signal(Some(signal));
            for (name, value) in headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            builder
                .body(form)
                .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
        })
        .await?;

        read_response(response).await
    }

    fn build_request(request: &ApiRequest, signal: &AbortSignal) -> Result<Request, AppError> {
        let mut builder = match request.method {
            Method::Get => Request::get(&request.url),
            Method::Post => Request::post(&request.url),
        }
        .abort_signal(Some(signal));

        for (name, value) in &request.headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        match &request.body {
            Some(body) => builder.body(body.clone()),
            None => builder.build(),
        }
        .map_err(|err| AppError::Serialization(format!("Failed to build request: {err}")))
    }

    async fn read_response(response: Response) -> Result<ApiResponse, AppError> {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Ok(ApiResponse { status, body })
    }

    /// Maps network errors into user-facing `AppError` variants with timeout detection.
    fn map_request_error(err: gloo_net::Error) -> AppError {
        let message = err.to_string();
        let lowered = message.to_lowercase();

        if lowered.contains("timeout") || lowered.contains("abort") {
            AppError::Timeout("Request timed out. Please try again.".to_string())
        } else {
            AppError::Network(format!("Unable to reach the server: {message}"))
        }
    }

    /// Sends a request with an abort timeout to avoid hanging UI state.
    async fn send_with_timeout(
        build_request: impl FnOnce(&AbortSignal) -> Result<Request, AppError>,
    ) -> Result<Response, AppError> {
        let controller = AbortController::new()
            .map_err(|_| AppError::Config("Failed to initialize request timeout.".to_string()))?;
        let signal = controller.signal();
        let timeout_controller = controller.clone();
        let timeout_ms = u32::try_from(REQUEST_TIMEOUT.as_millis()).unwrap_or(u32::MAX);
        let _timeout = Timeout::new(timeout_ms, move || timeout_controller.abort());

        let request = build_request(&signal)?;
        request.send().await.map_err(map_request_error)
    }
}

#[cfg(not(target_arch = "wasm32"))]
mod host {
    use crate::app_lib::{
        api::{ApiRequest, ApiResponse, HttpTransport, Method},
        config::REQUEST_TIMEOUT,
        errors::AppError,
    };
    use reqwest::Client;

    /// `reqwest`-backed transport for host builds and integration tests.
    #[derive(Clone, Debug)]
    pub struct ReqwestTransport {
        client: Client,
    }

    impl ReqwestTransport {
        /// # Errors
        /// Returns `AppError::Config` if the HTTP client cannot be built.
        pub fn new() -> Result<Self, AppError> {
            let client = Client::builder()
                .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
                .timeout(REQUEST_TIMEOUT)
                .build()
                .map_err(|err| AppError::Config(format!("Failed to build HTTP client: {err}")))?;
            Ok(Self { client })
        }
    }

    impl HttpTransport for ReqwestTransport {
        async fn send(&self, request: ApiRequest) -> Result<ApiResponse, AppError> {
            let mut builder = match request.method {
                Method::Get => self.client.get(&request.url),
                Method::Post => self.client.post(&request.url),
            };
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }
            if let Some(body) = request.body {
                builder = builder.body(body);
            }

            let response = builder.send().await.map_err(map_request_error)?;
            let status = response.status().as_u16();
            let body = response.text().await.map_err(map_request_error)?;
            Ok(ApiResponse { status, body })
        }
    }

    fn map_request_error(err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::Timeout("Request timed out. Please try again.".to_string())
        } else {
            AppError::Network(format!("Unable to reach the server: {err}"))
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::ReqwestTransport;
    use crate::app_lib::{
        api::{ApiRequest, HttpTransport, Method},
        errors::AppError,
    };
    use std::net::TcpListener;
    use wiremock::matchers::{body_string, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn can_bind_localhost() -> bool {
        TcpListener::bind("127.0.0.1:0").is_ok()
    }

    #[tokio::test]
    async fn sends_headers_and_body_and_returns_status() {
        if !can_bind_localhost() {
            eprintln!("Skipping test: cannot bind localhost");
            return;
        }
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/request-otp"))
            .and(header("Content-Type", "application/json"))
            .and(body_string(r#"{"email":"a@b.com"}"#))
            .respond_with(ResponseTemplate::new(429).set_body_string("slow down"))
            .mount(&server)
            .await;

        let transport = ReqwestTransport::new().unwrap();
        let response = transport
            .send(ApiRequest {
                method: Method::Post,
                url: format!("{}/auth/request-otp", server.uri()),
                headers: vec![("Content-Type".to_string(), "application/json".to_string())],
                body: Some(r#"{"email":"a@b.com"}"#.to_string()),
            })
            .await
            .unwrap();

        assert_eq!(response.status, 429);
        assert_eq!(response.body, "slow down");
    }

    #[tokio::test]
    async fn unreachable_host_is_a_network_error() {
        let transport = ReqwestTransport::new().unwrap();
        let result = transport
            .send(ApiRequest {
                method: Method::Get,
                url: "http://127.0.0.1:9/voters".to_string(),
                headers: Vec::new(),
                body: None,
            })
            .await;

        assert!(matches!(
            result,
            Err(AppError::Network(_) | AppError::Timeout(_))
        ));
    }
}
