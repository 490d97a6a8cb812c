//! Shared frontend utilities for API access, configuration, errors, session
//! persistence, polling and build metadata.
//!
//! ## Core Flows
//!
//! ### Passcode sign-in
//!
//! 1. **Request:** The client POSTs `{email}` to `/auth/request-otp`; the backend
//!    emails a 6-digit passcode.
//! 2. **Verify:** The client POSTs `{email, otp}` to `/auth/verify-otp` and
//!    receives an access and a refresh token.
//! 3. **Persist:** Both tokens are written to local storage. Their presence is
//!    what the route guards treat as "signed in".
//!
//! ### Authenticated resources
//!
//! Every request is built by `ResourceClient`, which reads the access token from
//! the `SessionStore` it was constructed with and sends it as
//! `Authorization: Bearer`. A 401 from the backend means the stored tokens are
//! no longer accepted; views clear the session and return to sign-in.
//!
//! Centralizing these helpers keeps network behavior consistent and avoids
//! duplicated logic in routes and features. Callers must avoid logging tokens,
//! passcodes or email addresses.

pub mod api;
pub mod config;
pub mod errors;
pub mod poll;
pub mod session;
pub mod storage;
pub mod telemetry;
pub mod transport;

/// Short git commit of the build, embedded by `build.rs`.
pub const GIT_COMMIT_HASH: &str = env!("VOTERDESK_WEB_GIT_SHA");

pub use api::{ApiRequest, ApiResponse, Envelope, HttpTransport, Method, ResourceClient};
pub use config::{AppConfig, Endpoints};
pub use errors::{AppError, ValidationError};
pub use session::{Session, SessionStore};
