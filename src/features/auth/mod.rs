//! Auth feature module covering the email passcode flow, token persistence and
//! route gating. It keeps authentication logic out of the UI. This module
//! touches security boundaries and must avoid logging emails, passcodes or
//! token material.
//!
//! Flow Overview: the email step posts `{email}` to `request-otp`; the code
//! step posts `{email, otp}` to `verify-otp` and stores the returned access and
//! refresh tokens. Guards only check that both tokens are present.

pub mod client;
pub mod flow;
pub mod guards;
#[cfg(target_arch = "wasm32")]
pub(crate) mod state;
pub mod types;

#[cfg(target_arch = "wasm32")]
pub(crate) use guards::{RedirectIfSignedIn, RequireSession};
