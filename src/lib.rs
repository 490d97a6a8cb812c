//! Browser frontend for student voter management: passcode sign-in, bulk
//! voter-file upload and the voter dashboard.
//!
//! The sign-in flow, session store, HTTP client, table model and upload checks
//! are target-independent and tested on the host. Components, routing, timers
//! and browser storage are compiled for `wasm32` only.

#[cfg(target_arch = "wasm32")]
mod app;
#[path = "lib/mod.rs"]
pub mod app_lib;
#[cfg(target_arch = "wasm32")]
mod components;
pub mod features;
pub mod routes;

/// Installs logging and mounts the app on `<body>`.
#[cfg(target_arch = "wasm32")]
pub fn start() {
    use crate::{
        app::App,
        app_lib::{AppConfig, GIT_COMMIT_HASH, telemetry},
    };
    use leptos::prelude::*;

    let config = AppConfig::load();
    if let Err(err) = telemetry::init(&config.log_level) {
        web_sys::console::warn_1(&format!("logging disabled: {err}").into());
    }
    tracing::info!(commit = GIT_COMMIT_HASH, "voterdesk starting");

    mount_to_body(move || view! { <App config /> });
}
