//! Build-time configuration for the backend API with an optional runtime
//! override. The runtime config is read from `window.VOTERDESK_CONFIG` (if
//! present) so static deployments can change the API host without rebuilding.
//! Configuration values are public; do not store secrets here.

use std::time::Duration;

/// Period of the upload-status poll on the voters view.
pub const POLL_INTERVAL: Duration = Duration::from_secs(3);
/// Default request timeout applied to every HTTP call.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const DEFAULT_LOG_LEVEL: &str = "info";

/// Frontend configuration derived from build-time environment variables.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AppConfig {
    pub api_base_url: String,
    pub log_level: String,
}

impl AppConfig {
    /// Loads config from build-time environment variables and applies runtime overrides.
    #[must_use]
    pub fn load() -> Self {
        let api_base_url = option_env!("VOTERDESK_API_URL").unwrap_or("");
        let log_level = option_env!("VOTERDESK_LOG_LEVEL").unwrap_or(DEFAULT_LOG_LEVEL);

        let mut config = Self {
            api_base_url: api_base_url.to_string(),
            log_level: log_level.to_string(),
        };

        if let Some(runtime) = runtime_config() {
            apply_runtime_overrides(&mut config, runtime);
        }

        config
    }

    /// Config pointing at an explicit API base, used by tests and tooling.
    #[must_use]
    pub fn with_api_base(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }

    /// Resolves every backend endpoint against the configured base URL.
    #[must_use]
    pub fn endpoints(&self) -> Endpoints {
        let auth = build_url_with_base(&self.api_base_url, "/auth");
        let voters = build_url_with_base(&self.api_base_url, "/voters");

        Endpoints {
            request_otp: build_url_with_base(&auth, "/request-otp"),
            verify_otp: build_url_with_base(&auth, "/verify-otp"),
            upload_status: build_url_with_base(&voters, "/uploads/status"),
            uploads: build_url_with_base(&voters, "/uploads"),
            voters,
        }
    }
}

/// Absolute (or origin-relative) URLs of the backend routes the app calls.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Endpoints {
    pub request_otp: String,
    pub verify_otp: String,
    pub voters: String,
    pub upload_status: String,
    pub uploads: String,
}

/// Builds a URL from an explicit base URL and the provided path.
#[must_use]
pub fn build_url_with_base(base_url: &str, path: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let path = path.trim();

    if base.is_empty() {
        path.to_string()
    } else {
        format!("{}/{}", base, path.trim_start_matches('/'))
    }
}

#[derive(Default)]
struct RuntimeConfig {
    api_base_url: Option<String>,
    log_level: Option<String>,
}

fn apply_runtime_overrides(config: &mut AppConfig, runtime: RuntimeConfig) {
    if let Some(value) = runtime.api_base_url {
        config.api_base_url = value;
    }
    if let Some(value) = runtime.log_level {
        config.log_level = value;
    }
}

#[cfg(target_arch = "wasm32")]
fn runtime_config() -> Option<RuntimeConfig> {
    use js_sys::{Object, Reflect};
    use wasm_bindgen::JsValue;

    let window = web_sys::window()?;
    let config = Reflect::get(&window, &JsValue::from_str("VOTERDESK_CONFIG")).ok()?;
    if config.is_null() || config.is_undefined() {
        return None;
    }
    let object = Object::from(config);

    Some(RuntimeConfig {
        api_base_url: read_runtime_value(&object, "api_base_url"),
        log_level: read_runtime_value(&object, "log_level"),
    })
}

#[cfg(not(target_arch = "wasm32"))]
fn runtime_config() -> Option<RuntimeConfig> {
    None
}

#[cfg(target_arch = "wasm32")]
fn read_runtime_value(object: &js_sys::Object, key: &str) -> Option<String> {
    let value = js_sys::Reflect::get(object, &wasm_bindgen::JsValue::from_str(key))
        .ok()?
        .as_string()?;
    normalize_runtime_value(&value)
}

fn normalize_runtime_value(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::{
        AppConfig, RuntimeConfig, apply_runtime_overrides, build_url_with_base,
        normalize_runtime_value,
    };

    #[test]
    fn normalize_runtime_value_trims_and_rejects_empty() {
        assert_eq!(normalize_runtime_value(""), None);
        assert_eq!(normalize_runtime_value("   "), None);
        assert_eq!(
            normalize_runtime_value("  https://api.example.edu "),
            Some("https://api.example.edu".to_string())
        );
    }

    #[test]
    fn apply_runtime_overrides_ignores_empty_values() {
        let mut config = AppConfig::with_api_base("https://api.default");
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value(""),
            log_level: normalize_runtime_value("  "),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.default");
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn apply_runtime_overrides_overwrites_when_present() {
        let mut config = AppConfig::with_api_base("https://api.default");
        let runtime = RuntimeConfig {
            api_base_url: normalize_runtime_value("https://api.override/api"),
            log_level: normalize_runtime_value("debug"),
        };

        apply_runtime_overrides(&mut config, runtime);

        assert_eq!(config.api_base_url, "https://api.override/api");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn build_url_with_base_joins_without_duplicate_slashes() {
        assert_eq!(
            build_url_with_base("https://api.example.edu/api/", "/voters"),
            "https://api.example.edu/api/voters"
        );
        assert_eq!(build_url_with_base("", "/voters"), "/voters");
        assert_eq!(
            build_url_with_base(" https://api.example.edu ", "auth"),
            "https://api.example.edu/auth"
        );
    }

    #[test]
    fn endpoints_follow_backend_routes() {
        let endpoints = AppConfig::with_api_base("https://api.example.edu/api").endpoints();

        assert_eq!(
            endpoints.request_otp,
            "https://api.example.edu/api/auth/request-otp"
        );
        assert_eq!(
            endpoints.verify_otp,
            "https://api.example.edu/api/auth/verify-otp"
        );
        assert_eq!(endpoints.voters, "https://api.example.edu/api/voters");
        assert_eq!(
            endpoints.upload_status,
            "https://api.example.edu/api/voters/uploads/status"
        );
        assert_eq!(endpoints.uploads, "https://api.example.edu/api/voters/uploads");
    }

    #[test]
    fn endpoints_are_origin_relative_without_base() {
        let endpoints = AppConfig::with_api_base("").endpoints();
        assert_eq!(endpoints.request_otp, "/auth/request-otp");
        assert_eq!(endpoints.upload_status, "/voters/uploads/status");
    }
}
