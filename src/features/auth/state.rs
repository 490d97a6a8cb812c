//! Auth session state and context for the frontend. The provider opens the
//! session store once on mount and exposes an "authenticated" signal for guards
//! and routes. Tokens stay in the store; only the presence flag lives in a
//! signal.

use crate::{
    app_lib::{AppConfig, ResourceClient, SessionStore, storage::default_storage, transport::FetchTransport},
    features::{
        auth::{
            client::AuthClient,
            guards::{Access, GuardDecision, RouteGuard},
        },
        voters::client::VoterClient,
    },
};
use leptos::prelude::*;
use tracing::{info, warn};

#[derive(Clone, Copy)]
/// Auth session context shared through Leptos.
pub struct AuthContext {
    store: StoredValue<SessionStore>,
    config: StoredValue<AppConfig>,
    pub is_authenticated: RwSignal<bool>,
}

impl AuthContext {
    fn new(store: SessionStore, config: AppConfig) -> Self {
        let is_authenticated = RwSignal::new(store.is_present());
        Self {
            store: StoredValue::new(store),
            config: StoredValue::new(config),
            is_authenticated,
        }
    }

    pub fn store(&self) -> SessionStore {
        self.store.get_value()
    }

    /// Re-reads the store after a successful sign-in.
    pub fn mark_signed_in(&self) {
        self.is_authenticated.set(self.store().is_present());
    }

    pub fn decide(&self, access: Access) -> GuardDecision {
        RouteGuard::check(access, &self.store())
    }

    /// Logout: drops both tokens.
    pub fn sign_out(&self) {
        self.clear();
        info!("signed out");
    }

    /// The backend refused the stored token; forget it so guards send the user
    /// back to sign-in.
    pub fn expire_session(&self) {
        self.clear();
        info!("session expired");
    }

    pub fn auth_client(&self) -> AuthClient<FetchTransport> {
        let api = ResourceClient::new(FetchTransport, self.store());
        self.config.with_value(|config| AuthClient::new(api, config))
    }

    pub fn voter_client(&self) -> VoterClient<FetchTransport> {
        let api = ResourceClient::new(FetchTransport, self.store());
        self.config.with_value(|config| VoterClient::new(api, config))
    }

    fn clear(&self) {
        if let Err(err) = self.store().clear() {
            warn!(error = %err, "failed to clear stored session");
        }
        self.is_authenticated.set(false);
    }
}

/// Provides auth context backed by persistent storage.
#[component]
pub fn AuthProvider(config: AppConfig, children: Children) -> impl IntoView {
    let auth = AuthContext::new(SessionStore::new(default_storage()), config);
    provide_context(auth);

    view! { {children()} }
}

/// Returns the current auth context or a fallback in-memory context.
pub fn use_auth() -> AuthContext {
    use_context::<AuthContext>()
        .unwrap_or_else(|| AuthContext::new(SessionStore::in_memory(), AppConfig::load()))
}
