//! Route gating based on the presence of stored tokens. This is a navigation
//! convenience only; the backend still rejects requests whose bearer token it
//! does not accept.

use crate::{app_lib::SessionStore, routes::paths};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Access {
    /// Requires both tokens; otherwise go to sign-in.
    Protected,
    /// Landing page; signed-in users go straight to the dashboard.
    GuestOnly,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Redirect(&'static str),
}

pub struct RouteGuard;

impl RouteGuard {
    #[must_use]
    pub fn check(access: Access, store: &SessionStore) -> GuardDecision {
        match (access, store.is_present()) {
            (Access::Protected, false) => GuardDecision::Redirect(paths::AUTHENTICATE),
            (Access::GuestOnly, true) => GuardDecision::Redirect(paths::DASHBOARD),
            _ => GuardDecision::Render,
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub use components::{RedirectIfSignedIn, RequireSession};

#[cfg(target_arch = "wasm32")]
mod components {
    use super::{Access, GuardDecision};
    use crate::{components::ui::Spinner, features::auth::state::use_auth};
    use leptos::prelude::*;
    use leptos_router::{NavigateOptions, hooks::use_navigate};

    /// Renders children only while a session is stored; otherwise navigates to
    /// sign-in and shows a spinner in the meantime.
    #[component]
    pub fn RequireSession(children: ChildrenFn) -> impl IntoView {
        let auth = use_auth();
        let navigate = use_navigate();

        Effect::new(move |_| {
            auth.is_authenticated.track();
            if let GuardDecision::Redirect(target) = auth.decide(Access::Protected) {
                navigate(
                    target,
                    NavigateOptions {
                        replace: true,
                        ..Default::default()
                    },
                );
            }
        });

        view! {
            <Show
                when=move || auth.is_authenticated.get()
                fallback=|| {
                    view! {
                        <div class="flex items-center justify-center h-screen bg-gray-100">
                            <Spinner large=true />
                        </div>
                    }
                }
            >
                {children()}
            </Show>
        }
    }

    /// Sends signed-in visitors of a guest page to the dashboard.
    #[component]
    pub fn RedirectIfSignedIn(children: Children) -> impl IntoView {
        let auth = use_auth();
        let navigate = use_navigate();

        Effect::new(move |_| {
            auth.is_authenticated.track();
            if let GuardDecision::Redirect(target) = auth.decide(Access::GuestOnly) {
                navigate(target, NavigateOptions::default());
            }
        });

        view! { {children()} }
    }
}
