//! Authenticated layout: collapsible sidebar with navigation and logout, and
//! the nested dashboard route in the main area. Rendering is gated on a stored
//! session; the backend still enforces access on every request.

use crate::{
    app_lib::GIT_COMMIT_HASH,
    components::layout::Sidebar,
    features::auth::RequireSession,
};
use leptos::prelude::*;
use leptos_router::components::Outlet;

#[component]
pub fn DashboardLayout() -> impl IntoView {
    let (sidebar_open, set_sidebar_open) = signal(true);

    view! {
        <RequireSession>
            <div class="flex h-screen bg-gray-100">
                <Sidebar open=sidebar_open set_open=set_sidebar_open />
                <main class="flex-1 overflow-y-auto bg-white">
                    <Outlet />
                    <p class="px-8 pb-4 text-[10px] text-gray-400 font-mono">
                        {format!("build {GIT_COMMIT_HASH}")}
                    </p>
                </main>
            </div>
        </RequireSession>
    }
}
