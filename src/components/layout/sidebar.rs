//! Side navigation for the dashboard: Home (uploads) and Voters, plus logout.

use crate::{features::auth::state::use_auth, routes::paths};
use leptos::prelude::*;
use leptos_router::{
    NavigateOptions,
    components::A,
    hooks::{use_location, use_navigate},
};

#[component]
pub fn Sidebar(open: ReadSignal<bool>, set_open: WriteSignal<bool>) -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let location = use_location();
    let pathname = move || location.pathname.get();

    let on_logout = move |_| {
        auth.sign_out();
        navigate(paths::AUTHENTICATE, NavigateOptions::default());
    };

    view! {
        <aside
            class="bg-gray-200 text-gray-800 flex flex-col transition-all duration-300 ease-in-out"
            class:w-72=move || open.get()
            class:w-24=move || !open.get()
        >
            <div class="p-6 flex items-center justify-between">
                <Show when=move || open.get()>
                    <h1 class="text-2xl font-bold">"Dashboard"</h1>
                </Show>
                <button
                    type="button"
                    class="p-2 rounded-full hover:bg-gray-300 transition-colors"
                    aria-label="Toggle sidebar"
                    on:click=move |_| set_open.update(|open| *open = !*open)
                >
                    <span class="material-symbols-outlined">"menu"</span>
                </button>
            </div>
            <nav class="flex-1 overflow-y-auto">
                <ul class="space-y-2 p-4">
                    <SidebarLink
                        target=paths::DASHBOARD
                        icon="home"
                        label="Home"
                        open=open
                        active=Signal::derive(move || pathname() == paths::DASHBOARD)
                    />
                    <SidebarLink
                        target=paths::VOTERS
                        icon="group"
                        label="Voters"
                        open=open
                        active=Signal::derive(move || pathname().starts_with(paths::VOTERS))
                    />
                </ul>
            </nav>
            <button
                type="button"
                class="flex items-center justify-center p-6 bg-red-600 hover:bg-red-700 text-white transition-colors mt-auto text-lg font-semibold"
                class:flex-col=move || !open.get()
                on:click=on_logout
            >
                <span class="material-symbols-outlined mr-3">"logout"</span>
                <span class:text-xs=move || !open.get()>"Logout"</span>
            </button>
        </aside>
    }
}

#[component]
fn SidebarLink(
    target: &'static str,
    icon: &'static str,
    label: &'static str,
    open: ReadSignal<bool>,
    active: Signal<bool>,
) -> impl IntoView {
    view! {
        <li>
            <A
                href=target
                {..}
                class="flex items-center rounded-lg hover:bg-gray-300 transition-colors text-lg font-medium"
                class:p-4=move || open.get()
                class:p-2=move || !open.get()
                class:bg-gray-300=move || active.get()
            >
                <span class="material-symbols-outlined" class:mr-4=move || open.get()>
                    {icon}
                </span>
                <Show when=move || open.get()>
                    <span>{label}</span>
                </Show>
            </A>
        </li>
    }
}
