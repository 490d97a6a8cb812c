//! Fallback for unknown paths.

use crate::routes::paths;
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="flex flex-col items-center justify-center min-h-screen text-center px-4">
            <div class="relative">
                <h1 class="text-9xl font-black text-gray-100 select-none">"404"</h1>
                <p class="absolute top-1/2 left-1/2 -translate-x-1/2 -translate-y-1/2 text-2xl font-bold text-gray-900 whitespace-nowrap">
                    "Page not found"
                </p>
            </div>
            <div class="mt-4 space-y-6">
                <p class="text-gray-500 max-w-sm mx-auto">
                    "The page you requested does not exist."
                </p>
                <div class="flex flex-col sm:flex-row items-center justify-center gap-4">
                    <A
                        href=paths::HOME
                        {..}
                        class="inline-flex items-center px-5 py-2.5 text-sm font-medium text-white bg-gray-800 rounded-md hover:bg-gray-700 transition-all"
                    >
                        <span class="material-symbols-outlined mr-2 text-base">"home"</span>
                        "Go Home"
                    </A>
                    <button
                        type="button"
                        on:click=move |_| {
                            if let Some(history) = web_sys::window().and_then(|window| window.history().ok()) {
                                let _ = history.back();
                            }
                        }
                        class="inline-flex items-center px-5 py-2.5 text-sm font-medium text-gray-900 bg-white border border-gray-200 rounded-md hover:bg-gray-100 transition-all"
                    >
                        <span class="material-symbols-outlined mr-2 text-base">"arrow_back"</span>
                        "Go Back"
                    </button>
                </div>
            </div>
        </div>
    }
}
