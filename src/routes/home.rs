//! Landing page. Signed-in visitors are forwarded to the dashboard.

use crate::{features::auth::RedirectIfSignedIn, routes::paths};
use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn HomePage() -> impl IntoView {
    view! {
        <RedirectIfSignedIn>
            <div class="flex flex-col items-center justify-center min-h-screen bg-white px-4 py-16">
                <div class="text-center mb-16 max-w-2xl">
                    <h1 class="text-4xl font-bold mb-6 text-black">"Student Voter Management"</h1>
                    <p class="text-xl text-gray-600">
                        "Secure, efficient, and user-friendly student voting system."
                    </p>
                </div>
                <div class="grid grid-cols-1 md:grid-cols-3 gap-8 mb-16">
                    <FeatureItem icon="how_to_vote" title="Easy Registration" />
                    <FeatureItem icon="verified" title="Instant Verification" />
                    <FeatureItem icon="person_add" title="Data Management" />
                </div>
                <A
                    href=paths::AUTHENTICATE
                    {..}
                    class="inline-flex items-center justify-center rounded-md bg-black px-12 py-6 text-2xl font-bold text-white transition-all duration-300 ease-out hover:bg-gray-800"
                >
                    "Start Now"
                    <span class="material-symbols-outlined ml-6">"arrow_forward"</span>
                </A>
            </div>
        </RedirectIfSignedIn>
    }
}

#[component]
fn FeatureItem(icon: &'static str, title: &'static str) -> impl IntoView {
    view! {
        <div class="flex items-center space-x-3">
            <span class="material-symbols-outlined text-gray-800">{icon}</span>
            <span class="text-lg">{title}</span>
        </div>
    }
}
