use leptos::prelude::*;

#[component]
pub fn Spinner(#[prop(optional)] large: bool) -> impl IntoView {
    let size = if large { "h-32 w-32 border-t-2 border-b-2" } else { "h-5 w-5 border-2 border-t-transparent" };

    view! {
        <div
            class=format!("inline-block animate-spin rounded-full border-gray-800 {size}")
            role="status"
            aria-live="polite"
            aria-label="Loading"
        ></div>
    }
}
