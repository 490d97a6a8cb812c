use crate::app_lib::AppConfig;
use crate::features::auth::state::AuthProvider;
use crate::routes::AppRoutes;
use leptos::prelude::*;
use leptos_router::components::Router;

#[component]
pub fn App(config: AppConfig) -> impl IntoView {
    view! {
        <AuthProvider config>
            <Router>
                <AppRoutes />
            </Router>
        </AuthProvider>
    }
}
