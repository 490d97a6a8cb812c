pub mod paths;

#[cfg(target_arch = "wasm32")]
mod authenticate;
#[cfg(target_arch = "wasm32")]
mod dashboard;
#[cfg(target_arch = "wasm32")]
mod home;
#[cfg(target_arch = "wasm32")]
mod not_found;
#[cfg(target_arch = "wasm32")]
mod voters;

#[cfg(target_arch = "wasm32")]
pub(crate) use app_routes::AppRoutes;

#[cfg(target_arch = "wasm32")]
mod app_routes {
    use super::{
        authenticate::AuthenticatePage, dashboard::DashboardPage, home::HomePage,
        not_found::NotFoundPage, voters::VotersPage,
    };
    use crate::components::DashboardLayout;
    use leptos::prelude::*;
    use leptos_router::{
        components::{ParentRoute, Route, Routes},
        path,
    };

    #[component]
    pub fn AppRoutes() -> impl IntoView {
        view! {
            <Routes fallback=|| view! { <NotFoundPage /> }>
                <Route path=path!("/") view=HomePage />
                <Route path=path!("/authenticate") view=AuthenticatePage />
                <ParentRoute path=path!("/dashboard") view=DashboardLayout>
                    <Route path=path!("") view=DashboardPage />
                    <Route path=path!("voters") view=VotersPage />
                </ParentRoute>
            </Routes>
        }
    }
}
