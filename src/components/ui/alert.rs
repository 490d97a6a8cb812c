//! Notice banners for sign-in and upload outcomes. Messages must be safe to
//! render and should never include emails, passcodes or tokens.

use crate::features::auth::flow::{Notice, NoticeKind};
use leptos::prelude::*;

#[derive(Clone, Copy)]
/// Supported alert styles.
pub enum AlertKind {
    Error,
    Success,
}

impl From<NoticeKind> for AlertKind {
    fn from(kind: NoticeKind) -> Self {
        match kind {
            NoticeKind::Success => AlertKind::Success,
            NoticeKind::Error => AlertKind::Error,
        }
    }
}

/// Renders a styled alert banner with an optional bold title.
#[component]
pub fn Alert(
    kind: AlertKind,
    message: String,
    #[prop(optional)] title: Option<&'static str>,
) -> impl IntoView {
    let class = match kind {
        AlertKind::Error => "rounded-lg border border-red-200 bg-red-50 px-4 py-3 text-sm text-red-800",
        AlertKind::Success => {
            "rounded-lg border border-green-200 bg-green-50 px-4 py-3 text-sm text-green-800"
        }
    };

    view! {
        <div class=class role="alert">
            {title.map(|title| view! { <p class="font-semibold">{title}</p> })}
            <p>{message}</p>
        </div>
    }
}

/// Banner for a flow notice.
#[component]
pub fn NoticeBanner(notice: Notice) -> impl IntoView {
    view! {
        <Alert
            kind=AlertKind::from(notice.kind)
            title=notice.title
            message=notice.message.to_string()
        />
    }
}
