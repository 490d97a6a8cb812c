//! Dashboard home: bulk upload of voter files. Selections are checked against
//! `UploadRestrictions` before anything is sent; each file is then posted on
//! its own and reported individually.

use crate::{
    app_lib::AppError,
    components::{Alert, AlertKind, Button, Spinner},
    features::{
        auth::state::use_auth,
        voters::upload::{FileMeta, UploadRestrictions},
    },
    routes::paths,
};
use leptos::{
    ev::{Event, SubmitEvent},
    html,
    prelude::*,
};
use leptos_router::hooks::use_navigate;
use tracing::warn;
use web_sys::{File, HtmlInputElement};

#[derive(Clone)]
struct UploadOutcome {
    name: String,
    result: Result<(), AppError>,
}

impl UploadOutcome {
    fn message(&self) -> String {
        match &self.result {
            Ok(()) => format!("{} uploaded successfully", self.name),
            Err(err) => format!("Failed to upload {}: {err}", self.name),
        }
    }
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let restrictions = UploadRestrictions::default();
    let accept = restrictions.accept();
    let selected = RwSignal::new_local(Vec::<File>::new());
    let file_input = NodeRef::<html::Input>::new();
    let (selection_error, set_selection_error) = signal::<Option<String>>(None);

    let upload = Action::new_local(move |files: &Vec<File>| {
        let files = files.clone();
        let client = auth.voter_client();
        async move {
            let mut outcomes = Vec::with_capacity(files.len());
            for file in files {
                let result = client.upload_file(&file).await;
                let expired = result.as_ref().is_err_and(AppError::is_unauthorized);
                outcomes.push(UploadOutcome {
                    name: file.name(),
                    result,
                });
                if expired {
                    break;
                }
            }
            outcomes
        }
    });

    Effect::new(move |_| {
        let expired = upload.value().with(|outcomes| {
            outcomes.as_ref().is_some_and(|outcomes| {
                outcomes
                    .iter()
                    .any(|outcome| outcome.result.as_ref().is_err_and(AppError::is_unauthorized))
            })
        });
        if expired {
            auth.expire_session();
            navigate(paths::AUTHENTICATE, Default::default());
        } else if upload.value().with(Option::is_some) {
            selected.set(Vec::new());
            if let Some(input) = file_input.get_untracked() {
                input.set_value("");
            }
        }
    });

    let on_change = move |event: Event| {
        let input = event_target::<HtmlInputElement>(&event);
        let files = input.files().map(|list| {
            (0..list.length())
                .filter_map(|index| list.get(index))
                .collect::<Vec<_>>()
        });
        let files = files.unwrap_or_default();
        let metas: Vec<FileMeta> = files
            .iter()
            .map(|file| FileMeta::new(file.name(), file.size().max(0.0) as u64))
            .collect();

        match UploadRestrictions::default().check(&metas) {
            Ok(()) => {
                set_selection_error.set(None);
                selected.set(files);
            }
            Err(err) => {
                warn!(error = %err, "file selection rejected");
                set_selection_error.set(Some(err.to_string()));
                selected.set(Vec::new());
                input.set_value("");
            }
        }
    };

    let can_upload =
        Signal::derive(move || !selected.with(Vec::is_empty) && !upload.pending().get());

    let on_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if can_upload.get_untracked() {
            upload.dispatch(selected.get_untracked());
        }
    };

    view! {
        <div class="max-w-4xl mx-auto space-y-8 p-8">
            <div class="bg-gray-50 rounded-lg p-6 shadow-sm space-y-4">
                <h2 class="text-2xl font-semibold">"Upload Voters' Information"</h2>
                <p class="text-sm text-gray-500">
                    {format!(
                        "Up to {} files ({}), at least {} KB each, {} MB in total.",
                        restrictions.max_files,
                        accept,
                        restrictions.min_file_bytes / 1024,
                        restrictions.max_total_bytes / (1024 * 1024),
                    )}
                </p>
                <input
                    node_ref=file_input
                    type="file"
                    multiple
                    accept=accept.clone()
                    class="block w-full text-sm text-gray-700 border border-gray-300 rounded-md cursor-pointer bg-white p-2"
                    disabled=move || upload.pending().get()
                    on:change=on_change
                />
                <ul class="text-sm text-gray-600 space-y-1">
                    {move || {
                        selected
                            .with(|files| files.iter().map(File::name).collect::<Vec<_>>())
                            .into_iter()
                            .map(|name| view! { <li>{name}</li> })
                            .collect_view()
                    }}
                </ul>
                {move || {
                    selection_error
                        .get()
                        .map(|message| view! { <Alert kind=AlertKind::Error message /> })
                }}
                <form on:submit=on_submit>
                    <Button button_type="submit" disabled=Signal::derive(move || !can_upload.get())>
                        <Show when=move || upload.pending().get() fallback=|| "Upload">
                            <Spinner />
                            <span class="ml-2">"Uploading..."</span>
                        </Show>
                    </Button>
                </form>
                <div class="space-y-2">
                    {move || {
                        upload
                            .value()
                            .get()
                            .unwrap_or_default()
                            .into_iter()
                            .map(|outcome| {
                                let kind = if outcome.result.is_ok() {
                                    AlertKind::Success
                                } else {
                                    AlertKind::Error
                                };
                                view! { <Alert kind message=outcome.message() /> }
                            })
                            .collect_view()
                    }}
                </div>
            </div>
        </div>
    }
}
