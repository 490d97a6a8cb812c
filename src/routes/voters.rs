//! Voters dashboard: upload-task queue refreshed on a fixed poll, quick stats
//! and the filterable voter table. A 401 from either listing ends the session.

use crate::{
    app_lib::{AppError, config::POLL_INTERVAL, poll::PollTask},
    components::{Alert, AlertKind},
    features::{
        auth::state::use_auth,
        voters::{
            table::{SortDirection, VoterColumn, VoterFilters, VoterPage, VoterQuery, VoterStats},
            types::{UploadStatus, UploadTask, Voter},
        },
    },
    routes::paths,
};
use leptos::prelude::*;
use leptos_router::hooks::use_navigate;

const PAGE_SIZE_CHOICES: [usize; 3] = [10, 20, 50];

#[component]
pub fn VotersPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let voters = LocalResource::new(move || {
        let client = auth.voter_client();
        async move { client.list_voters().await }
    });
    let uploads = LocalResource::new(move || {
        let client = auth.voter_client();
        async move { client.upload_statuses().await }
    });

    let poll = StoredValue::new_local(Some(PollTask::start(POLL_INTERVAL, move || {
        uploads.refetch();
    })));
    let stop_polling = move || {
        poll.update_value(|task| {
            if let Some(mut task) = task.take() {
                task.stop();
            }
        });
    };
    on_cleanup(stop_polling);

    Effect::new(move |_| {
        let voters_expired = voters
            .get()
            .is_some_and(|result| result.is_err_and(|err| err.is_unauthorized()));
        let uploads_expired = uploads
            .get()
            .is_some_and(|result| result.is_err_and(|err| err.is_unauthorized()));
        if voters_expired || uploads_expired {
            stop_polling();
            auth.expire_session();
            navigate(paths::AUTHENTICATE, Default::default());
        }
    });

    let stats = Memo::new(move |_| {
        voters
            .get()
            .and_then(Result::ok)
            .map(|voters| VoterStats::from_voters(&voters))
            .unwrap_or_default()
    });

    view! {
        <div class="space-y-8 p-8 w-full">
            <div class="rounded-lg bg-black text-white w-full p-6">
                <h1 class="text-3xl font-bold">"Voter Management Dashboard"</h1>
                <p class="text-gray-400">
                    "Manage and monitor voter information and file processing"
                </p>
            </div>

            <div class="grid grid-cols-1 gap-8 w-full">
                <Card
                    title="File Processing Queue"
                    icon="description"
                    description="Monitor ongoing voter file processing tasks"
                >
                    {move || match uploads.get() {
                        None => view! { <Skeleton rows=3 /> }.into_any(),
                        Some(Err(err)) => view! { <ErrorNotice err /> }.into_any(),
                        Some(Ok(tasks)) => view! { <UploadQueue tasks /> }.into_any(),
                    }}
                </Card>

                <Card title="Quick Stats" icon="group" description="Overview of voter registration">
                    <div class="grid grid-cols-2 gap-4">
                        <StatTile label="Total Voters" icon="group" value=Signal::derive(move || stats.get().total) />
                        <StatTile label="Departments" icon="work" value=Signal::derive(move || stats.get().departments) />
                    </div>
                </Card>
            </div>

            <Card
                title="Voters List"
                icon="group"
                description="Comprehensive list of all registered voters"
            >
                {move || match voters.get() {
                    None => view! { <Skeleton rows=5 /> }.into_any(),
                    Some(Err(err)) => view! { <ErrorNotice err /> }.into_any(),
                    Some(Ok(voters)) => view! { <VoterTable voters /> }.into_any(),
                }}
            </Card>
        </div>
    }
}

#[component]
fn Card(
    title: &'static str,
    icon: &'static str,
    description: &'static str,
    children: Children,
) -> impl IntoView {
    view! {
        <section class="w-full rounded-lg border border-gray-200 bg-white shadow-sm">
            <header class="p-6 space-y-1">
                <h2 class="text-2xl font-semibold flex items-center">
                    <span class="material-symbols-outlined mr-2">{icon}</span>
                    {title}
                </h2>
                <p class="text-sm text-gray-500">{description}</p>
            </header>
            <div class="p-6 pt-0">{children()}</div>
        </section>
    }
}

#[component]
fn Skeleton(rows: usize) -> impl IntoView {
    view! {
        <div class="space-y-2">
            {(0..rows)
                .map(|_| view! { <div class="h-10 w-full animate-pulse rounded-md bg-gray-200"></div> })
                .collect_view()}
        </div>
    }
}

#[component]
fn ErrorNotice(err: AppError) -> impl IntoView {
    view! { <Alert kind=AlertKind::Error message=err.to_string() /> }
}

#[component]
fn StatTile(label: &'static str, icon: &'static str, value: Signal<usize>) -> impl IntoView {
    view! {
        <div class="bg-gray-100 p-4 rounded-lg">
            <h3 class="text-lg font-semibold text-gray-800 flex items-center">
                <span class="material-symbols-outlined mr-2">{icon}</span>
                {label}
            </h3>
            <p class="text-3xl font-bold text-black">{move || value.get()}</p>
        </div>
    }
}

#[component]
fn UploadQueue(tasks: Vec<UploadTask>) -> impl IntoView {
    if tasks.is_empty() {
        return view! { <p class="text-sm text-gray-500">"No uploads yet."</p> }.into_any();
    }

    view! {
        <div class="space-y-4 max-h-96 overflow-y-auto pr-2">
            {tasks.into_iter().map(|task| view! { <UploadRow task /> }).collect_view()}
        </div>
    }
    .into_any()
}

#[component]
fn UploadRow(task: UploadTask) -> impl IntoView {
    let percent = task.progress_percent();
    let failure = task.failure_reason().map(str::to_string);
    let total = task.total_records.unwrap_or(0);

    view! {
        <div class="bg-gray-50 p-4 rounded-lg shadow-sm border border-gray-200">
            <div class="flex justify-between items-center mb-2">
                <div>
                    <span class="font-medium">{format!("Task ID: {}", task.id)}</span>
                    <p class="text-sm text-gray-500">{format!("File: {}", task.file)}</p>
                </div>
                <StatusBadge status=task.status />
            </div>
            <div class="h-2 mb-2 w-full rounded-full bg-gray-200">
                <div class="h-2 rounded-full bg-gray-800" style=format!("width: {percent}%")></div>
            </div>
            <div class="flex justify-between text-sm text-gray-500">
                <span>{format!("Processed: {}", task.processed_records)}</span>
                <span>{format!("Total: {total}")}</span>
            </div>
            {failure.map(|reason| {
                view! {
                    <div class="mt-2 p-2 bg-red-50 border border-red-200 rounded-md">
                        <p class="text-sm text-red-800">{format!("Error: {reason}")}</p>
                    </div>
                }
            })}
        </div>
    }
}

#[component]
fn StatusBadge(status: UploadStatus) -> impl IntoView {
    let (icon, class) = match status {
        UploadStatus::Completed => ("check_circle", "bg-green-100 text-green-800"),
        UploadStatus::Processing => ("progress_activity", "bg-blue-100 text-blue-800"),
        UploadStatus::Pending => ("schedule", "bg-yellow-100 text-yellow-800"),
        UploadStatus::Failed => ("error", "bg-red-100 text-red-800"),
    };

    view! {
        <span class=format!("inline-flex items-center rounded-full border px-2.5 py-0.5 text-xs font-semibold {class}")>
            <span class="material-symbols-outlined mr-1 text-base">{icon}</span>
            {status.label()}
        </span>
    }
}

#[component]
fn VoterTable(voters: Vec<Voter>) -> impl IntoView {
    let query = RwSignal::new(VoterQuery::default());
    let page = Memo::new(move |_| query.with(|query| query.apply(&voters)));
    let columns = Memo::new(move |_| query.with(VoterQuery::visible_columns));

    let set_filter = move |edit: fn(&mut VoterFilters, String), value: String| {
        query.update(|query| {
            let mut filters = query.filters().clone();
            edit(&mut filters, value);
            query.set_filters(filters);
        });
    };

    view! {
        <div class="w-full">
            <div class="flex flex-col sm:flex-row items-center py-4 gap-2">
                <FilterInput
                    placeholder="Filter by name..."
                    on_input=move |value| set_filter(|filters, value| filters.name = value, value)
                />
                <FilterInput
                    placeholder="Filter by email..."
                    on_input=move |value| set_filter(|filters, value| filters.email = value, value)
                />
                <FilterInput
                    placeholder="Filter by department..."
                    on_input=move |value| set_filter(|filters, value| filters.department = value, value)
                />
                <ColumnToggles query />
            </div>
            <div class="rounded-md border overflow-x-auto">
                <table class="w-full text-sm">
                    <thead class="border-b">
                        <tr>
                            {move || {
                                columns
                                    .get()
                                    .into_iter()
                                    .map(|column| view! { <HeaderCell column query /> })
                                    .collect_view()
                            }}
                        </tr>
                    </thead>
                    <tbody>
                        {move || {
                            let columns = columns.get();
                            let VoterPage { rows, .. } = page.get();
                            if rows.is_empty() {
                                return view! {
                                    <tr>
                                        <td colspan=columns.len() class="h-24 text-center">
                                            "No results."
                                        </td>
                                    </tr>
                                }
                                .into_any();
                            }
                            rows.into_iter()
                                .map(|voter| view! { <VoterRow voter columns=columns.clone() /> })
                                .collect_view()
                                .into_any()
                        }}
                    </tbody>
                </table>
            </div>
            <div class="flex items-center justify-end space-x-2 py-4">
                <span class="text-sm text-gray-500 mr-auto">
                    {move || {
                        let page = page.get();
                        format!("Page {} of {} ({} voters)", page.page + 1, page.page_count, page.matching)
                    }}
                </span>
                <label class="text-sm text-gray-500">
                    "Rows per page"
                    <select
                        class="ml-2 rounded-md border px-2 py-1"
                        on:change=move |event| {
                            if let Ok(size) = event_target_value(&event).parse::<usize>() {
                                query.update(|query| query.set_page_size(size));
                            }
                        }
                    >
                        {PAGE_SIZE_CHOICES
                            .into_iter()
                            .map(|size| {
                                view! {
                                    <option
                                        value=size.to_string()
                                        selected=move || query.with(VoterQuery::page_size) == size
                                    >
                                        {size}
                                    </option>
                                }
                            })
                            .collect_view()}
                    </select>
                </label>
                <PagerButton
                    label="Previous"
                    enabled=Signal::derive(move || page.with(VoterPage::has_previous))
                    on_click=move || {
                        let shown = page.get_untracked();
                        query.update(|query| query.previous_page(&shown));
                    }
                />
                <PagerButton
                    label="Next"
                    enabled=Signal::derive(move || page.with(VoterPage::has_next))
                    on_click=move || {
                        let shown = page.get_untracked();
                        query.update(|query| query.next_page(&shown));
                    }
                />
            </div>
        </div>
    }
}

#[component]
fn FilterInput<F>(placeholder: &'static str, on_input: F) -> impl IntoView
where
    F: Fn(String) + 'static,
{
    view! {
        <input
            type="text"
            placeholder=placeholder
            class="max-w-sm w-full rounded-md border px-3 py-2"
            on:input=move |event| on_input(event_target_value(&event))
        />
    }
}

#[component]
fn ColumnToggles(query: RwSignal<VoterQuery>) -> impl IntoView {
    view! {
        <details class="ml-auto relative">
            <summary class="cursor-pointer rounded-md border px-4 py-2 text-sm">"Columns"</summary>
            <div class="absolute right-0 z-10 mt-2 w-56 rounded-md border bg-white p-2 shadow">
                {VoterColumn::ALL
                    .into_iter()
                    .map(|column| {
                        view! {
                            <label class="flex items-center gap-2 px-2 py-1 text-sm">
                                <input
                                    type="checkbox"
                                    prop:checked=move || query.with(|query| query.is_visible(column))
                                    on:change=move |event| {
                                        let visible = event_target_checked(&event);
                                        query.update(|query| query.set_column_visible(column, visible));
                                    }
                                />
                                {column.title()}
                            </label>
                        }
                    })
                    .collect_view()}
            </div>
        </details>
    }
}

#[component]
fn HeaderCell(column: VoterColumn, query: RwSignal<VoterQuery>) -> impl IntoView {
    if !column.is_sortable() {
        return view! { <th class="h-12 px-4 text-left font-medium text-gray-500">{column.title()}</th> }
            .into_any();
    }

    let arrow = move || match query.with(VoterQuery::sort) {
        Some((sorted, SortDirection::Ascending)) if sorted == column => "arrow_upward",
        Some((sorted, SortDirection::Descending)) if sorted == column => "arrow_downward",
        _ => "swap_vert",
    };

    view! {
        <th class="h-12 px-4 text-left font-medium text-gray-500">
            <button
                type="button"
                class="inline-flex items-center hover:text-gray-900"
                on:click=move |_| query.update(|query| query.toggle_sort(column))
            >
                {column.title()}
                <span class="material-symbols-outlined ml-2 text-base">{arrow}</span>
            </button>
        </th>
    }
    .into_any()
}

#[component]
fn VoterRow(voter: Voter, columns: Vec<VoterColumn>) -> impl IntoView {
    view! {
        <tr class="border-b">
            {columns
                .into_iter()
                .map(|column| {
                    let class = match column {
                        VoterColumn::FullName => "p-4 font-medium",
                        VoterColumn::Email => "p-4 lowercase",
                        _ => "p-4",
                    };
                    view! { <td class=class>{column.value(&voter).to_string()}</td> }
                })
                .collect_view()}
        </tr>
    }
}

#[component]
fn PagerButton<F>(label: &'static str, enabled: Signal<bool>, on_click: F) -> impl IntoView
where
    F: Fn() + 'static,
{
    view! {
        <button
            type="button"
            class="rounded-md border px-3 py-1.5 text-sm disabled:opacity-50"
            disabled=move || !enabled.get()
            on:click=move |_| on_click()
        >
            {label}
        </button>
    }
}
