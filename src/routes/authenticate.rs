//! Passcode sign-in page. All state lives in an `AuthFlow`; this component
//! only wires DOM events to it and runs the two requests as local actions.

use crate::{
    components::{Button, NoticeBanner, Spinner},
    features::auth::{
        flow::{AuthFlow, AuthStep, CODE_LENGTH, DigitEntry},
        state::use_auth,
        types::{CredentialRequest, PasscodeVerification},
    },
    routes::paths,
};
use gloo_timers::callback::Timeout;
use leptos::{ev::SubmitEvent, prelude::*};
use leptos_router::{components::A, hooks::use_navigate};
use wasm_bindgen::JsCast;
use web_sys::{HtmlElement, HtmlInputElement};

const NOTICE_MILLIS: u32 = 5_000;

#[component]
pub fn AuthenticatePage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();
    let flow = RwSignal::new(AuthFlow::new());

    let send_code = Action::new_local(move |request: &CredentialRequest| {
        let request = request.clone();
        let client = auth.auth_client();
        async move { client.request_passcode(&request).await }
    });

    let verify_code = Action::new_local(move |request: &PasscodeVerification| {
        let request = request.clone();
        let client = auth.auth_client();
        async move { client.verify_passcode(&request).await }
    });

    Effect::new(move |_| {
        if let Some(outcome) = send_code.value().get() {
            flow.update(|flow| {
                let _ = flow.complete_email_submission(outcome);
            });
        }
    });

    Effect::new(move |_| {
        if let Some(outcome) = verify_code.value().get() {
            let store = auth.store();
            let signed_in = flow
                .try_update(|flow| flow.complete_code_submission(outcome, &store))
                .and_then(Result::ok);
            if let Some(signed_in) = signed_in {
                auth.mark_signed_in();
                navigate(signed_in.redirect_to, Default::default());
            }
        }
    });

    let notice = Memo::new(move |_| flow.with(|flow| flow.notice().cloned()));
    let notice_serial = Memo::new(move |_| flow.with(AuthFlow::notice_serial));
    Effect::new(move |_| {
        let serial = notice_serial.get();
        if notice.with_untracked(Option::is_some) {
            schedule_dismiss(flow, serial);
        }
    });

    let on_email_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if let Some(Ok(request)) = flow.try_update(AuthFlow::begin_email_submission) {
            send_code.dispatch(request);
        }
    };

    let on_code_submit = move |event: SubmitEvent| {
        event.prevent_default();
        if let Some(Ok(request)) = flow.try_update(AuthFlow::begin_code_submission) {
            verify_code.dispatch(request);
        }
    };

    let step = move || flow.with(AuthFlow::step);
    let pending = Signal::derive(move || flow.with(AuthFlow::is_pending));
    let email = move || flow.with(|flow| flow.email().to_string());

    view! {
        <div class="flex items-center justify-center min-h-screen bg-gray-50">
            <div class="fixed top-4 right-4 w-80 z-50">
                {move || notice.get().map(|notice| view! { <NoticeBanner notice /> })}
            </div>
            <div class="w-full max-w-md mx-4 rounded-lg border border-gray-200 bg-white shadow-lg">
                <div class="space-y-1 p-6">
                    <A
                        href=paths::HOME
                        {..}
                        class="inline-flex items-center text-sm text-gray-500 hover:text-gray-700 transition-colors"
                        on:click=move |_| flow.update(AuthFlow::reset)
                    >
                        <span class="material-symbols-outlined mr-2 text-base">"arrow_back"</span>
                        "Back"
                    </A>
                    <h2 class="text-2xl font-bold tracking-tight">
                        {move || if step() == AuthStep::EnteringEmail { "Sign In" } else { "Verify Email" }}
                    </h2>
                    <p class="text-sm text-gray-500">
                        {move || {
                            if step() == AuthStep::EnteringEmail {
                                "Verify your email to continue".to_string()
                            } else {
                                format!("Enter the {CODE_LENGTH}-digit code sent to {}", email())
                            }
                        }}
                    </p>
                </div>
                <div class="p-6 pt-0">
                    <Show
                        when=move || step() == AuthStep::EnteringEmail
                        fallback=move || view! { <CodeForm flow pending on_submit=on_code_submit /> }
                    >
                        <EmailForm flow pending on_submit=on_email_submit />
                    </Show>
                </div>
            </div>
        </div>
    }
}

#[component]
fn EmailForm<F>(flow: RwSignal<AuthFlow>, pending: Signal<bool>, on_submit: F) -> impl IntoView
where
    F: Fn(SubmitEvent) + 'static,
{
    let typed = move || flow.with(|flow| !flow.email().is_empty());
    let valid = move || flow.with(AuthFlow::email_is_valid);

    view! {
        <form class="space-y-4" on:submit=on_submit>
            <div class="space-y-2">
                <label for="email" class="text-sm font-medium text-gray-700">"Email"</label>
                <input
                    id="email"
                    type="email"
                    placeholder="you@example.com"
                    autocomplete="email"
                    required
                    class="w-full rounded-md border px-3 py-2"
                    class:border-green-500=move || typed() && valid()
                    class:border-red-500=move || typed() && !valid()
                    prop:value=move || flow.with(|flow| flow.email().to_string())
                    disabled=move || pending.get()
                    on:input=move |event| {
                        let value = event_target_value(&event);
                        flow.update(|flow| flow.set_email(&value));
                    }
                />
                <Show when=move || typed() && !valid()>
                    <p class="text-sm text-red-500">"Enter a valid email"</p>
                </Show>
            </div>
            <Button
                button_type="submit"
                disabled=Signal::derive(move || !flow.with(AuthFlow::can_submit_email))
            >
                <Show when=move || pending.get() fallback=|| "Send Code">
                    <Spinner />
                    <span class="ml-2">"Sending Code..."</span>
                </Show>
            </Button>
        </form>
    }
}

#[component]
fn CodeForm<F>(flow: RwSignal<AuthFlow>, pending: Signal<bool>, on_submit: F) -> impl IntoView
where
    F: Fn(SubmitEvent) + 'static,
{
    view! {
        <form class="space-y-4" on:submit=on_submit>
            <div class="space-y-2">
                <label for="otp-0" class="text-sm font-medium text-gray-700">"Verification Code"</label>
                <div class="flex justify-between space-x-2">
                    {(0..CODE_LENGTH)
                        .map(|index| view! { <DigitInput flow pending index /> })
                        .collect_view()}
                </div>
            </div>
            <Button
                button_type="submit"
                disabled=Signal::derive(move || !flow.with(AuthFlow::can_submit_code))
            >
                <Show when=move || pending.get() fallback=|| "Verify">
                    <Spinner />
                    <span class="ml-2">"Verifying..."</span>
                </Show>
            </Button>
            <p class="text-center text-sm text-gray-500 mt-4">
                <button
                    type="button"
                    class="text-gray-600 hover:text-gray-800 underline"
                    on:click=move |_| flow.update(AuthFlow::change_email)
                >
                    "Wrong email? Change it"
                </button>
            </p>
            <p class="text-center text-xs text-gray-400 mt-2">
                "No code yet? Check your spam folder or try again in a few minutes."
            </p>
        </form>
    }
}

#[component]
fn DigitInput(flow: RwSignal<AuthFlow>, pending: Signal<bool>, index: usize) -> impl IntoView {
    let current = move || {
        flow.with(|flow| flow.digits().digit(index).map(String::from).unwrap_or_default())
    };

    view! {
        <input
            id=digit_id(index)
            autofocus=index == 0
            type="text"
            inputmode="numeric"
            autocomplete="one-time-code"
            class="w-12 h-12 rounded-md border text-center text-lg"
            prop:value=current
            disabled=move || pending.get()
            on:input=move |event| {
                let value = event_target_value(&event);
                match flow.try_update(|flow| flow.enter_digit(index, &value)) {
                    Some(DigitEntry::Filled { next_focus: Some(next) }) => focus_digit(next),
                    Some(DigitEntry::Rejected) => {
                        // Keep the slot's previous digit on screen.
                        event_target::<HtmlInputElement>(&event).set_value(&current());
                    }
                    _ => {}
                }
            }
        />
    }
}

fn digit_id(index: usize) -> String {
    format!("otp-{index}")
}

fn focus_digit(index: usize) {
    let element = web_sys::window()
        .and_then(|window| window.document())
        .and_then(|document| document.get_element_by_id(&digit_id(index)))
        .and_then(|element| element.dyn_into::<HtmlElement>().ok());
    if let Some(element) = element {
        let _ = element.focus();
    }
}

/// Hides the notice posted as `serial` after a few seconds. A newer notice
/// has a different serial and stays.
fn schedule_dismiss(flow: RwSignal<AuthFlow>, serial: u64) {
    Timeout::new(NOTICE_MILLIS, move || {
        flow.try_update(|flow| flow.dismiss_notice(serial));
    })
    .forget();
}
