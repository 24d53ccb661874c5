//! Forgot Password Page
//!
//! Requests a reset link by email.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::api::request_password_reset;
use crate::components::FormField;
use crate::context::{use_api, use_notifier};

#[component]
pub fn ForgotPasswordPage() -> impl IntoView {
    let client = StoredValue::new(use_api());
    let notifier = use_notifier();

    let (email, set_email) = signal(String::new());
    let (sent, set_sent) = signal(false);
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let address = email.get_untracked().trim().to_string();
        if address.is_empty() {
            notifier.error("Enter your email address");
            return;
        }
        let client = client.get_value();
        set_submitting.set(true);
        spawn_local(async move {
            match request_password_reset(&client, &address).await {
                Ok(message) => {
                    notifier.success(message);
                    set_sent.set(true);
                }
                Err(err) => notifier.api_error(&err),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <Show
                when=move || sent.get()
                fallback=move || view! {
                    <form class="auth-card" on:submit=on_submit>
                        <h1>"Forgot password"</h1>
                        <p class="auth-subtitle">"We will email you a link to reset it."</p>
                        <FormField label="Email" input_type="email" value=email on_input=move |v| set_email.set(v) required=true/>
                        <button class="btn btn-primary btn-block" type="submit" disabled=move || submitting.get()>
                            "Send reset link"
                        </button>
                        <div class="auth-links"><A href="/login">"Back to sign in"</A></div>
                    </form>
                }
            >
                <div class="auth-card">
                    <h1>"Check your inbox"</h1>
                    <p>{move || format!("If {} belongs to an account, a reset link is on its way.", email.get())}</p>
                    <div class="auth-links"><A href="/login">"Back to sign in"</A></div>
                </div>
            </Show>
        </div>
    }
}
