//! Register Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::api::{register, RegisterRequest};
use crate::components::FormField;
use crate::context::{use_api, use_notifier};

#[component]
pub fn RegisterPage() -> impl IntoView {
    let client = StoredValue::new(use_api());
    let notifier = use_notifier();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (email, set_email) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if username.get_untracked().trim().is_empty() || password.get_untracked().is_empty() {
            notifier.error("Username and password are required");
            return;
        }
        if password.get_untracked() != confirm.get_untracked() {
            notifier.error("Passwords do not match");
            return;
        }
        let request = RegisterRequest {
            username: username.get_untracked().trim().to_string(),
            email: email.get_untracked().trim().to_string(),
            password: password.get_untracked(),
            role: None,
        };
        let client = client.get_value();
        let navigate = navigate.clone();
        set_submitting.set(true);
        spawn_local(async move {
            match register(&client, &request).await {
                Ok(()) => {
                    notifier.success("Account created, please sign in");
                    navigate("/login", Default::default());
                }
                Err(err) => notifier.api_error(&err),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Create account"</h1>
                <FormField label="Username" value=username on_input=move |v| set_username.set(v) required=true/>
                <FormField label="Email" input_type="email" value=email on_input=move |v| set_email.set(v)/>
                <FormField label="Password" input_type="password" value=password on_input=move |v| set_password.set(v) required=true/>
                <FormField label="Confirm password" input_type="password" value=confirm on_input=move |v| set_confirm.set(v) required=true/>
                <button class="btn btn-primary btn-block" type="submit" disabled=move || submitting.get()>
                    "Register"
                </button>
                <div class="auth-links">
                    <A href="/login">"Already have an account? Sign in"</A>
                </div>
            </form>
        </div>
    }
}
