//! Login Page

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_navigate;

use crate::components::FormField;
use crate::context::{use_auth, use_notifier};

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let navigate = use_navigate();

    let (username, set_username) = signal(String::new());
    let (password, set_password) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    // Signed in (now or by a restored session): leave the login screen
    Effect::new(move |_| {
        if auth.user.with(Option::is_some) {
            navigate("/", Default::default());
        }
    });

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        if submitting.get_untracked() {
            return;
        }
        let (user, pass) = (username.get_untracked(), password.get_untracked());
        if user.trim().is_empty() || pass.is_empty() {
            notifier.error("Enter your username and password");
            return;
        }
        set_submitting.set(true);
        spawn_local(async move {
            match auth.login(user, pass).await {
                Ok(()) => notifier.success("Signed in"),
                Err(err) if err.is_unauthorized() => notifier.error("Wrong username or password"),
                Err(err) => notifier.api_error(&err),
            }
            set_submitting.set(false);
        });
    };

    view! {
        <div class="auth-page">
            <form class="auth-card" on:submit=on_submit>
                <h1>"Core CRM"</h1>
                <p class="auth-subtitle">"Sign in to your account"</p>
                <FormField label="Username" value=username on_input=move |v| set_username.set(v) required=true/>
                <FormField label="Password" input_type="password" value=password on_input=move |v| set_password.set(v) required=true/>
                <button class="btn btn-primary btn-block" type="submit" disabled=move || submitting.get()>
                    {move || if submitting.get() { "Signing in..." } else { "Sign in" }}
                </button>
                <div class="auth-links">
                    <A href="/forgot-password">"Forgot password?"</A>
                    <A href="/register">"Create an account"</A>
                </div>
            </form>
        </div>
    }
}
