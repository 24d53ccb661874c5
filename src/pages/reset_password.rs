//! Reset Password Page
//!
//! Target of the emailed link `/reset-password/:uid/:token`.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::{use_navigate, use_params_map};

use crate::api::{check_new_password, confirm_password_reset};
use crate::components::FormField;
use crate::context::{use_api, use_notifier};

#[component]
pub fn ResetPasswordPage() -> impl IntoView {
    let client = StoredValue::new(use_api());
    let notifier = use_notifier();
    let navigate = use_navigate();
    let params = use_params_map();

    let (password, set_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (submitting, set_submitting) = signal(false);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let (new_password, confirmation) = (password.get_untracked(), confirm.get_untracked());
        if let Err(msg) = check_new_password(&new_password, &confirmation) {
            notifier.error(msg);
            return;
        }
        let (uid, token) = params.with_untracked(|p| (p.get("uid"), p.get("token")));
        let (Some(uid), Some(token)) = (uid, token) else {
            notifier.error("This reset link is incomplete");
            return;
        };
        let client = client.get_value();
        let navigate = navigate.clone();
        set_submitting.set(true);
        spawn_local(async move {
            match confirm_password_reset(&client, &uid, &token, &new_password).await {
                Ok(message) => {
                    notifier.success(message);
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
                <h1>"Choose a new password"</h1>
                <FormField label="New password" input_type="password" value=password on_input=move |v| set_password.set(v) required=true/>
                <FormField label="Confirm password" input_type="password" value=confirm on_input=move |v| set_confirm.set(v) required=true/>
                <button class="btn btn-primary btn-block" type="submit" disabled=move || submitting.get()>
                    "Reset password"
                </button>
            </form>
        </div>
    }
}
