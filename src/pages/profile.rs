//! Profile Page
//!
//! Email update and password change for the signed-in user.

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde_json::{Map, Value};

use crate::api::{change_password, check_new_password, update_me};
use crate::components::{ClientLog, FormField};
use crate::context::{use_auth, use_notifier};

#[component]
pub fn ProfilePage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let current_email = move || auth.user.with(|u| u.as_ref().map(|u| u.email.clone()).unwrap_or_default());
    let (email, set_email) = signal(current_email());
    let (saving, set_saving) = signal(false);

    let (old_password, set_old_password) = signal(String::new());
    let (new_password, set_new_password) = signal(String::new());
    let (confirm, set_confirm) = signal(String::new());
    let (old_password_error, set_old_password_error) = signal(None::<String>);
    let (changing, set_changing) = signal(false);

    let save_profile = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let value = email.get_untracked().trim().to_string();
        if value == current_email() {
            return;
        }
        let mut fields = Map::new();
        fields.insert("email".into(), Value::String(value));
        let client = auth.client();
        set_saving.set(true);
        spawn_local(async move {
            let result = match update_me(&client, &fields).await {
                Ok(_) => auth.refresh().await,
                Err(err) => Err(err),
            };
            match result {
                Ok(()) => notifier.success("Profile updated"),
                Err(err) => notifier.api_error(&err),
            }
            set_saving.set(false);
        });
    };

    let submit_password = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        set_old_password_error.set(None);
        let (old, new) = (old_password.get_untracked(), new_password.get_untracked());
        if old.is_empty() {
            set_old_password_error.set(Some("Enter your current password".to_string()));
            return;
        }
        if let Err(msg) = check_new_password(&new, &confirm.get_untracked()) {
            notifier.error(msg);
            return;
        }
        let client = auth.client();
        set_changing.set(true);
        spawn_local(async move {
            match change_password(&client, &old, &new).await {
                Ok(message) => {
                    notifier.success(message);
                    set_old_password.set(String::new());
                    set_new_password.set(String::new());
                    set_confirm.set(String::new());
                    // Basic credentials embed the password
                    let username = auth.user.with_untracked(|u| u.as_ref().map(|u| u.username.clone()));
                    if let Some(username) = username {
                        if auth.login(username, new).await.is_err() {
                            notifier.error("Password changed, please sign in again");
                        }
                    }
                }
                Err(err) => match err.field_error("old_password") {
                    Some(msg) => set_old_password_error.set(Some(msg)),
                    None => notifier.api_error(&err),
                },
            }
            set_changing.set(false);
        });
    };

    view! {
        <div class="profile-page">
            <h2>"My profile"</h2>
            <div class="card">
                <dl class="profile-summary">
                    <dt>"Username"</dt>
                    <dd>{move || auth.user.with(|u| u.as_ref().map(|u| u.username.clone()))}</dd>
                    <dt>"Role"</dt>
                    <dd>{move || auth.role().map(|r| r.label())}</dd>
                </dl>
                <form on:submit=save_profile>
                    <FormField label="Email" input_type="email" value=email on_input=move |v| set_email.set(v)/>
                    <button class="btn btn-primary" type="submit" disabled=move || saving.get()>"Save"</button>
                </form>
            </div>

            <div class="card">
                <h3>"Change password"</h3>
                <form on:submit=submit_password>
                    <FormField label="Current password" input_type="password" value=old_password on_input=move |v| set_old_password.set(v) required=true/>
                    {move || old_password_error.get().map(|msg| view! { <div class="field-error">{msg}</div> })}
                    <FormField label="New password" input_type="password" value=new_password on_input=move |v| set_new_password.set(v) required=true/>
                    <FormField label="Confirm new password" input_type="password" value=confirm on_input=move |v| set_confirm.set(v) required=true/>
                    <button class="btn btn-primary" type="submit" disabled=move || changing.get()>"Change password"</button>
                </form>
            </div>

            <ClientLog/>
        </div>
    }
}

