//! Pages
//!
//! One component per route, plus the modal-form plumbing the CRUD pages share.

mod customer_detail;
mod customers;
mod dashboard;
mod forgot_password;
mod kanban;
mod login;
mod not_found;
mod opportunities;
mod opportunity_detail;
mod products;
mod profile;
mod register;
mod reset_password;
mod settings;

pub use customer_detail::CustomerDetailPage;
pub use customers::CustomersPage;
pub use dashboard::DashboardPage;
pub use forgot_password::ForgotPasswordPage;
pub use kanban::KanbanPage;
pub use login::LoginPage;
pub use not_found::NotFoundPage;
pub use opportunities::OpportunitiesPage;
pub use opportunity_detail::OpportunityDetailPage;
pub use products::ProductsPage;
pub use profile::ProfilePage;
pub use register::RegisterPage;
pub use reset_password::ResetPasswordPage;
pub use settings::SettingsPage;

use leptos::prelude::*;
use leptos::task::spawn_local;
use serde::de::DeserializeOwned;

use crate::api::{ApiClient, Resource};
use crate::context::Notifier;
use crate::forms::{Draft, FormModal, Submission};

/// Read/write pair binding one text field of a modal's draft to a `FormField`.
pub(crate) fn draft_field<D: Draft>(
    modal: RwSignal<FormModal<D>>,
    get: fn(&D) -> &String,
    set: fn(&mut D, String),
) -> (Signal<String>, Callback<String>) {
    let value = Signal::derive(move || modal.with(|m| get(&m.draft).clone()));
    let on_input = Callback::new(move |v: String| modal.update(|m| set(&mut m.draft, v)));
    (value, on_input)
}

/// Send the modal's create or update, then run `on_saved` (usually a list reload).
/// Validation problems and failed requests keep the modal open.
pub(crate) fn submit_modal<D>(
    modal: RwSignal<FormModal<D>>,
    resource: Resource<D::Record>,
    client: ApiClient,
    notifier: Notifier,
    on_saved: impl FnOnce() + 'static,
) where
    D: Draft,
    D::Record: DeserializeOwned + 'static,
{
    if modal.with_untracked(|m| m.submitting) {
        return;
    }
    let submission = match modal.try_update(|m| m.submission()) {
        Some(Ok(submission)) => submission,
        Some(Err(msg)) => {
            notifier.error(msg);
            return;
        }
        None => return,
    };

    spawn_local(async move {
        let (result, done) = match &submission {
            Submission::Create(fields) => (resource.create(&client, fields).await, "Created"),
            Submission::Update { id, fields } => (resource.update(&client, *id, fields).await, "Saved"),
            Submission::Nothing => return,
        };
        match result {
            Ok(()) => {
                modal.update(|m| m.finish(true));
                notifier.success(done);
                on_saved();
            }
            Err(err) => {
                modal.update(|m| m.finish(false));
                notifier.api_error(&err);
            }
        }
    });
}

/// Delete one record and run `on_deleted` once the backend confirms.
pub(crate) fn delete_record<T: DeserializeOwned + 'static>(
    resource: Resource<T>,
    id: u32,
    client: ApiClient,
    notifier: Notifier,
    on_deleted: impl FnOnce() + 'static,
) {
    spawn_local(async move {
        match resource.delete(&client, id).await {
            Ok(()) => {
                notifier.success("Deleted");
                on_deleted();
            }
            Err(err) => notifier.api_error(&err),
        }
    });
}
