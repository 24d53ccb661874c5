//! Settings Page
//!
//! Pipeline stages and user accounts; managers and admins only.

use leptos::prelude::*;

use crate::api::{STAGES, USERS};
use crate::components::{DeleteConfirmButton, FormField, Modal, PaginationBar};
use crate::context::{use_auth, use_notifier};
use crate::forms::{FormModal, StageDraft, UserDraft};
use crate::listing::{use_list, ListQuery};
use crate::models::{DealStatus, Role};

use super::{delete_record, draft_field, submit_modal};

#[component]
pub fn SettingsPage() -> impl IntoView {
    view! {
        <div class="settings-page">
            <h2>"Settings"</h2>
            <StageSettings/>
            <UserSettings/>
        </div>
    }
}

#[component]
fn StageSettings() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let list = use_list(STAGES, |_| ListQuery::default());
    let sorted = move || {
        let mut stages = list.rows.get();
        stages.sort_by_key(|s| s.order);
        stages
    };

    let modal = RwSignal::new(FormModal::<StageDraft>::default());
    let (name, set_name) = draft_field(modal, |d| &d.name, |d, v| d.name = v);
    let (order, set_order) = draft_field(modal, |d| &d.order, |d, v| d.order = v);

    let open_create = move |_| {
        let next_order = list.rows.with_untracked(|s| s.iter().map(|s| s.order).max().unwrap_or(0) + 1);
        modal.update(|m| {
            m.open_create();
            m.draft.order = next_order.to_string();
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit_modal(modal, STAGES, auth.client(), notifier, move || list.reload());
    };

    view! {
        <div class="card">
            <div class="card-header">
                <h3>"Pipeline stages"</h3>
                <button class="btn btn-primary" on:click=open_create>"New stage"</button>
            </div>
            <table class="data-table">
                <thead>
                    <tr><th>"Order"</th><th>"Name"</th><th>"Type"</th><th></th></tr>
                </thead>
                <tbody>
                    <For each=sorted key=|s| (s.id, s.name.clone(), s.order, s.kind) let:stage>
                        {
                            let id = stage.id;
                            view! {
                                <tr>
                                    <td>{stage.order}</td>
                                    <td>{stage.name.clone()}</td>
                                    <td><span class=format!("tag {}", stage.kind.css())>{stage.kind.as_str()}</span></td>
                                    <td class="row-actions">
                                        <DeleteConfirmButton prompt="Delete stage?" on_confirm=move |_| {
                                            delete_record(STAGES, id, auth.client(), notifier, move || list.reload())
                                        }/>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>

            <Modal
                title="New stage".to_string()
                open=Signal::derive(move || modal.with(|m| m.open))
                on_close=move |_| modal.update(|m| m.close())
            >
                <form on:submit=on_submit>
                    <FormField label="Name" value=name on_input=set_name required=true/>
                    <FormField label="Order" input_type="number" value=order on_input=set_order/>
                    <div class="form-field">
                        <label>"Type"</label>
                        <select on:change=move |ev| {
                            if let Some(kind) = DealStatus::parse(&event_target_value(&ev)) {
                                modal.update(|m| m.draft.kind = kind);
                            }
                        }>
                            {[DealStatus::Open, DealStatus::Won, DealStatus::Lost].into_iter().map(|k| view! {
                                <option value=k.as_str() selected=move || modal.with(|m| m.draft.kind == k)>{k.as_str()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <div class="modal-actions">
                        <button class="btn" type="button" on:click=move |_| modal.update(|m| m.close())>"Cancel"</button>
                        <button class="btn btn-primary" type="submit" disabled=move || modal.with(|m| m.submitting)>"Save"</button>
                    </div>
                </form>
            </Modal>
        </div>
    }
}

#[component]
fn UserSettings() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let list = use_list(USERS, |page| ListQuery::search(page, ""));
    let me = move || auth.user.with(|u| u.as_ref().map(|u| u.id));

    let modal = RwSignal::new(FormModal::<UserDraft>::default());
    let (username, set_username) = draft_field(modal, |d| &d.username, |d, v| d.username = v);
    let (email, set_email) = draft_field(modal, |d| &d.email, |d, v| d.email = v);
    let (password, set_password) = draft_field(modal, |d| &d.password, |d, v| d.password = v);
    let is_edit = Signal::derive(move || modal.with(|m| m.is_edit()));

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let missing_password = modal.with_untracked(|m| !m.is_edit() && m.draft.password.is_empty());
        if missing_password {
            notifier.error("A new user needs a password");
            return;
        }
        submit_modal(modal, USERS, auth.client(), notifier, move || list.reload());
    };

    view! {
        <div class="card">
            <div class="card-header">
                <h3>"Users"</h3>
                <button class="btn btn-primary" on:click=move |_| modal.update(|m| m.open_create())>"New user"</button>
            </div>
            <table class="data-table" class:loading=move || list.loading.get()>
                <thead>
                    <tr><th>"Username"</th><th>"Email"</th><th>"Role"</th><th></th></tr>
                </thead>
                <tbody>
                    <For each=move || list.rows.get() key=|u| (u.id, u.email.clone(), u.role) let:user>
                        {
                            let id = user.id;
                            let edit_record = user.clone();
                            view! {
                                <tr>
                                    <td>{user.username.clone()}</td>
                                    <td>{user.email.clone()}</td>
                                    <td>{user.role.label()}</td>
                                    <td class="row-actions">
                                        <button class="btn btn-small" on:click=move |_| modal.update(|m| m.open_edit(id, &edit_record))>"Edit"</button>
                                        <Show when=move || me() != Some(id)>
                                            <DeleteConfirmButton prompt="Delete user?" on_confirm=move |_| {
                                                delete_record(USERS, id, auth.client(), notifier, move || list.reload())
                                            }/>
                                        </Show>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>

            <PaginationBar state=list.pagination on_change=move |p| list.page.set(p)/>

            <Modal
                title=Signal::derive(move || if is_edit.get() { "Edit user".to_string() } else { "New user".to_string() })
                open=Signal::derive(move || modal.with(|m| m.open))
                on_close=move |_| modal.update(|m| m.close())
            >
                <form on:submit=on_submit>
                    <FormField label="Username" value=username on_input=set_username disabled=is_edit.get_untracked() required=true/>
                    <FormField label="Email" input_type="email" value=email on_input=set_email/>
                    <div class="form-field">
                        <label>"Role"</label>
                        <select on:change=move |ev| {
                            if let Some(role) = Role::parse(&event_target_value(&ev)) {
                                modal.update(|m| m.draft.role = role);
                            }
                        }>
                            {[Role::Rep, Role::Manager, Role::Admin].into_iter().map(|r| view! {
                                <option value=r.as_str() selected=move || modal.with(|m| m.draft.role == r)>{r.label()}</option>
                            }).collect_view()}
                        </select>
                    </div>
                    <Show when=move || !is_edit.get()>
                        <FormField label="Password" input_type="password" value=password on_input=set_password required=true/>
                    </Show>
                    <div class="modal-actions">
                        <button class="btn" type="button" on:click=move |_| modal.update(|m| m.close())>"Cancel"</button>
                        <button class="btn btn-primary" type="submit" disabled=move || modal.with(|m| m.submitting)>"Save"</button>
                    </div>
                </form>
            </Modal>
        </div>
    }
}
