//! Customers Page
//!
//! Searchable customer table with CSV import and a downloadable template.

use leptos::html;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::api::{import_customers, is_csv, ImportSummary, CSV_TEMPLATE, CSV_TEMPLATE_FILE, CUSTOMERS};
use crate::components::{DeleteConfirmButton, FormField, Modal, PaginationBar, SearchInput};
use crate::context::{use_auth, use_notifier};
use crate::download::{picked_file, read_file, save_text};
use crate::format;
use crate::forms::{CustomerDraft, FormModal};
use crate::listing::{use_list, ListQuery};

use super::{delete_record, draft_field, submit_modal};

#[component]
pub fn CustomersPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let search = RwSignal::new(String::new());
    let list = use_list(CUSTOMERS, move |page| ListQuery::search(page, &search.get()));

    let modal = RwSignal::new(FormModal::<CustomerDraft>::default());
    let (name, set_name) = draft_field(modal, |d| &d.name, |d, v| d.name = v);
    let (email, set_email) = draft_field(modal, |d| &d.email, |d, v| d.email = v);
    let (phone, set_phone) = draft_field(modal, |d| &d.phone, |d, v| d.phone = v);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit_modal(modal, CUSTOMERS, auth.client(), notifier, move || list.reload());
    };

    // CSV import
    let file_input = NodeRef::<html::Input>::new();
    let importing = RwSignal::new(false);
    let import_result = RwSignal::new(None::<ImportSummary>);

    let on_file_picked = move |_| {
        let Some(input) = file_input.get() else { return };
        let Some(file) = picked_file(&input) else { return };
        input.set_value("");
        if !is_csv(&file.name()) {
            notifier.error("Please choose a .csv file");
            return;
        }
        let client = auth.client();
        importing.set(true);
        spawn_local(async move {
            let result = match read_file(&file).await {
                Ok((file_name, bytes)) => import_customers(&client, &file_name, bytes).await,
                Err(err) => Err(err),
            };
            match result {
                Ok(summary) => {
                    notifier.success(summary.message.clone());
                    import_result.set(Some(summary));
                    list.reload();
                }
                Err(err) => notifier.api_error(&err),
            }
            importing.set(false);
        });
    };

    let download_template = move |_| {
        if let Err(err) = save_text(CSV_TEMPLATE_FILE, "text/csv;charset=utf-8", CSV_TEMPLATE) {
            notifier.api_error(&err);
        }
    };

    view! {
        <div class="list-page">
            <div class="page-header">
                <h2>"Customers"</h2>
                <div class="page-actions">
                    <button class="btn" on:click=download_template>"CSV template"</button>
                    <button
                        class="btn"
                        disabled=move || importing.get()
                        on:click=move |_| {
                            if let Some(input) = file_input.get() {
                                input.click();
                            }
                        }
                    >
                        {move || if importing.get() { "Importing..." } else { "Import CSV" }}
                    </button>
                    <input type="file" accept=".csv" class="hidden" node_ref=file_input on:change=on_file_picked/>
                    <button class="btn btn-primary" on:click=move |_| modal.update(|m| m.open_create())>"New customer"</button>
                </div>
            </div>

            {move || import_result.get().filter(|r| !r.errors.is_empty()).map(|r| view! {
                <div class="import-errors">
                    <div class="import-errors-header">
                        <span>{format!("{} rows were skipped", r.errors.len())}</span>
                        <button class="btn btn-small" on:click=move |_| import_result.set(None)>"×"</button>
                    </div>
                    <ul>{r.errors.into_iter().map(|e| view! { <li>{e}</li> }).collect_view()}</ul>
                </div>
            })}

            <SearchInput
                placeholder="Search by name, email or phone"
                on_search=move |text: String| {
                    list.page.set(1);
                    search.set(text);
                }
            />

            <table class="data-table" class:loading=move || list.loading.get()>
                <thead>
                    <tr>
                        <th>"Name"</th>
                        <th>"Email"</th>
                        <th>"Phone"</th>
                        <th>"Created"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For each=move || list.rows.get() key=|c| (c.id, c.name.clone(), c.email.clone(), c.phone.clone()) let:customer>
                        {
                            let id = customer.id;
                            let edit_record = customer.clone();
                            view! {
                                <tr>
                                    <td><A href=format!("/customers/{}", id)>{customer.name.clone()}</A></td>
                                    <td>{customer.email.clone().unwrap_or_default()}</td>
                                    <td>{customer.phone.clone().unwrap_or_default()}</td>
                                    <td>{format::datetime(customer.created_at)}</td>
                                    <td class="row-actions">
                                        <button class="btn btn-small" on:click=move |_| modal.update(|m| m.open_edit(id, &edit_record))>"Edit"</button>
                                        <DeleteConfirmButton prompt="Delete customer?" on_confirm=move |_| {
                                            delete_record(CUSTOMERS, id, auth.client(), notifier, move || list.reload())
                                        }/>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
            <Show when=move || !list.loading.get() && list.rows.with(Vec::is_empty)>
                <p class="empty">"No customers found"</p>
            </Show>

            <PaginationBar state=list.pagination on_change=move |p| list.page.set(p)/>

            <Modal
                title=Signal::derive(move || if modal.with(|m| m.is_edit()) { "Edit customer".to_string() } else { "New customer".to_string() })
                open=Signal::derive(move || modal.with(|m| m.open))
                on_close=move |_| modal.update(|m| m.close())
            >
                <form on:submit=on_submit>
                    <FormField label="Name" value=name on_input=set_name required=true/>
                    <FormField label="Email" input_type="email" value=email on_input=set_email/>
                    <FormField label="Phone" value=phone on_input=set_phone/>
                    <div class="modal-actions">
                        <button class="btn" type="button" on:click=move |_| modal.update(|m| m.close())>"Cancel"</button>
                        <button class="btn btn-primary" type="submit" disabled=move || modal.with(|m| m.submitting)>"Save"</button>
                    </div>
                </form>
            </Modal>
        </div>
    }
}
