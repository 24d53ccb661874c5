//! Opportunities Page
//!
//! Filterable deal table with CSV export and the create/edit modal.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::api::{export_file_name, export_opportunities, OpportunityFilter, CUSTOMERS, OPPORTUNITIES, STAGES, USERS};
use crate::components::{DeleteConfirmButton, FormField, Modal, PaginationBar, SearchInput, StatusTag};
use crate::config::LOOKUP_PAGE_SIZE;
use crate::context::{use_auth, use_notifier};
use crate::download::save_bytes;
use crate::format;
use crate::forms::{FormModal, OpportunityDraft};
use crate::listing::use_list;
use crate::models::{Customer, DealStatus, PipelineStage, User};

use super::{delete_record, draft_field, submit_modal};

#[component]
pub fn OpportunitiesPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let filter = RwSignal::new(OpportunityFilter::default());
    let list = use_list(OPPORTUNITIES, move |page| filter.with(|f| f.query(page)));

    let set_filter = move |apply: fn(&mut OpportunityFilter, String), value: String| {
        list.page.set(1);
        filter.update(|f| apply(f, value));
    };

    // Choices for the filter and form selects
    let stages = RwSignal::new(Vec::<PipelineStage>::new());
    let customers = RwSignal::new(Vec::<Customer>::new());
    let owners = RwSignal::new(Vec::<User>::new());
    {
        let client = auth.client();
        let load_owners = auth.can_manage();
        spawn_local(async move {
            let everything = [("page_size", LOOKUP_PAGE_SIZE.to_string())];
            match STAGES.all(&client, &[]).await {
                Ok(mut list) => {
                    list.sort_by_key(|s| s.order);
                    stages.set(list);
                }
                Err(err) => notifier.api_error(&err),
            }
            match CUSTOMERS.all(&client, &everything).await {
                Ok(list) => customers.set(list),
                Err(err) => notifier.api_error(&err),
            }
            if load_owners {
                match USERS.all(&client, &everything).await {
                    Ok(list) => owners.set(list),
                    Err(err) => notifier.api_error(&err),
                }
            }
        });
    }

    let modal = RwSignal::new(FormModal::<OpportunityDraft>::default());
    let (title, set_title) = draft_field(modal, |d| &d.title, |d, v| d.title = v);
    let (customer, set_customer) = draft_field(modal, |d| &d.customer, |d, v| d.customer = v);
    let (value, set_value) = draft_field(modal, |d| &d.value, |d, v| d.value = v);
    let (close_date, set_close_date) =
        draft_field(modal, |d| &d.expected_close_date, |d, v| d.expected_close_date = v);
    let (stage, set_stage) = draft_field(modal, |d| &d.stage, |d, v| d.stage = v);

    let open_create = move |_| {
        modal.update(|m| {
            m.open_create();
            if let Some(first) = stages.with_untracked(|s| s.iter().find(|s| s.kind == DealStatus::Open).map(|s| s.id)) {
                m.draft.stage = first.to_string();
            }
        });
    };

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit_modal(modal, OPPORTUNITIES, auth.client(), notifier, move || list.reload());
    };

    let exporting = RwSignal::new(false);
    let on_export = move |_| {
        let client = auth.client();
        exporting.set(true);
        spawn_local(async move {
            let result = match export_opportunities(&client).await {
                Ok(bytes) => {
                    let file_name = export_file_name(chrono::Local::now().date_naive());
                    save_bytes(&file_name, "text/csv;charset=utf-8", &bytes)
                }
                Err(err) => Err(err),
            };
            if let Err(err) = result {
                notifier.api_error(&err);
            }
            exporting.set(false);
        });
    };

    view! {
        <div class="list-page">
            <div class="page-header">
                <h2>"Opportunities"</h2>
                <div class="page-actions">
                    <button class="btn" disabled=move || exporting.get() on:click=on_export>"Export CSV"</button>
                    <button class="btn btn-primary" on:click=open_create>"New opportunity"</button>
                </div>
            </div>

            <div class="filter-bar">
                <SearchInput
                    placeholder="Search opportunities"
                    on_search=move |text: String| set_filter(|f, v| f.search = v, text)
                />
                <select on:change=move |ev| set_filter(|f, v| f.status = v, event_target_value(&ev))>
                    <option value="">"All statuses"</option>
                    {[DealStatus::Open, DealStatus::Won, DealStatus::Lost].into_iter().map(|s| view! {
                        <option value=s.as_str()>{s.as_str()}</option>
                    }).collect_view()}
                </select>
                <select on:change=move |ev| set_filter(|f, v| f.stage = v, event_target_value(&ev))>
                    <option value="">"All stages"</option>
                    <For each=move || stages.get() key=|s| s.id let:s>
                        <option value=s.id.to_string()>{s.name}</option>
                    </For>
                </select>
                <Show when=move || auth.can_manage()>
                    <select on:change=move |ev| set_filter(|f, v| f.owner = v, event_target_value(&ev))>
                        <option value="">"All owners"</option>
                        <For each=move || owners.get() key=|u| u.id let:u>
                            <option value=u.id.to_string()>{u.username}</option>
                        </For>
                    </select>
                </Show>
            </div>

            <table class="data-table" class:loading=move || list.loading.get()>
                <thead>
                    <tr>
                        <th>"Title"</th>
                        <th>"Customer"</th>
                        <th>"Stage"</th>
                        <th>"Status"</th>
                        <th>"Value"</th>
                        <th>"Expected close"</th>
                        <th>"Owner"</th>
                        <th></th>
                    </tr>
                </thead>
                <tbody>
                    <For each=move || list.rows.get() key=|o| (o.id, o.updated_at, o.stage, o.value.to_bits()) let:opp>
                        {
                            let id = opp.id;
                            let edit_record = opp.clone();
                            view! {
                                <tr>
                                    <td><A href=format!("/opportunities/{}", id)>{opp.title.clone()}</A></td>
                                    <td><A href=format!("/customers/{}", opp.customer)>{opp.customer_name.clone()}</A></td>
                                    <td>{opp.stage_name.clone()}</td>
                                    <td><StatusTag status=opp.status/></td>
                                    <td>{format::currency(opp.value)}</td>
                                    <td>{format::date(opp.expected_close_date)}</td>
                                    <td>{opp.owner_name.clone()}</td>
                                    <td class="row-actions">
                                        <button class="btn btn-small" on:click=move |_| modal.update(|m| m.open_edit(id, &edit_record))>"Edit"</button>
                                        <DeleteConfirmButton prompt="Delete deal?" on_confirm=move |_| {
                                            delete_record(OPPORTUNITIES, id, auth.client(), notifier, move || list.reload())
                                        }/>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
            <Show when=move || !list.loading.get() && list.rows.with(Vec::is_empty)>
                <p class="empty">"No opportunities match"</p>
            </Show>

            <PaginationBar state=list.pagination on_change=move |p| list.page.set(p)/>

            <Modal
                title=Signal::derive(move || if modal.with(|m| m.is_edit()) { "Edit opportunity".to_string() } else { "New opportunity".to_string() })
                open=Signal::derive(move || modal.with(|m| m.open))
                on_close=move |_| modal.update(|m| m.close())
            >
                <form on:submit=on_submit>
                    <FormField label="Title" value=title on_input=set_title required=true/>
                    <div class="form-field">
                        <label>"Customer"</label>
                        <select required=true on:change=move |ev| set_customer.run(event_target_value(&ev))>
                            <option value="" selected=move || customer.get().is_empty()>"Choose a customer"</option>
                            <For each=move || customers.get() key=|c| c.id let:c>
                                {
                                    let id = c.id.to_string();
                                    let selected_id = id.clone();
                                    view! { <option value=id selected=move || customer.get() == selected_id>{c.name}</option> }
                                }
                            </For>
                        </select>
                    </div>
                    <FormField
                        label="Value"
                        value=value
                        on_input=set_value
                        disabled=modal.with_untracked(|m| m.is_edit())
                    />
                    {move || modal.with(|m| m.is_edit()).then(|| view! {
                        <p class="field-hint">"The value follows the deal's line items."</p>
                    })}
                    <FormField label="Expected close date" input_type="date" value=close_date on_input=set_close_date required=true/>
                    <div class="form-field">
                        <label>"Stage"</label>
                        <select required=true on:change=move |ev| set_stage.run(event_target_value(&ev))>
                            <For each=move || stages.get() key=|s| s.id let:s>
                                {
                                    let id = s.id.to_string();
                                    let selected_id = id.clone();
                                    view! { <option value=id selected=move || stage.get() == selected_id>{s.name}</option> }
                                }
                            </For>
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
