//! Products Page

use leptos::prelude::*;

use crate::api::PRODUCTS;
use crate::components::{DeleteConfirmButton, FormField, Modal, PaginationBar, SearchInput};
use crate::context::{use_auth, use_notifier};
use crate::format;
use crate::forms::{FormModal, ProductDraft};
use crate::listing::{use_list, ListQuery};

use super::{delete_record, draft_field, submit_modal};

#[component]
pub fn ProductsPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let search = RwSignal::new(String::new());
    let list = use_list(PRODUCTS, move |page| ListQuery::search(page, &search.get()));

    let modal = RwSignal::new(FormModal::<ProductDraft>::default());
    let (name, set_name) = draft_field(modal, |d| &d.name, |d, v| d.name = v);
    let (code, set_code) = draft_field(modal, |d| &d.code, |d, v| d.code = v);
    let (price, set_price) = draft_field(modal, |d| &d.price, |d, v| d.price = v);
    let (description, set_description) = draft_field(modal, |d| &d.description, |d, v| d.description = v);

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        submit_modal(modal, PRODUCTS, auth.client(), notifier, move || list.reload());
    };

    view! {
        <div class="list-page">
            <div class="page-header">
                <h2>"Products"</h2>
                <button class="btn btn-primary" on:click=move |_| modal.update(|m| m.open_create())>"New product"</button>
            </div>

            <SearchInput
                placeholder="Search products"
                on_search=move |text: String| {
                    list.page.set(1);
                    search.set(text);
                }
            />

            <table class="data-table" class:loading=move || list.loading.get()>
                <thead>
                    <tr><th>"Name"</th><th>"Code"</th><th>"Price"</th><th>"Description"</th><th></th></tr>
                </thead>
                <tbody>
                    <For each=move || list.rows.get() key=|p| (p.id, p.name.clone(), p.code.clone(), p.price.to_bits()) let:product>
                        {
                            let id = product.id;
                            let edit_record = product.clone();
                            view! {
                                <tr>
                                    <td>{product.name.clone()}</td>
                                    <td>{product.code.clone().unwrap_or_default()}</td>
                                    <td>{format::currency(product.price)}</td>
                                    <td class="cell-muted">{product.description.clone().unwrap_or_default()}</td>
                                    <td class="row-actions">
                                        <button class="btn btn-small" on:click=move |_| modal.update(|m| m.open_edit(id, &edit_record))>"Edit"</button>
                                        <DeleteConfirmButton prompt="Delete product?" on_confirm=move |_| {
                                            delete_record(PRODUCTS, id, auth.client(), notifier, move || list.reload())
                                        }/>
                                    </td>
                                </tr>
                            }
                        }
                    </For>
                </tbody>
            </table>
            <Show when=move || !list.loading.get() && list.rows.with(Vec::is_empty)>
                <p class="empty">"No products yet"</p>
            </Show>

            <PaginationBar state=list.pagination on_change=move |p| list.page.set(p)/>

            <Modal
                title=Signal::derive(move || if modal.with(|m| m.is_edit()) { "Edit product".to_string() } else { "New product".to_string() })
                open=Signal::derive(move || modal.with(|m| m.open))
                on_close=move |_| modal.update(|m| m.close())
            >
                <form on:submit=on_submit>
                    <FormField label="Name" value=name on_input=set_name required=true/>
                    <FormField label="Code" value=code on_input=set_code/>
                    <FormField label="Price" value=price on_input=set_price required=true/>
                    <FormField label="Description" value=description on_input=set_description/>
                    <div class="modal-actions">
                        <button class="btn" type="button" on:click=move |_| modal.update(|m| m.close())>"Cancel"</button>
                        <button class="btn btn-primary" type="submit" disabled=move || modal.with(|m| m.submitting)>"Save"</button>
                    </div>
                </form>
            </Modal>
        </div>
    }
}
