//! Customer Detail Page
//!
//! Contact details and the customer's opportunities.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::api::{customer_opportunities, CUSTOMERS};
use crate::components::StatusTag;
use crate::context::{use_auth, use_notifier};
use crate::format;
use crate::models::{Customer, Opportunity};

#[component]
pub fn CustomerDetailPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let params = use_params_map();

    let customer = RwSignal::new(None::<Customer>);
    let opportunities = RwSignal::new(Vec::<Opportunity>::new());
    let missing = RwSignal::new(false);

    Effect::new(move |_| {
        let Some(id) = params.with(|p| p.get("id")).and_then(|v| v.parse::<u32>().ok()) else {
            missing.set(true);
            return;
        };
        let client = auth.client();
        spawn_local(async move {
            match CUSTOMERS.get(&client, id).await {
                Ok(c) => customer.set(Some(c)),
                Err(err) => {
                    missing.set(err.status() == Some(404));
                    notifier.api_error(&err);
                    return;
                }
            }
            match customer_opportunities(&client, id).await {
                Ok(list) => opportunities.set(list),
                Err(err) => notifier.api_error(&err),
            }
        });
    });

    let pipeline_total = move || format::currency(opportunities.with(|o| o.iter().map(|o| o.value).sum::<f64>()));

    view! {
        <div class="detail-page">
            <A href="/customers" attr:class="back-link">"‹ Customers"</A>
            <Show when=move || !missing.get() fallback=|| view! { <p class="empty">"Customer not found"</p> }>
                {move || customer.get().map(|c| view! {
                    <div class="card">
                        <h2>{c.name.clone()}</h2>
                        <dl class="detail-fields">
                            <dt>"Email"</dt><dd>{c.email.clone().unwrap_or_else(|| "-".into())}</dd>
                            <dt>"Phone"</dt><dd>{c.phone.clone().unwrap_or_else(|| "-".into())}</dd>
                            <dt>"Created"</dt><dd>{format::datetime(c.created_at)}</dd>
                        </dl>
                    </div>
                })}
                <div class="card">
                    <div class="card-header">
                        <h3>"Opportunities"</h3>
                        <span class="card-meta">{pipeline_total}</span>
                    </div>
                    <Show when=move || !opportunities.with(Vec::is_empty) fallback=|| view! { <p class="empty">"No opportunities yet"</p> }>
                        <table class="data-table">
                            <thead>
                                <tr><th>"Title"</th><th>"Stage"</th><th>"Status"</th><th>"Value"</th><th>"Expected close"</th></tr>
                            </thead>
                            <tbody>
                                <For each=move || opportunities.get() key=|o| o.id let:opp>
                                    <tr>
                                        <td><A href=format!("/opportunities/{}", opp.id)>{opp.title.clone()}</A></td>
                                        <td>{opp.stage_name.clone()}</td>
                                        <td><StatusTag status=opp.status/></td>
                                        <td>{format::currency(opp.value)}</td>
                                        <td>{format::date(opp.expected_close_date)}</td>
                                    </tr>
                                </For>
                            </tbody>
                        </table>
                    </Show>
                </div>
            </Show>
        </div>
    }
}
