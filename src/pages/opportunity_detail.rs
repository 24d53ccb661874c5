//! Opportunity Detail Page
//!
//! Stage progress, won/lost, activity log, open tasks and product line items.
//! Every change refetches the whole detail since the backend recomputes the
//! deal value from its line items.

use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;
use leptos_router::hooks::use_params_map;

use crate::api::{
    change_stage, close_deal, fetch_detail, open_stages, ApiError, NewActivity, NewLineItem, NewTask, OpportunityDetail,
    ACTIVITIES, OPPORTUNITY_ITEMS, PRODUCTS, STAGES, TASKS,
};
use crate::components::{DeleteConfirmButton, StatusTag};
use crate::config::LOOKUP_PAGE_SIZE;
use crate::context::{use_auth, use_notifier, Notifier};
use crate::dashboard::toggle_task;
use crate::format;
use crate::models::{ActivityType, DealStatus, PipelineStage, Priority, Product, Task};

#[component]
pub fn OpportunityDetailPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();
    let params = use_params_map();

    let opportunity_id = Memo::new(move |_| params.with(|p| p.get("id")).and_then(|v| v.parse::<u32>().ok()));
    let detail = RwSignal::new(None::<OpportunityDetail>);
    let stages = RwSignal::new(Vec::<PipelineStage>::new());
    let products = RwSignal::new(Vec::<Product>::new());
    let reload = RwSignal::new(0u32);
    let busy = RwSignal::new(false);

    {
        let client = auth.client();
        spawn_local(async move {
            match STAGES.all(&client, &[]).await {
                Ok(list) => stages.set(list),
                Err(err) => notifier.api_error(&err),
            }
            match PRODUCTS.all(&client, &[("page_size", LOOKUP_PAGE_SIZE.to_string())]).await {
                Ok(list) => products.set(list),
                Err(err) => notifier.api_error(&err),
            }
        });
    }

    Effect::new(move |_| {
        reload.track();
        let Some(id) = opportunity_id.get() else { return };
        let client = auth.client();
        spawn_local(async move {
            match fetch_detail(&client, id).await {
                Ok(d) => detail.set(Some(d)),
                Err(err) => notifier.api_error(&err),
            }
        });
    });

    // Run a mutation, then refetch the detail. The refetch rebuilds the
    // sections, which clears their forms; a failure leaves them as typed.
    let mutate = move |success: &'static str, action: Mutation| {
        let Some(id) = opportunity_id.get_untracked() else { return };
        if busy.get_untracked() {
            return;
        }
        let client = auth.client();
        let stage_list = stages.get_untracked();
        busy.set(true);
        spawn_local(async move {
            let result = match action {
                Mutation::Stage(stage) => change_stage(&client, id, stage).await,
                Mutation::Close(outcome) => close_deal(&client, id, &stage_list, outcome).await,
                Mutation::LogActivity(body) => ACTIVITIES.create(&client, &body).await,
                Mutation::AddTask(body) => TASKS.create(&client, &body).await,
                Mutation::ToggleTask(task) => toggle_task(&client, &task).await,
                Mutation::AddItem(body) => OPPORTUNITY_ITEMS.create(&client, &body).await,
                Mutation::RemoveItem(item) => OPPORTUNITY_ITEMS.delete(&client, item).await,
            };
            if finish(result, success, notifier) {
                reload.update(|v| *v += 1);
            }
            busy.set(false);
        });
    };

    view! {
        <div class="detail-page">
            <A href="/opportunities" attr:class="back-link">"‹ Opportunities"</A>
            {move || match detail.get() {
                None => view! { <div class="page-loading">"Loading..."</div> }.into_any(),
                Some(d) => {
                    let opp = d.opportunity.clone();
                    let current_stage = opp.stage;
                    let is_open = opp.status == DealStatus::Open;
                    let id = opp.id;
                    view! {
                        <div class="card">
                            <div class="card-header">
                                <h2>{opp.title.clone()}</h2>
                                <StatusTag status=opp.status/>
                            </div>
                            <dl class="detail-fields">
                                <dt>"Customer"</dt>
                                <dd><A href=format!("/customers/{}", opp.customer)>{opp.customer_name.clone()}</A></dd>
                                <dt>"Value"</dt><dd>{format::currency(opp.value)}</dd>
                                <dt>"Expected close"</dt><dd>{format::date(opp.expected_close_date)}</dd>
                                <dt>"Owner"</dt><dd>{opp.owner_name.clone()}</dd>
                            </dl>

                            <div class="stage-progress">
                                {open_stages(&stages.get()).into_iter().map(|s| {
                                    let stage_id = s.id;
                                    view! {
                                        <button
                                            class="stage-step"
                                            class:current=stage_id == current_stage
                                            disabled=move || busy.get() || stage_id == current_stage
                                            on:click=move |_| mutate("Stage updated", Mutation::Stage(stage_id))
                                        >
                                            {s.name}
                                        </button>
                                    }
                                }).collect_view()}
                            </div>
                            {is_open.then(|| view! {
                                <div class="close-actions">
                                    <button class="btn btn-success" disabled=move || busy.get()
                                        on:click=move |_| mutate("Marked as won", Mutation::Close(DealStatus::Won))>
                                        "Mark won"
                                    </button>
                                    <button class="btn btn-danger" disabled=move || busy.get()
                                        on:click=move |_| mutate("Marked as lost", Mutation::Close(DealStatus::Lost))>
                                        "Mark lost"
                                    </button>
                                </div>
                            })}
                        </div>

                        <div class="detail-columns">
                            <ActivityLog detail=d.clone() opportunity=id on_add=Callback::new(move |body| mutate("Activity logged", Mutation::LogActivity(body)))/>
                            <TaskPanel
                                detail=d.clone()
                                opportunity=id
                                on_add=Callback::new(move |body| mutate("Task added", Mutation::AddTask(body)))
                                on_toggle=Callback::new(move |task| mutate("Task updated", Mutation::ToggleTask(task)))
                            />
                        </div>

                        <LineItems
                            detail=d
                            opportunity=id
                            products=products
                            on_add=Callback::new(move |body| mutate("Product added", Mutation::AddItem(body)))
                            on_remove=Callback::new(move |item| mutate("Product removed", Mutation::RemoveItem(item)))
                        />
                    }
                    .into_any()
                }
            }}
        </div>
    }
}

enum Mutation {
    Stage(u32),
    Close(DealStatus),
    LogActivity(NewActivity),
    AddTask(NewTask),
    ToggleTask(Task),
    AddItem(NewLineItem),
    RemoveItem(u32),
}

/// Toast the outcome; true when the mutation went through.
fn finish(result: Result<(), ApiError>, success: &str, notifier: Notifier) -> bool {
    match result {
        Ok(()) => {
            notifier.success(success);
            true
        }
        Err(err) => {
            notifier.api_error(&err);
            false
        }
    }
}

// ========================
// Sections
// ========================

#[component]
fn ActivityLog(detail: OpportunityDetail, opportunity: u32, on_add: Callback<NewActivity>) -> impl IntoView {
    let kind = RwSignal::new(ActivityType::default());
    let summary = RwSignal::new(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = summary.get_untracked().trim().to_string();
        if text.is_empty() {
            return;
        }
        on_add.run(NewActivity {
            opportunity,
            kind: kind.get_untracked(),
            summary: text,
        });
    };

    view! {
        <div class="card">
            <h3>"Activity"</h3>
            <form class="inline-form" on:submit=on_submit>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    if let Some(k) = ActivityType::ALL.into_iter().find(|k| k.as_str() == value) {
                        kind.set(k);
                    }
                }>
                    {ActivityType::ALL.into_iter().map(|k| view! {
                        <option value=k.as_str() selected=move || kind.get() == k>{k.label()}</option>
                    }).collect_view()}
                </select>
                <input
                    type="text"
                    placeholder="What happened?"
                    prop:value=move || summary.get()
                    on:input=move |ev| summary.set(event_target_value(&ev))
                />
                <button class="btn btn-primary" type="submit">"Log"</button>
            </form>
            <ul class="activity-list">
                {detail.activities.into_iter().map(|a| view! {
                    <li class="activity-item">
                        <span class="activity-type">{a.kind.label()}</span>
                        <span class="activity-summary">{a.summary}</span>
                        <span class="activity-meta">{format!("{} · {}", a.user_name, format::short_datetime(a.created_at))}</span>
                    </li>
                }).collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn TaskPanel(
    detail: OpportunityDetail,
    opportunity: u32,
    on_add: Callback<NewTask>,
    on_toggle: Callback<Task>,
) -> impl IntoView {
    let notifier = use_notifier();
    let title = RwSignal::new(String::new());
    let priority = RwSignal::new(Priority::default());
    let due = RwSignal::new(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let text = title.get_untracked().trim().to_string();
        if text.is_empty() {
            return;
        }
        let due_text = due.get_untracked();
        let due_date = match due_text.trim() {
            "" => None,
            value => match format::datetime_local_to_rfc3339(value) {
                Some(v) => Some(v),
                None => {
                    notifier.error("Invalid due date");
                    return;
                }
            },
        };
        on_add.run(NewTask {
            opportunity,
            title: text,
            priority: priority.get_untracked(),
            due_date,
        });
    };

    let now = chrono::Utc::now();
    let open_tasks: Vec<_> = detail.open_tasks().cloned().collect();

    view! {
        <div class="card">
            <h3>"Open tasks"</h3>
            <form class="inline-form" on:submit=on_submit>
                <input
                    type="text"
                    placeholder="New task"
                    prop:value=move || title.get()
                    on:input=move |ev| title.set(event_target_value(&ev))
                />
                <select on:change=move |ev| {
                    if let Some(p) = Priority::parse(&event_target_value(&ev)) {
                        priority.set(p);
                    }
                }>
                    {[Priority::Low, Priority::Medium, Priority::High].into_iter().map(|p| view! {
                        <option value=p.as_str() selected=move || priority.get() == p>{p.label()}</option>
                    }).collect_view()}
                </select>
                <input
                    type="datetime-local"
                    prop:value=move || due.get()
                    on:input=move |ev| due.set(event_target_value(&ev))
                />
                <button class="btn btn-primary" type="submit">"Add"</button>
            </form>
            <ul class="task-list">
                {open_tasks.into_iter().map(|task| {
                    let overdue = format::is_overdue(task.due_date, now);
                    let label = format!("{} ({})", task.title, task.priority.label());
                    let due_text = format::short_datetime(task.due_date);
                    view! {
                        <li class="task-item" class:overdue=overdue>
                            <input type="checkbox" on:change=move |_| on_toggle.run(task.clone())/>
                            <span class="task-title">{label}</span>
                            <span class="task-due">{due_text}</span>
                        </li>
                    }
                }).collect_view()}
            </ul>
        </div>
    }
}

#[component]
fn LineItems(
    detail: OpportunityDetail,
    opportunity: u32,
    products: RwSignal<Vec<Product>>,
    on_add: Callback<NewLineItem>,
    on_remove: Callback<u32>,
) -> impl IntoView {
    let notifier = use_notifier();
    let product = RwSignal::new(String::new());
    let quantity = RwSignal::new("1".to_string());
    let unit_price = RwSignal::new(String::new());

    let on_submit = move |ev: web_sys::SubmitEvent| {
        ev.prevent_default();
        let Ok(product_id) = product.get_untracked().parse::<u32>() else {
            notifier.error("Choose a product");
            return;
        };
        let qty = match quantity.get_untracked().trim().parse::<u32>() {
            Ok(q) if q > 0 => q,
            _ => {
                notifier.error("Quantity must be at least 1");
                return;
            }
        };
        let price = match unit_price.get_untracked().trim() {
            "" => None,
            text => match text.parse::<f64>() {
                Ok(p) if p >= 0.0 => Some(p),
                _ => {
                    notifier.error("Unit price must be a non-negative number");
                    return;
                }
            },
        };
        on_add.run(NewLineItem {
            opportunity,
            product: product_id,
            quantity: qty,
            unit_price: price,
        });
    };

    let total = format::currency(detail.items_total());

    view! {
        <div class="card">
            <div class="card-header">
                <h3>"Products"</h3>
                <span class="card-meta">{total}</span>
            </div>
            <table class="data-table">
                <thead>
                    <tr><th>"Product"</th><th>"Qty"</th><th>"Unit price"</th><th>"Total"</th><th></th></tr>
                </thead>
                <tbody>
                    {detail.items.into_iter().map(|item| {
                        let item_id = item.id;
                        let line_total = format::currency(item.line_total());
                        view! {
                            <tr>
                                <td>{item.product_name}</td>
                                <td>{item.quantity}</td>
                                <td>{format::currency(item.unit_price)}</td>
                                <td>{line_total}</td>
                                <td class="row-actions">
                                    <DeleteConfirmButton label="Remove" prompt="Remove line?" on_confirm=move |_| on_remove.run(item_id)/>
                                </td>
                            </tr>
                        }
                    }).collect_view()}
                </tbody>
            </table>
            <form class="inline-form" on:submit=on_submit>
                <select on:change=move |ev| {
                    let value = event_target_value(&ev);
                    let list_price = value
                        .parse::<u32>()
                        .ok()
                        .and_then(|id| products.with_untracked(|p| p.iter().find(|p| p.id == id).map(|p| p.price)));
                    product.set(value);
                    if let Some(price) = list_price {
                        unit_price.set(price.to_string());
                    }
                }>
                    <option value="" selected=move || product.get().is_empty()>"Choose a product"</option>
                    <For each=move || products.get() key=|p| p.id let:p>
                        <option value=p.id.to_string()>{format!("{} ({})", p.name, format::currency(p.price))}</option>
                    </For>
                </select>
                <input
                    type="number"
                    min="1"
                    prop:value=move || quantity.get()
                    on:input=move |ev| quantity.set(event_target_value(&ev))
                />
                <input
                    type="number"
                    min="0"
                    placeholder="Unit price"
                    prop:value=move || unit_price.get()
                    on:input=move |ev| unit_price.set(event_target_value(&ev))
                />
                <button class="btn btn-primary" type="submit">"Add"</button>
            </form>
        </div>
    }
}
