//! Dashboard Page
//!
//! KPI cards and charts over a selectable month range. Managers see revenue
//! by stage and lost reasons; reps see their tasks and monthly sales.

use chrono::Utc;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::components::A;

use crate::components::BarChart;
use crate::context::{use_auth, use_notifier};
use crate::dashboard::{fetch_stats, toggle_task, DashboardStats, MonthsRange};
use crate::format;
use crate::models::Task;

fn count_label(value: f64) -> String {
    format!("{}", value as i64)
}

#[component]
pub fn DashboardPage() -> impl IntoView {
    let auth = use_auth();
    let notifier = use_notifier();

    let range = RwSignal::new(MonthsRange::default());
    let stats = RwSignal::new(None::<DashboardStats>);
    let reload = RwSignal::new(0u32);

    Effect::new(move |_| {
        let range = range.get();
        reload.track();
        let client = auth.client();
        spawn_local(async move {
            match fetch_stats(&client, range).await {
                Ok(data) => stats.set(Some(data)),
                Err(err) => notifier.api_error(&err),
            }
        });
    });

    let on_toggle = Callback::new(move |task: Task| {
        let client = auth.client();
        spawn_local(async move {
            match toggle_task(&client, &task).await {
                Ok(()) => reload.update(|v| *v += 1),
                Err(err) => notifier.api_error(&err),
            }
        });
    });

    let stat = move |f: fn(&DashboardStats) -> String| move || stats.with(|s| s.as_ref().map(f).unwrap_or_default());

    let revenue_bars = Signal::derive(move || {
        stats.with(|s| {
            s.as_ref()
                .map(|s| s.revenue_by_stage.iter().map(|p| (p.name.clone(), p.value)).collect())
                .unwrap_or_default()
        })
    });
    let lost_bars = Signal::derive(move || {
        stats.with(|s| {
            s.as_ref()
                .map(|s| s.lost_reason_data.iter().map(|p| (p.name.clone(), p.value)).collect())
                .unwrap_or_default()
        })
    });
    let performance_bars = Signal::derive(move || {
        stats.with(|s| {
            s.as_ref()
                .map(|s| s.rep_performance.iter().map(|m| (m.month.clone(), m.sales)).collect())
                .unwrap_or_default()
        })
    });

    view! {
        <div class="dashboard-page">
            <div class="page-header">
                <h2>"Dashboard"</h2>
                <select
                    class="range-select"
                    on:change=move |ev| {
                        let months = event_target_value(&ev).parse().unwrap_or_default();
                        if let Some(r) = MonthsRange::from_months(months) {
                            range.set(r);
                        }
                    }
                >
                    {MonthsRange::ALL.into_iter().map(|r| view! {
                        <option value=r.months().to_string() selected=move || range.get() == r>{r.label()}</option>
                    }).collect_view()}
                </select>
            </div>

            <Show when=move || stats.with(Option::is_some) fallback=|| view! { <div class="page-loading">"Loading..."</div> }>
                <div class="kpi-grid">
                    <div class="kpi-card">
                        <div class="kpi-label">"Expected revenue"</div>
                        <div class="kpi-value">{stat(|s| format::currency(s.expected_revenue))}</div>
                    </div>
                    <div class="kpi-card">
                        <div class="kpi-label">"Open deals"</div>
                        <div class="kpi-value">{stat(|s| s.open_deals_count.to_string())}</div>
                    </div>
                    <div class="kpi-card">
                        <div class="kpi-label">"New customers"</div>
                        <div class="kpi-value">{stat(|s| s.new_customers_count.to_string())}</div>
                    </div>
                    <div class="kpi-card">
                        <div class="kpi-label">"Win rate"</div>
                        <div class="kpi-value">{stat(|s| format::percent(s.win_rate))}</div>
                    </div>
                </div>

                <Show
                    when=move || auth.can_manage()
                    fallback=move || view! {
                        <div class="dashboard-row">
                            <div class="card">
                                <h3>"My tasks"</h3>
                                <TaskList stats=stats on_toggle=on_toggle/>
                            </div>
                            <div class="card">
                                <h3>"My sales by month"</h3>
                                <BarChart bars=performance_bars format=format::compact empty_text="No closed deals yet"/>
                            </div>
                        </div>
                    }
                >
                    <div class="dashboard-row">
                        <div class="card">
                            <h3>"Revenue by stage"</h3>
                            <BarChart bars=revenue_bars format=format::compact/>
                        </div>
                        <div class="card">
                            <h3>"Lost reasons"</h3>
                            <BarChart bars=lost_bars format=count_label empty_text="No lost deals"/>
                        </div>
                    </div>
                </Show>

                <div class="card">
                    <h3>"Closing soon"</h3>
                    <UpcomingDeals stats=stats/>
                </div>
            </Show>
        </div>
    }
}

#[component]
fn TaskList(stats: RwSignal<Option<DashboardStats>>, on_toggle: Callback<Task>) -> impl IntoView {
    let tasks = move || stats.with(|s| s.as_ref().map(|s| s.my_tasks.clone()).unwrap_or_default());

    view! {
        <Show when=move || !tasks().is_empty() fallback=|| view! { <p class="empty">"No open tasks"</p> }>
            <ul class="task-list">
                <For each=tasks key=|t| (t.id, t.is_completed) let:task>
                    {
                        let overdue = !task.is_completed && format::is_overdue(task.due_date, Utc::now());
                        let checked = task.is_completed;
                        let title = task.title.clone();
                        let due = format::short_datetime(task.due_date);
                        let deal = task.opportunity.map(|id| (id, task.opportunity_name.clone().unwrap_or_default()));
                        view! {
                            <li class="task-item" class:overdue=overdue class:done=checked>
                                <input type="checkbox" prop:checked=checked on:change=move |_| on_toggle.run(task.clone())/>
                                <span class="task-title">{title}</span>
                                <span class="task-due">{due}</span>
                                {deal.map(|(id, name)| view! {
                                    <A href=format!("/opportunities/{}", id) attr:class="task-deal">{name}</A>
                                })}
                            </li>
                        }
                    }
                </For>
            </ul>
        </Show>
    }
}

#[component]
fn UpcomingDeals(stats: RwSignal<Option<DashboardStats>>) -> impl IntoView {
    let deals = move || stats.with(|s| s.as_ref().map(|s| s.upcoming_deals.clone()).unwrap_or_default());

    view! {
        <Show when=move || !deals().is_empty() fallback=|| view! { <p class="empty">"Nothing closes in the next days"</p> }>
            <table class="data-table">
                <thead>
                    <tr><th>"Deal"</th><th>"Expected close"</th><th>"Value"</th></tr>
                </thead>
                <tbody>
                    <For each=deals key=|d| d.id let:deal>
                        <tr>
                            <td><A href=format!("/opportunities/{}", deal.id)>{deal.title.clone()}</A></td>
                            <td>{format::date(deal.expected_close_date)}</td>
                            <td>{format::currency(deal.value)}</td>
                        </tr>
                    </For>
                </tbody>
            </table>
        </Show>
    }
}
