//! Bar Chart Component
//!
//! Horizontal HTML/CSS bars scaled to the largest value.

use leptos::prelude::*;

use crate::dashboard::{bar_percent, series_max};

#[component]
pub fn BarChart(
    #[prop(into)] bars: Signal<Vec<(String, f64)>>,
    format: fn(f64) -> String,
    #[prop(into, default = "No data".to_string())] empty_text: String,
) -> impl IntoView {
    view! {
        <div class="bar-chart">
            {move || {
                let bars = bars.get();
                if bars.is_empty() {
                    return view! { <div class="empty">{empty_text.clone()}</div> }.into_any();
                }
                let max = series_max(bars.iter().map(|(_, v)| *v));
                bars.into_iter()
                    .map(|(label, value)| {
                        let width = format!("{:.1}%", bar_percent(value, max));
                        view! {
                            <div class="bar-row">
                                <span class="bar-label">{label}</span>
                                <div class="bar-track">
                                    <div class="bar-fill" style:width=width></div>
                                </div>
                                <span class="bar-value">{format(value)}</span>
                            </div>
                        }
                    })
                    .collect_view()
                    .into_any()
            }}
        </div>
    }
}
