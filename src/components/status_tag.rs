//! Status Tag Component

use leptos::prelude::*;

use crate::models::DealStatus;

#[component]
pub fn StatusTag(status: DealStatus) -> impl IntoView {
    let label = match status {
        DealStatus::Open => "Open",
        DealStatus::Won => "Won",
        DealStatus::Lost => "Lost",
    };
    view! { <span class=format!("tag {}", status.css())>{label}</span> }
}
