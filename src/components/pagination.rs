//! Pagination Component

use leptos::prelude::*;

use crate::listing::Pagination;

#[component]
pub fn PaginationBar(
    #[prop(into)] state: Signal<Pagination>,
    #[prop(into)] on_change: Callback<u32>,
) -> impl IntoView {
    view! {
        <div class="pagination">
            <span class="pagination-info">
                {move || {
                    let p = state.get();
                    let (start, end) = p.shown_range();
                    format!("{}-{} of {}", start, end, p.total)
                }}
            </span>
            <button
                class="btn btn-small"
                disabled=move || !state.get().has_previous()
                on:click=move |_| on_change.run(state.get_untracked().current - 1)
            >
                "‹ Prev"
            </button>
            <span class="pagination-page">
                {move || format!("{} / {}", state.get().current, state.get().page_count())}
            </span>
            <button
                class="btn btn-small"
                disabled=move || !state.get().has_next()
                on:click=move |_| on_change.run(state.get_untracked().current + 1)
            >
                "Next ›"
            </button>
        </div>
    }
}
