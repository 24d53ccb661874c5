//! Search Input Component
//!
//! Text box that reports its value once typing pauses.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::SEARCH_DEBOUNCE_MS;
use crate::listing::Debouncer;

#[component]
pub fn SearchInput(
    #[prop(into)] placeholder: String,
    #[prop(into)] on_search: Callback<String>,
) -> impl IntoView {
    let debouncer = StoredValue::new(Debouncer::new());
    let (text, set_text) = signal(String::new());

    let on_input = move |ev| {
        let value = event_target_value(&ev);
        set_text.set(value.clone());
        let debouncer = debouncer.get_value();
        spawn_local(async move {
            if debouncer.settle(TimeoutFuture::new(SEARCH_DEBOUNCE_MS)).await {
                on_search.run(value);
            }
        });
    };

    view! {
        <input
            type="search"
            class="search-input"
            placeholder=placeholder
            prop:value=move || text.get()
            on:input=on_input
        />
    }
}
