//! Delete Confirm Button Component
//!
//! Two-step delete: the first click arms the button, a second click on
//! "Yes" runs the action. An armed button disarms itself after a few seconds.

use gloo_timers::future::TimeoutFuture;
use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::config::CONFIRM_WINDOW_MS;
use crate::listing::Debouncer;

#[component]
pub fn DeleteConfirmButton(
    #[prop(into, default = "btn btn-danger btn-small".to_string())] button_class: String,
    #[prop(into, default = "Delete".to_string())] label: String,
    #[prop(into, default = "Delete?".to_string())] prompt: String,
    #[prop(into)] on_confirm: Callback<()>,
) -> impl IntoView {
    let armed = RwSignal::new(false);
    // Each arm or answer supersedes the pending disarm timer.
    let window = StoredValue::new(Debouncer::new());

    let arm = move |ev: web_sys::MouseEvent| {
        ev.stop_propagation();
        armed.set(true);
        let window = window.get_value();
        spawn_local(async move {
            if window.settle(TimeoutFuture::new(CONFIRM_WINDOW_MS)).await {
                let _ = armed.try_set(false);
            }
        });
    };

    let answer = move |ev: web_sys::MouseEvent, confirmed: bool| {
        ev.stop_propagation();
        window.with_value(|w| w.bump());
        armed.set(false);
        if confirmed {
            on_confirm.run(());
        }
    };

    view! {
        <Show
            when=move || armed.get()
            fallback=move || view! { <button class=button_class.clone() on:click=arm>{label.clone()}</button> }
        >
            <span class="delete-confirm">
                <span class="delete-confirm-text">{prompt.clone()}</span>
                <button class="btn btn-danger btn-small" on:click=move |ev| answer(ev, true)>"Yes"</button>
                <button class="btn btn-small" on:click=move |ev| answer(ev, false)>"No"</button>
            </span>
        </Show>
    }
}
