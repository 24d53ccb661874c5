//! Modal Component
//!
//! Overlay dialog; clicking the backdrop closes it.

use leptos::prelude::*;

#[component]
pub fn Modal(
    #[prop(into)] title: Signal<String>,
    #[prop(into)] open: Signal<bool>,
    #[prop(into)] on_close: Callback<()>,
    children: ChildrenFn,
) -> impl IntoView {
    view! {
        <Show when=move || open.get()>
            <div class="modal-backdrop" on:click=move |_| on_close.run(())>
                <div class="modal" on:click=|ev| ev.stop_propagation()>
                    <div class="modal-header">
                        <h3>{move || title.get()}</h3>
                        <button class="icon-btn" on:click=move |_| on_close.run(())>"×"</button>
                    </div>
                    <div class="modal-body">{children()}</div>
                </div>
            </div>
        </Show>
    }
}
