//! Toast Component
//!
//! Renders the notifier's transient messages.

use leptos::prelude::*;

use crate::context::{use_notifier, ToastKind};

#[component]
pub fn ToastHost() -> impl IntoView {
    let notifier = use_notifier();

    view! {
        <div class="toast-stack">
            <For
                each=move || notifier.toasts.get()
                key=|toast| toast.id
                let:toast
            >
                {
                    let id = toast.id;
                    let class = match toast.kind {
                        ToastKind::Success => "toast toast-success",
                        ToastKind::Error => "toast toast-error",
                    };
                    view! {
                        <div class=class on:click=move |_| notifier.dismiss(id)>
                            {toast.text}
                        </div>
                    }
                }
            </For>
        </div>
    }
}
