//! Form Field Component
//!
//! Labelled input bound to a getter and an input callback.

use leptos::prelude::*;

#[component]
pub fn FormField(
    #[prop(into)] label: String,
    #[prop(into)] value: Signal<String>,
    #[prop(into)] on_input: Callback<String>,
    #[prop(into, default = "text".to_string())] input_type: String,
    #[prop(optional)] disabled: bool,
    #[prop(optional)] required: bool,
) -> impl IntoView {
    view! {
        <label class="form-field">
            <span class="form-label">{label}{required.then_some(" *")}</span>
            <input
                type=input_type
                prop:value=move || value.get()
                disabled=disabled
                on:input=move |ev| on_input.run(event_target_value(&ev))
            />
        </label>
    }
}
