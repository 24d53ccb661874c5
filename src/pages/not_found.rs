use leptos::prelude::*;
use leptos_router::components::A;

#[component]
pub fn NotFoundPage() -> impl IntoView {
    view! {
        <div class="not-found">
            <h1>"404"</h1>
            <p>"This page does not exist."</p>
            <A href="/">"Back to the dashboard"</A>
        </div>
    }
}
