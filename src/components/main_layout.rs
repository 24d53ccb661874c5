//! Main Layout Component
//!
//! Navigation sidebar, header with the signed-in user, and the routed page.

use leptos::prelude::*;
use leptos_router::components::{Outlet, A};
use leptos_router::hooks::use_navigate;

use crate::context::use_auth;

const NAV: &[(&str, &str)] = &[
    ("/", "Dashboard"),
    ("/kanban", "Pipeline"),
    ("/opportunities", "Opportunities"),
    ("/customers", "Customers"),
    ("/products", "Products"),
];

#[component]
pub fn MainLayout() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let logout = move |_| {
        auth.logout();
        navigate("/login", Default::default());
    };

    let username = move || auth.user.with(|u| u.as_ref().map(|u| u.username.clone()).unwrap_or_default());
    let role = move || auth.user.with(|u| u.as_ref().map(|u| u.role.label()).unwrap_or_default());

    view! {
        <div class="app-layout">
            <nav class="sidebar">
                <div class="brand">"Core CRM"</div>
                {NAV.iter().map(|(href, label)| view! {
                    <A href=*href attr:class="nav-link">{*label}</A>
                }).collect_view()}
                <Show when=move || auth.can_manage()>
                    <A href="/settings" attr:class="nav-link">"Settings"</A>
                </Show>
            </nav>
            <div class="main-column">
                <header class="app-header">
                    <A href="/profile" attr:class="header-user">
                        <span class="header-username">{username}</span>
                        <span class="header-role">{role}</span>
                    </A>
                    <button class="btn" on:click=logout>"Log out"</button>
                </header>
                <main class="page">
                    <Outlet/>
                </main>
            </div>
        </div>
    }
}
