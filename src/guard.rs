//! Route Guards
//!
//! Protected screens render only for a verified session.

use leptos::prelude::*;
use leptos_router::components::Redirect;

use crate::context::use_auth;
use crate::models::{Role, User};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardOutcome {
    /// Session still being verified
    Pending,
    Allow,
    Redirect,
}

pub fn evaluate(loading: bool, user: Option<&User>) -> GuardOutcome {
    match (loading, user) {
        (true, _) => GuardOutcome::Pending,
        (false, Some(_)) => GuardOutcome::Allow,
        (false, None) => GuardOutcome::Redirect,
    }
}

/// Like [`evaluate`], additionally requiring a manager or admin role
pub fn evaluate_manager(loading: bool, user: Option<&User>) -> GuardOutcome {
    match evaluate(loading, user) {
        GuardOutcome::Allow if !user.map(|u| u.role).is_some_and(|r: Role| r.can_manage()) => {
            GuardOutcome::Redirect
        }
        outcome => outcome,
    }
}

#[component]
pub fn RequireAuth(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let outcome = Memo::new(move |_| auth.user.with(|u| evaluate(auth.loading.get(), u.as_ref())));

    move || match outcome.get() {
        GuardOutcome::Pending => view! { <div class="page-loading">"Loading..."</div> }.into_any(),
        GuardOutcome::Allow => children().into_any(),
        GuardOutcome::Redirect => view! { <Redirect path="/login"/> }.into_any(),
    }
}

/// Managers and admins only; others are sent to the dashboard.
#[component]
pub fn RequireManager(children: ChildrenFn) -> impl IntoView {
    let auth = use_auth();
    let outcome = Memo::new(move |_| auth.user.with(|u| evaluate_manager(auth.loading.get(), u.as_ref())));

    move || match outcome.get() {
        GuardOutcome::Pending => view! { <div class="page-loading">"Loading..."</div> }.into_any(),
        GuardOutcome::Allow => children().into_any(),
        GuardOutcome::Redirect => view! { <Redirect path="/"/> }.into_any(),
    }
}
