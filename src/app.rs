//! Core CRM App
//!
//! Context setup and the route table.

use leptos::prelude::*;
use leptos_router::components::{ParentRoute, Route, Router, Routes};
use leptos_router::path;

use crate::api::ApiClient;
use crate::components::{MainLayout, ToastHost};
use crate::context::{AuthContext, Notifier};
use crate::guard::{RequireAuth, RequireManager};
use crate::pages::*;
use crate::session::Session;

#[component]
pub fn App() -> impl IntoView {
    let auth = AuthContext::new(Session::new(ApiClient::from_config()));
    provide_context(auth);
    provide_context(Notifier::new());
    auth.restore();

    view! {
        <Router>
            <Routes fallback=NotFoundPage>
                <Route path=path!("/login") view=LoginPage/>
                <Route path=path!("/register") view=RegisterPage/>
                <Route path=path!("/forgot-password") view=ForgotPasswordPage/>
                <Route path=path!("/reset-password/:uid/:token") view=ResetPasswordPage/>
                <ParentRoute
                    path=path!("")
                    view=|| view! { <RequireAuth><MainLayout/></RequireAuth> }
                >
                    <Route path=path!("") view=DashboardPage/>
                    <Route path=path!("kanban") view=KanbanPage/>
                    <Route path=path!("opportunities") view=OpportunitiesPage/>
                    <Route path=path!("opportunities/:id") view=OpportunityDetailPage/>
                    <Route path=path!("customers") view=CustomersPage/>
                    <Route path=path!("customers/:id") view=CustomerDetailPage/>
                    <Route path=path!("products") view=ProductsPage/>
                    <Route
                        path=path!("settings")
                        view=|| view! { <RequireManager><SettingsPage/></RequireManager> }
                    />
                    <Route path=path!("profile") view=ProfilePage/>
                </ParentRoute>
            </Routes>
        </Router>
        <ToastHost/>
    }
}
