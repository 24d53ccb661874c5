//! UI Components
//!
//! Reusable Leptos components.

mod bar_chart;
mod client_log;
mod delete_confirm_button;
mod form_field;
mod kanban_column;
mod main_layout;
mod modal;
mod pagination;
mod search_input;
mod status_tag;
mod toast;

pub use bar_chart::BarChart;
pub use client_log::ClientLog;
pub use delete_confirm_button::DeleteConfirmButton;
pub use form_field::FormField;
pub use kanban_column::KanbanColumn;
pub use main_layout::MainLayout;
pub use modal::Modal;
pub use pagination::PaginationBar;
pub use search_input::SearchInput;
pub use status_tag::StatusTag;
pub use toast::ToastHost;
