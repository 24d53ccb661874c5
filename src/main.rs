//! Core CRM Frontend Entry Point

mod api;
mod app;
mod components;
mod config;
mod context;
mod dashboard;
mod download;
mod format;
mod forms;
mod guard;
mod kanban;
mod listing;
mod models;
mod pages;
mod session;

use app::App;
use leptos::prelude::*;
use log::LevelFilter;

fn main() {
    console_error_panic_hook::set_once();
    if let Err(err) = rolling_logger::init_logger(config::APP_NAME, LevelFilter::Info, config::LOG_BUFFER_CAPACITY) {
        web_sys::console::warn_1(&format!("logger already set: {}", err).into());
    }
    log::info!("[APP] starting, API at {}", config::API_BASE);
    mount_to_body(App);
}
