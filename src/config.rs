//! Application Configuration
//!
//! Build-time and fixed runtime settings.

/// REST API base, fixed when the bundle is built.
pub const API_BASE: &str = match option_env!("CRM_API_BASE") {
    Some(base) => base,
    None => "http://127.0.0.1:8000/api/",
};

// ========================
// Credential storage keys
// ========================

pub const TOKEN_KEY: &str = "access_token";
pub const AUTH_TYPE_KEY: &str = "auth_type";

// ========================
// UI timings and sizes
// ========================

/// Delay between the last keystroke in a search box and the fetch
pub const SEARCH_DEBOUNCE_MS: u32 = 500;

pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// The board shows the whole pipeline in one request.
pub const KANBAN_PAGE_SIZE: u32 = 1000;

/// Select boxes (customer, owner) list every choice.
pub const LOOKUP_PAGE_SIZE: u32 = 1000;

/// How long a delete button waits for its confirmation
pub const CONFIRM_WINDOW_MS: u32 = 4000;

pub const SUCCESS_TOAST_MS: u32 = 3000;
pub const ERROR_TOAST_MS: u32 = 5000;

/// Name stamped on every log line
pub const APP_NAME: &str = "CoreCRM";

/// Records retained by the in-memory log buffer
pub const LOG_BUFFER_CAPACITY: usize = 200;
