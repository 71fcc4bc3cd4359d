//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Authentication endpoint paths (relative to the API base URL)
pub const AUTH_LOGIN_PATH: &str = "/auth/login";
pub const AUTH_REGISTER_PATH: &str = "/auth/register";
pub const AUTH_REFRESH_PATH: &str = "/auth/refresh";

// API client defaults
pub const DEFAULT_API_BASE_URL: &str = "https://api.wareflow.io/v1";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("wareflow-client/", env!("CARGO_PKG_VERSION"));

// Session event channel sizing
pub const SESSION_EVENT_CHANNEL_CAPACITY: usize = 64;
