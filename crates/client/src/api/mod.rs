//! API layer for Wareflow backend communication
//!
//! Everything the application sends to the backend flows through
//! [`ApiClient::execute`]: bearer decoration, credential renewal on 401,
//! and the single resubmission all live behind that one entry point.

pub mod client;
pub mod errors;
pub mod request;

pub use client::{ApiClient, ApiClientBuilder};
pub use errors::{ApiError, ApiErrorCategory};
pub use request::{ApiRequest, ApiResponse};
