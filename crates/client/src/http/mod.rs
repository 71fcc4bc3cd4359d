//! HTTP transport layer
//!
//! Thin wrapper around `reqwest` carrying the transport policies shared by
//! every outbound call.

pub mod client;

pub use client::{HttpClient, HttpClientBuilder};
