//! Pingdom API client library.
//!
//! Provides a client for the read-only Pingdom REST API 2.0 endpoints: checks,
//! probes, raw results, and outage, uptime and performance summaries.

pub mod client;
pub mod credentials;
pub mod error;
pub mod helpers;
pub mod options;
pub mod probe;
pub mod secret;

pub use client::Client;
pub use credentials::Credentials;
pub use error::{ApiError, AuthError, Error};
pub use helpers::{
    format_timestamp_display, get_credentials, parse_time, resolve_window, CredentialSource,
};
pub use options::{Resolution, ResultsOptions, TimeRange, DEFAULT_RESULTS_LIMIT};
pub use probe::ProbeServer;
pub use secret::{bitwarden, keepassxc, one_password};

/// Library version for User-Agent and diagnostics.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
