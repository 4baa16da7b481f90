//! Client for a key service reachable over HTTP(S) or the legacy HKP(S)
//! URL schemes.
//!
//! [`Client`] validates a [`Config`] once and then builds ready-to-send
//! [`reqwest::Request`] values. Sending them, and reading the responses, is
//! left to the caller.

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod page;
pub mod scheme;

pub use client::{Client, default_http_client};
pub use config::Config;
pub use error::{Error, Result};
pub use page::PageDetails;
pub use scheme::{DEFAULT_BASE_URL, HKP_DEFAULT_PORT, normalize_url};
