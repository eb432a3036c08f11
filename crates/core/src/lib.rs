//! # Laudos Core
//!
//! Core logic for retrieving diagnostic reports ("laudos") from the partner report service.
//!
//! This crate contains:
//! - The `ReportClient`, which authenticates with the password grant, caches the bearer token
//!   until shortly before it expires, and maps report endpoint responses to typed results
//! - The `CredentialStore` JSON persistence for the service credentials
//! - Report wire types and tax ID normalisation
//!
//! **No front-end concerns**: HTML rendering, HTTP serving and terminal prompts belong in
//! `api-rest` and `laudos-cli`.

pub mod client;
pub mod clock;
pub mod config;
pub mod constants;
pub mod error;
pub mod models;
pub mod validation;

pub use client::ReportClient;
pub use clock::{Clock, SystemClock};
pub use config::{config_path_from_env_value, resolve_credentials, CredentialStore, Credentials};
pub use error::{
    AuthError, ConfigError, ConfigResult, ReportError, ReportResult, ValidationError,
};
pub use models::{find_by_accession, Report, ReportsResponse};
pub use validation::normalize_tax_id;
