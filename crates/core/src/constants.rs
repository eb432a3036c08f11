//! Constants used throughout the laudos core crate.
//!
//! Wire paths, timing margins and configuration keys live here so the client, the credential
//! store and the front ends agree on them.

/// Path of the token endpoint, relative to the configured base URL.
pub const TOKEN_PATH: &str = "/token";

/// Path prefix of the report endpoint; the subject tax ID is appended as the final segment.
pub const REPORTS_PATH: &str = "/laudos";

/// OAuth2 grant type sent to the token endpoint.
pub const GRANT_TYPE: &str = "password";

/// Timeout applied to every outbound request, in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Seconds subtracted from the server-declared token lifetime.
pub const TOKEN_EXPIRY_MARGIN_SECS: i64 = 60;

/// Default location of the credential store when `LAUDOS_CONFIG` is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Environment variable overriding the credential store location.
pub const CONFIG_PATH_ENV: &str = "LAUDOS_CONFIG";

/// Environment variables that supply credentials without a store file.
pub const BASE_URL_ENV: &str = "LAUDOS_BASE_URL";
pub const CLIENT_ID_ENV: &str = "LAUDOS_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "LAUDOS_CLIENT_SECRET";

/// Longest accepted tax ID (CNPJ); a CPF has 11 digits.
pub const MAX_TAX_ID_LEN: usize = 14;
