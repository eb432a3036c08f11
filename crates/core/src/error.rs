use reqwest::StatusCode;

/// Why the token endpoint did not yield a usable bearer token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("status {status} - {body}")]
    Rejected { status: StatusCode, body: String },
    #[error("token endpoint unreachable: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("invalid token response: {0}")]
    InvalidResponse(#[source] serde_json::Error),
}

/// Failure of a single `fetch_reports` call.
///
/// A 404 from the report endpoint is not represented here; it is an empty result.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("authentication failed: {0}")]
    Authentication(#[from] AuthError),
    #[error("api error: status {status} - {body}")]
    Api { status: StatusCode, body: String },
    #[error("failed to decode report response: {0}")]
    ResponseDecode(#[source] serde_json::Error),
    #[error("request to report service failed: {0}")]
    Transport(#[source] reqwest::Error),
}

pub type ReportResult<T> = std::result::Result<T, ReportError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("credentials are not configured")]
    NotConfigured,
    #[error("failed to read config file: {0}")]
    Read(std::io::Error),
    #[error("failed to parse config file: {0}")]
    Parse(serde_json::Error),
    #[error("failed to serialize config: {0}")]
    Serialize(serde_json::Error),
    #[error("failed to create config directory: {0}")]
    CreateDir(std::io::Error),
    #[error("failed to write config file: {0}")]
    Write(std::io::Error),
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("tax ID cannot be empty")]
    EmptyTaxId,
    #[error("tax ID must contain only digits")]
    NonDigitTaxId,
    #[error("tax ID exceeds maximum length of {max} digits")]
    TaxIdTooLong { max: usize },
}
