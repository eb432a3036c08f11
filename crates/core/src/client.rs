//! Authenticated client for the partner report service.
//!
//! The client owns the bearer token and refreshes it lazily. Refresh is serialised by a single
//! async mutex that covers only the check-and-refresh step; report requests run outside it, so
//! at most one authentication request is in flight while report fetches proceed concurrently.

use crate::clock::{Clock, SystemClock};
use crate::config::Credentials;
use crate::constants::{
    GRANT_TYPE, REPORTS_PATH, REQUEST_TIMEOUT_SECS, TOKEN_EXPIRY_MARGIN_SECS, TOKEN_PATH,
};
use crate::error::{AuthError, ReportError, ReportResult};
use crate::models::{Report, ReportsResponse, TokenResponse};
use chrono::{DateTime, Utc};
use reqwest::StatusCode;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Cached bearer token. Replaced wholesale on every successful authentication.
#[derive(Debug, Clone)]
struct TokenState {
    access_token: String,
    expires_at: DateTime<Utc>,
}

impl TokenState {
    fn unset() -> Self {
        Self {
            access_token: String::new(),
            expires_at: DateTime::<Utc>::MIN_UTC,
        }
    }

    fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        !self.access_token.is_empty() && now < self.expires_at
    }
}

/// Expiry for a token issued at `now` with a server-declared lifetime of `expires_in` seconds.
///
/// Lifetimes of 60 seconds or less produce an expiry at or before `now`.
fn expiry_from(now: DateTime<Utc>, expires_in: i64) -> DateTime<Utc> {
    let lifetime = expires_in.saturating_sub(TOKEN_EXPIRY_MARGIN_SECS);
    chrono::Duration::try_seconds(lifetime)
        .and_then(|d| now.checked_add_signed(d))
        .unwrap_or(if lifetime > 0 {
            DateTime::<Utc>::MAX_UTC
        } else {
            DateTime::<Utc>::MIN_UTC
        })
}

/// Client for `GET {base_url}/laudos/{tax_id}` with lazy OAuth2 password-grant authentication.
///
/// Share one instance (behind an `Arc`) between all callers.
pub struct ReportClient {
    base_url: String,
    credentials: Credentials,
    http: reqwest::Client,
    token: Mutex<TokenState>,
    clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for ReportClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReportClient")
            .field("base_url", &self.base_url)
            .field("credentials", &self.credentials)
            .finish_non_exhaustive()
    }
}

impl ReportClient {
    /// Creates a client with a 10-second request timeout and no cached token.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::Transport` if the HTTP transport cannot be initialised.
    pub fn new(credentials: Credentials) -> ReportResult<Self> {
        Self::with_clock(credentials, Arc::new(SystemClock))
    }

    /// Creates a client that reads the current time from `clock`.
    pub fn with_clock(credentials: Credentials, clock: Arc<dyn Clock>) -> ReportResult<Self> {
        Self::build(
            credentials,
            clock,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    fn build(
        credentials: Credentials,
        clock: Arc<dyn Clock>,
        timeout: Duration,
    ) -> ReportResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(ReportError::Transport)?;

        Ok(Self {
            base_url: credentials.base_url.trim_end_matches('/').to_string(),
            credentials,
            http,
            token: Mutex::new(TokenState::unset()),
            clock,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns a bearer token that is valid now, authenticating first if needed.
    ///
    /// The lock is held across the whole check-and-refresh sequence. A caller that waited on
    /// the lock re-checks the token it finds and skips authentication if another caller has
    /// already replaced it.
    ///
    /// # Errors
    ///
    /// Returns an `AuthError` if authentication was needed and failed. The cached token is
    /// left untouched in that case.
    pub async fn ensure_valid_token(&self) -> Result<String, AuthError> {
        let mut state = self.token.lock().await;

        if !state.is_valid_at(self.clock.now()) {
            *state = self.authenticate().await?;
        }

        Ok(state.access_token.clone())
    }

    /// Password-grant request against the token endpoint. Only called with the token lock held.
    async fn authenticate(&self) -> Result<TokenState, AuthError> {
        let url = format!("{}{}", self.base_url, TOKEN_PATH);
        debug!(url = %url, "authenticating with report service");

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", GRANT_TYPE),
                ("username", self.credentials.client_id.as_str()),
                ("password", self.credentials.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(AuthError::Transport)?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "authentication rejected");
            return Err(AuthError::Rejected { status, body });
        }

        let body = response.text().await.map_err(AuthError::Transport)?;
        let token: TokenResponse =
            serde_json::from_str(&body).map_err(AuthError::InvalidResponse)?;

        let expires_at = expiry_from(self.clock.now(), token.expires_in);
        debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            %expires_at,
            "authentication successful"
        );

        Ok(TokenState {
            access_token: token.access_token,
            expires_at,
        })
    }

    /// Fetches every report held for `subject_tax_id`.
    ///
    /// A 404 from the service means the subject has no reports and yields an empty list.
    ///
    /// # Errors
    ///
    /// - `ReportError::Authentication` if no valid token could be obtained; no report request
    ///   is made in that case.
    /// - `ReportError::Api` for any status other than 200 or 404.
    /// - `ReportError::ResponseDecode` if a 200 body is not the expected JSON.
    /// - `ReportError::Transport` on timeout or connection failure.
    pub async fn fetch_reports(&self, subject_tax_id: &str) -> ReportResult<Vec<Report>> {
        let token = self.ensure_valid_token().await?;

        let url = format!("{}{}/{}", self.base_url, REPORTS_PATH, subject_tax_id);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(ReportError::Transport)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            debug!("no reports found for subject");
            return Ok(Vec::new());
        }

        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            warn!(status = %status, "report request failed");
            return Err(ReportError::Api { status, body });
        }

        let body = response.text().await.map_err(ReportError::Transport)?;
        let parsed: ReportsResponse =
            serde_json::from_str(&body).map_err(ReportError::ResponseDecode)?;

        debug!(count = parsed.results.len(), "fetched reports");
        Ok(parsed.results)
    }
}
