//! Standalone web front end binary.
//!
//! ## Purpose
//! Runs only the web front end (search page, PDF serving, JSON API with Swagger UI).
//!
//! ## Intended use
//! Useful on a server where no terminal operator is present. The workspace's main `laudos-run`
//! binary runs the web front end and the terminal form together.

use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{serve, AppState, DEFAULT_WEB_ADDR};
use laudos_core::{
    config_path_from_env_value,
    constants::{BASE_URL_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV, CONFIG_PATH_ENV},
    resolve_credentials, ConfigError, CredentialStore, Credentials, ReportClient,
};

/// Main entry point for the laudos web front end
///
/// # Environment Variables
/// - `LAUDOS_WEB_ADDR`: Server address (default: "0.0.0.0:8080")
/// - `LAUDOS_BASE_URL`, `LAUDOS_CLIENT_ID`, `LAUDOS_CLIENT_SECRET`: credentials; used when all
///   three are set
/// - `LAUDOS_CONFIG`: credential store path otherwise (default: "config.json")
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - no credentials are configured,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var("LAUDOS_WEB_ADDR").unwrap_or_else(|_| DEFAULT_WEB_ADDR.into());

    let from_env = Credentials::from_env_values(
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(CLIENT_ID_ENV).ok(),
        std::env::var(CLIENT_SECRET_ENV).ok(),
    );
    let store = CredentialStore::new(config_path_from_env_value(
        std::env::var(CONFIG_PATH_ENV).ok(),
    ));
    let credentials = match resolve_credentials(from_env, &store) {
        Ok(creds) => creds,
        Err(ConfigError::NotConfigured) => anyhow::bail!(
            "No credentials configured: set {}, {} and {} or run `laudos configure` (store: {})",
            BASE_URL_ENV,
            CLIENT_ID_ENV,
            CLIENT_SECRET_ENV,
            store.path().display()
        ),
        Err(e) => return Err(e.into()),
    };

    tracing::info!("-- Using report service at {}", credentials.base_url);

    let client = Arc::new(ReportClient::new(credentials)?);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    serve(listener, AppState::new(client)?).await?;

    Ok(())
}
