use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, DEFAULT_WEB_ADDR};
use laudos_cli::form;
use laudos_core::{
    config_path_from_env_value,
    constants::{BASE_URL_ENV, CLIENT_ID_ENV, CLIENT_SECRET_ENV, CONFIG_PATH_ENV},
    CredentialStore, Credentials, ReportClient,
};

/// Address operators should open in a browser for a given listen address.
fn browser_url(addr: &str) -> String {
    let host = addr.replacen("0.0.0.0", "localhost", 1);
    format!("http://{host}/buscar")
}

/// Main entry point for the laudos application
///
/// Runs the web front end and the interactive terminal form together, sharing one
/// `ReportClient` (and so one cached token):
/// - web front end on port 8080 (configurable via LAUDOS_WEB_ADDR), in the background
/// - terminal search form in the foreground; the process exits when the form exits
///
/// When no credentials are configured, the setup prompt runs first and saves them.
///
/// # Environment Variables
/// - `LAUDOS_WEB_ADDR`: web front end address (default: "0.0.0.0:8080")
/// - `LAUDOS_CONFIG`: credential store path (default: "config.json")
/// - `LAUDOS_BASE_URL`, `LAUDOS_CLIENT_ID`, `LAUDOS_CLIENT_SECRET`: credentials, taking
///   precedence over the store when all three are set
///
/// # Returns
/// * `Ok(())` - If the operator leaves the form
/// * `Err(anyhow::Error)` - If setup fails or the web server stops with an error
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("laudos_run=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let web_addr = std::env::var("LAUDOS_WEB_ADDR").unwrap_or_else(|_| DEFAULT_WEB_ADDR.into());
    let store = CredentialStore::new(config_path_from_env_value(
        std::env::var(CONFIG_PATH_ENV).ok(),
    ));
    let from_env = Credentials::from_env_values(
        std::env::var(BASE_URL_ENV).ok(),
        std::env::var(CLIENT_ID_ENV).ok(),
        std::env::var(CLIENT_SECRET_ENV).ok(),
    );

    let credentials =
        tokio::task::spawn_blocking(move || form::load_or_prompt(&store, from_env)).await??;

    tracing::info!("++ Using report service at {}", credentials.base_url);

    let client = Arc::new(ReportClient::new(credentials)?);
    let state = AppState::new(client.clone())?;

    let listener = tokio::net::TcpListener::bind(&web_addr).await?;
    let mut web_server = tokio::spawn(api_rest::serve(listener, state));

    let url = browser_url(&web_addr);
    tokio::select! {
        result = &mut web_server => {
            result??;
            Ok(())
        }
        result = form::run_interactive(&client, Some(&url)) => {
            web_server.abort();
            result
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_browser_url() {
        assert_eq!(browser_url("0.0.0.0:8080"), "http://localhost:8080/buscar");
        assert_eq!(browser_url("127.0.0.1:9000"), "http://127.0.0.1:9000/buscar");
    }
}
