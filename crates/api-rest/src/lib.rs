//! # API REST
//!
//! Web front end for the laudos report service.
//!
//! Handles:
//! - HTML search page and PDF document serving for clinic staff
//! - JSON report listing with OpenAPI/Swagger documentation
//! - REST-specific concerns (templating, CORS)
//!
//! Uses `laudos-core` for report retrieval; every handler shares one `ReportClient`.

#![warn(rust_2018_idioms)]

use axum::{routing::get, Router};
use laudos_core::ReportClient;
use std::sync::Arc;
use tera::Tera;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod handlers;
pub mod templates;

/// Default listen address when `LAUDOS_WEB_ADDR` is not set.
pub const DEFAULT_WEB_ADDR: &str = "0.0.0.0:8080";

/// Application state shared across request handlers.
#[derive(Clone)]
pub struct AppState {
    pub client: Arc<ReportClient>,
    pub templates: Arc<Tera>,
}

impl AppState {
    /// Builds the state around an already constructed client.
    ///
    /// # Errors
    /// Returns a `tera::Error` if the embedded templates fail to compile.
    pub fn new(client: Arc<ReportClient>) -> Result<Self, tera::Error> {
        Ok(Self {
            client,
            templates: Arc::new(templates::load_templates()?),
        })
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(handlers::health, handlers::list_reports),
    components(schemas(
        handlers::HealthRes,
        handlers::ErrorRes,
        laudos_core::ReportsResponse,
        laudos_core::Report,
    ))
)]
pub struct ApiDoc;

/// Builds the router with every route of the front end.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/health", get(handlers::health))
        .route("/buscar", get(handlers::search_page))
        .route("/laudo", get(handlers::report_document))
        .route("/api/laudos/:cpf", get(handlers::list_reports))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serves the front end on an already bound listener until the server stops.
///
/// # Errors
/// Returns an error if the server fails while running.
pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("-- Laudos web front end listening on http://{}", addr);
    }
    axum::serve(listener, router(state)).await
}
