//! Request handlers for the web front end.

use axum::{
    extract::{Path as AxumPath, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use laudos_core::{find_by_accession, normalize_tax_id, ReportsResponse};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::templates::{render_search_page, SearchPage};
use crate::AppState;

const SEARCH_HINT: &str = "Please provide a tax ID in the URL (e.g. /buscar?cpf=12345678903)";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorRes {
    pub error: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DocumentParams {
    pub cpf: Option<String>,
    pub accession: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for monitoring and load balancers.
pub async fn health() -> Json<HealthRes> {
    Json(HealthRes {
        ok: true,
        message: "Laudos web is alive".into(),
    })
}

/// Sends the root path to the search form.
pub async fn index() -> Redirect {
    Redirect::to("/buscar")
}

/// HTML search page.
///
/// Without a `cpf` the page shows a hint. With one, the reports are fetched and listed; any
/// failure is shown on the page as its message.
///
/// # Errors
/// Returns `500 Internal Server Error` only if the page itself cannot be rendered.
pub async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Html<String>, (StatusCode, String)> {
    let page = match non_blank(params.cpf) {
        None => SearchPage::with_error(String::new(), SEARCH_HINT.into()),
        Some(raw) => match normalize_tax_id(&raw) {
            Err(e) => SearchPage::with_error(raw, e.to_string()),
            Ok(tax_id) => match state.client.fetch_reports(&tax_id).await {
                Ok(reports) => SearchPage::with_reports(tax_id, &reports),
                Err(e) => {
                    tracing::error!("Fetch reports error: {:?}", e);
                    SearchPage::with_error(tax_id, e.to_string())
                }
            },
        },
    };

    render_search_page(&state.templates, &page)
        .map(Html)
        .map_err(|e| {
            tracing::error!("Render search page error: {:?}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal error".into())
        })
}

/// Serves the PDF of one report, looked up by tax ID and accession number.
///
/// # Errors
/// - `400 Bad Request` if either parameter is missing or the tax ID is invalid.
/// - `404 Not Found` if no report has that accession number or it carries no PDF.
/// - `500 Internal Server Error` if the reports cannot be fetched or the payload is not
///   valid base64.
pub async fn report_document(
    State(state): State<AppState>,
    Query(params): Query<DocumentParams>,
) -> Result<Response, (StatusCode, String)> {
    let (Some(raw_tax_id), Some(accession)) = (non_blank(params.cpf), non_blank(params.accession))
    else {
        return Err((StatusCode::BAD_REQUEST, "Invalid request".into()));
    };

    let tax_id =
        normalize_tax_id(&raw_tax_id).map_err(|e| (StatusCode::BAD_REQUEST, e.to_string()))?;

    let reports = state.client.fetch_reports(&tax_id).await.map_err(|e| {
        tracing::error!("Fetch reports error: {:?}", e);
        (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
    })?;

    let report = find_by_accession(&reports, &accession)
        .filter(|r| r.has_pdf())
        .ok_or_else(|| {
            (
                StatusCode::NOT_FOUND,
                "Report not found or PDF unavailable".to_string(),
            )
        })?;

    let pdf = report.pdf_bytes().map_err(|e| {
        tracing::error!("Decode report document error: {:?}", e);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Failed to decode report document".to_string(),
        )
    })?;

    let disposition =
        HeaderValue::from_str(&format!("inline; filename=\"{}\"", report.pdf_filename()))
            .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid accession number".to_string()))?;

    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        pdf,
    )
        .into_response())
}

#[utoipa::path(
    get,
    path = "/api/laudos/{cpf}",
    params(
        ("cpf" = String, Path, description = "Patient tax ID, with or without mask")
    ),
    responses(
        (status = 200, description = "Reports for the patient (empty if none)", body = ReportsResponse),
        (status = 400, description = "Invalid tax ID", body = ErrorRes),
        (status = 502, description = "Report service failure", body = ErrorRes)
    )
)]
/// Lists the reports for a patient as JSON, in the report service's own shape.
pub async fn list_reports(
    State(state): State<AppState>,
    AxumPath(cpf): AxumPath<String>,
) -> Result<Json<ReportsResponse>, (StatusCode, Json<ErrorRes>)> {
    let tax_id = normalize_tax_id(&cpf).map_err(|e| {
        (
            StatusCode::BAD_REQUEST,
            Json(ErrorRes {
                error: e.to_string(),
            }),
        )
    })?;

    match state.client.fetch_reports(&tax_id).await {
        Ok(results) => Ok(Json(ReportsResponse { results })),
        Err(e) => {
            tracing::error!("Fetch reports error: {:?}", e);
            Err((
                StatusCode::BAD_GATEWAY,
                Json(ErrorRes {
                    error: e.to_string(),
                }),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use laudos_core::{Credentials, ReportClient};
    use std::sync::Arc;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const SAMPLE_BODY: &str = r#"{"resultados": [
        {"accession_number":"A1","tipo":"RX","descricao":"Tórax","data":"2024-01-01","pdf_base64":"QQ==","nm_pessoa":"Paciente Teste"},
        {"accession_number":"A2","tipo":"US","descricao":"Abdome","data":"2024-02-01","pdf_base64":""},
        {"accession_number":"A3","tipo":"TC","descricao":"Crânio","data":"2024-03-01","pdf_base64":"%%%"}
    ]}"#;

    async fn remote() -> MockServer {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "access_token": "tok-1",
                "token_type": "bearer",
                "expires_in": 1800
            })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/laudos/12345678903"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(SAMPLE_BODY, "application/json"))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/laudos/00000000000"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/laudos/99999999999"))
            .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
            .mount(&server)
            .await;

        server
    }

    fn app(server: &MockServer) -> axum::Router {
        let creds = Credentials::new(server.uri(), "client", "s3cret");
        let client = Arc::new(ReportClient::new(creds).unwrap());
        router(AppState::new(client).unwrap())
    }

    async fn get(app: axum::Router, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, headers, body.to_vec())
    }

    #[tokio::test]
    async fn test_root_redirects_to_search() {
        let server = remote().await;
        let (status, headers, _) = get(app(&server), "/").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers.get(header::LOCATION).unwrap(), "/buscar");
    }

    #[tokio::test]
    async fn test_health() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/health").await;
        assert_eq!(status, StatusCode::OK);
        let res: HealthRes = serde_json::from_slice(&body).unwrap();
        assert!(res.ok);
    }

    #[tokio::test]
    async fn test_search_without_cpf_shows_hint() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/buscar").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("Please provide a tax ID"));
    }

    #[tokio::test]
    async fn test_search_lists_reports_for_masked_cpf() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/buscar?cpf=123.456.789-03").await;
        assert_eq!(status, StatusCode::OK);

        let html = String::from_utf8(body).unwrap();
        assert!(html.contains("3 report(s) found."));
        assert!(html.contains("Paciente Teste"));
        assert!(html.contains("accession=A1"));
    }

    #[tokio::test]
    async fn test_search_without_reports() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/buscar?cpf=00000000000").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body)
            .unwrap()
            .contains("No reports found for this tax ID."));
    }

    #[tokio::test]
    async fn test_search_shows_service_error_verbatim() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/buscar?cpf=99999999999").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body).unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_search_rejects_invalid_cpf() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/buscar?cpf=abc").await;
        assert_eq!(status, StatusCode::OK);
        assert!(String::from_utf8(body)
            .unwrap()
            .contains("tax ID must contain only digits"));
    }

    #[tokio::test]
    async fn test_document_served_as_pdf() {
        let server = remote().await;
        let (status, headers, body) =
            get(app(&server), "/laudo?cpf=12345678903&accession=A1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "application/pdf");
        assert_eq!(
            headers.get(header::CONTENT_DISPOSITION).unwrap(),
            "inline; filename=\"laudo_A1.pdf\""
        );
        assert_eq!(body, b"A");
    }

    #[tokio::test]
    async fn test_document_requires_both_params() {
        let server = remote().await;
        let (status, _, _) = get(app(&server), "/laudo?cpf=12345678903").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_document_not_found_or_without_pdf() {
        let server = remote().await;
        let (status, _, _) = get(app(&server), "/laudo?cpf=12345678903&accession=ZZ").await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, _) = get(app(&server), "/laudo?cpf=12345678903&accession=A2").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_document_with_invalid_payload() {
        let server = remote().await;
        let (status, _, _) = get(app(&server), "/laudo?cpf=12345678903&accession=A3").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test]
    async fn test_document_service_failure() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/laudo?cpf=99999999999&accession=A1").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(String::from_utf8(body).unwrap().contains("upstream exploded"));
    }

    #[tokio::test]
    async fn test_json_api_lists_reports() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/api/laudos/12345678903").await;
        assert_eq!(status, StatusCode::OK);

        let res: ReportsResponse = serde_json::from_slice(&body).unwrap();
        assert_eq!(res.results.len(), 3);
        assert_eq!(res.results[0].accession_number, "A1");
    }

    #[tokio::test]
    async fn test_json_api_not_found_is_empty() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/api/laudos/00000000000").await;
        assert_eq!(status, StatusCode::OK);

        let res: ReportsResponse = serde_json::from_slice(&body).unwrap();
        assert!(res.results.is_empty());
    }

    #[tokio::test]
    async fn test_json_api_maps_failures() {
        let server = remote().await;
        let (status, _, body) = get(app(&server), "/api/laudos/99999999999").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        let res: ErrorRes = serde_json::from_slice(&body).unwrap();
        assert!(res.error.contains("500"));

        let (status, _, _) = get(app(&server), "/api/laudos/12x").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
