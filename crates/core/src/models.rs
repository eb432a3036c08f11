//! Wire types exchanged with the report service.
//!
//! Field names on the wire follow the partner service (`tipo`, `descricao`, ...); the Rust
//! names describe what each field holds.

use base64::Engine as _;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

/// Missing or null text fields decode as empty strings.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A single diagnostic report ("laudo").
///
/// Only `accession_number` is required; the descriptive fields and the payload fall back to
/// empty strings so one incomplete record does not fail the whole result set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Report {
    pub accession_number: String,
    #[serde(rename = "tipo", default, deserialize_with = "null_as_empty")]
    pub report_type: String,
    #[serde(rename = "descricao", default, deserialize_with = "null_as_empty")]
    pub description: String,
    #[serde(rename = "data", default, deserialize_with = "null_as_empty")]
    pub date: String,
    /// Base64-encoded PDF. Empty when the service holds no document for this report.
    #[serde(rename = "pdf_base64", default, deserialize_with = "null_as_empty")]
    pub pdf_payload: String,
    #[serde(rename = "nr_cpf", default, skip_serializing_if = "Option::is_none")]
    pub subject_tax_id: Option<String>,
    #[serde(rename = "nm_pessoa", default, skip_serializing_if = "Option::is_none")]
    pub subject_name: Option<String>,
}

impl Report {
    /// Returns `true` when the report carries a PDF payload.
    pub fn has_pdf(&self) -> bool {
        !self.pdf_payload.trim().is_empty()
    }

    /// Decodes the embedded PDF payload.
    ///
    /// # Errors
    ///
    /// Returns a `base64::DecodeError` if the payload is not valid standard base64.
    pub fn pdf_bytes(&self) -> Result<Vec<u8>, base64::DecodeError> {
        base64::engine::general_purpose::STANDARD.decode(self.pdf_payload.trim())
    }

    /// File name for the decoded PDF, `laudo_{accession}.pdf`.
    ///
    /// Characters outside `[A-Za-z0-9._-]` are replaced with `_` so the name is safe both as a
    /// path component and inside a `Content-Disposition` header.
    pub fn pdf_filename(&self) -> String {
        let accession: String = self
            .accession_number
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                    c
                } else {
                    '_'
                }
            })
            .collect();
        format!("laudo_{accession}.pdf")
    }
}

/// Body of a successful report query.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct ReportsResponse {
    #[serde(rename = "resultados")]
    pub results: Vec<Report>,
}

/// Body of a successful token request.
#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Finds the report with the given accession number in one query's result set.
pub fn find_by_accession<'a>(reports: &'a [Report], accession_number: &str) -> Option<&'a Report> {
    reports
        .iter()
        .find(|r| r.accession_number == accession_number)
}
