//! Report operations shared by the one-shot commands and the interactive form.

use anyhow::Context;
use laudos_core::{find_by_accession, normalize_tax_id, Report, ReportClient};
use std::path::{Path, PathBuf};

/// Normalises `raw_tax_id` and fetches every report for it.
pub async fn search(client: &ReportClient, raw_tax_id: &str) -> anyhow::Result<Vec<Report>> {
    let tax_id = normalize_tax_id(raw_tax_id)?;
    Ok(client.fetch_reports(&tax_id).await?)
}

/// Writes the PDF of one report to `output`, or to `laudo_{accession}.pdf` in the working
/// directory when no output is given. Returns the path written.
pub async fn export_pdf(
    client: &ReportClient,
    raw_tax_id: &str,
    accession: &str,
    output: Option<&Path>,
) -> anyhow::Result<PathBuf> {
    let reports = search(client, raw_tax_id).await?;

    let report = find_by_accession(&reports, accession)
        .filter(|r| r.has_pdf())
        .with_context(|| format!("report {accession} not found or PDF unavailable"))?;

    let pdf = report
        .pdf_bytes()
        .context("failed to decode report document")?;

    let path = output
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(report.pdf_filename()));

    tokio::fs::write(&path, pdf)
        .await
        .with_context(|| format!("failed to write {}", path.display()))?;

    tracing::debug!("wrote report document to {}", path.display());
    Ok(path)
}
