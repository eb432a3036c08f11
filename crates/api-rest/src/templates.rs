//! HTML rendering for the search page.

use laudos_core::Report;
use serde::Serialize;
use tera::{Context, Tera};

pub const INDEX_TEMPLATE: &str = "index.html";

/// Builds the template set. The template is compiled into the binary.
pub fn load_templates() -> Result<Tera, tera::Error> {
    let mut tera = Tera::default();
    tera.add_raw_template(INDEX_TEMPLATE, include_str!("../templates/index.html"))?;
    Ok(tera)
}

/// One row of the results table. The PDF payload stays out of the page.
#[derive(Debug, Serialize)]
pub struct ReportRow {
    pub accession_number: String,
    pub report_type: String,
    pub description: String,
    pub date: String,
    pub has_pdf: bool,
}

impl From<&Report> for ReportRow {
    fn from(report: &Report) -> Self {
        Self {
            accession_number: report.accession_number.clone(),
            report_type: report.report_type.clone(),
            description: report.description.clone(),
            date: report.date.clone(),
            has_pdf: report.has_pdf(),
        }
    }
}

/// Everything the search page shows.
#[derive(Debug, Default, Serialize)]
pub struct SearchPage {
    pub tax_id: String,
    pub searched: bool,
    pub error: Option<String>,
    pub subject_name: Option<String>,
    pub reports: Vec<ReportRow>,
}

impl SearchPage {
    pub fn with_reports(tax_id: String, reports: &[Report]) -> Self {
        Self {
            tax_id,
            searched: true,
            error: None,
            subject_name: reports.iter().find_map(|r| r.subject_name.clone()),
            reports: reports.iter().map(ReportRow::from).collect(),
        }
    }

    pub fn with_error(tax_id: String, error: String) -> Self {
        Self {
            tax_id,
            error: Some(error),
            ..Self::default()
        }
    }
}

pub fn render_search_page(tera: &Tera, page: &SearchPage) -> Result<String, tera::Error> {
    let context = Context::from_serialize(page)?;
    tera.render(INDEX_TEMPLATE, &context)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(accession: &str, payload: &str) -> Report {
        Report {
            accession_number: accession.into(),
            report_type: "RX".into(),
            description: "Tórax <PA>".into(),
            date: "2024-01-01".into(),
            pdf_payload: payload.into(),
            subject_tax_id: Some("12345678903".into()),
            subject_name: Some("Paciente Teste".into()),
        }
    }

    #[test]
    fn test_renders_report_rows_escaped() {
        let tera = load_templates().unwrap();
        let page = SearchPage::with_reports(
            "12345678903".into(),
            &[report("A1", "QQ=="), report("A2", "")],
        );

        let html = render_search_page(&tera, &page).unwrap();
        assert!(html.contains("2 report(s) found."));
        assert!(html.contains("Paciente Teste"));
        assert!(html.contains("Tórax &lt;PA&gt;"));
        assert!(html.contains("/laudo?cpf=12345678903&amp;accession=A1"));
        assert!(!html.contains("accession=A2"));
        assert!(html.contains("unavailable"));
    }

    #[test]
    fn test_renders_empty_result_message() {
        let tera = load_templates().unwrap();
        let page = SearchPage::with_reports("00000000000".into(), &[]);

        let html = render_search_page(&tera, &page).unwrap();
        assert!(html.contains("No reports found for this tax ID."));
    }

    #[test]
    fn test_renders_error_message() {
        let tera = load_templates().unwrap();
        let page = SearchPage::with_error(String::new(), "authentication failed".into());

        let html = render_search_page(&tera, &page).unwrap();
        assert!(html.contains("authentication failed"));
        assert!(!html.contains("No reports found"));
    }
}
