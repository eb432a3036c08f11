//! Plain-text rendering of report lists for the terminal.

use console::style;
use laudos_core::Report;

const SEPARATOR_WIDTH: usize = 50;

/// Formats the result of one search.
pub fn format_reports(reports: &[Report]) -> String {
    if reports.is_empty() {
        return format!("{}\n", style("No reports found for this tax ID.").red());
    }

    let mut out = String::new();

    if let Some(name) = reports.iter().find_map(|r| r.subject_name.as_deref()) {
        out.push_str(&format!("Patient: {}\n", style(name).bold()));
    }

    out.push_str(&format!(
        "{}\n",
        style(format!("Found {} report(s) for the patient.", reports.len())).magenta()
    ));
    out.push_str(&"-".repeat(SEPARATOR_WIDTH));
    out.push('\n');

    for report in reports {
        out.push_str(&format!(
            "  • [{}] {}\n",
            report.date,
            style(&report.report_type).bold()
        ));
        out.push_str(&format!(
            "    Description: {} (Accession: {})\n",
            report.description, report.accession_number
        ));
        if !report.has_pdf() {
            out.push_str("    PDF unavailable\n");
        }
        out.push('\n');
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(accession: &str, payload: &str) -> Report {
        Report {
            accession_number: accession.into(),
            report_type: "RX".into(),
            description: "Tórax".into(),
            date: "2024-01-01".into(),
            pdf_payload: payload.into(),
            subject_tax_id: None,
            subject_name: Some("Paciente Teste".into()),
        }
    }

    #[test]
    fn test_empty_result() {
        let out = console::strip_ansi_codes(&format_reports(&[])).to_string();
        assert_eq!(out, "No reports found for this tax ID.\n");
    }

    #[test]
    fn test_lists_each_report() {
        let out = format_reports(&[report("A1", "QQ=="), report("A2", "")]);
        let out = console::strip_ansi_codes(&out).to_string();

        assert!(out.contains("Patient: Paciente Teste"));
        assert!(out.contains("Found 2 report(s) for the patient."));
        assert!(out.contains("• [2024-01-01] RX"));
        assert!(out.contains("Description: Tórax (Accession: A1)"));
        assert_eq!(out.matches("PDF unavailable").count(), 1);
    }
}
