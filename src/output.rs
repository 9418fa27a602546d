use crate::batch::{ClientOutcome, ClientStatus};
use crate::util::format_int;
use std::path::Path;
use tabled::{settings::Style, Table, Tabled};

pub fn write_html(path: &Path, html: &str) -> std::io::Result<()> {
    std::fs::write(path, html)
}

#[derive(Debug, Clone, Tabled)]
pub struct OutcomeRow {
    #[tabled(rename = "Client")]
    pub client: String,
    #[tabled(rename = "Status")]
    pub status: String,
    #[tabled(rename = "Detail")]
    pub detail: String,
}

impl From<&ClientOutcome> for OutcomeRow {
    fn from(outcome: &ClientOutcome) -> Self {
        let client = outcome
            .folder
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| outcome.folder.display().to_string());
        let (status, detail) = match &outcome.status {
            ClientStatus::Generated { path, bytes } => (
                "generated".to_string(),
                format!("{} ({} bytes)", path.display(), format_int(*bytes)),
            ),
            ClientStatus::Skipped => ("skipped".to_string(), "no reports.json".to_string()),
            ClientStatus::Failed(err) => ("failed".to_string(), err.to_string()),
        };
        OutcomeRow { client, status, detail }
    }
}

pub fn summary_table(outcomes: &[ClientOutcome]) -> String {
    if outcomes.is_empty() {
        return "(no client folders)".to_string();
    }
    let rows: Vec<OutcomeRow> = outcomes.iter().map(OutcomeRow::from).collect();
    Table::new(rows).with(Style::markdown()).to_string()
}

pub fn print_summary(outcomes: &[ClientOutcome]) {
    let generated = outcomes
        .iter()
        .filter(|o| matches!(o.status, ClientStatus::Generated { .. }))
        .count();
    let failed = outcomes.iter().filter(|o| o.is_failure()).count();
    println!("\n{}\n", summary_table(outcomes));
    println!(
        "{} generated, {} failed, {} skipped",
        format_int(generated),
        format_int(failed),
        format_int(outcomes.len() - generated - failed)
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PortalError;
    use std::path::PathBuf;

    #[test]
    fn test_summary_table_rows() {
        let outcomes = vec![
            ClientOutcome {
                folder: PathBuf::from("clients/acme"),
                status: ClientStatus::Generated {
                    path: PathBuf::from("clients/acme/index.html"),
                    bytes: 18204,
                },
            },
            ClientOutcome {
                folder: PathBuf::from("clients/bolt"),
                status: ClientStatus::Failed(PortalError::MissingRequiredField("client.name".into())),
            },
            ClientOutcome { folder: PathBuf::from("clients/misc"), status: ClientStatus::Skipped },
        ];
        let table = summary_table(&outcomes);
        assert!(table.contains("| Client"));
        assert!(table.contains("18,204 bytes"));
        assert!(table.contains("Missing required field: client.name"));
        assert!(table.contains("skipped"));
    }

    #[test]
    fn test_summary_table_empty() {
        assert_eq!(summary_table(&[]), "(no client folders)");
    }
}
