use colored::Colorize;
use tabled::{settings::Style, Table, Tabled};

use crate::runner::RuleReport;

#[derive(Tabled)]
struct SummaryRow {
    #[tabled(rename = "Check")]
    rule: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Scanned")]
    scanned: usize,
    #[tabled(rename = "Passed")]
    passed: usize,
    #[tabled(rename = "Skipped")]
    skipped: usize,
    #[tabled(rename = "Bad")]
    bad: String,
    #[tabled(rename = "Errors")]
    errors: String,
}

impl From<&RuleReport> for SummaryRow {
    fn from(report: &RuleReport) -> Self {
        Self {
            rule: report.rule.clone(),
            result: result_colored(report.succeeded()),
            scanned: report.scanned,
            passed: report.passed,
            skipped: report.skipped,
            bad: list_or_dash(&report.bad),
            errors: match &report.failure {
                Some(failure) => failure.clone(),
                None => list_or_dash(&report.errors),
            },
        }
    }
}

/// Print the run summary as a table, or as JSON when `json` is set.
pub fn print_summary(reports: &[RuleReport], json: bool) {
    if json {
        println!("{}", serde_json::to_string_pretty(reports).unwrap_or_default());
        return;
    }

    if reports.is_empty() {
        println!("No checks ran.");
        return;
    }

    let rows: Vec<SummaryRow> = reports.iter().map(SummaryRow::from).collect();
    let table = Table::new(rows).with(Style::rounded()).to_string();
    println!("{table}");
}

fn result_colored(succeeded: bool) -> String {
    if succeeded {
        "PASS".green().bold().to_string()
    } else {
        "FAIL".red().bold().to_string()
    }
}

fn list_or_dash(items: &[String]) -> String {
    if items.is_empty() {
        "-".to_string()
    } else {
        items.join(", ")
    }
}
