//! The compliance checks. Each one searches for its own tickets, validates
//! them one at a time and remediates the ones that fail.

mod open_pr;
mod release_note;
mod sprint_order;

pub use open_pr::OpenPullRequestRule;
pub use release_note::ReleaseNoteRule;
pub use sprint_order::SprintOrderRule;

use crate::config::Config;
use crate::error::Result;
use crate::runner::Rule;

/// Statuses a ticket is in once development is finished.
const DONE_STATUSES: [&str; 2] = ["DONE (Development)", "Accepted"];

/// The rules switched on in `config`, in a fixed order.
pub fn enabled(config: &Config) -> Result<Vec<Box<dyn Rule>>> {
    let mut rules: Vec<Box<dyn Rule>> = Vec::new();

    if config.checks.release_note {
        rules.push(Box::new(ReleaseNoteRule::new(config)?));
    }
    if config.checks.linked_dependency {
        rules.push(Box::new(SprintOrderRule::new(config)?));
    }
    if config.checks.open_pull_request {
        rules.push(Box::new(OpenPullRequestRule::new(config)?));
    }

    Ok(rules)
}

/// `"A", "B"` for a JQL `IN (...)` clause.
fn jql_list(values: &[&str]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v.replace('"', "\\\"")))
        .collect::<Vec<_>>()
        .join(", ")
}
