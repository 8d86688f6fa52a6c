mod adf;
mod cli;
mod client;
mod config;
mod error;
#[cfg(test)]
mod fake;
mod logging;
mod notice;
mod output;
mod remediation;
mod responses;
mod rules;
mod runner;
mod tracker;
mod types;

use std::error::Error;

use chrono::{FixedOffset, Utc};
use clap::Parser;

use cli::Cli;
use client::JiraClient;
use config::Config;
use error::{PatrolError, Result};
use runner::{run_rule, Context, RuleReport};

/// Hong Kong time, the team's reference clock for run logs.
const HKT_OFFSET_SECS: i32 = 8 * 3600;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = run(&cli).await {
        eprintln!("Error: {e}");

        if cli.verbose {
            let mut source = e.source();
            while let Some(cause) = source {
                eprintln!("Caused by: {cause}");
                source = std::error::Error::source(cause);
            }
        }

        std::process::exit(1);
    }
}

async fn run(cli: &Cli) -> Result<()> {
    logging::init(&cli.log_level);

    let now = match FixedOffset::east_opt(HKT_OFFSET_SECS) {
        Some(hkt) => Utc::now().with_timezone(&hkt).to_rfc3339(),
        None => Utc::now().to_rfc3339(),
    };
    tracing::info!("Start JIRA checking script at {now} (HKT)");

    let config = Config::load(cli.config.as_deref())?;

    if !config.any_check_enabled() {
        tracing::info!("No checks enabled, nothing to do");
        output::print_summary(&[], cli.json);
        return Ok(());
    }

    let client = JiraClient::new(config.domain()?, config.token()?);
    let ctx = Context {
        tracker: &client,
        wiki: &client,
    };

    let mut reports = Vec::new();
    let mut failed = Vec::new();

    for rule in rules::enabled(&config)? {
        match run_rule(rule.as_ref(), &ctx).await {
            Ok(report) => {
                if !report.succeeded() {
                    failed.push(report.rule.clone());
                }
                reports.push(report);
            }
            Err(e) => {
                tracing::error!("Check '{}' failed: {e}", rule.name());
                failed.push(rule.name().to_string());
                reports.push(RuleReport::aborted(rule.name(), &e));
            }
        }
    }

    output::print_summary(&reports, cli.json);

    if !failed.is_empty() {
        return Err(PatrolError::ChecksFailed(failed));
    }

    tracing::info!("Done JIRA checking script!");
    Ok(())
}
