use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(name = "jira-patrol")]
#[command(about = "Scan recently updated Jira tickets for compliance issues", version)]
#[command(after_help = "ENVIRONMENT:
    JIRA_DOMAIN                          Jira Cloud host (e.g. acme.atlassian.net)
    JIRA_TOKEN                           Basic auth credential (base64 of email:api_token)
    JIRA_PROJECT_KEY                     Project to scan
    JIRA_REASON_FIELD                    Field id that receives the remediation reason
    JIRA_SHOULD_CHECK_DEPLOYMENT_NOTE    Enable the release note check
    JIRA_SHOULD_CHECK_LINKED_DEPENDENCY  Enable the sprint ordering check
    JIRA_SHOULD_CHECK_GITHUB             Enable the open pull request check

EXAMPLES:
    jira-patrol
    jira-patrol --config ./patrol.toml --log-level debug
    jira-patrol --json")]
pub struct Cli {
    /// Path to a TOML config file (defaults to the platform config directory)
    #[arg(long, short)]
    pub config: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, env = "LOGGER_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,

    /// Show detailed error information
    #[arg(long, short)]
    pub verbose: bool,
}
