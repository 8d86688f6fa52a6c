use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use regex::Regex;
use serde::Deserialize;

use crate::error::{PatrolError, Result};

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub domain: Option<String>,
    pub token: Option<String>,
    pub project_key: Option<String>,
    pub suppress_label: String,
    pub release_label: String,
    /// How far back `updated` may be, in JQL relative form (e.g. `5d`).
    pub lookback: String,
    /// Tickets updated more recently than this are left for the next run.
    pub settle_buffer: String,
    pub max_results: u32,
    pub checks: Checks,
    pub fields: FieldIds,
}

/// Which rules run.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Checks {
    pub release_note: bool,
    pub linked_dependency: bool,
    pub open_pull_request: bool,
}

/// Custom field identifiers of the Jira site.
#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct FieldIds {
    pub sprint: String,
    pub reviewer: String,
    /// Receives the remediation reason on Rework and Reopen (CAT). Required
    /// whenever a rule that moves tickets is enabled.
    pub reason: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            domain: None,
            token: None,
            project_key: None,
            suppress_label: "SuppressScanning".to_string(),
            release_label: "DeploymentNote".to_string(),
            lookback: "5d".to_string(),
            settle_buffer: "1d".to_string(),
            max_results: 200,
            checks: Checks::default(),
            fields: FieldIds::default(),
        }
    }
}

impl Default for FieldIds {
    fn default() -> Self {
        Self {
            sprint: "customfield_10122".to_string(),
            reviewer: "customfield_11696".to_string(),
            reason: None,
        }
    }
}

impl Config {
    /// Load the config file (explicit path or the default location), then
    /// apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let config_path = match explicit {
            Some(path) => path.to_path_buf(),
            None => Self::config_path()?,
        };

        let mut config = if config_path.exists() {
            Self::from_file(&config_path)?
        } else {
            Config::default()
        };

        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    pub fn config_path() -> Result<PathBuf> {
        ProjectDirs::from("", "", "jira-patrol")
            .map(|dirs| dirs.config_dir().join("config.toml"))
            .ok_or(PatrolError::NoConfigDir)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| PatrolError::ConfigRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| PatrolError::ConfigParse {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Environment variables take precedence over the config file.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(token) = lookup("JIRA_TOKEN") {
            self.token = Some(token);
        }
        if let Some(domain) = lookup("JIRA_DOMAIN") {
            self.domain = Some(domain);
        }
        if let Some(project) = lookup("JIRA_PROJECT_KEY") {
            self.project_key = Some(project);
        }
        if let Some(field) = lookup("JIRA_REASON_FIELD") {
            self.fields.reason = Some(field);
        }

        if let Some(flag) = lookup("JIRA_SHOULD_CHECK_DEPLOYMENT_NOTE") {
            self.checks.release_note = parse_flag(&flag);
        }
        if let Some(flag) = lookup("JIRA_SHOULD_CHECK_LINKED_DEPENDENCY") {
            self.checks.linked_dependency = parse_flag(&flag);
        }
        if let Some(flag) = lookup("JIRA_SHOULD_CHECK_GITHUB") {
            self.checks.open_pull_request = parse_flag(&flag);
        }
    }

    fn validate(&self) -> Result<()> {
        let window = Regex::new(r"^\d+[hdw]$").map_err(|_| {
            PatrolError::InvalidWindow(self.lookback.clone())
        })?;

        for value in [&self.lookback, &self.settle_buffer] {
            if !window.is_match(value) {
                return Err(PatrolError::InvalidWindow(value.clone()));
            }
        }

        if self.checks.release_note || self.checks.open_pull_request {
            self.reason_field()?;
        }

        Ok(())
    }

    pub fn any_check_enabled(&self) -> bool {
        self.checks.release_note || self.checks.linked_dependency || self.checks.open_pull_request
    }

    pub fn domain(&self) -> Result<&str> {
        self.domain.as_deref().ok_or(PatrolError::MissingSetting {
            key: "domain",
            env: "JIRA_DOMAIN",
        })
    }

    pub fn token(&self) -> Result<&str> {
        self.token.as_deref().ok_or(PatrolError::MissingSetting {
            key: "token",
            env: "JIRA_TOKEN",
        })
    }

    pub fn reason_field(&self) -> Result<&str> {
        self.fields
            .reason
            .as_deref()
            .map(str::trim)
            .filter(|field| !field.is_empty())
            .ok_or(PatrolError::MissingSetting {
                key: "fields.reason",
                env: "JIRA_REASON_FIELD",
            })
    }

    pub fn project_key(&self) -> Result<&str> {
        self.project_key.as_deref().ok_or(PatrolError::MissingSetting {
            key: "project_key",
            env: "JIRA_PROJECT_KEY",
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("TRUE"));
        assert!(parse_flag("1"));
        assert!(parse_flag("Yes"));
        assert!(!parse_flag(""));
        assert!(!parse_flag("no"));
        assert!(!parse_flag("on"));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: Config = toml::from_str(
            r#"
domain = "file.atlassian.net"
project_key = "FILE"

[checks]
release_note = true
"#,
        )
        .unwrap();

        let vars = env(&[
            ("JIRA_DOMAIN", "env.atlassian.net"),
            ("JIRA_TOKEN", "secret"),
            ("JIRA_SHOULD_CHECK_DEPLOYMENT_NOTE", "false"),
            ("JIRA_SHOULD_CHECK_GITHUB", "yes"),
            ("JIRA_REASON_FIELD", "customfield_12000"),
        ]);
        config.apply_env(|key| vars.get(key).cloned());

        assert_eq!(config.domain().unwrap(), "env.atlassian.net");
        assert_eq!(config.token().unwrap(), "secret");
        assert_eq!(config.project_key().unwrap(), "FILE");
        assert!(!config.checks.release_note);
        assert!(!config.checks.linked_dependency);
        assert!(config.checks.open_pull_request);
        assert_eq!(config.reason_field().unwrap(), "customfield_12000");
    }

    #[test]
    fn test_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.suppress_label, "SuppressScanning");
        assert_eq!(config.release_label, "DeploymentNote");
        assert_eq!(config.lookback, "5d");
        assert_eq!(config.settle_buffer, "1d");
        assert_eq!(config.max_results, 200);
        assert_eq!(config.fields.sprint, "customfield_10122");
        assert_eq!(config.fields.reviewer, "customfield_11696");
        assert!(config.fields.reason.is_none());
        assert!(!config.any_check_enabled());
    }

    #[test]
    fn test_missing_settings() {
        let config = Config::default();
        assert!(matches!(
            config.domain(),
            Err(PatrolError::MissingSetting { key: "domain", .. })
        ));
        assert!(matches!(
            config.project_key(),
            Err(PatrolError::MissingSetting { env: "JIRA_PROJECT_KEY", .. })
        ));
    }

    #[test]
    fn test_validate_windows() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.lookback = "2w".to_string();
        config.settle_buffer = "12h".to_string();
        assert!(config.validate().is_ok());

        config.lookback = "five days".to_string();
        assert!(matches!(
            config.validate(),
            Err(PatrolError::InvalidWindow(w)) if w == "five days"
        ));
    }

    #[test]
    fn test_transitioning_rules_require_reason_field() {
        let mut config = Config::default();
        config.checks.linked_dependency = true;
        assert!(config.validate().is_ok(), "sprint ordering only comments");

        for (release_note, open_pull_request) in [(true, false), (false, true)] {
            let mut config = Config::default();
            config.checks.release_note = release_note;
            config.checks.open_pull_request = open_pull_request;
            assert!(matches!(
                config.validate(),
                Err(PatrolError::MissingSetting { key: "fields.reason", env: "JIRA_REASON_FIELD" })
            ));

            config.fields.reason = Some("  ".to_string());
            assert!(config.validate().is_err());

            config.fields.reason = Some("customfield_12000".to_string());
            assert!(config.validate().is_ok());
        }
    }
}
