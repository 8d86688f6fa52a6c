use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A typed, directed relation between two tickets. Jira populates exactly
/// one of `inward_issue` / `outward_issue`.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct IssueLink {
    pub id: String,
    #[serde(rename = "type")]
    pub link_type: IssueLinkType,
    #[serde(rename = "inwardIssue")]
    pub inward_issue: Option<LinkedIssue>,
    #[serde(rename = "outwardIssue")]
    pub outward_issue: Option<LinkedIssue>,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct IssueLinkType {
    pub name: String,
    pub inward: String,
    pub outward: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct LinkedIssue {
    pub key: String,
    pub fields: Value,
}

impl fmt::Display for IssueLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(issue) = &self.inward_issue {
            write!(f, "inward ({} -> {})", self.link_type.inward, issue.key)
        } else if let Some(issue) = &self.outward_issue {
            write!(f, "outward ({} -> {})", self.link_type.outward, issue.key)
        } else {
            write!(f, "link {}", self.id)
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_inward_link() {
        let link: IssueLink = serde_json::from_value(json!({
            "id": "501",
            "type": {
                "name": "Gantt End to Start",
                "inward": "has to be done after",
                "outward": "has to be done before"
            },
            "inwardIssue": { "key": "CAT-9", "fields": { "summary": "x" } }
        }))
        .unwrap();

        assert_eq!(link.link_type.name, "Gantt End to Start");
        assert!(link.outward_issue.is_none());
        assert_eq!(link.to_string(), "inward (has to be done after -> CAT-9)");
    }

    #[test]
    fn test_display_without_issue() {
        let link: IssueLink = serde_json::from_value(json!({ "id": "7" })).unwrap();
        assert_eq!(link.to_string(), "link 7");
    }
}
