use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Transition {
    pub id: String,
    pub name: String,
    pub to: Option<TransitionStatus>,
    #[serde(rename = "hasScreen")]
    pub has_screen: bool,
    #[serde(rename = "isGlobal")]
    pub is_global: bool,
    #[serde(rename = "isInitial")]
    pub is_initial: bool,
    #[serde(rename = "isAvailable")]
    pub is_available: bool,
    #[serde(rename = "isConditional")]
    pub is_conditional: bool,
    #[serde(rename = "isLooped")]
    pub is_looped: bool,
}

impl Transition {
    /// Name of the status this transition leads to.
    pub fn target_name(&self) -> Option<&str> {
        self.to.as_ref().map(|s| s.name.as_str())
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct TransitionStatus {
    #[serde(rename = "self")]
    pub self_url: String,
    pub description: String,
    #[serde(rename = "iconUrl")]
    pub icon_url: String,
    pub name: String,
    pub id: String,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_transition_flags() {
        let t: Transition = serde_json::from_value(json!({
            "id": "31",
            "name": "Send back",
            "to": { "id": "10010", "name": "Rework" },
            "hasScreen": true,
            "isGlobal": false,
            "isAvailable": true
        }))
        .unwrap();

        assert_eq!(t.target_name(), Some("Rework"));
        assert!(t.has_screen);
        assert!(t.is_available);
        assert!(!t.is_looped);
    }
}
