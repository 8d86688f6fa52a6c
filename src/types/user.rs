use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct UserAccount {
    #[serde(rename = "accountId")]
    pub account_id: String,
    #[serde(rename = "emailAddress")]
    pub email_address: String,
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub active: bool,
    #[serde(rename = "timeZone")]
    pub time_zone: String,
}

impl UserAccount {
    /// The account id, if the tracker returned a usable one.
    pub fn id(&self) -> Option<&str> {
        let id = self.account_id.trim();
        (!id.is_empty()).then_some(id)
    }
}
