use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct Sprint {
    pub id: Option<u64>,
    pub name: String,
    pub state: String,
    #[serde(rename = "startDate", deserialize_with = "lenient_datetime")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(rename = "endDate", deserialize_with = "lenient_datetime")]
    pub end_date: Option<DateTime<Utc>>,
}

/// Earliest start date across a sprint set. Sprints without a start date
/// don't contribute; `None` when no sprint has one.
pub fn earliest_start(sprints: &[Sprint]) -> Option<DateTime<Utc>> {
    sprints.iter().filter_map(|s| s.start_date).min()
}

fn lenient_datetime<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|s| DateTime::parse_from_rfc3339(&s).ok().map(|dt| dt.with_timezone(&Utc))))
}
