use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    #[serde(alias = "_id")]
    pub id: String,
    pub title: String,
    pub remind_at: DateTime<Utc>,
    #[serde(default)]
    pub note: Option<String>,
}

impl Reminder {
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        self.remind_at <= now
    }
}
