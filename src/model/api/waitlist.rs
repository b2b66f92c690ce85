use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ApiId;
use crate::model::db::WaitlistEntry;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistRequest {
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntryDescription {
    pub id: ApiId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<WaitlistEntry> for WaitlistEntryDescription {
    fn from(entry: WaitlistEntry) -> Self {
        Self {
            id: entry.id.into(),
            email: entry.entry.email,
            created_at: entry.entry.created_at,
        }
    }
}
