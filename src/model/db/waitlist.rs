use std::ops::Deref;

use chrono::{DateTime, Utc};
use mongodb::bson::serde_helpers::chrono_datetime_as_bson_datetime;
use serde::{Deserialize, Serialize};

use crate::model::{db::now, mongodb::Id};

/// Core waitlist data, as stored in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntryCore {
    /// Contact address, unique across the waitlist.
    pub email: String,
    #[serde(with = "chrono_datetime_as_bson_datetime")]
    pub created_at: DateTime<Utc>,
}

impl WaitlistEntryCore {
    pub fn new(email: String) -> Self {
        Self {
            email,
            created_at: now(),
        }
    }
}

/// A waitlist entry without an ID.
pub type NewWaitlistEntry = WaitlistEntryCore;

/// A waitlist entry from the database, with its unique ID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitlistEntry {
    #[serde(rename = "_id")]
    pub id: Id,
    #[serde(flatten)]
    pub entry: WaitlistEntryCore,
}

impl Deref for WaitlistEntry {
    type Target = WaitlistEntryCore;

    fn deref(&self) -> &Self::Target {
        &self.entry
    }
}
