//! DB-compatible (e.g. de/serialisable) types.
//!
//! The types in this module are serialised in an DB-friendly way, e.g.:
//!
//! - IDs and datetimes are serialised in MongoDB's own format.

use chrono::{DateTime, SubsecRound, Utc};

pub mod question;
pub mod quiz;
pub mod waitlist;

pub use question::{NewQuestion, Proposition, Question, QuestionCore};
pub use quiz::{NewQuiz, Quiz, QuizCore, DEFAULT_TIME_TO_ANSWER};
pub use waitlist::{NewWaitlistEntry, WaitlistEntry, WaitlistEntryCore};

/// The current time, truncated to the millisecond precision of BSON datetimes
/// so that a stored value reads back unchanged.
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}
