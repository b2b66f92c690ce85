use std::ops::Deref;

use log::debug;
use mongodb::{
    bson::{doc, Document},
    error::Error as DbError,
    options::IndexOptions,
    Collection, Database, IndexModel,
};

use crate::model::db::{NewQuestion, NewQuiz, NewWaitlistEntry, Question, Quiz, WaitlistEntry};

/// A type that can be directly inserted/read to/from the database.
pub trait MongoCollection {
    /// The name of the collection.
    const NAME: &'static str;
}

/// A database collection of the given type.
pub struct Coll<T>(Collection<T>);

impl<T> Coll<T>
where
    T: MongoCollection,
{
    /// Get a handle on this collection in the given database.
    pub fn from_db(db: &Database) -> Self {
        Self(db.collection(T::NAME))
    }
}

// `Derive(Clone)` would only derive if `T: Clone`, but we don't need that bound.
impl<T> Clone for Coll<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T> Deref for Coll<T> {
    type Target = Collection<T>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

// Quiz collections
const QUIZZES: &str = "quizzes";
impl MongoCollection for Quiz {
    const NAME: &'static str = QUIZZES;
}
// `NewQuiz` is the ID-less core, so it gets the same name.
impl MongoCollection for NewQuiz {
    const NAME: &'static str = QUIZZES;
}

// Question collections
const QUESTIONS: &str = "questions";
impl MongoCollection for Question {
    const NAME: &'static str = QUESTIONS;
}
impl MongoCollection for NewQuestion {
    const NAME: &'static str = QUESTIONS;
}

// Waitlist collections
const WAITLIST: &str = "waitlist";
impl MongoCollection for WaitlistEntry {
    const NAME: &'static str = WAITLIST;
}
impl MongoCollection for NewWaitlistEntry {
    const NAME: &'static str = WAITLIST;
}

/// The unique indexes of each collection, as `(collection, keys)`.
///
/// They are what actually guarantees quiz name uniqueness per creator,
/// question order uniqueness per quiz and email uniqueness on the waitlist.
fn unique_indexes() -> [(&'static str, Document); 3] {
    [
        (QUIZZES, doc! {"creator": 1, "name": 1}),
        (QUESTIONS, doc! {"quiz_id": 1, "order": 1}),
        (WAITLIST, doc! {"email": 1}),
    ]
}

/// Ensure that all the required indexes exist on the given database.
///
/// This operation is idempotent.
pub async fn ensure_indexes_exist(db: &Database) -> Result<(), DbError> {
    debug!("Ensuring collection indexes exist");

    let unique = IndexOptions::builder().unique(true).build();
    for (collection, keys) in unique_indexes() {
        let index = IndexModel::builder()
            .keys(keys)
            .options(unique.clone())
            .build();
        db.collection::<Document>(collection)
            .create_index(index, None)
            .await?;
    }

    Ok(())
}
