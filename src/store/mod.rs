//! Persistence of quizzes, questions and waitlist entries.
//!
//! Every service operation runs inside a single [`Transaction`]: its writes
//! become visible together on [`Transaction::commit`], and dropping an
//! uncommitted transaction discards them.
//!
//! Implementations must enforce uniqueness of quiz `(creator, name)`,
//! question `(quiz_id, order)` and waitlist `email`, and cascade quiz
//! deletion to the quiz's questions.

use std::sync::Arc;

use crate::error::Result;
use crate::model::{
    db::{NewQuestion, NewQuiz, NewWaitlistEntry, Question, Quiz, WaitlistEntry},
    mongodb::Id,
    ordering::Order,
};

pub mod memory;
pub mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// A source of transactions.
#[rocket::async_trait]
pub trait QuizStore: Send + Sync {
    /// Start a new unit of work.
    async fn begin(&self) -> Result<Box<dyn Transaction + '_>>;
}

/// A unit of work against the store.
#[rocket::async_trait]
pub trait Transaction: Send {
    async fn quiz(&mut self, id: Id) -> Result<Option<Quiz>>;

    async fn quizzes_by_creator(&mut self, creator: &str) -> Result<Vec<Quiz>>;

    async fn quiz_by_name(&mut self, creator: &str, name: &str) -> Result<Option<Quiz>>;

    /// Insert a quiz. A `(creator, name)` collision fails with `Conflict`.
    async fn insert_quiz(&mut self, quiz: NewQuiz) -> Result<Quiz>;

    /// Overwrite the stored quiz with the same ID. A `(creator, name)`
    /// collision fails with `Conflict`.
    async fn replace_quiz(&mut self, quiz: &Quiz) -> Result<()>;

    /// Delete a quiz and all of its questions.
    async fn delete_quiz(&mut self, id: Id) -> Result<()>;

    /// All questions of a quiz, ascending by order.
    async fn questions(&mut self, quiz_id: Id) -> Result<Vec<Question>>;

    async fn question(&mut self, id: Id) -> Result<Option<Question>>;

    async fn count_questions(&mut self, quiz_id: Id) -> Result<Order>;

    async fn insert_question(&mut self, question: NewQuestion) -> Result<Question>;

    /// Delete a single question. Siblings are left untouched.
    async fn delete_question(&mut self, id: Id) -> Result<()>;

    async fn set_question_order(&mut self, id: Id, order: Order) -> Result<()>;

    /// Insert a waitlist entry. A duplicate email fails with `Conflict`.
    async fn insert_waitlist_entry(&mut self, entry: NewWaitlistEntry) -> Result<WaitlistEntry>;

    /// All waitlist entries, oldest first.
    async fn waitlist(&mut self) -> Result<Vec<WaitlistEntry>>;

    /// Make every write of this transaction visible at once.
    async fn commit(self: Box<Self>) -> Result<()>;
}

/// The store in use, as held in Rocket's managed state.
#[derive(Clone)]
pub struct Storage(Arc<dyn QuizStore>);

impl Storage {
    pub fn new(store: impl QuizStore + 'static) -> Self {
        Self(Arc::new(store))
    }

    pub fn store(&self) -> &dyn QuizStore {
        self.0.as_ref()
    }
}

/// The error for a quiz name already used by the same creator.
pub(crate) fn name_conflict(name: &str) -> crate::error::Error {
    crate::error::Error::Conflict(format!("A quiz named {name:?} already exists"))
}

/// The error for an email already on the waitlist.
pub(crate) fn email_conflict() -> crate::error::Error {
    crate::error::Error::Conflict("This email is already on the waitlist".to_string())
}
