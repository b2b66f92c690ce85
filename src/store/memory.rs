//! A process-local store.
//!
//! Transactions are serialised behind an async mutex. Each one works on a
//! private copy of the tables which replaces the committed tables on commit,
//! so an abandoned transaction leaves no trace.

use std::collections::BTreeMap;
use std::sync::Arc;

use rocket::tokio::sync::{Mutex, OwnedMutexGuard};

use super::{email_conflict, name_conflict, QuizStore, Transaction};
use crate::error::{Error, Result};
use crate::model::{
    db::{NewQuestion, NewQuiz, NewWaitlistEntry, Question, Quiz, WaitlistEntry},
    mongodb::Id,
    ordering::Order,
};

#[derive(Debug, Clone, Default)]
struct Tables {
    quizzes: BTreeMap<Id, Quiz>,
    questions: BTreeMap<Id, Question>,
    waitlist: Vec<WaitlistEntry>,
}

impl Tables {
    fn order_taken(&self, quiz_id: Id, order: Order, except: Option<Id>) -> bool {
        self.questions
            .values()
            .any(|q| q.quiz_id == quiz_id && q.order == order && Some(q.id) != except)
    }
}

/// An in-memory [`QuizStore`].
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed quizzes and questions, for inspecting state in tests.
    #[cfg(test)]
    pub async fn dump(&self) -> (Vec<Quiz>, Vec<Question>) {
        let tables = self.tables.lock().await;
        (
            tables.quizzes.values().cloned().collect(),
            tables.questions.values().cloned().collect(),
        )
    }
}

#[rocket::async_trait]
impl QuizStore for MemoryStore {
    async fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        let committed = self.tables.clone().lock_owned().await;
        let working = Tables::clone(&committed);
        Ok(Box::new(MemoryTransaction { committed, working }))
    }
}

struct MemoryTransaction {
    committed: OwnedMutexGuard<Tables>,
    working: Tables,
}

#[rocket::async_trait]
impl Transaction for MemoryTransaction {
    async fn quiz(&mut self, id: Id) -> Result<Option<Quiz>> {
        Ok(self.working.quizzes.get(&id).cloned())
    }

    async fn quizzes_by_creator(&mut self, creator: &str) -> Result<Vec<Quiz>> {
        let mut quizzes: Vec<Quiz> = self
            .working
            .quizzes
            .values()
            .filter(|quiz| quiz.is_owned_by(creator))
            .cloned()
            .collect();
        quizzes.sort_by_key(|quiz| quiz.created_at);
        Ok(quizzes)
    }

    async fn quiz_by_name(&mut self, creator: &str, name: &str) -> Result<Option<Quiz>> {
        Ok(self
            .working
            .quizzes
            .values()
            .find(|quiz| quiz.is_owned_by(creator) && quiz.name == name)
            .cloned())
    }

    async fn insert_quiz(&mut self, quiz: NewQuiz) -> Result<Quiz> {
        if self.quiz_by_name(&quiz.creator, &quiz.name).await?.is_some() {
            return Err(name_conflict(&quiz.name));
        }
        let quiz = Quiz { id: Id::new(), quiz };
        self.working.quizzes.insert(quiz.id, quiz.clone());
        Ok(quiz)
    }

    async fn replace_quiz(&mut self, quiz: &Quiz) -> Result<()> {
        if !self.working.quizzes.contains_key(&quiz.id) {
            return Err(Error::QuizNotFound(quiz.id));
        }
        let collision = self.working.quizzes.values().any(|other| {
            other.id != quiz.id && other.creator == quiz.creator && other.name == quiz.name
        });
        if collision {
            return Err(name_conflict(&quiz.name));
        }
        self.working.quizzes.insert(quiz.id, quiz.clone());
        Ok(())
    }

    async fn delete_quiz(&mut self, id: Id) -> Result<()> {
        self.working
            .quizzes
            .remove(&id)
            .ok_or(Error::QuizNotFound(id))?;
        self.working.questions.retain(|_, q| q.quiz_id != id);
        Ok(())
    }

    async fn questions(&mut self, quiz_id: Id) -> Result<Vec<Question>> {
        let mut questions: Vec<Question> = self
            .working
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .cloned()
            .collect();
        questions.sort_by_key(|q| q.order);
        Ok(questions)
    }

    async fn question(&mut self, id: Id) -> Result<Option<Question>> {
        Ok(self.working.questions.get(&id).cloned())
    }

    async fn count_questions(&mut self, quiz_id: Id) -> Result<Order> {
        let count = self
            .working
            .questions
            .values()
            .filter(|q| q.quiz_id == quiz_id)
            .count();
        Order::try_from(count).map_err(|_| Error::Storage("question count overflow".to_string()))
    }

    async fn insert_question(&mut self, question: NewQuestion) -> Result<Question> {
        if !self.working.quizzes.contains_key(&question.quiz_id) {
            return Err(Error::QuizNotFound(question.quiz_id));
        }
        if self.working.order_taken(question.quiz_id, question.order, None) {
            return Err(Error::Storage(format!(
                "order {} already taken in quiz {}",
                question.order, question.quiz_id
            )));
        }
        let question = Question {
            id: Id::new(),
            question,
        };
        self.working.questions.insert(question.id, question.clone());
        Ok(question)
    }

    async fn delete_question(&mut self, id: Id) -> Result<()> {
        self.working
            .questions
            .remove(&id)
            .map(|_| ())
            .ok_or(Error::QuestionNotFound(id))
    }

    async fn set_question_order(&mut self, id: Id, order: Order) -> Result<()> {
        let quiz_id = self
            .working
            .questions
            .get(&id)
            .ok_or(Error::QuestionNotFound(id))?
            .quiz_id;
        if self.working.order_taken(quiz_id, order, Some(id)) {
            return Err(Error::Storage(format!(
                "order {order} already taken in quiz {quiz_id}"
            )));
        }
        if let Some(question) = self.working.questions.get_mut(&id) {
            question.order = order;
        }
        Ok(())
    }

    async fn insert_waitlist_entry(&mut self, entry: NewWaitlistEntry) -> Result<WaitlistEntry> {
        if self.working.waitlist.iter().any(|e| e.email == entry.email) {
            return Err(email_conflict());
        }
        let entry = WaitlistEntry {
            id: Id::new(),
            entry,
        };
        self.working.waitlist.push(entry.clone());
        Ok(entry)
    }

    async fn waitlist(&mut self) -> Result<Vec<WaitlistEntry>> {
        Ok(self.working.waitlist.clone())
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MemoryTransaction {
            mut committed,
            working,
        } = *self;
        *committed = working;
        Ok(())
    }
}
