//! MongoDB-backed store.
//!
//! Transactions map onto MongoDB session transactions, which require the
//! server to run as a replica set. Uniqueness is enforced by the indexes
//! created in [`ensure_indexes_exist`](crate::model::mongodb::ensure_indexes_exist).

use mongodb::{
    bson::{doc, Bson, Document},
    options::FindOptions,
    Client, ClientSession, Database,
};
use rocket::futures::TryStreamExt;
use serde::de::DeserializeOwned;

use super::{email_conflict, name_conflict, QuizStore, Transaction};
use crate::error::{Error, Result};
use crate::model::{
    db::{NewQuestion, NewQuiz, NewWaitlistEntry, Question, Quiz, WaitlistEntry},
    mongodb::{is_duplicate_key_error, Coll, Id},
    ordering::Order,
};

/// A [`QuizStore`] over a MongoDB database.
pub struct MongoStore {
    client: Client,
    db: Database,
}

impl MongoStore {
    pub fn new(client: Client, db: Database) -> Self {
        Self { client, db }
    }
}

#[rocket::async_trait]
impl QuizStore for MongoStore {
    async fn begin(&self) -> Result<Box<dyn Transaction + '_>> {
        let mut session = self.client.start_session(None).await?;
        session.start_transaction(None).await?;
        Ok(Box::new(MongoTransaction {
            session,
            quizzes: Coll::from_db(&self.db),
            new_quizzes: Coll::from_db(&self.db),
            questions: Coll::from_db(&self.db),
            new_questions: Coll::from_db(&self.db),
            waitlist: Coll::from_db(&self.db),
            new_waitlist: Coll::from_db(&self.db),
        }))
    }
}

/// An open session transaction. Dropping it without committing aborts it.
struct MongoTransaction {
    session: ClientSession,
    quizzes: Coll<Quiz>,
    new_quizzes: Coll<NewQuiz>,
    questions: Coll<Question>,
    new_questions: Coll<NewQuestion>,
    waitlist: Coll<WaitlistEntry>,
    new_waitlist: Coll<NewWaitlistEntry>,
}

/// Extract the ID MongoDB assigned to an inserted document.
fn inserted_id(id: Bson) -> Result<Id> {
    id.as_object_id()
        .map(Id::from)
        .ok_or_else(|| Error::Storage(format!("unexpected inserted ID {id}")))
}

/// Run a sorted find inside the session and collect every match.
async fn find_all<T>(
    coll: &Coll<T>,
    session: &mut ClientSession,
    filter: Document,
    sort: Document,
) -> Result<Vec<T>>
where
    T: DeserializeOwned + Unpin + Send + Sync,
{
    let options = FindOptions::builder().sort(sort).build();
    let mut cursor = coll.find_with_session(filter, options, session).await?;
    let items = cursor.stream(session).try_collect().await?;
    Ok(items)
}

#[rocket::async_trait]
impl Transaction for MongoTransaction {
    async fn quiz(&mut self, id: Id) -> Result<Option<Quiz>> {
        let quiz = self
            .quizzes
            .find_one_with_session(id.as_doc(), None, &mut self.session)
            .await?;
        Ok(quiz)
    }

    async fn quizzes_by_creator(&mut self, creator: &str) -> Result<Vec<Quiz>> {
        find_all(
            &self.quizzes,
            &mut self.session,
            doc! { "creator": creator },
            doc! { "created_at": 1 },
        )
        .await
    }

    async fn quiz_by_name(&mut self, creator: &str, name: &str) -> Result<Option<Quiz>> {
        let filter = doc! {
            "creator": creator,
            "name": name,
        };
        let quiz = self
            .quizzes
            .find_one_with_session(filter, None, &mut self.session)
            .await?;
        Ok(quiz)
    }

    async fn insert_quiz(&mut self, quiz: NewQuiz) -> Result<Quiz> {
        let result = self
            .new_quizzes
            .insert_one_with_session(&quiz, None, &mut self.session)
            .await;
        match result {
            Ok(inserted) => Ok(Quiz {
                id: inserted_id(inserted.inserted_id)?,
                quiz,
            }),
            Err(err) if is_duplicate_key_error(&err) => Err(name_conflict(&quiz.name)),
            Err(err) => Err(err.into()),
        }
    }

    async fn replace_quiz(&mut self, quiz: &Quiz) -> Result<()> {
        let result = self
            .quizzes
            .replace_one_with_session(quiz.id.as_doc(), quiz, None, &mut self.session)
            .await;
        match result {
            Ok(replaced) if replaced.matched_count == 0 => Err(Error::QuizNotFound(quiz.id)),
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key_error(&err) => Err(name_conflict(&quiz.name)),
            Err(err) => Err(err.into()),
        }
    }

    async fn delete_quiz(&mut self, id: Id) -> Result<()> {
        let result = self
            .quizzes
            .delete_one_with_session(id.as_doc(), None, &mut self.session)
            .await?;
        if result.deleted_count == 0 {
            return Err(Error::QuizNotFound(id));
        }

        // Cascade to the quiz's questions, and with them their propositions.
        self.questions
            .delete_many_with_session(doc! { "quiz_id": id }, None, &mut self.session)
            .await?;
        Ok(())
    }

    async fn questions(&mut self, quiz_id: Id) -> Result<Vec<Question>> {
        find_all(
            &self.questions,
            &mut self.session,
            doc! { "quiz_id": quiz_id },
            doc! { "order": 1 },
        )
        .await
    }

    async fn question(&mut self, id: Id) -> Result<Option<Question>> {
        let question = self
            .questions
            .find_one_with_session(id.as_doc(), None, &mut self.session)
            .await?;
        Ok(question)
    }

    async fn count_questions(&mut self, quiz_id: Id) -> Result<Order> {
        let count = self
            .questions
            .count_documents_with_session(doc! { "quiz_id": quiz_id }, None, &mut self.session)
            .await?;
        Order::try_from(count).map_err(|_| Error::Storage(format!("question count {count} overflows")))
    }

    async fn insert_question(&mut self, question: NewQuestion) -> Result<Question> {
        let inserted = self
            .new_questions
            .insert_one_with_session(&question, None, &mut self.session)
            .await?;
        Ok(Question {
            id: inserted_id(inserted.inserted_id)?,
            question,
        })
    }

    async fn delete_question(&mut self, id: Id) -> Result<()> {
        let result = self
            .questions
            .delete_one_with_session(id.as_doc(), None, &mut self.session)
            .await?;
        if result.deleted_count == 0 {
            Err(Error::QuestionNotFound(id))
        } else {
            Ok(())
        }
    }

    async fn set_question_order(&mut self, id: Id, order: Order) -> Result<()> {
        let update = doc! {
            "$set": {
                "order": i64::from(order),
            }
        };
        let result = self
            .questions
            .update_one_with_session(id.as_doc(), update, None, &mut self.session)
            .await?;
        if result.matched_count == 0 {
            Err(Error::QuestionNotFound(id))
        } else {
            Ok(())
        }
    }

    async fn insert_waitlist_entry(&mut self, entry: NewWaitlistEntry) -> Result<WaitlistEntry> {
        let result = self
            .new_waitlist
            .insert_one_with_session(&entry, None, &mut self.session)
            .await;
        match result {
            Ok(inserted) => Ok(WaitlistEntry {
                id: inserted_id(inserted.inserted_id)?,
                entry,
            }),
            Err(err) if is_duplicate_key_error(&err) => Err(email_conflict()),
            Err(err) => Err(err.into()),
        }
    }

    async fn waitlist(&mut self) -> Result<Vec<WaitlistEntry>> {
        find_all(
            &self.waitlist,
            &mut self.session,
            doc! {},
            doc! { "created_at": 1 },
        )
        .await
    }

    async fn commit(self: Box<Self>) -> Result<()> {
        let MongoTransaction { mut session, .. } = *self;
        session.commit_transaction().await?;
        Ok(())
    }
}
