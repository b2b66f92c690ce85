//! Quiz management operations.
//!
//! Every operation runs in one store transaction and commits only when it
//! fully succeeds. Operations on a quiz check, in this order: that the quiz
//! exists, that the caller owns it, that the targeted question belongs to
//! it, and only then validate the input. A quiz owned by someone else is
//! reported exactly like a missing one.

use log::{debug, info};

use crate::error::{Error, Result};
use crate::model::{
    api::{
        question::{OrderEntry, QuestionSpec},
        quiz::{MetadataUpdate, QuizSpec},
        waitlist::WaitlistRequest,
    },
    auth::Caller,
    db::{now, NewQuestion, NewQuiz, NewWaitlistEntry, Question, Quiz, WaitlistEntry},
    mongodb::Id,
    ordering::{append_order, plan_compaction, plan_reorder},
    rules::waitlist::validate_email,
};
use crate::store::{name_conflict, QuizStore, Transaction};

type Tx<'s> = Box<dyn Transaction + 's>;

/// Who is asking, and where their data lives.
#[derive(Clone, Copy)]
pub struct Context<'a> {
    pub caller: &'a Caller,
    pub store: &'a dyn QuizStore,
}

impl<'a> Context<'a> {
    pub fn new(caller: &'a Caller, store: &'a dyn QuizStore) -> Self {
        Self { caller, store }
    }
}

/// A quiz together with its questions, ascending by order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizWithQuestions {
    pub quiz: Quiz,
    pub questions: Vec<Question>,
}

/// Fetch a quiz the caller owns.
async fn owned_quiz(tx: &mut Tx<'_>, caller: &Caller, id: Id) -> Result<Quiz> {
    match tx.quiz(id).await? {
        Some(quiz) if quiz.is_owned_by(caller.id()) => Ok(quiz),
        _ => Err(Error::QuizNotFound(id)),
    }
}

/// Fetch a question of the given quiz.
async fn quiz_question(tx: &mut Tx<'_>, quiz_id: Id, question_id: Id) -> Result<Question> {
    match tx.question(question_id).await? {
        Some(question) if question.quiz_id == quiz_id => Ok(question),
        _ => Err(Error::QuestionNotFound(question_id)),
    }
}

/// Reject a quiz name the creator already uses.
///
/// The store's uniqueness guarantee still applies; this only reports the
/// collision before any write.
async fn check_name_unique(tx: &mut Tx<'_>, creator: &str, name: &str) -> Result<()> {
    match tx.quiz_by_name(creator, name).await? {
        Some(_) => Err(name_conflict(name)),
        None => Ok(()),
    }
}

pub async fn create_quiz(ctx: Context<'_>, spec: QuizSpec) -> Result<Quiz> {
    let valid = spec.validate()?;
    let mut tx = ctx.store.begin().await?;

    check_name_unique(&mut tx, ctx.caller.id(), &valid.name).await?;
    let quiz = tx
        .insert_quiz(NewQuiz::new(
            valid.name,
            valid.description,
            ctx.caller.id().to_string(),
        ))
        .await?;
    tx.commit().await?;

    info!("Quiz {} ({:?}) created by {}", quiz.id, quiz.name, quiz.creator);
    Ok(quiz)
}

/// The caller's quizzes, oldest first, each with its questions.
pub async fn list_quizzes(ctx: Context<'_>) -> Result<Vec<QuizWithQuestions>> {
    let mut tx = ctx.store.begin().await?;
    let quizzes = tx.quizzes_by_creator(ctx.caller.id()).await?;
    let mut listed = Vec::with_capacity(quizzes.len());
    for quiz in quizzes {
        let questions = tx.questions(quiz.id).await?;
        listed.push(QuizWithQuestions { quiz, questions });
    }
    tx.commit().await?;
    Ok(listed)
}

/// Any quiz by ID, regardless of its owner.
pub async fn get_quiz(store: &dyn QuizStore, id: Id) -> Result<QuizWithQuestions> {
    let mut tx = store.begin().await?;
    let quiz = tx.quiz(id).await?.ok_or(Error::QuizNotFound(id))?;
    let questions = tx.questions(id).await?;
    tx.commit().await?;
    Ok(QuizWithQuestions { quiz, questions })
}

/// Replace a quiz's name, description and answer time, returning the quiz
/// with its questions as of the update.
///
/// The new name is not checked against the caller's other quizzes up front;
/// a collision is still rejected by the store as a conflict.
pub async fn update_quiz_metadata(
    ctx: Context<'_>,
    id: Id,
    update: MetadataUpdate,
) -> Result<QuizWithQuestions> {
    let mut tx = ctx.store.begin().await?;
    let mut quiz = owned_quiz(&mut tx, ctx.caller, id).await?;
    let valid = update.validate()?;

    quiz.name = valid.name;
    quiz.description = valid.description;
    quiz.time_to_answer = valid.time_to_answer;
    quiz.updated_at = now();
    tx.replace_quiz(&quiz).await?;
    let questions = tx.questions(id).await?;
    tx.commit().await?;

    info!("Quiz {id} metadata updated");
    Ok(QuizWithQuestions { quiz, questions })
}

/// Delete a quiz along with all of its questions.
pub async fn delete_quiz(ctx: Context<'_>, id: Id) -> Result<()> {
    let mut tx = ctx.store.begin().await?;
    owned_quiz(&mut tx, ctx.caller, id).await?;
    tx.delete_quiz(id).await?;
    tx.commit().await?;

    info!("Quiz {id} deleted by {}", ctx.caller.id());
    Ok(())
}

/// Append a new question to a quiz.
pub async fn add_question(ctx: Context<'_>, quiz_id: Id, spec: QuestionSpec) -> Result<Question> {
    let mut tx = ctx.store.begin().await?;
    owned_quiz(&mut tx, ctx.caller, quiz_id).await?;
    let valid = spec.validate()?;

    let order = append_order(tx.count_questions(quiz_id).await?);
    let question = tx
        .insert_question(NewQuestion::new(quiz_id, order, valid))
        .await?;
    tx.commit().await?;

    info!("Question {} added to quiz {quiz_id} at {order}", question.id);
    Ok(question)
}

/// Append a copy of an existing question to the end of its quiz.
pub async fn duplicate_question(ctx: Context<'_>, quiz_id: Id, question_id: Id) -> Result<Question> {
    let mut tx = ctx.store.begin().await?;
    owned_quiz(&mut tx, ctx.caller, quiz_id).await?;
    let original = quiz_question(&mut tx, quiz_id, question_id).await?;

    let order = append_order(tx.count_questions(quiz_id).await?);
    let copy = tx.insert_question(original.duplicate_at(order)).await?;
    tx.commit().await?;

    info!("Question {question_id} of quiz {quiz_id} duplicated as {} at {order}", copy.id);
    Ok(copy)
}

/// Remove a question and close the gap it leaves.
pub async fn delete_question(ctx: Context<'_>, quiz_id: Id, question_id: Id) -> Result<()> {
    let mut tx = ctx.store.begin().await?;
    owned_quiz(&mut tx, ctx.caller, quiz_id).await?;
    let removed = quiz_question(&mut tx, quiz_id, question_id).await?;

    tx.delete_question(question_id).await?;
    let siblings: Vec<_> = tx
        .questions(quiz_id)
        .await?
        .iter()
        .map(|q| (q.id, q.order))
        .collect();
    let shifts = plan_compaction(&siblings, removed.order);
    debug!("Compacting quiz {quiz_id} after order {}: {shifts:?}", removed.order);
    for (id, order) in shifts {
        tx.set_question_order(id, order).await?;
    }
    tx.commit().await?;

    info!("Question {question_id} deleted from quiz {quiz_id}");
    Ok(())
}

/// Replace a question's content in place.
///
/// The replacement is a new question: it gets a new ID and new proposition
/// IDs, but keeps the position of the question it replaces.
pub async fn update_question(
    ctx: Context<'_>,
    quiz_id: Id,
    question_id: Id,
    spec: QuestionSpec,
) -> Result<Question> {
    let mut tx = ctx.store.begin().await?;
    owned_quiz(&mut tx, ctx.caller, quiz_id).await?;
    let old = quiz_question(&mut tx, quiz_id, question_id).await?;
    let valid = spec.validate()?;

    tx.delete_question(question_id).await?;
    let question = tx
        .insert_question(NewQuestion::new(quiz_id, old.order, valid))
        .await?;
    tx.commit().await?;

    info!(
        "Question {question_id} of quiz {quiz_id} replaced by {} at {}",
        question.id, question.order
    );
    Ok(question)
}

/// Apply a full new ordering to a quiz's questions.
///
/// `entries` must name every question of the quiz exactly once, with the
/// orders `0..N` each used once. Nothing is written unless the whole
/// request is valid.
pub async fn reorder_questions(
    ctx: Context<'_>,
    quiz_id: Id,
    entries: &[OrderEntry],
) -> Result<QuizWithQuestions> {
    let mut tx = ctx.store.begin().await?;
    let quiz = owned_quiz(&mut tx, ctx.caller, quiz_id).await?;

    let current: Vec<Id> = tx.questions(quiz_id).await?.iter().map(|q| q.id).collect();
    let requested: Vec<(Id, i64)> = entries.iter().map(|e| (*e.id, e.order)).collect();
    let plan = plan_reorder(&current, &requested)?;
    debug!("Reordering quiz {quiz_id}: {plan:?}");
    for &(id, order) in plan.writes() {
        tx.set_question_order(id, order).await?;
    }

    let questions = tx.questions(quiz_id).await?;
    tx.commit().await?;

    info!("Quiz {quiz_id} reordered ({} questions)", questions.len());
    Ok(QuizWithQuestions { quiz, questions })
}

/// Register interest in the service. No caller required.
pub async fn join_waitlist(store: &dyn QuizStore, request: WaitlistRequest) -> Result<WaitlistEntry> {
    let email = validate_email(&request.email)?;
    let mut tx = store.begin().await?;
    let entry = tx.insert_waitlist_entry(NewWaitlistEntry::new(email)).await?;
    tx.commit().await?;

    info!("Waitlist entry {} added", entry.id);
    Ok(entry)
}

/// Every waitlist entry, oldest first.
pub async fn list_waitlist(ctx: Context<'_>) -> Result<Vec<WaitlistEntry>> {
    let mut tx = ctx.store.begin().await?;
    let entries = tx.waitlist().await?;
    tx.commit().await?;

    debug!("{} listed {} waitlist entries", ctx.caller.id(), entries.len());
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use crate::model::{
        api::ApiId, ordering::Order, rules::question::PropositionInput,
        rules::ValidationError,
    };
    use crate::store::MemoryStore;

    use super::*;

    fn entries(order: &[(&Question, i64)]) -> Vec<OrderEntry> {
        order
            .iter()
            .map(|&(q, order)| OrderEntry {
                id: ApiId::from(q.id),
                order,
            })
            .collect()
    }

    /// The quiz's question texts paired with their orders, as stored.
    async fn layout(store: &MemoryStore, quiz_id: Id) -> Vec<(String, Order)> {
        get_quiz(store, quiz_id)
            .await
            .unwrap()
            .questions
            .into_iter()
            .map(|q| (q.question.text, q.question.order))
            .collect()
    }

    fn assert_dense(questions: &[Question]) {
        let orders: Vec<Order> = questions.iter().map(|q| q.order).collect();
        let expected: Vec<Order> = (0..questions.len() as Order).collect();
        assert_eq!(orders, expected);
    }

    async fn quiz_with(ctx: Context<'_>, texts: &[&str]) -> (Quiz, Vec<Question>) {
        let quiz = create_quiz(ctx, QuizSpec::example()).await.unwrap();
        let mut questions = Vec::new();
        for text in texts {
            questions.push(
                add_question(ctx, quiz.id, QuestionSpec::titled(text))
                    .await
                    .unwrap(),
            );
        }
        (quiz, questions)
    }

    #[rocket::async_test]
    async fn create_quiz_sets_defaults() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);

        let quiz = create_quiz(ctx, QuizSpec::named("Capitals")).await.unwrap();
        assert_eq!(quiz.name, "Capitals");
        assert_eq!(quiz.description, "");
        assert_eq!(quiz.time_to_answer, 30);
        assert_eq!(quiz.creator, "alice");
        assert!(get_quiz(&store, quiz.id).await.unwrap().questions.is_empty());
    }

    #[rocket::async_test]
    async fn quiz_names_are_unique_per_creator() {
        let store = MemoryStore::new();
        let alice = Caller::example();
        let bob = Caller::example2();

        create_quiz(Context::new(&alice, &store), QuizSpec::example())
            .await
            .unwrap();
        let err = create_quiz(Context::new(&alice, &store), QuizSpec::example())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));

        create_quiz(Context::new(&bob, &store), QuizSpec::example())
            .await
            .unwrap();
        let (quizzes, _) = store.dump().await;
        assert_eq!(quizzes.len(), 2);
    }

    #[rocket::async_test]
    async fn create_quiz_rejects_invalid_names() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);

        let err = create_quiz(ctx, QuizSpec::named("  ")).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyName)));
        let err = create_quiz(ctx, QuizSpec::named(&"n".repeat(51)))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::NameTooLong(51))));
        assert!(store.dump().await.0.is_empty());
    }

    #[rocket::async_test]
    async fn foreign_quizzes_look_missing() {
        let store = MemoryStore::new();
        let alice = Caller::example();
        let bob = Caller::example2();
        let (quiz, questions) = quiz_with(Context::new(&alice, &store), &["A"]).await;
        let ctx = Context::new(&bob, &store);

        assert!(matches!(
            delete_quiz(ctx, quiz.id).await,
            Err(Error::QuizNotFound(id)) if id == quiz.id
        ));
        assert!(matches!(
            add_question(ctx, quiz.id, QuestionSpec::example()).await,
            Err(Error::QuizNotFound(_))
        ));
        assert!(matches!(
            duplicate_question(ctx, quiz.id, questions[0].id).await,
            Err(Error::QuizNotFound(_))
        ));
        assert!(matches!(
            update_quiz_metadata(ctx, quiz.id, MetadataUpdate::example()).await,
            Err(Error::QuizNotFound(_))
        ));
        assert!(matches!(
            reorder_questions(ctx, quiz.id, &entries(&[(&questions[0], 0)])).await,
            Err(Error::QuizNotFound(_))
        ));

        // Still readable by anyone.
        assert_eq!(get_quiz(&store, quiz.id).await.unwrap().quiz, quiz);
    }

    #[rocket::async_test]
    async fn ownership_is_checked_before_validation() {
        let store = MemoryStore::new();
        let alice = Caller::example();
        let bob = Caller::example2();
        let (quiz, _) = quiz_with(Context::new(&alice, &store), &[]).await;

        let invalid = QuestionSpec {
            question: String::new(),
            propositions: vec![],
        };
        let err = add_question(Context::new(&bob, &store), quiz.id, invalid.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::QuizNotFound(_)));
        let err = add_question(Context::new(&alice, &store), quiz.id, invalid)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::EmptyQuestionText)));
    }

    #[rocket::async_test]
    async fn questions_of_other_quizzes_look_missing() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (first, _) = quiz_with(ctx, &[]).await;
        let other = create_quiz(ctx, QuizSpec::named("Other")).await.unwrap();
        let foreign = add_question(ctx, other.id, QuestionSpec::example())
            .await
            .unwrap();

        assert!(matches!(
            delete_question(ctx, first.id, foreign.id).await,
            Err(Error::QuestionNotFound(id)) if id == foreign.id
        ));
        assert!(matches!(
            update_question(ctx, first.id, foreign.id, QuestionSpec::example()).await,
            Err(Error::QuestionNotFound(_))
        ));
        assert_eq!(layout(&store, other.id).await.len(), 1);
    }

    #[rocket::async_test]
    async fn add_question_appends_in_input_order() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A", "B", "C"]).await;

        let orders: Vec<Order> = questions.iter().map(|q| q.order).collect();
        assert_eq!(orders, vec![0, 1, 2]);

        let planets = add_question(ctx, quiz.id, QuestionSpec::example())
            .await
            .unwrap();
        assert_eq!(planets.order, 3);
        let texts: Vec<&str> = planets
            .propositions
            .iter()
            .map(|p| p.proposition.as_str())
            .collect();
        assert_eq!(texts, ["Mars", "Jupiter", "Venus"]);
    }

    #[rocket::async_test]
    async fn add_question_validates_propositions() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, _) = quiz_with(ctx, &[]).await;

        let spec = QuestionSpec {
            question: "Pick one".to_string(),
            propositions: vec![PropositionInput::wrong("A"), PropositionInput::wrong("B")],
        };
        let err = add_question(ctx, quiz.id, spec).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::NoCorrectAnswer)));
        assert!(layout(&store, quiz.id).await.is_empty());
    }

    #[rocket::async_test]
    async fn duplicate_appends_a_copy() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A", "B"]).await;

        let copy = duplicate_question(ctx, quiz.id, questions[0].id)
            .await
            .unwrap();
        assert_eq!(copy.order, 2);
        assert_ne!(copy.id, questions[0].id);
        assert_eq!(copy.text, "A");
        assert_ne!(copy.propositions[0].id, questions[0].propositions[0].id);

        assert!(matches!(
            duplicate_question(ctx, quiz.id, Id::new()).await,
            Err(Error::QuestionNotFound(_))
        ));
        assert_dense(&get_quiz(&store, quiz.id).await.unwrap().questions);
    }

    #[rocket::async_test]
    async fn delete_question_compacts_later_orders() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A", "B", "C", "D"]).await;

        delete_question(ctx, quiz.id, questions[1].id).await.unwrap();
        assert_eq!(
            layout(&store, quiz.id).await,
            vec![("A".into(), 0), ("C".into(), 1), ("D".into(), 2)]
        );

        delete_question(ctx, quiz.id, questions[3].id).await.unwrap();
        assert_eq!(
            layout(&store, quiz.id).await,
            vec![("A".into(), 0), ("C".into(), 1)]
        );

        let after = get_quiz(&store, quiz.id).await.unwrap();
        assert_eq!(after.questions[0].id, questions[0].id);
        assert_eq!(after.questions[1].id, questions[2].id);
    }

    #[rocket::async_test]
    async fn update_question_keeps_position_with_new_identity() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A", "B", "C"]).await;

        let updated = update_question(ctx, quiz.id, questions[1].id, QuestionSpec::example())
            .await
            .unwrap();
        assert_eq!(updated.order, 1);
        assert_ne!(updated.id, questions[1].id);
        assert!(matches!(
            duplicate_question(ctx, quiz.id, questions[1].id).await,
            Err(Error::QuestionNotFound(_))
        ));

        let after = get_quiz(&store, quiz.id).await.unwrap().questions;
        assert_dense(&after);
        assert_eq!(after[0], questions[0]);
        assert_eq!(after[1].id, updated.id);
        assert_eq!(after[2], questions[2]);
    }

    #[rocket::async_test]
    async fn update_question_validation_leaves_question_untouched() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A"]).await;

        let spec = QuestionSpec {
            question: "Too many".to_string(),
            propositions: ["1", "2", "3", "4", "5"]
                .iter()
                .map(|p| PropositionInput::right(p))
                .collect(),
        };
        let err = update_question(ctx, quiz.id, questions[0].id, spec)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::PropositionCountOutOfRange(5))
        ));
        assert_eq!(get_quiz(&store, quiz.id).await.unwrap().questions, questions);
    }

    #[rocket::async_test]
    async fn reorder_applies_permutation() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, q) = quiz_with(ctx, &["A", "B", "C", "D"]).await;

        let reordered = reorder_questions(
            ctx,
            quiz.id,
            &entries(&[(&q[0], 3), (&q[1], 2), (&q[2], 1), (&q[3], 0)]),
        )
        .await
        .unwrap();
        assert_dense(&reordered.questions);
        let texts: Vec<&str> = reordered
            .questions
            .iter()
            .map(|q| q.text.as_str())
            .collect();
        assert_eq!(texts, ["D", "C", "B", "A"]);
        assert_eq!(
            reordered.questions,
            get_quiz(&store, quiz.id).await.unwrap().questions
        );
    }

    #[rocket::async_test]
    async fn rejected_reorders_leave_state_unchanged() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, q) = quiz_with(ctx, &["A", "B", "C"]).await;
        let before = store.dump().await;

        let err = reorder_questions(ctx, quiz.id, &entries(&[(&q[0], 1), (&q[1], 0)]))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::OrderCountMismatch {
                expected: 3,
                got: 2
            }
        ));

        let err = reorder_questions(
            ctx,
            quiz.id,
            &entries(&[(&q[0], 0), (&q[1], 0), (&q[2], 2)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOrderPermutation(_)));

        let err = reorder_questions(
            ctx,
            quiz.id,
            &entries(&[(&q[0], 0), (&q[1], 1), (&q[2], 3)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOrderPermutation(_)));

        let err = reorder_questions(
            ctx,
            quiz.id,
            &entries(&[(&q[0], 0), (&q[0], 1), (&q[2], 2)]),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, Error::InvalidOrderPermutation(_)));

        let stranger = OrderEntry {
            id: Id::new().into(),
            order: 1,
        };
        let mut request = entries(&[(&q[0], 0), (&q[2], 2)]);
        request.insert(1, stranger);
        let err = reorder_questions(ctx, quiz.id, &request).await.unwrap_err();
        assert!(matches!(err, Error::QuestionNotFound(id) if id == *stranger.id));

        assert_eq!(store.dump().await, before);
    }

    #[rocket::async_test]
    async fn delete_add_reorder_scenario() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, q) = quiz_with(ctx, &["A", "B", "C"]).await;

        delete_question(ctx, quiz.id, q[1].id).await.unwrap();
        assert_eq!(
            layout(&store, quiz.id).await,
            vec![("A".into(), 0), ("C".into(), 1)]
        );

        let d = add_question(ctx, quiz.id, QuestionSpec::titled("D"))
            .await
            .unwrap();
        assert_eq!(d.order, 2);

        reorder_questions(ctx, quiz.id, &entries(&[(&q[2], 0), (&q[0], 1), (&d, 2)]))
            .await
            .unwrap();
        assert_eq!(
            layout(&store, quiz.id).await,
            vec![("C".into(), 0), ("A".into(), 1), ("D".into(), 2)]
        );
    }

    #[rocket::async_test]
    async fn delete_quiz_cascades() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, _) = quiz_with(ctx, &["A", "B"]).await;
        let (other, _) = {
            let other = create_quiz(ctx, QuizSpec::named("Kept")).await.unwrap();
            let question = add_question(ctx, other.id, QuestionSpec::example())
                .await
                .unwrap();
            (other, question)
        };

        delete_quiz(ctx, quiz.id).await.unwrap();
        assert!(matches!(
            get_quiz(&store, quiz.id).await,
            Err(Error::QuizNotFound(_))
        ));
        let (quizzes, questions) = store.dump().await;
        assert_eq!(quizzes.len(), 1);
        assert!(questions.iter().all(|q| q.quiz_id == other.id));
        assert_eq!(questions.len(), 1);

        assert!(matches!(
            delete_quiz(ctx, quiz.id).await,
            Err(Error::QuizNotFound(_))
        ));
    }

    #[rocket::async_test]
    async fn update_metadata_replaces_fields() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        let (quiz, questions) = quiz_with(ctx, &["A"]).await;

        let full = update_quiz_metadata(ctx, quiz.id, MetadataUpdate::example())
            .await
            .unwrap();
        assert_eq!(full.questions, questions);
        let updated = full.quiz;
        assert_eq!(updated.name, "Outer planets");
        assert_eq!(updated.description, "Gas and ice giants");
        assert_eq!(updated.time_to_answer, 45);
        assert_eq!(updated.created_at, quiz.created_at);
        assert!(updated.updated_at >= quiz.updated_at);
        assert_eq!(updated.updated_at.timestamp_subsec_nanos() % 1_000_000, 0);

        let mut update = MetadataUpdate::example();
        update.time_to_answer = 61;
        let err = update_quiz_metadata(ctx, quiz.id, update).await.unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::TimeOutOfRange(61))));

        let mut update = MetadataUpdate::example();
        update.time_to_answer = 0;
        assert!(update_quiz_metadata(ctx, quiz.id, update).await.is_err());
        assert_eq!(get_quiz(&store, quiz.id).await.unwrap().quiz, updated);
    }

    #[rocket::async_test]
    async fn name_check_is_exact_and_per_creator() {
        let store = MemoryStore::new();
        let alice = Caller::example();
        create_quiz(Context::new(&alice, &store), QuizSpec::named("Shared"))
            .await
            .unwrap();

        let mut tx = store.begin().await.unwrap();
        assert!(matches!(
            check_name_unique(&mut tx, "alice", "Shared").await,
            Err(Error::Conflict(_))
        ));
        assert!(check_name_unique(&mut tx, "alice", "shared").await.is_ok());
        assert!(check_name_unique(&mut tx, "bob", "Shared").await.is_ok());
    }

    #[rocket::async_test]
    async fn rename_onto_existing_name_conflicts() {
        let store = MemoryStore::new();
        let caller = Caller::example();
        let ctx = Context::new(&caller, &store);
        create_quiz(ctx, QuizSpec::named("Taken")).await.unwrap();
        let quiz = create_quiz(ctx, QuizSpec::named("Free")).await.unwrap();

        let update = MetadataUpdate {
            name: "Taken".to_string(),
            description: String::new(),
            time_to_answer: 30,
        };
        let err = update_quiz_metadata(ctx, quiz.id, update).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        assert_eq!(get_quiz(&store, quiz.id).await.unwrap().quiz.name, "Free");
    }

    #[rocket::async_test]
    async fn list_quizzes_shows_own_quizzes_with_question_order() {
        let store = MemoryStore::new();
        let alice = Caller::example();
        let bob = Caller::example2();
        let (quiz, q) = quiz_with(Context::new(&alice, &store), &["A", "B"]).await;
        create_quiz(Context::new(&bob, &store), QuizSpec::named("Bob's"))
            .await
            .unwrap();

        let ctx = Context::new(&alice, &store);
        reorder_questions(ctx, quiz.id, &entries(&[(&q[0], 1), (&q[1], 0)]))
            .await
            .unwrap();

        let listed = list_quizzes(ctx).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].quiz.id, quiz.id);
        let ids: Vec<Id> = listed[0].questions.iter().map(|q| q.id).collect();
        assert_eq!(ids, vec![q[1].id, q[0].id]);
    }

    #[rocket::async_test]
    async fn waitlist_rejects_duplicates_and_bad_emails() {
        let store = MemoryStore::new();
        let caller = Caller::example();

        let request = |email: &str| WaitlistRequest {
            email: email.to_string(),
        };
        let entry = join_waitlist(&store, request("ada@example.com"))
            .await
            .unwrap();
        assert_eq!(entry.email, "ada@example.com");

        let err = join_waitlist(&store, request(" ADA@example.com "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
        let err = join_waitlist(&store, request("not an email"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(ValidationError::InvalidEmail(_))));

        let entries = list_waitlist(Context::new(&caller, &store)).await.unwrap();
        assert_eq!(entries, vec![entry]);
    }
}
