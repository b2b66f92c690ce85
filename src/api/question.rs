use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::{
        question::{OrderEntry, QuestionDescription, QuestionSpec},
        quiz::QuizDescription,
    },
    auth::Caller,
    mongodb::Id,
};
use crate::service::{self, Context};
use crate::store::Storage;

pub fn routes() -> Vec<Route> {
    routes![
        add_question,
        reorder_questions,
        duplicate_question,
        update_question,
        delete_question,
    ]
}

#[post("/quizzes/<quiz_id>/questions", data = "<spec>", format = "json")]
async fn add_question(
    caller: Caller,
    quiz_id: Id,
    spec: Json<QuestionSpec>,
    storage: &State<Storage>,
) -> Result<(Status, Json<QuestionDescription>)> {
    let ctx = Context::new(&caller, storage.store());
    let question = service::add_question(ctx, quiz_id, spec.into_inner()).await?;
    Ok((Status::Created, Json(question.into())))
}

// Ranked ahead of `update_question`, whose `<question_id>` also matches "order".
#[put("/quizzes/<quiz_id>/questions/order", data = "<entries>", format = "json", rank = 1)]
async fn reorder_questions(
    caller: Caller,
    quiz_id: Id,
    entries: Json<Vec<OrderEntry>>,
    storage: &State<Storage>,
) -> Result<Json<QuizDescription>> {
    let ctx = Context::new(&caller, storage.store());
    let full = service::reorder_questions(ctx, quiz_id, &entries).await?;
    Ok(Json(full.into()))
}

#[post("/quizzes/<quiz_id>/questions/<question_id>/duplicate")]
async fn duplicate_question(
    caller: Caller,
    quiz_id: Id,
    question_id: Id,
    storage: &State<Storage>,
) -> Result<(Status, Json<QuestionDescription>)> {
    let ctx = Context::new(&caller, storage.store());
    let copy = service::duplicate_question(ctx, quiz_id, question_id).await?;
    Ok((Status::Created, Json(copy.into())))
}

#[put("/quizzes/<quiz_id>/questions/<question_id>", data = "<spec>", format = "json", rank = 2)]
async fn update_question(
    caller: Caller,
    quiz_id: Id,
    question_id: Id,
    spec: Json<QuestionSpec>,
    storage: &State<Storage>,
) -> Result<Json<QuestionDescription>> {
    let ctx = Context::new(&caller, storage.store());
    let question = service::update_question(ctx, quiz_id, question_id, spec.into_inner()).await?;
    Ok(Json(question.into()))
}

#[delete("/quizzes/<quiz_id>/questions/<question_id>")]
async fn delete_question(
    caller: Caller,
    quiz_id: Id,
    question_id: Id,
    storage: &State<Storage>,
) -> Result<()> {
    let ctx = Context::new(&caller, storage.store());
    service::delete_question(ctx, quiz_id, question_id).await
}
