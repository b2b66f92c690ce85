use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::quiz::{MetadataUpdate, QuizDescription, QuizSpec, QuizSummary},
    auth::Caller,
    mongodb::Id,
};
use crate::service::{self, Context, QuizWithQuestions};
use crate::store::Storage;

pub fn routes() -> Vec<Route> {
    routes![create_quiz, list_quizzes, get_quiz, update_quiz, delete_quiz]
}

impl From<QuizWithQuestions> for QuizDescription {
    fn from(full: QuizWithQuestions) -> Self {
        Self::new(full.quiz, full.questions)
    }
}

#[post("/quizzes", data = "<spec>", format = "json")]
async fn create_quiz(
    caller: Caller,
    spec: Json<QuizSpec>,
    storage: &State<Storage>,
) -> Result<(Status, Json<QuizDescription>)> {
    let ctx = Context::new(&caller, storage.store());
    let quiz = service::create_quiz(ctx, spec.into_inner()).await?;
    Ok((Status::Created, Json(QuizDescription::new(quiz, Vec::new()))))
}

#[get("/quizzes")]
async fn list_quizzes(caller: Caller, storage: &State<Storage>) -> Result<Json<Vec<QuizSummary>>> {
    let ctx = Context::new(&caller, storage.store());
    let summaries = service::list_quizzes(ctx)
        .await?
        .into_iter()
        .map(|full| QuizSummary::new(full.quiz, &full.questions))
        .collect();
    Ok(Json(summaries))
}

/// Anyone may read a quiz in order to play it.
#[get("/quizzes/<quiz_id>")]
async fn get_quiz(quiz_id: Id, storage: &State<Storage>) -> Result<Json<QuizDescription>> {
    let full = service::get_quiz(storage.store(), quiz_id).await?;
    Ok(Json(full.into()))
}

#[put("/quizzes/<quiz_id>", data = "<update>", format = "json")]
async fn update_quiz(
    caller: Caller,
    quiz_id: Id,
    update: Json<MetadataUpdate>,
    storage: &State<Storage>,
) -> Result<Json<QuizDescription>> {
    let ctx = Context::new(&caller, storage.store());
    let full = service::update_quiz_metadata(ctx, quiz_id, update.into_inner()).await?;
    Ok(Json(full.into()))
}

#[delete("/quizzes/<quiz_id>")]
async fn delete_quiz(caller: Caller, quiz_id: Id, storage: &State<Storage>) -> Result<()> {
    let ctx = Context::new(&caller, storage.store());
    service::delete_quiz(ctx, quiz_id).await
}
