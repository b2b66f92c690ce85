use rocket::{http::Status, serde::json::Json, Route, State};

use crate::error::Result;
use crate::model::{
    api::waitlist::{WaitlistEntryDescription, WaitlistRequest},
    auth::Caller,
};
use crate::service::{self, Context};
use crate::store::Storage;

pub fn routes() -> Vec<Route> {
    routes![join_waitlist, list_waitlist]
}

#[post("/waitlist", data = "<request>", format = "json")]
async fn join_waitlist(
    request: Json<WaitlistRequest>,
    storage: &State<Storage>,
) -> Result<(Status, Json<WaitlistEntryDescription>)> {
    let entry = service::join_waitlist(storage.store(), request.into_inner()).await?;
    Ok((Status::Created, Json(entry.into())))
}

#[get("/waitlist")]
async fn list_waitlist(
    caller: Caller,
    storage: &State<Storage>,
) -> Result<Json<Vec<WaitlistEntryDescription>>> {
    let ctx = Context::new(&caller, storage.store());
    let entries = service::list_waitlist(ctx).await?;
    Ok(Json(entries.into_iter().map(Into::into).collect()))
}
