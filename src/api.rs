use rocket::{http::Status, serde::json::Json, Catcher, Request, Route};

use crate::error::ErrorBody;

mod question;
mod quiz;
mod waitlist;

pub fn routes() -> Vec<Route> {
    let mut routes = Vec::new();
    routes.extend(quiz::routes());
    routes.extend(question::routes());
    routes.extend(waitlist::routes());
    routes
}

pub fn catchers() -> Vec<Catcher> {
    catchers![json_catcher]
}

/// Give Rocket-level failures (bad JSON, unparsable IDs, missing tokens,
/// unknown routes) the same body as application errors.
#[catch(default)]
fn json_catcher(status: Status, _req: &Request) -> (Status, Json<ErrorBody>) {
    (status, Json(ErrorBody::for_status(status)))
}
