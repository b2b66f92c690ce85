#[macro_use]
extern crate rocket;

#[cfg(test)]
#[macro_use]
extern crate backend_test;

use rocket::{Build, Rocket};

use crate::config::{ConfigFairing, StoreFairing};
use crate::logging::LoggerFairing;

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

/// Build the server from `Rocket.toml` and the environment.
pub fn build() -> Rocket<Build> {
    assemble(rocket::build()).attach(StoreFairing)
}

/// Everything but the store.
fn assemble(rocket: Rocket<Build>) -> Rocket<Build> {
    rocket
        .mount("/", api::routes())
        .register("/", api::catchers())
        .attach(LoggerFairing)
        .attach(ConfigFairing)
}

/// A server over the given in-memory store, signing tokens with the test secret.
#[cfg(test)]
pub(crate) fn rocket_for_store(store: store::MemoryStore) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("jwt_secret", config::TEST_JWT_SECRET))
        .merge(("log_level", "off"));
    assemble(rocket::custom(figment)).manage(store::Storage::new(store))
}
