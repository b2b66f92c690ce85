use log::{error, info, warn};
use mongodb::Client as MongoClient;
use rocket::{
    fairing::{Fairing, Info, Kind},
    Build, Rocket,
};
use serde::Deserialize;

use crate::model::mongodb::ensure_indexes_exist;
use crate::store::{MemoryStore, MongoStore, Storage};

/// Application configuration, derived from `Rocket.toml` and `ROCKET_*`
/// environment variables. This struct becomes managed state and can be
/// inspected by any endpoint.
#[derive(Deserialize)]
pub struct Config {
    // secrets
    jwt_secret: String,
}

impl Config {
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
        }
    }

    /// Secret key used to sign and verify bearer tokens.
    pub fn jwt_secret(&self) -> &[u8] {
        self.jwt_secret.as_bytes()
    }
}

/// A fairing that loads the application config and puts it in managed state.
pub struct ConfigFairing;

#[rocket::async_trait]
impl Fairing for ConfigFairing {
    fn info(&self) -> Info {
        Info {
            name: "Config",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<Config>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load application config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        // Manage the state.
        rocket = rocket.manage(config);
        Ok(rocket)
    }
}

/// Configuration for the store.
#[derive(Deserialize)]
struct StoreConfig {
    // secrets
    db_uri: Option<String>,
    // non-secrets
    #[serde(default = "default_db_name")]
    db_name: String,
}

fn default_db_name() -> String {
    "qcm".to_string()
}

/// A fairing that loads the store config, connects to MongoDB if a URI is
/// given, performs any setup necessary, and places a [`Storage`] into
/// managed state. Without a URI the process-local store is used.
pub struct StoreFairing;

#[rocket::async_trait]
impl Fairing for StoreFairing {
    fn info(&self) -> Info {
        Info {
            name: "Store",
            kind: Kind::Ignite,
        }
    }

    async fn on_ignite(&self, mut rocket: Rocket<Build>) -> rocket::fairing::Result {
        // Load the config.
        let config = match rocket.figment().extract::<StoreConfig>() {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load store config");
                rocket::config::pretty_print_error(e);
                return Err(rocket);
            }
        };

        let Some(db_uri) = config.db_uri else {
            warn!("No `db_uri` configured, quizzes will be kept in memory only");
            rocket = rocket.manage(Storage::new(MemoryStore::new()));
            return Ok(rocket);
        };

        info!("Loaded database config, connecting...");
        // Construct the connection.
        let client = match MongoClient::with_uri_str(db_uri).await {
            Ok(client) => client,
            Err(e) => {
                error!("Failed to connect to database: {e}");
                return Err(rocket);
            }
        };
        let db = client.database(&config.db_name);

        // Ensure the required indexes exist.
        if let Err(e) = ensure_indexes_exist(&db).await {
            error!("Failed to connect to database: {e}");
            return Err(rocket);
        }
        info!("...database connection online, using database {}", config.db_name);

        // Manage the state.
        rocket = rocket.manage(Storage::new(MongoStore::new(client, db)));
        Ok(rocket)
    }
}

/// Example data for tests.
#[cfg(test)]
mod examples {
    use super::*;

    pub const TEST_JWT_SECRET: &str = "test secret";

    impl Config {
        pub fn example() -> Self {
            Self::new(TEST_JWT_SECRET)
        }
    }
}

#[cfg(test)]
pub(crate) use examples::TEST_JWT_SECRET;
