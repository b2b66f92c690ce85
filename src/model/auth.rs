use chrono::{serde::ts_seconds, DateTime, Duration, Utc};
use jsonwebtoken::{
    errors::{Error as JwtError, ErrorKind},
    Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use log::error;
use rocket::{
    http::Status,
    request::{FromRequest, Outcome},
    Request,
};
use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::error::Error;
use crate::logging::record_caller;

/// Header carrying the caller's token.
pub const AUTHORIZATION: &str = "Authorization";

const BEARER: &str = "Bearer ";

/// The authenticated originator of a request, identified by the opaque
/// subject of their bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Caller(String);

impl Caller {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The caller's identifier, as recorded in `Quiz::creator`.
    pub fn id(&self) -> &str {
        &self.0
    }

    /// Sign a token for this caller, valid for `ttl`.
    pub fn token(&self, config: &Config, ttl: Duration) -> Result<String, JwtError> {
        let claims = Claims {
            sub: self.0.clone(),
            exp: Utc::now() + ttl,
        };
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(config.jwt_secret()),
        )
    }

    /// Verify a token and extract its caller.
    pub fn from_token(token: &str, config: &Config) -> Result<Self, JwtError> {
        let data = jsonwebtoken::decode::<Claims>(
            token,
            &DecodingKey::from_secret(config.jwt_secret()),
            &Validation::new(Algorithm::HS256),
        )?;
        if data.claims.sub.is_empty() {
            return Err(ErrorKind::InvalidSubject.into());
        }
        Ok(Self(data.claims.sub))
    }
}

/// Token claims: the caller ID plus an expiry datetime.
#[derive(Serialize, Deserialize)]
struct Claims {
    sub: String,
    #[serde(with = "ts_seconds")]
    exp: DateTime<Utc>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Caller {
    type Error = Error;

    async fn from_request(req: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let Some(config) = req.rocket().state::<Config>() else {
            error!("Token verification requested before the config was loaded");
            return Outcome::Error((
                Status::InternalServerError,
                Error::Config("token verification unavailable".to_string()),
            ));
        };

        let Some(header) = req.headers().get_one(AUTHORIZATION) else {
            return Outcome::Error((
                Status::Unauthorized,
                Error::Unauthorized("missing bearer token".to_string()),
            ));
        };
        let Some(token) = header.strip_prefix(BEARER) else {
            return Outcome::Error((
                Status::Unauthorized,
                Error::Unauthorized("malformed authorization header".to_string()),
            ));
        };

        match Self::from_token(token.trim(), config) {
            Ok(caller) => {
                record_caller(req, &caller);
                Outcome::Success(caller)
            }
            Err(err) => Outcome::Error((Status::Unauthorized, Error::Unauthorized(err.to_string()))),
        }
    }
}
