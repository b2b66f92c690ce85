use log::{error, warn};
use mongodb::error::Error as DbError;
use rocket::{
    http::{Status, StatusClass},
    response::{self, Responder},
    serde::json::Json,
    Request,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::{mongodb::Id, ordering::OrderError, rules::ValidationError};

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Db(#[from] DbError),
    #[error("Storage failure: {0}")]
    Storage(String),
    #[error("Server misconfigured: {0}")]
    Config(String),
    #[error("Quiz {0} not found")]
    QuizNotFound(Id),
    #[error("Question {0} not found")]
    QuestionNotFound(Id),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Expected an order for each of the {expected} questions, got {got}")]
    OrderCountMismatch { expected: usize, got: usize },
    #[error("Invalid question order: {0}")]
    InvalidOrderPermutation(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl Error {
    /// The HTTP status this error is reported with.
    pub fn status(&self) -> Status {
        match self {
            Self::Db(_) | Self::Storage(_) | Self::Config(_) => Status::InternalServerError,
            Self::QuizNotFound(_) | Self::QuestionNotFound(_) => Status::NotFound,
            Self::Conflict(_) => Status::Conflict,
            Self::Validation(_) | Self::OrderCountMismatch { .. } | Self::InvalidOrderPermutation(_) => {
                Status::BadRequest
            }
            Self::Unauthorized(_) => Status::Unauthorized,
        }
    }

    /// Machine-readable error code for API clients.
    pub fn code(&self) -> &'static str {
        match self {
            Self::OrderCountMismatch { .. } => "ORDER_COUNT_MISMATCH",
            Self::InvalidOrderPermutation(_) => "INVALID_ORDER",
            other => code_for(other.status()),
        }
    }
}

impl From<OrderError> for Error {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::CountMismatch { expected, got } => Self::OrderCountMismatch { expected, got },
            OrderError::UnknownQuestion(id) => Self::QuestionNotFound(id),
            other @ (OrderError::DuplicateQuestion(_) | OrderError::NotAPermutation { .. }) => {
                Self::InvalidOrderPermutation(other.to_string())
            }
        }
    }
}

/// The JSON body of every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl ErrorBody {
    /// A body for a bare status, e.g. from a catcher.
    pub fn for_status(status: Status) -> Self {
        Self {
            code: code_for(status).to_string(),
            message: status.reason_lossy().to_string(),
        }
    }
}

fn code_for(status: Status) -> &'static str {
    match status.code {
        400 => "BAD_REQUEST",
        401 => "UNAUTHORIZED",
        403 => "FORBIDDEN",
        404 => "NOT_FOUND",
        409 => "CONFLICT",
        422 => "UNPROCESSABLE_ENTITY",
        _ if status.class() == StatusClass::ServerError => "INTERNAL_SERVER_ERROR",
        _ => "BAD_REQUEST",
    }
}

impl<'r, 'o: 'r> Responder<'r, 'o> for Error {
    fn respond_to(self, req: &'r Request<'_>) -> response::Result<'o> {
        let status = self.status();
        let body = if status.class() == StatusClass::ServerError {
            // Driver errors can leak connection details; keep them in the logs.
            error!("{} {}: {self}", req.method(), req.uri());
            ErrorBody::for_status(status)
        } else {
            warn!("{} {}: {self}", req.method(), req.uri());
            ErrorBody {
                code: self.code().to_string(),
                message: self.to_string(),
            }
        };
        (status, Json(body)).respond_to(req)
    }
}
