#[macro_use]
extern crate log;

use actix_web::{error::BlockingError, error::ResponseError, http::StatusCode, HttpResponse};
use derive_more::Display;
use diesel::result::{DatabaseErrorKind, Error as DBError};
use r2d2::Error as PoolError;
use serde::{Deserialize, Serialize};

#[derive(Debug, Display, PartialEq)]
pub enum Error {
    BadRequest(String),
    BlockingError(String),
    CannotDecodeJwtToken(String),
    CannotEncodeJwtToken(String),
    InternalServerError(String),
    NotFound(String),
    PoolError(String),
    Unauthorized,
    #[display(fmt = "")]
    ValidationError(Vec<String>),
}

// User-friendly error messages
#[derive(Debug, Deserialize, Serialize)]
pub struct ErrorResponse {
    pub errors: Vec<String>,
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self {
            Error::BadRequest(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::CannotDecodeJwtToken(_) | Error::Unauthorized => StatusCode::UNAUTHORIZED,
            Error::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Error::ValidationError(ref validation_errors) => HttpResponse::UnprocessableEntity()
                .json(ErrorResponse::from(validation_errors.to_vec())),
            Error::BadRequest(error) => HttpResponse::BadRequest().json(ErrorResponse::from(error)),
            Error::NotFound(message) => HttpResponse::NotFound().json(ErrorResponse::from(message)),
            Error::CannotDecodeJwtToken(_) | Error::Unauthorized => {
                HttpResponse::Unauthorized().json(ErrorResponse::from("Unauthorized"))
            }
            _ => {
                error!("{:?}", self);
                HttpResponse::new(StatusCode::INTERNAL_SERVER_ERROR)
            }
        }
    }
}

impl From<&str> for ErrorResponse {
    fn from(error: &str) -> Self {
        ErrorResponse {
            errors: vec![error.into()],
        }
    }
}

impl From<&String> for ErrorResponse {
    fn from(error: &String) -> Self {
        ErrorResponse {
            errors: vec![error.into()],
        }
    }
}

impl From<Vec<String>> for ErrorResponse {
    fn from(error: Vec<String>) -> Self {
        ErrorResponse { errors: error }
    }
}

// Convert DBErrors to our Error type
impl From<DBError> for Error {
    fn from(error: DBError) -> Error {
        match error {
            DBError::DatabaseError(kind, info) => match kind {
                DatabaseErrorKind::UniqueViolation => {
                    let message = info.details().unwrap_or_else(|| info.message()).to_string();
                    Error::BadRequest(message)
                }
                // rows pointing at a question that is gone
                DatabaseErrorKind::ForeignKeyViolation => {
                    Error::NotFound("Record not found".into())
                }
                _ => {
                    error!("Database error - {}", info.message());
                    Error::InternalServerError("Unknown database error".into())
                }
            },
            DBError::NotFound => Error::NotFound("Record not found".into()),
            _ => Error::InternalServerError("Unknown database error".into()),
        }
    }
}

// Convert PoolError to our Error type
impl From<PoolError> for Error {
    fn from(error: PoolError) -> Error {
        Error::PoolError(error.to_string())
    }
}

impl From<BlockingError> for Error {
    fn from(_: BlockingError) -> Error {
        Error::BlockingError("Thread blocking error".into())
    }
}
