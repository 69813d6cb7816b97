use actix_web::{http::header, http::StatusCode, HttpResponse};
use derive_more::Display;
use serde_derive::Serialize;
use serde_json::json;

use crate::routes::Route;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CommonError {
    Empty,
    TooLong,
    TooShort,
    Invalid,
    Taken,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "field", content = "error", rename_all = "snake_case")]
pub enum Fields {
    Title(CommonError),
    Text(CommonError),
    Slug(CommonError),
    Username(CommonError),
    Password(CommonError),
    Credentials,
}

#[derive(Debug, Display)]
pub enum ServerError {
    DieselError,
    EnvironmentError,
    R2D2Error,
    ArgonError,
    JWTError,
    InvalidCredentials,
    #[display(fmt = "login required to access {}", _0)]
    LoginRequired(String),
    #[display(fmt = "note {} was not found", _0)]
    NotFound(String),
    #[display(fmt = "{}", _0)]
    Conflict(String),
    #[display(fmt = "invalid input: {:?}", _0)]
    UserError(Vec<Fields>),
}

impl From<r2d2::Error> for ServerError {
    fn from(err: r2d2::Error) -> ServerError {
        log::error!("{err}");
        ServerError::R2D2Error
    }
}

impl From<std::env::VarError> for ServerError {
    fn from(_: std::env::VarError) -> ServerError {
        ServerError::EnvironmentError
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(err: diesel::result::Error) -> ServerError {
        match err {
            diesel::result::Error::NotFound => ServerError::NotFound(String::new()),
            _ => {
                log::error!("{err}");
                ServerError::DieselError
            }
        }
    }
}

impl From<argon2::password_hash::Error> for ServerError {
    fn from(err: argon2::password_hash::Error) -> ServerError {
        log::error!("{err}");
        ServerError::ArgonError
    }
}

impl From<jsonwebtoken::errors::Error> for ServerError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        log::error!("{err}");
        ServerError::JWTError
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServerError::LoginRequired(_) => StatusCode::FOUND,
            ServerError::NotFound(_) => StatusCode::NOT_FOUND,
            ServerError::Conflict(_) => StatusCode::CONFLICT,
            ServerError::UserError(_) => StatusCode::BAD_REQUEST,
            ServerError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            ServerError::DieselError => {
                HttpResponse::InternalServerError().body("Library Error: Diesel Error.")
            }
            ServerError::EnvironmentError => HttpResponse::InternalServerError()
                .body("Server Error: Use of an uninitialized environment variable."),
            ServerError::R2D2Error => {
                HttpResponse::InternalServerError().body("Server Error: Pooling Error.")
            }
            ServerError::ArgonError => {
                HttpResponse::InternalServerError().body("Library Error: Password Hashing Failed")
            }
            ServerError::JWTError => {
                HttpResponse::InternalServerError().body("Library Error: JWT Library Malfunctioned")
            }
            ServerError::InvalidCredentials => HttpResponse::Unauthorized().json(json!({
                "errors": [Fields::Credentials],
            })),
            ServerError::LoginRequired(next) => HttpResponse::Found()
                .insert_header((header::LOCATION, Route::Login.with_next(next)))
                .finish(),
            // same body for a missing note and someone else's note
            ServerError::NotFound(_) => HttpResponse::NotFound().body("note was not found"),
            ServerError::Conflict(msg) => HttpResponse::Conflict().body(msg.to_owned()),
            ServerError::UserError(fields) => HttpResponse::BadRequest().json(json!({
                "errors": fields,
            })),
        }
    }
}
