use actix_web::{web, HttpResponse, Responder};
use serde_derive::Deserialize;
use serde_json::json;

use crate::{
    auth::AppState,
    db::Pool,
    errors::{CommonError, Fields, ServerError},
    handlers::redirect,
    models::user::{is_valid_username, NewUser, User, PASSWORD_MIN_LENGTH, USERNAME_MAX_LENGTH},
    routes::{safe_next, Route},
};

#[derive(Deserialize)]
pub struct Credentials {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

#[derive(Deserialize)]
pub struct NextQuery {
    next: Option<String>,
}

pub async fn login_form(query: web::Query<NextQuery>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "form": {
            "name": "login_form",
            "fields": ["username", "password"],
        },
        "next": query.next,
    }))
}

pub async fn login(
    query: web::Query<NextQuery>,
    input: web::Form<Credentials>,
    state: web::Data<AppState>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;

    let user = match User::find_by_username(&mut connection, input.username.trim())? {
        Some(user) if user.check_password(&input.password) => user,
        _ => return Err(ServerError::InvalidCredentials),
    };

    let token = state.issue_token(&user)?;
    let next = safe_next(input.next.as_deref().or(query.next.as_deref()));
    log::info!("{} logged in", user.username);

    Ok(HttpResponse::Found()
        .cookie(state.session_cookie(token))
        .insert_header((actix_web::http::header::LOCATION, next))
        .finish())
}

pub async fn logout(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok()
        .cookie(state.expired_cookie())
        .json(json!({ "page": "logged_out" }))
}

pub async fn signup_form() -> impl Responder {
    HttpResponse::Ok().json(json!({
        "form": {
            "name": "signup_form",
            "fields": ["username", "password"],
        },
    }))
}

pub async fn signup(
    input: web::Form<Credentials>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let username = input.username.trim();
    let mut errors = vec![];

    if username.is_empty() {
        errors.push(Fields::Username(CommonError::Empty));
    } else if username.chars().count() > USERNAME_MAX_LENGTH {
        errors.push(Fields::Username(CommonError::TooLong));
    } else if !is_valid_username(username) {
        errors.push(Fields::Username(CommonError::Invalid));
    }

    if input.password.chars().count() < PASSWORD_MIN_LENGTH {
        errors.push(Fields::Password(CommonError::TooShort));
    }

    if !errors.is_empty() {
        return Err(ServerError::UserError(errors));
    }

    let mut connection = pool.get()?;
    if User::find_by_username(&mut connection, username)?.is_some() {
        return Err(ServerError::UserError(vec![Fields::Username(
            CommonError::Taken,
        )]));
    }

    let user = match NewUser::with_password(username, &input.password)?.insert(&mut connection) {
        Ok(user) => user,
        Err(diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        )) => {
            return Err(ServerError::UserError(vec![Fields::Username(
                CommonError::Taken,
            )]));
        }
        Err(e) => return Err(e.into()),
    };
    log::info!("user {} signed up", user.username);

    Ok(redirect(Route::Login.path()))
}
