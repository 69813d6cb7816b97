use actix_web::{http::header, HttpResponse, Responder};
use serde_json::json;

use crate::auth::CurrentUser;

pub mod auth;
pub mod note;

pub async fn index(user: Option<CurrentUser>) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "page": "home",
        "user": user.map(|u| u.0.username),
    }))
}

pub async fn success(user: CurrentUser) -> impl Responder {
    HttpResponse::Ok().json(json!({
        "page": "success",
        "user": user.username,
    }))
}

pub fn redirect(location: String) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}
