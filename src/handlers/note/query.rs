use actix_web::{web, HttpResponse};
use serde_json::json;

use crate::{auth::CurrentUser, db::Pool, errors::ServerError, models::note::Note};

pub async fn list(user: CurrentUser, pool: web::Data<Pool>) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let object_list = Note::list_for(&mut connection, user.id)?;

    Ok(HttpResponse::Ok().json(json!({ "object_list": object_list })))
}

pub async fn detail(
    user: CurrentUser,
    note_slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;

    match Note::find_owned(&mut connection, &note_slug, user.id)? {
        Some(note) => Ok(HttpResponse::Ok().json(json!({ "object": note }))),
        None => Err(ServerError::NotFound(note_slug.into_inner())),
    }
}
