use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{map_slug_conflict, NoteForm};
use crate::{
    auth::CurrentUser, db::Pool, errors::ServerError, handlers::redirect, models::note::NewNote,
    routes::Route,
};

pub async fn form(_user: CurrentUser) -> HttpResponse {
    let empty = NoteForm::default();
    HttpResponse::Ok().json(json!({ "form": empty.context() }))
}

pub async fn new(
    user: CurrentUser,
    input: web::Form<NoteForm>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let cleaned = input.clean(&mut connection, None)?;

    let note = NewNote::new(&cleaned.title, &cleaned.text, Some(cleaned.slug.as_str()), user.id)
        .insert(&mut connection)
        .map_err(|e| map_slug_conflict(e, &cleaned.slug))?;
    log::info!("note {} created by {}", note.slug, user.username);

    Ok(redirect(Route::Success.path()))
}
