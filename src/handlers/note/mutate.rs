use actix_web::{web, HttpResponse};
use serde_json::json;

use super::{map_slug_conflict, NoteForm};
use crate::{
    auth::CurrentUser,
    db::Pool,
    errors::ServerError,
    handlers::redirect,
    models::note::{Note, NoteChanges},
    routes::Route,
};

fn owned_or_not_found(
    connection: &mut diesel::sqlite::SqliteConnection,
    note_slug: &str,
    user: &CurrentUser,
) -> Result<Note, ServerError> {
    Note::find_owned(connection, note_slug, user.id)?
        .ok_or_else(|| ServerError::NotFound(note_slug.to_owned()))
}

pub async fn edit_form(
    user: CurrentUser,
    note_slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_or_not_found(&mut connection, &note_slug, &user)?;
    let form = NoteForm::from(&note);

    Ok(HttpResponse::Ok().json(json!({
        "form": form.context(),
        "object": note,
    })))
}

pub async fn edit(
    user: CurrentUser,
    note_slug: web::Path<String>,
    input: Result<web::Form<NoteForm>, actix_web::Error>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    // ownership is settled before the body is looked at
    let note = owned_or_not_found(&mut connection, &note_slug, &user)?;
    let input = match input {
        Ok(form) => form,
        Err(e) => return Ok(HttpResponse::from_error(e)),
    };
    let cleaned = input.clean(&mut connection, Some(&note))?;

    let updated = note
        .update(
            &mut connection,
            &NoteChanges {
                title: &cleaned.title,
                text: &cleaned.text,
                slug: &cleaned.slug,
            },
        )
        .map_err(|e| map_slug_conflict(e, &cleaned.slug))?;
    log::info!("note {} updated by {}", updated.slug, user.username);

    Ok(redirect(Route::Success.path()))
}

pub async fn confirm_delete(
    user: CurrentUser,
    note_slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_or_not_found(&mut connection, &note_slug, &user)?;

    Ok(HttpResponse::Ok().json(json!({ "object": note })))
}

pub async fn del(
    user: CurrentUser,
    note_slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_or_not_found(&mut connection, &note_slug, &user)?;

    note.delete(&mut connection)?;
    log::info!("note {} deleted by {}", note.slug, user.username);

    Ok(redirect(Route::Success.path()))
}
