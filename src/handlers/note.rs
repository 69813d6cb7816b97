use diesel::sqlite::SqliteConnection;
use serde_derive::{Deserialize, Serialize};

use crate::{
    errors::{CommonError, Fields, ServerError},
    models::note::{is_valid_slug, slugify, Note, SLUG_MAX_LENGTH, TITLE_MAX_LENGTH},
};

pub mod mutate;
pub mod post;
pub mod query;

pub const FORM_NAME: &str = "note_form";
pub const FORM_FIELDS: [&str; 3] = ["title", "text", "slug"];

/// Backs both the add and the edit page.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

/// What the add and edit pages hand to the client under `"form"`.
#[derive(Debug, Serialize)]
pub struct FormContext<'a> {
    pub name: &'static str,
    pub fields: [&'static str; 3],
    pub data: &'a NoteForm,
}

#[derive(Debug, PartialEq, Eq)]
pub struct CleanedNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        NoteForm {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

impl NoteForm {
    pub fn context(&self) -> FormContext<'_> {
        FormContext {
            name: FORM_NAME,
            fields: FORM_FIELDS,
            data: self,
        }
    }

    /// Field checks that need no database. A blank slug is filled in from
    /// the title.
    pub fn validate(&self) -> Result<CleanedNote, Vec<Fields>> {
        let mut errors = vec![];
        let title = self.title.trim();
        let text = self.text.trim();
        let explicit_slug = self.slug.trim();

        if title.is_empty() {
            errors.push(Fields::Title(CommonError::Empty));
        } else if title.chars().count() > TITLE_MAX_LENGTH {
            errors.push(Fields::Title(CommonError::TooLong));
        }

        if text.is_empty() {
            errors.push(Fields::Text(CommonError::Empty));
        }

        let slug = if explicit_slug.is_empty() {
            let derived = slugify(title);
            if derived.is_empty() && !title.is_empty() {
                errors.push(Fields::Slug(CommonError::Invalid));
            }
            derived
        } else if explicit_slug.chars().count() > SLUG_MAX_LENGTH {
            errors.push(Fields::Slug(CommonError::TooLong));
            explicit_slug.to_owned()
        } else if !is_valid_slug(explicit_slug) {
            errors.push(Fields::Slug(CommonError::Invalid));
            explicit_slug.to_owned()
        } else {
            explicit_slug.to_owned()
        };

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(CleanedNote {
            title: title.to_owned(),
            text: self.text.clone(),
            slug,
        })
    }

    /// Full validation, including slug uniqueness. `instance` is the note
    /// being edited, whose own slug does not count as taken.
    pub fn clean(
        &self,
        connection: &mut SqliteConnection,
        instance: Option<&Note>,
    ) -> Result<CleanedNote, ServerError> {
        let cleaned = self.validate().map_err(ServerError::UserError)?;
        if Note::slug_taken(connection, &cleaned.slug, instance.map(|n| n.id))? {
            return Err(ServerError::UserError(vec![Fields::Slug(
                CommonError::Taken,
            )]));
        }
        Ok(cleaned)
    }
}

/// Storage-level unique violations that slipped past [`NoteForm::clean`].
pub(crate) fn map_slug_conflict(err: diesel::result::Error, note_slug: &str) -> ServerError {
    match err {
        diesel::result::Error::DatabaseError(
            diesel::result::DatabaseErrorKind::UniqueViolation,
            _,
        ) => ServerError::Conflict(format!("slug {note_slug} has been taken")),
        _ => err.into(),
    }
}
