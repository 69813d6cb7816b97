use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde_derive::Serialize;

use crate::schema::notes;

pub const TITLE_MAX_LENGTH: usize = 100;
pub const SLUG_MAX_LENGTH: usize = 100;

#[derive(Clone, Debug, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = notes)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i32,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notes)]
pub struct NewNote<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub slug: String,
    pub author_id: i32,
}

#[derive(Debug, AsChangeset)]
#[diesel(table_name = notes)]
pub struct NoteChanges<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub slug: &'a str,
}

/// Transliterates `title` into a lowercase hyphenated ASCII slug,
/// cut to the slug column width.
pub fn slugify(title: &str) -> String {
    slug::slugify(title).chars().take(SLUG_MAX_LENGTH).collect()
}

/// Explicit slugs are limited to ASCII letters, digits, `-` and `_`.
pub fn is_valid_slug(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

impl<'a> NewNote<'a> {
    /// A blank `slug` is replaced with one derived from `title`.
    pub fn new(title: &'a str, text: &'a str, slug: Option<&str>, author_id: i32) -> Self {
        let slug = match slug.map(str::trim) {
            Some(explicit) if !explicit.is_empty() => explicit.to_owned(),
            _ => slugify(title),
        };
        NewNote {
            title,
            text,
            slug,
            author_id,
        }
    }

    pub fn insert(&self, connection: &mut SqliteConnection) -> QueryResult<Note> {
        diesel::insert_into(notes::table)
            .values(self)
            .get_result::<Note>(connection)
    }
}

impl Note {
    /// Looks a note up by slug among the notes written by `owner`.
    pub fn find_owned(
        connection: &mut SqliteConnection,
        note_slug: &str,
        owner: i32,
    ) -> QueryResult<Option<Note>> {
        notes::table
            .filter(notes::slug.eq(note_slug))
            .filter(notes::author_id.eq(owner))
            .first::<Note>(connection)
            .optional()
    }

    pub fn list_for(connection: &mut SqliteConnection, owner: i32) -> QueryResult<Vec<Note>> {
        notes::table
            .filter(notes::author_id.eq(owner))
            .order(notes::id.asc())
            .load::<Note>(connection)
    }

    /// Whether a note other than `exclude` already uses `candidate`.
    pub fn slug_taken(
        connection: &mut SqliteConnection,
        candidate: &str,
        exclude: Option<i32>,
    ) -> QueryResult<bool> {
        let clash = match exclude {
            Some(own_id) => notes::table
                .filter(notes::slug.eq(candidate))
                .filter(notes::id.ne(own_id))
                .select(notes::id)
                .first::<i32>(connection)
                .optional()?,
            None => notes::table
                .filter(notes::slug.eq(candidate))
                .select(notes::id)
                .first::<i32>(connection)
                .optional()?,
        };
        Ok(clash.is_some())
    }

    pub fn update(
        &self,
        connection: &mut SqliteConnection,
        changes: &NoteChanges,
    ) -> QueryResult<Note> {
        diesel::update(notes::table.find(self.id))
            .set(changes)
            .get_result::<Note>(connection)
    }

    pub fn delete(&self, connection: &mut SqliteConnection) -> QueryResult<usize> {
        diesel::delete(notes::table.find(self.id)).execute(connection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_transliterates_cyrillic() {
        assert_eq!(slugify("Привет мир"), "privet-mir");
        assert_eq!(slugify("note 0"), "note-0");
        assert_eq!(slugify("  Hello,   World! "), "hello-world");
    }

    #[test]
    fn slugify_is_cut_to_column_width() {
        let title = "a".repeat(SLUG_MAX_LENGTH + 20);
        assert_eq!(slugify(&title).len(), SLUG_MAX_LENGTH);
    }

    #[test]
    fn blank_slug_is_derived_from_title() {
        assert_eq!(NewNote::new("My Note", "x", None, 1).slug, "my-note");
        assert_eq!(NewNote::new("My Note", "x", Some("  "), 1).slug, "my-note");
    }

    #[test]
    fn explicit_slug_is_kept_verbatim() {
        let note = NewNote::new("title", "x", Some("Note_Slug"), 1);
        assert_eq!(note.slug, "Note_Slug");
        assert_ne!(note.slug, slugify(note.title));
    }

    #[test]
    fn slug_charset() {
        assert!(is_valid_slug("note-slug_2"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("with space"));
        assert!(!is_valid_slug("заметка"));
        assert!(!is_valid_slug("a/b"));
    }
}
