#![allow(dead_code)]

use std::time::Duration;

use actix_web::{cookie::Cookie, web};
use diesel::prelude::*;
use tempfile::TempDir;

use notekeeper::{
    auth::SESSION_COOKIE,
    db,
    models::{
        note::{NewNote, Note},
        user::{NewUser, User},
    },
    schema::notes,
    AppState, Pool,
};

/// Builds the real route table over the context's pool and state.
macro_rules! app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.pool.clone())
                .app_data($ctx.state.clone())
                .configure(notekeeper::routes::configure),
        )
        .await
    };
}

/// A fresh database file per test.
pub struct TestContext {
    pub pool: web::Data<Pool>,
    pub state: web::Data<AppState>,
    _dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.sqlite3");
        let pool = db::build_pool(path.to_str().unwrap(), 4).unwrap();
        db::run_migrations(&pool).unwrap();

        TestContext {
            pool: web::Data::new(pool),
            state: web::Data::new(AppState::new(
                "test secret",
                Duration::from_secs(60 * 60),
            )),
            _dir: dir,
        }
    }

    pub fn create_user(&self, username: &str) -> User {
        let mut connection = self.pool.get().unwrap();
        NewUser::unusable(username).insert(&mut connection).unwrap()
    }

    pub fn create_note(&self, author: &User, title: &str, text: &str, slug: Option<&str>) -> Note {
        let mut connection = self.pool.get().unwrap();
        NewNote::new(title, text, slug, author.id)
            .insert(&mut connection)
            .unwrap()
    }

    /// Session cookie for `user`, as if they had just logged in.
    pub fn login(&self, user: &User) -> Cookie<'static> {
        Cookie::new(SESSION_COOKIE, self.state.issue_token(user).unwrap())
    }

    pub fn note_count(&self) -> i64 {
        let mut connection = self.pool.get().unwrap();
        notes::table.count().get_result(&mut connection).unwrap()
    }

    pub fn refresh(&self, note: &Note) -> Note {
        let mut connection = self.pool.get().unwrap();
        notes::table.find(note.id).first(&mut connection).unwrap()
    }

    pub fn find_by_slug(&self, slug: &str) -> Option<Note> {
        let mut connection = self.pool.get().unwrap();
        notes::table
            .filter(notes::slug.eq(slug))
            .first(&mut connection)
            .optional()
            .unwrap()
    }
}
