//! Named routes and the URL table they resolve to.
//!
//! Handlers and tests refer to pages through [`Route`] so that a path is
//! spelled out in exactly one place.

use actix_web::web;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::handlers::{self, auth, note};

/// Characters left untouched in the `next` query parameter.
const NEXT_PARAM: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Route<'a> {
    Home,
    List,
    Add,
    Success,
    Detail(&'a str),
    Edit(&'a str),
    Delete(&'a str),
    Login,
    Logout,
    Signup,
}

impl Route<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Route::Home => "notes:home",
            Route::List => "notes:list",
            Route::Add => "notes:add",
            Route::Success => "notes:success",
            Route::Detail(_) => "notes:detail",
            Route::Edit(_) => "notes:edit",
            Route::Delete(_) => "notes:delete",
            Route::Login => "users:login",
            Route::Logout => "users:logout",
            Route::Signup => "users:signup",
        }
    }

    /// Resource pattern as registered with actix, `{slug}` placeholder included.
    pub fn pattern(&self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::List => "/notes/",
            Route::Add => "/add/",
            Route::Success => "/done/",
            Route::Detail(_) => "/note/{slug}/",
            Route::Edit(_) => "/edit/{slug}/",
            Route::Delete(_) => "/delete/{slug}/",
            Route::Login => "/auth/login/",
            Route::Logout => "/auth/logout/",
            Route::Signup => "/auth/signup/",
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Detail(slug) | Route::Edit(slug) | Route::Delete(slug) => {
                self.pattern().replace("{slug}", slug)
            }
            _ => self.pattern().to_owned(),
        }
    }

    fn resource(&self) -> actix_web::Resource {
        web::resource(self.pattern()).name(self.name())
    }

    /// Path with `?next=` pointing back at `next`.
    pub fn with_next(&self, next: &str) -> String {
        format!(
            "{}?next={}",
            self.path(),
            utf8_percent_encode(next, NEXT_PARAM)
        )
    }
}

/// Only local absolute paths are accepted as redirect targets after login.
pub fn safe_next(next: Option<&str>) -> String {
    match next {
        Some(path) if path.starts_with('/') && !path.starts_with("//") => path.to_owned(),
        _ => Route::Home.path(),
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(Route::Home.resource().route(web::get().to(handlers::index)))
        .service(Route::List.resource().route(web::get().to(note::query::list)))
        .service(
            Route::Add
                .resource()
                .route(web::get().to(note::post::form))
                .route(web::post().to(note::post::new)),
        )
        .service(Route::Success.resource().route(web::get().to(handlers::success)))
        .service(
            Route::Detail("")
                .resource()
                .route(web::get().to(note::query::detail)),
        )
        .service(
            Route::Edit("")
                .resource()
                .route(web::get().to(note::mutate::edit_form))
                .route(web::post().to(note::mutate::edit)),
        )
        .service(
            Route::Delete("")
                .resource()
                .route(web::get().to(note::mutate::confirm_delete))
                .route(web::post().to(note::mutate::del))
                .route(web::delete().to(note::mutate::del)),
        )
        .service(
            Route::Login
                .resource()
                .route(web::get().to(auth::login_form))
                .route(web::post().to(auth::login)),
        )
        .service(
            Route::Logout
                .resource()
                .route(web::get().to(auth::logout))
                .route(web::post().to(auth::logout)),
        )
        .service(
            Route::Signup
                .resource()
                .route(web::get().to(auth::signup_form))
                .route(web::post().to(auth::signup)),
        );
}
