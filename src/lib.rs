//! Personal notes service: every user keeps a private list of notes that
//! only they can read, change or remove.

pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod schema;

pub use auth::AppState;
pub use db::Pool;
