use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use rand::rngs::OsRng;
use serde_derive::Serialize;

use crate::{errors::ServerError, schema::users};

pub const USERNAME_MAX_LENGTH: usize = 150;
pub const PASSWORD_MIN_LENGTH: usize = 8;

/// Stored instead of a hash for accounts that cannot log in.
pub const UNUSABLE_PASSWORD: &str = "!";

#[derive(Clone, Debug, PartialEq, Eq, Queryable, Identifiable, Serialize)]
#[diesel(table_name = users)]
pub struct User {
    pub id: i32,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password_hash: String,
}

pub fn is_valid_username(candidate: &str) -> bool {
    !candidate.is_empty()
        && candidate
            .chars()
            .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
}

pub fn hash_password(password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(Argon2::default()
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

impl<'a> NewUser<'a> {
    pub fn with_password(username: &'a str, password: &str) -> Result<Self, ServerError> {
        Ok(NewUser {
            username,
            password_hash: hash_password(password)?,
        })
    }

    pub fn unusable(username: &'a str) -> Self {
        NewUser {
            username,
            password_hash: UNUSABLE_PASSWORD.to_owned(),
        }
    }

    pub fn insert(&self, connection: &mut SqliteConnection) -> QueryResult<User> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result::<User>(connection)
    }
}

impl User {
    pub fn find(connection: &mut SqliteConnection, user_id: i32) -> QueryResult<Option<User>> {
        users::table.find(user_id).first::<User>(connection).optional()
    }

    pub fn find_by_username(
        connection: &mut SqliteConnection,
        name: &str,
    ) -> QueryResult<Option<User>> {
        users::table
            .filter(users::username.eq(name))
            .first::<User>(connection)
            .optional()
    }

    pub fn check_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let user = User {
            id: 1,
            username: "author".to_owned(),
            password_hash: hash_password("correct horse").unwrap(),
        };
        assert!(user.check_password("correct horse"));
        assert!(!user.check_password("battery staple"));
    }

    #[test]
    fn unusable_password_never_matches() {
        let user = User {
            id: 1,
            username: "author".to_owned(),
            password_hash: UNUSABLE_PASSWORD.to_owned(),
        };
        assert!(!user.check_password(""));
        assert!(!user.check_password("!"));
    }

    #[test]
    fn username_charset() {
        assert!(is_valid_username("not_author"));
        assert!(is_valid_username("user@example.com"));
        assert!(!is_valid_username("two words"));
        assert!(!is_valid_username(""));
    }
}
