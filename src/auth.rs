use std::future::{ready, Ready};
use std::ops::Deref;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use actix_web::{
    cookie::{time, Cookie, SameSite},
    dev::Payload,
    web, FromRequest, HttpRequest,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, TokenData, Validation};
use serde_derive::{Deserialize, Serialize};

use crate::{db::Pool, errors::ServerError, models::user::User};

pub const SESSION_COOKIE: &str = "session";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub uid: i32,
    pub iat: usize,
    pub exp: usize,
}

pub struct AppState {
    pub secret: String,
    pub jwt_header: Header,
    pub jwt_validator: Validation,
    pub session_lifetime: Duration,
}

impl AppState {
    pub fn new(secret: impl Into<String>, session_lifetime: Duration) -> Self {
        AppState {
            secret: secret.into(),
            jwt_header: Header::default(),
            jwt_validator: Validation::default(),
            session_lifetime,
        }
    }

    pub fn issue_token(&self, user: &User) -> Result<String, ServerError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default();
        let claims = Claims {
            sub: user.username.clone(),
            uid: user.id,
            iat: now.as_secs() as usize,
            exp: (now + self.session_lifetime).as_secs() as usize,
        };
        Ok(encode(
            &self.jwt_header,
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?)
    }

    pub fn decode_token(&self, token: &str) -> jsonwebtoken::errors::Result<TokenData<Claims>> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &self.jwt_validator,
        )
    }

    pub fn session_cookie(&self, token: String) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, token)
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::seconds(self.session_lifetime.as_secs() as i64))
            .finish()
    }

    pub fn expired_cookie(&self) -> Cookie<'static> {
        Cookie::build(SESSION_COOKIE, "")
            .path("/")
            .http_only(true)
            .same_site(SameSite::Lax)
            .max_age(time::Duration::ZERO)
            .finish()
    }
}

/// The logged-in user. Extraction fails with a login redirect for
/// anonymous requests, so gated handlers take it as their first argument.
#[derive(Clone, Debug)]
pub struct CurrentUser(pub User);

impl Deref for CurrentUser {
    type Target = User;

    fn deref(&self) -> &User {
        &self.0
    }
}

impl FromRequest for CurrentUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

fn authenticate(req: &HttpRequest) -> Result<CurrentUser, ServerError> {
    let login_required = || {
        let next = req
            .uri()
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or_else(|| req.path());
        ServerError::LoginRequired(next.to_owned())
    };

    let token = match req.cookie(SESSION_COOKIE) {
        Some(cookie) if !cookie.value().is_empty() => cookie.value().to_owned(),
        _ => return Err(login_required()),
    };

    let state = req
        .app_data::<web::Data<AppState>>()
        .ok_or(ServerError::EnvironmentError)?;
    let claims = match state.decode_token(&token) {
        Ok(data) => data.claims,
        Err(e) => {
            log::warn!("rejected session cookie: {e}");
            return Err(login_required());
        }
    };

    let pool = req
        .app_data::<web::Data<Pool>>()
        .ok_or(ServerError::EnvironmentError)?;
    let mut connection = pool.get()?;
    match User::find(&mut connection, claims.uid)? {
        Some(user) if user.username == claims.sub => Ok(CurrentUser(user)),
        _ => {
            log::warn!("session for missing user {}", claims.sub);
            Err(login_required())
        }
    }
}
