//! Session middleware and credential handling.
use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    Extension,
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::{SignedCookieJar, cookie};
use thiserror::Error;
use tracing::debug;

use crate::config::AppConfig;

pub const SESSION_COOKIE: &str = "session";

/// Failures of the credential store itself.
///
/// A wrong password is not an error: `verify_password` reports it as
/// `Ok(false)`. Only a malformed stored hash or a hashing-backend failure
/// lands here, and those propagate instead of being masked as a failed
/// login.
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("stored password hash is malformed: {0}")]
    MalformedHash(password_hash::Error),
    #[error("password hashing failed: {0}")]
    Hash(password_hash::Error),
}

pub fn hash_password(password: &str) -> Result<String, CredentialError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(CredentialError::Hash)
}

pub fn verify_password(stored_hash: &str, candidate: &str) -> Result<bool, CredentialError> {
    let parsed = PasswordHash::new(stored_hash).map_err(CredentialError::MalformedHash)?;
    match Argon2::default().verify_password(candidate.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(CredentialError::Hash(e)),
    }
}

/// The user resolved from the session cookie, if any.
///
/// The middleware never rejects a request; handlers that need a user check
/// for `None` themselves.
#[derive(Clone, Debug)]
pub struct AuthUser(pub Option<i32>);

pub async fn auth_middleware(
    Extension(config): Extension<AppConfig>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let cookies = SignedCookieJar::from_headers(req.headers(), config.cookie_secret.clone());
    let user_id = cookies
        .get(SESSION_COOKIE)
        .and_then(|cookie| cookie.value().parse::<i32>().ok());
    debug!("Resolved session user: {:?}", user_id);
    req.extensions_mut().insert(AuthUser(user_id));
    let resp = next.run(req).await;
    Ok((cookies, resp).into_response())
}

pub fn add_session_cookie(cookies: SignedCookieJar, user_id: i32) -> SignedCookieJar {
    cookies.add(
        cookie::Cookie::build((SESSION_COOKIE, user_id.to_string()))
            .path("/")
            .http_only(true)
            .secure(true)
            .max_age(time::Duration::days(30))
            .same_site(cookie::SameSite::Strict)
            .build(),
    )
}

pub fn clear_session_cookie(cookies: SignedCookieJar) -> SignedCookieJar {
    cookies.remove(cookie::Cookie::build((SESSION_COOKIE, "")).path("/").build())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn hash_round_trips() {
        let hash = hash_password("correct horse battery staple").unwrap();
        assert!(verify_password(&hash, "correct horse battery staple").unwrap());
        assert!(!verify_password(&hash, "wrong password").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let a = hash_password("hunter2").unwrap();
        let b = hash_password("hunter2").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn corrupt_stored_hash_is_an_error_not_a_mismatch() {
        let result = verify_password("not-a-phc-string", "anything");
        assert!(matches!(result, Err(CredentialError::MalformedHash(_))));
    }
}
