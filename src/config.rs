//! Application configuration structure
use std::env;
use std::net::SocketAddr;

use anyhow::Context;
use axum_extra::extract::cookie::Key;
use secrecy::SecretString;
use tracing::warn;

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: SecretString,
    pub bind_addr: SocketAddr,
    pub cookie_secret: Key,
}

impl AppConfig {
    /// Builds the configuration from the environment.
    ///
    /// `DATABASE_URL` is required. `BIND_ADDR` defaults to 0.0.0.0:8000.
    /// `SECRET_KEY` (at least 32 bytes) keys the signed session cookies; if
    /// unset an ephemeral key is generated and sessions do not survive a
    /// restart.
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = SecretString::from(env::var("DATABASE_URL").context("DATABASE_URL not set")?);
        let bind_addr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8000".to_string())
            .parse()
            .context("Invalid BIND_ADDR")?;
        let cookie_secret = match env::var("SECRET_KEY") {
            Ok(secret) => {
                anyhow::ensure!(
                    secret.len() >= 32,
                    "SECRET_KEY must be at least 32 bytes long"
                );
                Key::derive_from(secret.as_bytes())
            }
            Err(_) => {
                warn!("SECRET_KEY not set, generating an ephemeral cookie key");
                Key::generate()
            }
        };
        Ok(Self {
            database_url,
            bind_addr,
            cookie_secret,
        })
    }
}
