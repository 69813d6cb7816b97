use std::{env, str::FromStr, time::Duration};

use actix_governor::{
    governor::middleware::NoOpMiddleware, GovernorConfig, GovernorConfigBuilder,
    PeerIpKeyExtractor,
};

use crate::errors::ServerError;

#[derive(Clone, Debug)]
pub struct Settings {
    pub port: u16,
    pub database_url: String,
    pub secret_key: String,
    pub pool_size: u32,
    pub session_lifetime: Duration,
    /// Seconds until one request of the burst quota is given back.
    pub rate_limit_replenish_secs: u64,
    pub rate_limit_burst: u32,
}

impl Settings {
    /// Reads settings from the environment, `.env` included.
    pub fn from_env() -> Result<Self, ServerError> {
        dotenv::dotenv().ok();

        Ok(Settings {
            port: parse_or("PORT", 8080)?,
            database_url: env::var("DATABASE_URL")?,
            secret_key: env::var("SECRET_KEY")?,
            pool_size: parse_or("POOL_SIZE", 8)?,
            session_lifetime: Duration::from_secs(parse_or(
                "SESSION_LIFETIME_SECS",
                60 * 60 * 24 * 14,
            )?),
            rate_limit_replenish_secs: parse_or("RATE_LIMIT_REPLENISH_SECS", 2)?,
            rate_limit_burst: parse_or("RATE_LIMIT_BURST", 120)?,
        })
    }

    /// Per peer IP quota; `None` when either setting is zero.
    pub fn rate_limit(&self) -> Option<GovernorConfig<PeerIpKeyExtractor, NoOpMiddleware>> {
        GovernorConfigBuilder::default()
            .per_second(self.rate_limit_replenish_secs)
            .burst_size(self.rate_limit_burst)
            .finish()
    }
}

fn parse_or<T: FromStr>(key: &str, default: T) -> Result<T, ServerError> {
    match env::var(key) {
        Ok(raw) => raw.parse::<T>().map_err(|_| {
            log::error!("env {key} has an invalid value: {raw}");
            ServerError::EnvironmentError
        }),
        Err(env::VarError::NotPresent) => Ok(default),
        Err(e) => Err(e.into()),
    }
}
