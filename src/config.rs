use std::{env, net::SocketAddr, time::Duration};

use crate::error::AppError;

const DEFAULT_MAX_BODY_BYTES: usize = 1 << 20;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub listen_addr: SocketAddr,
    /// Origins allowed to make cross-origin requests, e.g. the Vite dev server.
    pub cors_origins: Vec<String>,
    /// Bodies above this size are rejected with 413 before reaching a handler.
    pub max_body_bytes: usize,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let database_url =
            get("DATABASE_URL").unwrap_or_else(|| "sqlite://rvlog.db?mode=rwc".to_string());
        let listen_addr: SocketAddr = get("APP_LISTEN_ADDR")
            .unwrap_or_else(|| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|err| AppError::Config(format!("invalid APP_LISTEN_ADDR: {err}")))?;

        let cors_origins = split_csv(
            &get("CORS_ORIGINS").unwrap_or_else(|| "http://localhost:5173".to_string()),
        );

        let max_body_bytes = get("MAX_BODY_BYTES")
            .and_then(|raw| raw.trim().parse().ok())
            .unwrap_or(DEFAULT_MAX_BODY_BYTES);

        let request_timeout = get("REQUEST_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS));

        Ok(Self {
            database_url,
            listen_addr,
            cors_origins,
            max_body_bytes,
            request_timeout,
        })
    }
}

fn split_csv(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
