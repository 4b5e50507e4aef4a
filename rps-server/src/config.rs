use anyhow::{Context, Result, bail};
use std::env;
use std::net::IpAddr;
use warp::http::Uri;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub database_url: String,
    pub cors_origin: String,
}

impl Config {
    pub fn new() -> Result<Self> {
        let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
        let port = env::var("PORT").unwrap_or_else(|_| "8080".to_string());
        let cors_origin =
            env::var("CORS_ORIGIN").unwrap_or_else(|_| "http://localhost:4200".to_string());

        Self::from_parts(
            &host,
            &port,
            env::var("DATABASE_URL")
                .unwrap_or_else(|_| "sqlite://rps_arena.db?mode=rwc".to_string()),
            cors_origin,
        )
    }

    fn from_parts(host: &str, port: &str, database_url: String, cors_origin: String) -> Result<Self> {
        validate_origin(&cors_origin)
            .with_context(|| format!("Invalid CORS_ORIGIN: {cors_origin}"))?;

        Ok(Self {
            host: host.parse().with_context(|| format!("Invalid HOST: {host}"))?,
            port: port.parse().with_context(|| format!("Invalid PORT: {port}"))?,
            database_url,
            cors_origin,
        })
    }
}

/// `warp::cors().allow_origin` panics on anything but `scheme://host[:port]`.
fn validate_origin(origin: &str) -> Result<()> {
    let uri: Uri = origin.parse()?;
    match uri.scheme_str() {
        Some("http" | "https") => {}
        _ => bail!("scheme must be http or https"),
    }
    if uri.authority().is_none_or(|authority| authority.host().is_empty()) {
        bail!("missing host");
    }
    if uri.path_and_query().is_some() {
        bail!("origin must not carry a path or query");
    }
    Ok(())
}
