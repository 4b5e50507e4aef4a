use anyhow::Result;
use rps_core::CoreConfig;
use std::env;

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub core: CoreConfig,
}

impl ClientConfig {
    pub fn new() -> Result<Self> {
        Ok(Self {
            api_url: env::var("RPS_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080/api".to_string()),
            core: CoreConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_environment() {
        if env::var("RPS_API_URL").is_ok() || env::var("RPS_GAME_MODE").is_ok() {
            return;
        }

        let config = ClientConfig::new().unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/api");
        assert_eq!(config.core.mode, rps_types::GameMode::Classic);
    }
}
