//! Gateway configuration loaded from `.env` / environment.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | GEMINI_API_KEY | unset | Generation provider credential. |
//! | YOUTUBE_API_KEY | unset | Video-search provider credential. |
//! | PORT | 8000 | Listen port. |
//! | SCIPLAN_STATIC_DIR | ./static | Static asset directory. |
//!
//! Unset keys are carried as `None`; the affected endpoint reports a
//! missing-configuration error per request instead of failing startup.

use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub port: u16,
    pub gemini_api_key: Option<String>,
    pub youtube_api_key: Option<String>,
    pub static_dir: PathBuf,
}

impl GatewayConfig {
    pub fn from_env() -> Self {
        Self {
            port: env_port("PORT", 8000),
            gemini_api_key: env_opt_string("GEMINI_API_KEY"),
            youtube_api_key: env_opt_string("YOUTUBE_API_KEY"),
            static_dir: PathBuf::from(
                std::env::var("SCIPLAN_STATIC_DIR").unwrap_or_else(|_| "./static".to_string()),
            ),
        }
    }
}

fn env_port(name: &str, default: u16) -> u16 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}
