//! Client config loader (strict parsing).

pub mod schema;

use std::fs;

use chansub_core::error::{ChanSubError, Result};

pub use schema::{ClientConfig, ServerSection, SubscriberSection};

/// Environment variable that overrides `server.url`.
pub const URL_ENV: &str = "CHANSUB_WS_URL";

pub fn load_from_file(path: &str) -> Result<ClientConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ChanSubError::BadConfig(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<ClientConfig> {
    let cfg: ClientConfig = serde_yaml::from_str(s)
        .map_err(|e| ChanSubError::BadConfig(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Apply an optional `server.url` override (normally `std::env::var(URL_ENV).ok()`)
/// and re-validate.
pub fn apply_env(mut cfg: ClientConfig, url: Option<String>) -> Result<ClientConfig> {
    if let Some(url) = url.filter(|u| !u.is_empty()) {
        cfg.server.url = url;
    }
    cfg.validate()?;
    Ok(cfg)
}
