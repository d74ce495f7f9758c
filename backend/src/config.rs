use std::env;
use std::path::PathBuf;

use anyhow::Context;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 5001;
/// Largest request body accepted before answering 413.
pub const MAX_CONTENT_LENGTH: u64 = 16 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// `development` turns on debug logging.
    pub environment: String,
    pub site_root: PathBuf,
    pub max_content_length: u64,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got {:?}", raw))?,
            None => DEFAULT_PORT,
        };
        Ok(Self {
            host: lookup("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port,
            environment: lookup("ENVIRONMENT").unwrap_or_else(|| "production".to_string()),
            site_root: lookup("SITE_ROOT")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            max_content_length: MAX_CONTENT_LENGTH,
        })
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    #[cfg(test)]
    pub fn for_site(site_root: impl Into<PathBuf>) -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            environment: "test".to_string(),
            site_root: site_root.into(),
            max_content_length: MAX_CONTENT_LENGTH,
        }
    }
}
