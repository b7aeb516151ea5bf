//! Client configuration: which service to query and how to transform its
//! responses.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, TransformError};
use crate::http::DEFAULT_BASE_URL;
use crate::transform::{BufferedTransform, FutureTransform, ResponseTransform, StreamingTransform};

/// Overrides the service base URL.
pub const BASE_URL_ENV: &str = "ZIPPO_BASE_URL";
/// Selects the transform strategy (`buffered`, `future`, `streaming`).
pub const TRANSFORM_ENV: &str = "ZIPPO_TRANSFORM";

/// The three response transform strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    #[default]
    Buffered,
    Future,
    Streaming,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Buffered, Strategy::Future, Strategy::Streaming];

    pub fn build(self) -> Result<Box<dyn ResponseTransform>, TransformError> {
        Ok(match self {
            Strategy::Buffered => Box::new(BufferedTransform),
            Strategy::Future => Box::new(FutureTransform::new()?),
            Strategy::Streaming => Box::new(StreamingTransform),
        })
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Strategy::Buffered => "buffered",
            Strategy::Future => "future",
            Strategy::Streaming => "streaming",
        })
    }
}

impl FromStr for Strategy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Strategy::ALL
            .into_iter()
            .find(|strategy| strategy.to_string().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ConfigError::UnknownStrategy(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ZippoConfig {
    pub base_url: String,
    pub strategy: Strategy,
}

impl Default for ZippoConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            strategy: Strategy::default(),
        }
    }
}

impl ZippoConfig {
    /// Defaults, overridden by `ZIPPO_BASE_URL` and `ZIPPO_TRANSFORM`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();
        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|v| !v.trim().is_empty()) {
            config.base_url = base_url;
        }
        if let Some(strategy) = lookup(TRANSFORM_ENV) {
            config.strategy = strategy.parse()?;
        }
        Ok(config)
    }
}
