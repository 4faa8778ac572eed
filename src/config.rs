use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::core::DEFAULT_PRECISION;

pub type SharedConfig = Arc<RwLock<Config>>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Fractional digits for every derived value. 6 is canonical; earlier
    /// deployments used 2 and are superseded.
    pub precision: u32,

    // Pagination
    pub default_page_size: u32,
    pub max_page_size: u32,

    // Logging
    pub log_level: String,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let env = |key: &str, default: &str| -> String {
            std::env::var(key).unwrap_or_else(|_| default.to_string())
        };

        Config {
            precision: env("FD_PRECISION", "6")
                .parse()
                .unwrap_or(DEFAULT_PRECISION),
            default_page_size: env("FD_PAGE_SIZE", "10").parse().unwrap_or(10),
            max_page_size: env("FD_MAX_PAGE_SIZE", "100").parse().unwrap_or(100),
            log_level: env("FD_LOG_LEVEL", "INFO"),
        }
    }

    pub fn shared(self) -> SharedConfig {
        Arc::new(RwLock::new(self))
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            precision: DEFAULT_PRECISION,
            default_page_size: 10,
            max_page_size: 100,
            log_level: "INFO".to_string(),
        }
    }
}
