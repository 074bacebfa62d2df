/// Configuration default values
///
/// This module contains all the default values for configuration options,
/// making them easily changeable in one central location.
use std::time::Duration;

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_STATIC_DIR: &str = "./public";

// Source defaults
pub const DEFAULT_CONTENTS_URL: &str = "https://api.github.com/repos/hotpad100c/Qoute/contents";
pub const DEFAULT_USER_AGENT: &str = concat!("image-catalog/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(30);

// Cache defaults
pub const DEFAULT_MIRROR_PATH: &str = "./data/catalog-mirror.json";
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(10 * 60);
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_RETRY_BACKOFF: Duration = Duration::from_secs(5);

// Search defaults
pub const DEFAULT_SEARCH_LIMIT: usize = 3;
pub const DEFAULT_RANDOM_COUNT: usize = 6;
