use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Browser window/viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

/// All knobs for one fetch run.
///
/// Defaults mirror the values the fetcher has always shipped with; a
/// `cenacolo.toml` next to the binary or `CENACOLO_*` environment variables
/// override individual fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FetcherConfig {
    pub headless: bool,
    pub navigation_timeout_ms: u64,
    pub post_load_wait_ms: u64,
    pub viewport: Viewport,
    pub user_agent: String,
    pub max_retries: u32,
    pub retry_delay_ms: u64,
    pub debug_screenshot: bool,
    pub debug_save_html: bool,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout_ms: 30_000,
            post_load_wait_ms: 2_000,
            viewport: Viewport::default(),
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            max_retries: 3,
            retry_delay_ms: 2_000,
            debug_screenshot: true,
            debug_save_html: true,
        }
    }
}

impl FetcherConfig {
    pub fn load() -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name("cenacolo").required(false))
            .add_source(config::Environment::with_prefix("CENACOLO").separator("__"))
            .build()
            .context("Failed to read configuration sources")?;

        settings
            .try_deserialize()
            .context("Failed to deserialize configuration")
    }
}
