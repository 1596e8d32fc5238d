//! The browser capability behind the fetch pipeline.
//!
//! [`Page`] is the seam between orchestration and the engine: the real
//! implementation drives Chromium over CDP ([`chromium`]), tests drive the
//! pipeline with a scripted page instead.

pub mod chromium;

use anyhow::Result;
use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

pub use chromium::ChromiumSession;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("no Chromium binary found (set CENACOLO_CHROMIUM_PATH or install chromium)")]
    ChromiumNotFound,

    #[error("browser launch failed: {0}")]
    LaunchFailed(String),

    #[error("navigation failed: {0}")]
    NavigationFailed(String),

    #[error("navigation timed out after {0}ms")]
    NavigationTimeout(u64),
}

/// Something on the page worth clicking: either a plain CSS selector or a
/// text match over all elements of a given tag (covering the
/// `button:has-text("…")` patterns that are not expressible in CSS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    Css(&'static str),
    Text {
        scope: &'static str,
        needle: &'static str,
    },
}

/// One live page in a browsing context.
#[async_trait]
pub trait Page: Send + Sync {
    /// Navigate and block until the network is judged idle or the timeout
    /// elapses. A timeout is a failure, not a soft continue.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<()>;

    /// Snapshot of the full current page markup.
    async fn html(&self) -> Result<String>;

    /// Click the first element matching the trigger. `Ok(false)` means
    /// nothing matched; errors are for the click itself going wrong.
    async fn click_first(&self, trigger: &Trigger, timeout_ms: u64) -> Result<bool>;

    /// Capture a full-page screenshot to the given path.
    async fn screenshot(&self, path: &Path) -> Result<()>;
}

/// Build the JS snippet that performs a [`Trigger`] click in the page and
/// reports whether anything was clicked.
pub(crate) fn click_script(trigger: &Trigger) -> String {
    match trigger {
        Trigger::Css(selector) => {
            let selector = serde_json::to_string(selector).expect("selector is valid JSON string");
            format!(
                r#"(() => {{
                    const el = document.querySelector({selector});
                    if (!el) return false;
                    el.click();
                    return true;
                }})()"#
            )
        }
        Trigger::Text { scope, needle } => {
            let scope = serde_json::to_string(scope).expect("scope is valid JSON string");
            let needle = serde_json::to_string(needle).expect("needle is valid JSON string");
            format!(
                r#"(() => {{
                    for (const el of document.querySelectorAll({scope})) {{
                        if ((el.textContent || '').includes({needle})) {{
                            el.click();
                            return true;
                        }}
                    }}
                    return false;
                }})()"#
            )
        }
    }
}
