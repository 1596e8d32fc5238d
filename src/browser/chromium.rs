//! Chromium implementation of [`Page`] via chromiumoxide.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;
use tracing::{debug, info};

use super::{click_script, BrowserError, Page, Trigger};
use crate::config::FetcherConfig;

/// Locate the Chromium binary: explicit env override first, then PATH.
pub fn find_chromium() -> Option<PathBuf> {
    if let Ok(p) = std::env::var("CENACOLO_CHROMIUM_PATH") {
        let path = PathBuf::from(&p);
        if path.exists() {
            return Some(path);
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    None
}

/// One launched browser with its single page. Dropping without [`close`]
/// leaks the Chromium process until the handler task dies, so the fetcher
/// always closes explicitly.
///
/// [`close`]: ChromiumSession::close
pub struct ChromiumSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    page: ChromiumPage,
}

impl ChromiumSession {
    pub async fn launch(config: &FetcherConfig) -> Result<Self> {
        let chrome_path = find_chromium().ok_or(BrowserError::ChromiumNotFound)?;
        debug!("Using Chromium binary at {}", chrome_path.display());

        let mut builder = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .window_size(config.viewport.width, config.viewport.height)
            .arg(format!("--user-agent={}", config.user_agent))
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions");
        if config.headless {
            builder = builder.arg("--headless=new");
        } else {
            builder = builder.with_head();
        }
        let browser_config = builder
            .build()
            .map_err(BrowserError::LaunchFailed)?;

        let (browser, mut handler) = Browser::launch(browser_config)
            .await
            .map_err(|e| BrowserError::LaunchFailed(e.to_string()))?;

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        let page = browser
            .new_page("about:blank")
            .await
            .context("failed to open page")?;

        Ok(Self {
            browser,
            handler_task,
            page: ChromiumPage { page },
        })
    }

    pub fn page_mut(&mut self) -> &mut ChromiumPage {
        &mut self.page
    }

    pub async fn close(mut self) {
        let _ = self.page.page.close().await;
        let _ = self.browser.close().await;
        self.handler_task.abort();
    }
}

pub struct ChromiumPage {
    page: CdpPage,
}

impl ChromiumPage {
    /// CDP has no Playwright-style `networkidle` condition; poll the page's
    /// resource count until it stays stable for a second. A poll that never
    /// stabilizes counts as a navigation timeout.
    async fn wait_for_network_idle(&self, timeout_ms: u64) -> Result<()> {
        let script = format!(
            r#"(async () => {{
                const timeoutMs = {timeout_ms};
                const idleMs = 1000;
                const interval = 250;
                const start = Date.now();
                let lastCount = 0;
                let stableMs = 0;
                try {{ lastCount = performance.getEntriesByType('resource').length; }} catch (_) {{}}
                while (Date.now() - start < timeoutMs) {{
                    await new Promise(r => setTimeout(r, interval));
                    let curCount = lastCount;
                    try {{ curCount = performance.getEntriesByType('resource').length; }} catch (_) {{}}
                    if (document.readyState === 'complete' && curCount === lastCount) {{
                        stableMs += interval;
                        if (stableMs >= idleMs) return true;
                    }} else {{
                        stableMs = 0;
                    }}
                    lastCount = curCount;
                }}
                return false;
            }})()"#
        );

        let idle: bool = self
            .page
            .evaluate(script)
            .await
            .context("network-idle poll failed")?
            .into_value()
            .context("network-idle poll returned a non-boolean")?;

        if idle {
            Ok(())
        } else {
            Err(BrowserError::NavigationTimeout(timeout_ms).into())
        }
    }
}

#[async_trait]
impl Page for ChromiumPage {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<()> {
        let start = Instant::now();

        let goto = tokio::time::timeout(Duration::from_millis(timeout_ms), async {
            self.page.goto(url).await?;
            let _ = self.page.wait_for_navigation().await;
            Ok::<_, chromiumoxide::error::CdpError>(())
        })
        .await;

        match goto {
            Ok(Ok(())) => {}
            Ok(Err(e)) => return Err(BrowserError::NavigationFailed(e.to_string()).into()),
            Err(_) => return Err(BrowserError::NavigationTimeout(timeout_ms).into()),
        }

        let elapsed_ms = start.elapsed().as_millis() as u64;
        let remaining_ms = timeout_ms.saturating_sub(elapsed_ms);
        if remaining_ms == 0 {
            return Err(BrowserError::NavigationTimeout(timeout_ms).into());
        }
        self.wait_for_network_idle(remaining_ms).await?;

        info!("Page loaded in {}ms", start.elapsed().as_millis());
        Ok(())
    }

    async fn html(&self) -> Result<String> {
        self.page
            .evaluate("document.documentElement.outerHTML")
            .await
            .context("failed to read page markup")?
            .into_value()
            .context("page markup was not a string")
    }

    async fn click_first(&self, trigger: &Trigger, timeout_ms: u64) -> Result<bool> {
        let script = click_script(trigger);
        let clicked = tokio::time::timeout(
            Duration::from_millis(timeout_ms),
            self.page.evaluate(script),
        )
        .await
        .map_err(|_| anyhow::anyhow!("click timed out after {timeout_ms}ms"))?
        .context("click script failed")?
        .into_value()
        .context("click script returned a non-boolean")?;

        Ok(clicked)
    }

    async fn screenshot(&self, path: &Path) -> Result<()> {
        self.page
            .save_screenshot(
                ScreenshotParams::builder()
                    .format(CaptureScreenshotFormat::Png)
                    .full_page(true)
                    .build(),
                path,
            )
            .await
            .context("failed to capture screenshot")?;
        Ok(())
    }
}
