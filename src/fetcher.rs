use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::browser::{ChromiumSession, Page};
use crate::config::FetcherConfig;
use crate::models::{DateCandidate, FetchResult};
use crate::parsers::looks_like_date;
use crate::scrapers::{extract_candidates, CalendarSite};

/// Debug artifacts land in the working directory under fixed names.
const SCREENSHOT_PATH: &str = "page_screenshot.png";
const MARKUP_DUMP_PATH: &str = "page_content.html";

/// Settle time for client-side rendering before each extraction pass.
const EXTRACTION_SETTLE_MS: u64 = 3_000;
const CONSENT_SETTLE_MS: u64 = 1_000;
const CONSENT_CLICK_TIMEOUT_MS: u64 = 2_000;
const BOOKING_CLICK_TIMEOUT_MS: u64 = 5_000;

/// Orchestrates one fetch run: launch, navigate, dismiss consent, probe,
/// tear down.
pub struct DateFetcher<S> {
    config: FetcherConfig,
    site: S,
}

impl<S: CalendarSite> DateFetcher<S> {
    pub fn new(config: FetcherConfig, site: S) -> Self {
        Self { config, site }
    }

    /// Run the whole pipeline against a freshly launched Chromium. The
    /// browser is released on every exit path, success or failure.
    pub async fn fetch(&self) -> Result<FetchResult> {
        info!("Starting date fetch process...");

        let mut session = ChromiumSession::launch(&self.config).await?;
        let result = self.fetch_with(session.page_mut()).await;
        session.close().await;

        if let Ok(fetched) = &result {
            info!("Successfully fetched {} date(s)", fetched.total_dates_found);
        }
        result
    }

    /// The engine-agnostic pipeline; tests drive this with a scripted
    /// [`Page`].
    pub async fn fetch_with<P: Page>(&self, page: &mut P) -> Result<FetchResult> {
        let url = Url::parse(self.site.event_url()).context("Invalid event URL")?;

        self.navigate_with_retry(page, url.as_str()).await?;
        self.dismiss_consent(page).await;
        sleep(Duration::from_millis(self.config.post_load_wait_ms)).await;

        if self.config.debug_screenshot {
            info!("Taking screenshot for debugging...");
            if let Err(e) = page.screenshot(Path::new(SCREENSHOT_PATH)).await {
                warn!("Could not capture debug screenshot: {}", e);
            }
        }

        let candidates = match self.run_extraction(page).await {
            Ok(candidates) => candidates,
            Err(e) => {
                self.dump_markup(page).await;
                return Err(e);
            }
        };

        Ok(FetchResult::new(
            self.site.event_name(),
            self.site.event_url(),
            candidates,
        ))
    }

    /// Bounded attempt loop around navigation; the remaining pipeline is
    /// single-shot.
    async fn navigate_with_retry<P: Page>(&self, page: &mut P, url: &str) -> Result<()> {
        let attempts = self.config.max_retries.max(1);
        let mut last_error = None;

        for attempt in 1..=attempts {
            info!("Navigating to {}", url);
            match page.navigate(url, self.config.navigation_timeout_ms).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    warn!("Navigation attempt {}/{} failed: {}", attempt, attempts, e);
                    last_error = Some(e);
                    if attempt < attempts {
                        sleep(Duration::from_millis(self.config.retry_delay_ms)).await;
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| anyhow::anyhow!("Max retries exceeded")))
            .with_context(|| format!("Failed to reach {url} after {attempts} attempts"))
    }

    /// Best-effort: the first consent trigger that lands wins; every
    /// failure here is swallowed and never aborts the fetch.
    async fn dismiss_consent<P: Page>(&self, page: &P) {
        for trigger in self.site.consent_triggers() {
            match page.click_first(trigger, CONSENT_CLICK_TIMEOUT_MS).await {
                Ok(true) => {
                    info!("Accepting cookie consent...");
                    sleep(Duration::from_millis(CONSENT_SETTLE_MS)).await;
                    return;
                }
                Ok(false) => {}
                Err(e) => debug!("Consent trigger {:?} failed: {}", trigger, e),
            }
        }
        debug!("No cookie consent found");
    }

    /// Up to two extraction passes: when the first finds nothing and a
    /// booking trigger can be clicked, one more pass runs against the new
    /// page state.
    async fn run_extraction<P: Page>(&self, page: &mut P) -> Result<Vec<DateCandidate>> {
        let mut extra_pass_done = false;

        loop {
            sleep(Duration::from_millis(EXTRACTION_SETTLE_MS)).await;
            info!("Searching for date elements on the page...");

            let html = page.html().await?;
            let candidates = extract_candidates(&html, &self.site);

            if !candidates.is_empty() {
                let dated = candidates
                    .iter()
                    .filter(|c| c.date_attribute.as_deref().is_some_and(looks_like_date))
                    .count();
                info!(
                    "Extracted {} potential date elements ({} with a date-like attribute)",
                    candidates.len(),
                    dated
                );
                return Ok(candidates);
            }

            if extra_pass_done {
                return Ok(candidates);
            }
            warn!("No date elements found. Page might use a different structure or require interaction.");

            if !self.click_booking_trigger(page).await {
                return Ok(candidates);
            }
            sleep(Duration::from_millis(self.config.post_load_wait_ms)).await;
            extra_pass_done = true;
        }
    }

    async fn click_booking_trigger<P: Page>(&self, page: &P) -> bool {
        for trigger in self.site.booking_triggers() {
            match page.click_first(trigger, BOOKING_CLICK_TIMEOUT_MS).await {
                Ok(true) => {
                    info!("Found and clicked booking trigger {:?}", trigger);
                    return true;
                }
                Ok(false) => {}
                Err(e) => debug!("Booking trigger {:?} failed: {}", trigger, e),
            }
        }
        false
    }

    /// Postmortem artifact for extraction failures.
    async fn dump_markup<P: Page>(&self, page: &P) {
        if !self.config.debug_save_html {
            return;
        }
        match page.html().await {
            Ok(html) => match std::fs::write(MARKUP_DUMP_PATH, html) {
                Ok(()) => info!("Saved page content to {} for debugging", MARKUP_DUMP_PATH),
                Err(e) => warn!("Could not write {}: {}", MARKUP_DUMP_PATH, e),
            },
            Err(e) => warn!("Could not capture page markup for dump: {}", e),
        }
    }
}
