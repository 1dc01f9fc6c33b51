use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::{BrowserEngine, PageSession};
use crate::scrapers::types::CrawlConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use headless_chrome::{Browser, LaunchOptions, Tab};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Headless Chrome engine. One browser process, one tab per page session.
pub struct ChromeEngine {
    browser: Browser,
    user_agent: String,
    navigation_timeout: Duration,
}

impl ChromeEngine {
    /// Launch Chrome (headless unless `show_browser` is set)
    pub fn launch(config: &CrawlConfig, show_browser: bool) -> Result<Self> {
        info!("Launching {} Chrome...", if show_browser { "visible" } else { "headless" });

        let options = LaunchOptions::default_builder()
            .headless(!show_browser)
            .idle_browser_timeout(Duration::from_secs(300))
            .build()
            .context("Failed to build launch options")?;

        let browser = Browser::new(options).context("Failed to launch Chrome browser")?;

        Ok(Self {
            browser,
            user_agent: config.user_agent.clone(),
            navigation_timeout: config.navigation_timeout,
        })
    }
}

#[async_trait]
impl BrowserEngine for ChromeEngine {
    async fn open_page(&self) -> ScrapeResult<Box<dyn PageSession>> {
        let browser = self.browser.clone();
        let user_agent = self.user_agent.clone();
        let timeout = self.navigation_timeout;

        let tab = tokio::task::spawn_blocking(move || -> Result<Arc<Tab>> {
            let tab = browser.new_tab()?;
            tab.set_default_timeout(timeout);
            close_on_error(tab.set_user_agent(&user_agent, None, None), || {
                if let Err(e) = tab.close(true) {
                    warn!("Failed to close half-opened tab: {}", e);
                }
            })?;
            Ok(tab)
        })
        .await?
        .map_err(|e| ScrapeError::Browser(format!("failed to open tab: {e}")))?;

        Ok(Box::new(ChromeSession {
            tab,
            timeout,
            current_url: String::new(),
        }))
    }

    fn engine_name(&self) -> &'static str {
        "chrome"
    }
}

/// Run `close` when setting up a freshly opened tab failed
fn close_on_error<T>(result: Result<T>, close: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        close();
    }
    result
}

/// A Chrome tab. Every call blocks, so each one runs on the blocking pool.
pub struct ChromeSession {
    tab: Arc<Tab>,
    timeout: Duration,
    current_url: String,
}

impl ChromeSession {
    async fn evaluate(&self, script: String) -> ScrapeResult<Option<serde_json::Value>> {
        let tab = self.tab.clone();
        let result = tokio::task::spawn_blocking(move || tab.evaluate(&script, false))
            .await?
            .map_err(|e| ScrapeError::Browser(e.to_string()))?;
        Ok(result.value)
    }
}

#[async_trait]
impl PageSession for ChromeSession {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        debug!("Navigating to {}", url);
        let tab = self.tab.clone();
        let target = url.to_string();

        tokio::task::spawn_blocking(move || -> Result<()> {
            tab.navigate_to(&target)?;
            tab.wait_until_navigated()?;
            Ok(())
        })
        .await?
        .map_err(|e| ScrapeError::navigation(url, e))?;

        self.current_url = url.to_string();
        Ok(())
    }

    async fn wait_for_network_idle(&mut self) -> ScrapeResult<()> {
        // No network-idle event in the protocol wrapper; poll the ready state.
        let tab = self.tab.clone();
        let timeout = self.timeout;
        let url = self.current_url.clone();

        tokio::task::spawn_blocking(move || -> Result<()> {
            let started = Instant::now();
            loop {
                let state = tab.evaluate("document.readyState", false)?;
                if state.value.as_ref().and_then(|v| v.as_str()) == Some("complete") {
                    return Ok(());
                }
                if started.elapsed() > timeout {
                    anyhow::bail!("page did not finish loading within {:?}", timeout);
                }
                thread::sleep(Duration::from_millis(100));
            }
        })
        .await?
        .map_err(|e| ScrapeError::navigation(&url, e))
    }

    async fn scroll_to(&mut self, fraction: f64) -> ScrapeResult<()> {
        self.evaluate(format!(
            "window.scrollTo(0, document.body.scrollHeight * {})",
            fraction.clamp(0.0, 1.0)
        ))
        .await?;
        Ok(())
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        let value = self
            .evaluate("document.documentElement.outerHTML".to_string())
            .await?;
        match value.as_ref().and_then(|v| v.as_str()) {
            Some(html) => Ok(html.to_string()),
            None => Err(ScrapeError::Browser(format!(
                "could not read HTML from {}",
                self.current_url
            ))),
        }
    }

    async fn close(&mut self) -> ScrapeResult<()> {
        let tab = self.tab.clone();
        tokio::task::spawn_blocking(move || tab.close(true))
            .await?
            .map_err(|e| ScrapeError::Browser(format!("failed to close tab: {e}")))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_failed_tab_setup_closes_the_tab() {
        let closed = Cell::new(false);
        let result: Result<()> = close_on_error(Err(anyhow::anyhow!("no user agent")), || {
            closed.set(true)
        });
        assert!(result.is_err());
        assert!(closed.get());
    }

    #[test]
    fn test_successful_tab_setup_keeps_the_tab() {
        let closed = Cell::new(false);
        let result = close_on_error(Ok(()), || closed.set(true));
        assert!(result.is_ok());
        assert!(!closed.get());
    }
}
