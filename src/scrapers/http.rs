use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::{BrowserEngine, PageSession};
use crate::scrapers::types::CrawlConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

/// Plain HTTP engine. No JavaScript, so it only sees server-rendered
/// markup; scrolling and network idle are no-ops.
pub struct HttpEngine {
    client: Client,
}

impl HttpEngine {
    pub fn new(config: &CrawlConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.navigation_timeout)
            .user_agent(config.user_agent.as_str())
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl BrowserEngine for HttpEngine {
    async fn open_page(&self) -> ScrapeResult<Box<dyn PageSession>> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            body: None,
        }))
    }

    fn engine_name(&self) -> &'static str {
        "http"
    }
}

pub struct HttpSession {
    client: Client,
    body: Option<String>,
}

#[async_trait]
impl PageSession for HttpSession {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        debug!("Fetching URL: {}", url);
        self.body = None;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ScrapeError::navigation(url, e))?;

        if !response.status().is_success() {
            warn!("{} returned status: {}", url, response.status());
            return Err(ScrapeError::navigation(
                url,
                format!("status {}", response.status()),
            ));
        }

        let html = response.text().await?;
        debug!("Downloaded {} bytes of HTML", html.len());
        self.body = Some(html);
        Ok(())
    }

    async fn wait_for_network_idle(&mut self) -> ScrapeResult<()> {
        Ok(())
    }

    async fn scroll_to(&mut self, _fraction: f64) -> ScrapeResult<()> {
        Ok(())
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        self.body
            .clone()
            .ok_or_else(|| ScrapeError::Browser("no page loaded".to_string()))
    }

    async fn close(&mut self) -> ScrapeResult<()> {
        self.body = None;
        Ok(())
    }
}
