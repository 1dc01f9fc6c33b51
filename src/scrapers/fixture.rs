//! In-memory engine serving canned HTML, for crawler tests.

use crate::scrapers::error::{ScrapeError, ScrapeResult};
use crate::scrapers::traits::{BrowserEngine, PageSession};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Default, Clone)]
pub struct FixtureEngine {
    pages: Arc<HashMap<String, String>>,
    log: Arc<Mutex<FixtureLog>>,
}

#[derive(Default, Debug)]
pub struct FixtureLog {
    pub visited: Vec<String>,
    pub scrolls: Vec<f64>,
    pub opened: usize,
    pub closed: usize,
}

impl FixtureEngine {
    pub fn new(pages: impl IntoIterator<Item = (String, String)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            log: Arc::default(),
        }
    }

    pub fn visited(&self) -> Vec<String> {
        self.log.lock().unwrap().visited.clone()
    }

    pub fn scrolls(&self) -> Vec<f64> {
        self.log.lock().unwrap().scrolls.clone()
    }

    /// (opened, closed) session counts
    pub fn sessions(&self) -> (usize, usize) {
        let log = self.log.lock().unwrap();
        (log.opened, log.closed)
    }
}

#[async_trait]
impl BrowserEngine for FixtureEngine {
    async fn open_page(&self) -> ScrapeResult<Box<dyn PageSession>> {
        self.log.lock().unwrap().opened += 1;
        Ok(Box::new(FixtureSession {
            engine: self.clone(),
            current: None,
        }))
    }

    fn engine_name(&self) -> &'static str {
        "fixture"
    }
}

struct FixtureSession {
    engine: FixtureEngine,
    current: Option<String>,
}

#[async_trait]
impl PageSession for FixtureSession {
    async fn navigate(&mut self, url: &str) -> ScrapeResult<()> {
        self.engine.log.lock().unwrap().visited.push(url.to_string());
        match self.engine.pages.get(url) {
            Some(html) => {
                self.current = Some(html.clone());
                Ok(())
            }
            None => {
                self.current = None;
                Err(ScrapeError::navigation(url, "404 not found"))
            }
        }
    }

    async fn wait_for_network_idle(&mut self) -> ScrapeResult<()> {
        Ok(())
    }

    async fn scroll_to(&mut self, fraction: f64) -> ScrapeResult<()> {
        self.engine.log.lock().unwrap().scrolls.push(fraction);
        Ok(())
    }

    async fn content(&mut self) -> ScrapeResult<String> {
        self.current
            .clone()
            .ok_or_else(|| ScrapeError::Browser("no page loaded".to_string()))
    }

    async fn close(&mut self) -> ScrapeResult<()> {
        self.engine.log.lock().unwrap().closed += 1;
        Ok(())
    }
}
