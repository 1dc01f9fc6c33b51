pub mod browser;
pub mod error;
#[cfg(test)]
pub mod fixture;
pub mod http;
pub mod traits;
pub mod types;

pub use browser::ChromeEngine;
pub use error::{ScrapeError, ScrapeResult};
pub use http::HttpEngine;
pub use traits::{BrowserEngine, PageSession};
pub use types::{CrawlConfig, CrawlMode, SearchTarget};
