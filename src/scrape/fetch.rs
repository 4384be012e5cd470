use std::time::Duration;

use reqwest::blocking::Client;

use crate::config::HttpConfig;
use crate::error::ScrapeError;

/// Blocking page fetcher shared by every extraction stage.
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    pub fn new(config: &HttpConfig) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(&config.user_agent)
            .build()
            .expect("Failed to create HTTP client");

        PageFetcher { client }
    }

    /// GET a page and return its body.
    ///
    /// A non-success status is an error: there is no point feeding an
    /// error page to the extractors.
    pub fn fetch(&self, url: &str) -> Result<String, ScrapeError> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScrapeError::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(response.text()?)
    }
}
