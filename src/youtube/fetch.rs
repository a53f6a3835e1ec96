use anyhow::{Context, Result};
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::{PAGE_TIMEOUT, USER_AGENT};
use crate::util::throttle::Throttle;

/// Page client: one GET at a time, each followed by a throttle pause.
pub struct Fetcher {
    client: Client,
    throttle: Throttle,
}

impl Fetcher {
    pub fn new(throttle: Throttle) -> Result<Self> {
        let client = Client::builder()
            .timeout(PAGE_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .context("build http client")?;
        Ok(Fetcher { client, throttle })
    }

    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let resp = self.client.get(url)
            .header("Accept-Language", "ru-RU,ru;q=0.9,en;q=0.8")
            .send().await?
            .error_for_status()?;
        Ok(resp.text().await?)
    }

    /// GET a page; failures are logged and come back as None. Always pauses afterwards.
    pub async fn fetch_html(&self, url: &str) -> Option<String> {
        debug!(url, "GET");
        let out = match self.fetch_page(url).await {
            Ok(html) => Some(html),
            Err(e) => { warn!(url, error = %e, "request failed"); None }
        };
        self.throttle.pause().await;
        out
    }
}
