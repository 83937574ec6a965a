//! Client for the Naver shopping search API.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{error, warn};

use crate::config::{
    CollectorConfig, NAVER_SHOP_API_URL, SEARCH_MAX_RETRIES, SEARCH_RETRY_DELAY_MS,
    SEARCH_TIMEOUT_SECS,
};
use crate::error::Result;
use crate::types::RawSearchItem;

/// Seam between the collection pipeline and the upstream search API.
#[async_trait]
pub trait SearchProvider {
    /// Fetch raw results for one keyword. Must not fail: transport errors
    /// degrade to an empty list, indistinguishable from zero matches.
    async fn search(&self, keyword: &str) -> Vec<RawSearchItem>;
}

pub struct NaverSearchClient {
    client: reqwest::Client,
    client_id: String,
    client_secret: String,
    display: u32,
}

impl NaverSearchClient {
    pub fn new(cfg: &CollectorConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(SEARCH_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            client_id: cfg.naver_client_id.clone(),
            client_secret: cfg.naver_client_secret.clone(),
            display: cfg.search_display,
        })
    }

    async fn try_search(&self, keyword: &str) -> Result<Vec<RawSearchItem>> {
        let display = self.display.to_string();
        let body: serde_json::Value = self
            .client
            .get(NAVER_SHOP_API_URL)
            .header("X-Naver-Client-Id", &self.client_id)
            .header("X-Naver-Client-Secret", &self.client_secret)
            .query(&[("query", keyword), ("display", display.as_str()), ("sort", "sim")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        let items = body
            .get("items")
            .and_then(|i| i.as_array())
            .map(|a| a.iter().cloned().map(RawSearchItem::from_value).collect())
            .unwrap_or_default();
        Ok(items)
    }
}

#[async_trait]
impl SearchProvider for NaverSearchClient {
    async fn search(&self, keyword: &str) -> Vec<RawSearchItem> {
        for attempt in 1..=SEARCH_MAX_RETRIES {
            match self.try_search(keyword).await {
                Ok(items) => return items,
                Err(e) => {
                    warn!("[{keyword}] search API call failed (attempt {attempt}/{SEARCH_MAX_RETRIES}): {e}");
                    if attempt < SEARCH_MAX_RETRIES {
                        tokio::time::sleep(Duration::from_millis(SEARCH_RETRY_DELAY_MS)).await;
                    }
                }
            }
        }

        error!("[{keyword}] search API call failed after {SEARCH_MAX_RETRIES} attempts");
        Vec::new()
    }
}
