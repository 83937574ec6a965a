//! Slack webhook notifier. Fire and forget — a failed notification is
//! logged and never aborts the collection run.

use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::NOTIFY_TIMEOUT_SECS;
use crate::error::Result;
use crate::types::AlertNotification;

#[async_trait]
pub trait Notifier {
    /// Send one outbound alert. Returns true only on a 2xx response.
    async fn notify(&self, alert: &AlertNotification) -> bool;
}

pub struct SlackNotifier {
    client: reqwest::Client,
    webhook_url: String,
}

impl SlackNotifier {
    pub fn new(webhook_url: String) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(NOTIFY_TIMEOUT_SECS))
            .build()?;
        Ok(Self { client, webhook_url })
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn notify(&self, alert: &AlertNotification) -> bool {
        let text = format!(
            ":bell: Target price reached!\n\n\
             Product: {}\n\
             Lowest price: ₩{} ({})\n\
             Target price: ₩{}\n\
             Savings: {:.1}%\n\n\
             :point_right: Link: {}",
            alert.keyword,
            format_won(alert.price),
            alert.shop_name,
            format_won(alert.target_price),
            saving_rate(alert.price, alert.target_price),
            alert.product_url,
        );
        let body = serde_json::json!({ "text": text });

        match self.client.post(&self.webhook_url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                info!("[{}] Slack alert sent", alert.keyword);
                true
            }
            Ok(resp) => {
                warn!("[{}] Slack alert rejected: status={}", alert.keyword, resp.status());
                false
            }
            Err(e) => {
                warn!("[{}] Slack alert failed: {e}", alert.keyword);
                false
            }
        }
    }
}

/// Percentage saved versus the target price. 0 when the target is zero or
/// negative, to avoid dividing by zero.
pub fn saving_rate(price: i64, target_price: i64) -> f64 {
    if target_price <= 0 {
        return 0.0;
    }
    (target_price - price) as f64 / target_price as f64 * 100.0
}

/// Comma-grouped won amount: 1234567 → "1,234,567".
fn format_won(amount: i64) -> String {
    let digits = amount.abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if amount < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
