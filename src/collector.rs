//! Collection pipeline: one sequential pass over all active tracked
//! products. Results are accumulated in memory and flushed to the database
//! in one batch step at the end of the pass, so a mid-run failure on a
//! single keyword never costs the whole run.

use std::time::{Duration, Instant};

use tracing::{debug, error, info, warn};

use crate::config::CollectorConfig;
use crate::db::models::ProductRow;
use crate::db::Store;
use crate::error::Result;
use crate::filter::filter_items;
use crate::notifier::Notifier;
use crate::search::SearchProvider;
use crate::types::{AlertNotification, NewAlert, NewPriceLog};

/// Totals for one completed collection run.
#[derive(Debug)]
pub struct RunReport {
    pub products: usize,
    pub prices_saved: u64,
    pub alerts_saved: u64,
    pub elapsed: Duration,
}

pub struct Collector<S, N> {
    cfg: CollectorConfig,
    store: Store,
    search: S,
    notifier: Option<N>,
}

impl<S: SearchProvider, N: Notifier> Collector<S, N> {
    pub fn new(cfg: CollectorConfig, store: Store, search: S, notifier: Option<N>) -> Self {
        Self {
            cfg,
            store,
            search,
            notifier,
        }
    }

    /// Execute one collection run. Fails only if the active-product list
    /// cannot be loaded; everything past that point degrades per keyword
    /// and the run completes.
    pub async fn run(&self) -> Result<RunReport> {
        let started = Instant::now();

        let products = self.store.active_products().await?;
        info!("collecting {} active keyword(s)", products.len());

        let mut price_buffer: Vec<NewPriceLog> = Vec::new();
        let mut alert_buffer: Vec<NewAlert> = Vec::new();

        for product in &products {
            self.collect_one(product, &mut price_buffer, &mut alert_buffer)
                .await;
            // Rate-limit courtesy to the upstream API, one keyword at a time.
            tokio::time::sleep(Duration::from_millis(self.cfg.request_delay_ms)).await;
        }

        let mut prices_saved = 0u64;
        if !price_buffer.is_empty() {
            match self.store.insert_price_logs(&price_buffer).await {
                Ok(n) => {
                    prices_saved = n;
                    info!("price log batch saved: {n} row(s)");
                }
                Err(e) => error!("price log batch save failed: {e}"),
            }
        }

        let mut alerts_saved = 0u64;
        if !alert_buffer.is_empty() {
            match self.store.insert_alerts(&alert_buffer).await {
                Ok(n) => {
                    alerts_saved = n;
                    info!("alert batch saved: {n} row(s)");
                }
                Err(e) => error!("alert batch save failed: {e}"),
            }
        }

        let report = RunReport {
            products: products.len(),
            prices_saved,
            alerts_saved,
            elapsed: started.elapsed(),
        };
        info!(
            "collection complete: {} keyword(s), {} price(s) + {} alert(s) saved, {:.1}s elapsed",
            report.products,
            report.prices_saved,
            report.alerts_saved,
            report.elapsed.as_secs_f64(),
        );
        Ok(report)
    }

    /// Search, filter and buffer one product. Never fails — degraded
    /// outcomes are logged and the pass moves on.
    async fn collect_one(
        &self,
        product: &ProductRow,
        price_buffer: &mut Vec<NewPriceLog>,
        alert_buffer: &mut Vec<NewAlert>,
    ) {
        let keyword = &product.keyword;
        info!("[{keyword}] collecting...");

        let items = self.search.search(keyword).await;
        if items.is_empty() {
            warn!("[{keyword}] no search results");
            return;
        }

        let matches = filter_items(keyword, &items, Some(&self.cfg.exclude_keywords));
        info!(
            "[{keyword}] {} result(s) → {} passed filter",
            items.len(),
            matches.len()
        );
        if matches.is_empty() {
            return;
        }

        for m in &matches {
            price_buffer.push(NewPriceLog {
                product_id: product.id,
                shop_name: m.shop_name.clone(),
                price: m.price,
                product_url: (!m.product_url.is_empty()).then(|| m.product_url.clone()),
                raw_data: Some(m.raw.to_string()),
            });
        }

        let Some(cheapest) = matches.iter().min_by_key(|m| m.price) else {
            return;
        };
        let Some(target_price) = product.target_price else {
            return;
        };
        if cheapest.price > target_price {
            return;
        }

        match self
            .store
            .has_recent_alert(product.id, self.cfg.alert_dedup_hours)
            .await
        {
            Ok(true) => {
                debug!("[{keyword}] alert suppressed, one already sent within {}h", self.cfg.alert_dedup_hours);
            }
            Ok(false) => {
                info!(
                    "[{keyword}] target price reached: {} <= {}",
                    cheapest.price, target_price
                );
                if let Some(notifier) = &self.notifier {
                    // Best-effort: a failed webhook still records the alert.
                    notifier
                        .notify(&AlertNotification {
                            keyword: keyword.clone(),
                            price: cheapest.price,
                            target_price,
                            shop_name: cheapest.shop_name.clone(),
                            product_url: cheapest.product_url.clone(),
                        })
                        .await;
                }
                alert_buffer.push(NewAlert {
                    product_id: product.id,
                    triggered_price: cheapest.price,
                    target_price,
                    shop_name: cheapest.shop_name.clone(),
                });
            }
            Err(e) => warn!("[{keyword}] recent-alert lookup failed, skipping alert: {e}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use async_trait::async_trait;
    use serde_json::json;
    use sqlx::sqlite::SqlitePoolOptions;

    use super::*;
    use crate::notifier::Notifier;
    use crate::types::RawSearchItem;

    struct StubSearch {
        by_keyword: HashMap<String, Vec<RawSearchItem>>,
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, keyword: &str) -> Vec<RawSearchItem> {
            self.by_keyword.get(keyword).cloned().unwrap_or_default()
        }
    }

    struct CountingNotifier {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _alert: &AlertNotification) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            true
        }
    }

    fn cfg() -> CollectorConfig {
        CollectorConfig {
            naver_client_id: "id".to_string(),
            naver_client_secret: "secret".to_string(),
            search_display: 30,
            request_delay_ms: 0,
            exclude_keywords: Vec::new(),
            slack_enabled: true,
            slack_webhook_url: "https://hooks.example/x".to_string(),
            alert_dedup_hours: 24,
        }
    }

    async fn test_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::db::MIGRATOR.run(&pool).await.expect("migrations");
        Store::new(pool)
    }

    fn item(title: &str, lprice: &str, shop: &str) -> RawSearchItem {
        RawSearchItem::from_value(json!({
            "title": title,
            "lprice": lprice,
            "mallName": shop,
            "link": "https://shop.example/1",
        }))
    }

    fn collector(
        store: Store,
        items: Vec<(&str, Vec<RawSearchItem>)>,
        calls: Arc<AtomicUsize>,
    ) -> Collector<StubSearch, CountingNotifier> {
        let by_keyword = items
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect();
        Collector::new(
            cfg(),
            store,
            StubSearch { by_keyword },
            Some(CountingNotifier { calls }),
        )
    }

    #[tokio::test]
    async fn empty_product_list_is_a_clean_noop() {
        let store = test_store().await;
        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(store, vec![], Arc::clone(&calls));

        let report = collector.run().await.unwrap();
        assert_eq!(report.products, 0);
        assert_eq!(report.prices_saved, 0);
        assert_eq!(report.alerts_saved, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn target_breach_produces_one_alert_and_one_notification() {
        let store = test_store().await;
        let product = store
            .create_product("콜라 30개", Some(10000), None)
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(
            store.clone(),
            vec![(
                "콜라 30개",
                vec![
                    item("콜라 30캔 행사", "9500", "A마트"),
                    item("콜라 30개 대용량", "11000", "B마트"),
                ],
            )],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        assert_eq!(report.products, 1);
        assert_eq!(report.prices_saved, 2);
        assert_eq!(report.alerts_saved, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(store.has_recent_alert(product.id, 24).await.unwrap());

        // Alert carries the minimum price, not just any match.
        let (triggered, shop): (i64, String) = sqlx::query_as(
            "SELECT triggered_price, shop_name FROM alerts WHERE product_id = ?",
        )
        .bind(product.id)
        .fetch_one(store.pool())
        .await
        .unwrap();
        assert_eq!(triggered, 9500);
        assert_eq!(shop, "A마트");
    }

    #[tokio::test]
    async fn alert_within_dedup_window_is_suppressed() {
        let store = test_store().await;
        let product = store
            .create_product("콜라 30개", Some(10000), None)
            .await
            .unwrap();
        store
            .insert_alerts(&[NewAlert {
                product_id: product.id,
                triggered_price: 9400,
                target_price: 10000,
                shop_name: "A마트".to_string(),
            }])
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(
            store.clone(),
            vec![("콜라 30개", vec![item("콜라 30캔 행사", "9500", "A마트")])],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        // Prices still logged; the alert is the only thing deduplicated.
        assert_eq!(report.prices_saved, 1);
        assert_eq!(report.alerts_saved, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn price_above_target_does_not_alert() {
        let store = test_store().await;
        store
            .create_product("콜라 30개", Some(9000), None)
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(
            store.clone(),
            vec![("콜라 30개", vec![item("콜라 30캔 행사", "9500", "A마트")])],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        assert_eq!(report.prices_saved, 1);
        assert_eq!(report.alerts_saved, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn filtered_out_results_are_not_buffered() {
        let store = test_store().await;
        store
            .create_product("콜라 30개", Some(10000), None)
            .await
            .unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        // Wrong quantity and a bundle listing: nothing survives the filter.
        let collector = collector(
            store.clone(),
            vec![(
                "콜라 30개",
                vec![
                    item("콜라 20캔", "9500", "A마트"),
                    item("콜라 30캔 3묶음", "9000", "B마트"),
                ],
            )],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        assert_eq!(report.prices_saved, 0);
        assert_eq!(report.alerts_saved, 0);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_search_results_degrade_per_keyword() {
        let store = test_store().await;
        store.create_product("없는상품", Some(10000), None).await.unwrap();
        store.create_product("콜라", None, None).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        // First keyword gets nothing back; second still collects.
        let collector = collector(
            store.clone(),
            vec![("콜라", vec![item("콜라 190ml", "1200", "A마트")])],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        assert_eq!(report.products, 2);
        assert_eq!(report.prices_saved, 1);
    }

    #[tokio::test]
    async fn inactive_products_are_skipped() {
        let store = test_store().await;
        let product = store
            .create_product("콜라", Some(10000), None)
            .await
            .unwrap();
        let patch = crate::types::ProductPatch {
            is_active: Some(false),
            ..Default::default()
        };
        store.update_product(product.id, &patch).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(
            store.clone(),
            vec![("콜라", vec![item("콜라 190ml", "1200", "A마트")])],
            Arc::clone(&calls),
        );

        let report = collector.run().await.unwrap();
        assert_eq!(report.products, 0);
        assert_eq!(report.prices_saved, 0);
    }

    #[tokio::test]
    async fn price_rows_carry_raw_snapshot() {
        let store = test_store().await;
        let product = store.create_product("콜라", None, None).await.unwrap();

        let calls = Arc::new(AtomicUsize::new(0));
        let collector = collector(
            store.clone(),
            vec![("콜라", vec![item("<b>콜라</b> 190ml", "1200", "A마트")])],
            Arc::clone(&calls),
        );
        collector.run().await.unwrap();

        let raw: Option<String> =
            sqlx::query_scalar("SELECT raw_data FROM price_logs WHERE product_id = ?")
                .bind(product.id)
                .fetch_one(store.pool())
                .await
                .unwrap();
        let raw: serde_json::Value = serde_json::from_str(&raw.unwrap()).unwrap();
        // Snapshot is the unfiltered API payload, markup intact.
        assert_eq!(raw["title"], "<b>콜라</b> 190ml");
        assert_eq!(raw["lprice"], "1200");
    }
}
