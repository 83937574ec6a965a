//! Data access layer over SQLite. The collector and the API server share
//! this type; the collector only touches the product list, the two batch
//! insert paths and the recent-alert lookup.

use std::str::FromStr;

use chrono::Utc;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};
use tracing::debug;

use crate::config::BATCH_SIZE;
use crate::db::models::{
    DashboardSummary, PriceHistoryRow, PriceStatsRow, ProductRow, ProductWithPricesRow,
    RecentCollectionRow, ShopPriceRow,
};
use crate::error::{AppError, Result};
use crate::types::{NewAlert, NewPriceLog, ProductPatch};

/// Latest/previous collection-batch minimum price per product. Batches are
/// grouped by `collected_at` (one collection run flushes with a single
/// timestamp).
const PRODUCT_PRICES_CTE: &str = r#"
WITH ranked AS (
    SELECT product_id, price, shop_name, product_url, collected_at,
           DENSE_RANK() OVER (PARTITION BY product_id ORDER BY collected_at DESC) AS batch_rank
    FROM price_logs
),
latest AS (
    SELECT product_id, MIN(price) AS price, shop_name, product_url, collected_at
    FROM ranked WHERE batch_rank = 1 GROUP BY product_id
),
prev AS (
    SELECT product_id, MIN(price) AS price
    FROM ranked WHERE batch_rank = 2 GROUP BY product_id
)
SELECT p.id, p.keyword, p.target_price, p.memo, p.is_active, p.created_at, p.updated_at,
       l.price AS latest_price, l.shop_name AS latest_shop, l.product_url AS latest_url,
       l.collected_at AS latest_collected_at,
       v.price AS prev_price
FROM products p
LEFT JOIN latest l ON l.product_id = p.id
LEFT JOIN prev v ON v.product_id = p.id
"#;

#[derive(Clone)]
pub struct Store {
    pool: SqlitePool,
}

impl Store {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Open (creating if missing) the database file and run migrations.
    pub async fn connect(db_path: &str) -> Result<Self> {
        let opts =
            SqliteConnectOptions::from_str(&format!("sqlite:{db_path}"))?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(opts).await?;
        crate::db::MIGRATOR.run(&pool).await?;
        Ok(Self { pool })
    }

    pub async fn ping(&self) -> Result<()> {
        sqlx::query_scalar::<_, i64>("SELECT 1")
            .fetch_one(&self.pool)
            .await?;
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Products
    // -----------------------------------------------------------------------

    pub async fn create_product(
        &self,
        keyword: &str,
        target_price: Option<i64>,
        memo: Option<&str>,
    ) -> Result<ProductRow> {
        let now = Utc::now().timestamp();
        sqlx::query_as::<_, ProductRow>(
            r#"
            INSERT INTO products (keyword, target_price, memo, is_active, created_at, updated_at)
            VALUES (?, ?, ?, 1, ?, ?)
            RETURNING id, keyword, target_price, memo, is_active, created_at, updated_at
            "#,
        )
        .bind(keyword)
        .bind(target_price)
        .bind(memo)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => AppError::DuplicateKeyword,
            _ => AppError::from(e),
        })
    }

    pub async fn get_product(&self, id: i64) -> Result<Option<ProductRow>> {
        let row = sqlx::query_as::<_, ProductRow>(
            "SELECT id, keyword, target_price, memo, is_active, created_at, updated_at
             FROM products WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    /// All products with latest/previous prices, optionally filtered by a
    /// keyword substring.
    pub async fn list_products_with_prices(
        &self,
        search: Option<&str>,
    ) -> Result<Vec<ProductWithPricesRow>> {
        let sql = format!(
            "{PRODUCT_PRICES_CTE} WHERE ?1 IS NULL OR p.keyword LIKE '%' || ?1 || '%' ORDER BY p.id"
        );
        let rows = sqlx::query_as::<_, ProductWithPricesRow>(&sql)
            .bind(search)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn product_with_prices(&self, id: i64) -> Result<Option<ProductWithPricesRow>> {
        let sql = format!("{PRODUCT_PRICES_CTE} WHERE p.id = ?1");
        let row = sqlx::query_as::<_, ProductWithPricesRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    /// Apply a partial update. Only fields present in the patch are touched;
    /// an explicit null clears the column.
    pub async fn update_product(&self, id: i64, patch: &ProductPatch) -> Result<ProductRow> {
        if !patch.is_empty() {
            let now = Utc::now().timestamp();
            let mut qb = QueryBuilder::<Sqlite>::new("UPDATE products SET updated_at = ");
            qb.push_bind(now);
            if let Some(target_price) = &patch.target_price {
                qb.push(", target_price = ");
                qb.push_bind(*target_price);
            }
            if let Some(memo) = &patch.memo {
                qb.push(", memo = ");
                qb.push_bind(memo.clone());
            }
            if let Some(is_active) = patch.is_active {
                qb.push(", is_active = ");
                qb.push_bind(is_active);
            }
            qb.push(" WHERE id = ");
            qb.push_bind(id);

            let result = qb.build().execute(&self.pool).await?;
            if result.rows_affected() == 0 {
                return Err(AppError::ProductNotFound);
            }
        }

        self.get_product(id).await?.ok_or(AppError::ProductNotFound)
    }

    pub async fn delete_product(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::ProductNotFound);
        }
        Ok(())
    }

    /// Products eligible for collection.
    pub async fn active_products(&self) -> Result<Vec<ProductRow>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            "SELECT id, keyword, target_price, memo, is_active, created_at, updated_at
             FROM products WHERE is_active = 1 ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    // -----------------------------------------------------------------------
    // Collector writes
    // -----------------------------------------------------------------------

    /// Batch-insert price logs, chunked at [`BATCH_SIZE`] rows per
    /// statement. All rows of one call share a `collected_at` timestamp so
    /// they form one collection batch. Returns the total inserted.
    pub async fn insert_price_logs(&self, rows: &[NewPriceLog]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let collected_at = Utc::now().timestamp();
        let mut total = 0u64;

        for chunk in rows.chunks(BATCH_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "INSERT INTO price_logs (product_id, shop_name, price, product_url, raw_data, collected_at) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.product_id)
                    .push_bind(row.shop_name.as_str())
                    .push_bind(row.price)
                    .push_bind(row.product_url.as_deref())
                    .push_bind(row.raw_data.as_deref())
                    .push_bind(collected_at);
            });
            qb.build().execute(&self.pool).await?;
            total += chunk.len() as u64;
        }

        debug!(
            "inserted {total} price logs in {} statement(s)",
            chunk_count(rows.len())
        );
        Ok(total)
    }

    /// Batch-insert alert records. Same chunking as price logs.
    pub async fn insert_alerts(&self, rows: &[NewAlert]) -> Result<u64> {
        if rows.is_empty() {
            return Ok(0);
        }
        let notified_at = Utc::now().timestamp();
        let mut total = 0u64;

        for chunk in rows.chunks(BATCH_SIZE) {
            let mut qb = QueryBuilder::<Sqlite>::new(
                "INSERT INTO alerts (product_id, triggered_price, target_price, shop_name, notified_at) ",
            );
            qb.push_values(chunk, |mut b, row| {
                b.push_bind(row.product_id)
                    .push_bind(row.triggered_price)
                    .push_bind(row.target_price)
                    .push_bind(row.shop_name.as_str())
                    .push_bind(notified_at);
            });
            qb.build().execute(&self.pool).await?;
            total += chunk.len() as u64;
        }

        debug!(
            "inserted {total} alerts in {} statement(s)",
            chunk_count(rows.len())
        );
        Ok(total)
    }

    /// True when an alert for this product exists within the dedup window.
    pub async fn has_recent_alert(&self, product_id: i64, hours: i64) -> Result<bool> {
        let cutoff = Utc::now().timestamp() - hours * 3600;
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM alerts WHERE product_id = ? AND notified_at >= ?)",
        )
        .bind(product_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    // -----------------------------------------------------------------------
    // History / statistics queries
    // -----------------------------------------------------------------------

    /// Per-day min/max prices over the last `days` days (0 = all history),
    /// with the shop offering each day's minimum.
    pub async fn price_history(&self, product_id: i64, days: i64) -> Result<Vec<PriceHistoryRow>> {
        let cutoff = history_cutoff(days);
        let rows = sqlx::query_as::<_, PriceHistoryRow>(
            r#"
            WITH daily AS (
                SELECT date(collected_at, 'unixepoch') AS day, price, shop_name, product_url,
                       ROW_NUMBER() OVER (PARTITION BY date(collected_at, 'unixepoch') ORDER BY price ASC) AS rn,
                       COUNT(*)   OVER (PARTITION BY date(collected_at, 'unixepoch')) AS collected_count,
                       MIN(price) OVER (PARTITION BY date(collected_at, 'unixepoch')) AS min_price,
                       MAX(price) OVER (PARTITION BY date(collected_at, 'unixepoch')) AS max_price
                FROM price_logs
                WHERE product_id = ?1 AND collected_at >= ?2
            )
            SELECT day, min_price, max_price, shop_name AS shop, product_url AS url, collected_count
            FROM daily WHERE rn = 1 ORDER BY day
            "#,
        )
        .bind(product_id)
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Newest logged price per shop, cheapest first.
    pub async fn latest_prices(&self, product_id: i64) -> Result<Vec<ShopPriceRow>> {
        let rows = sqlx::query_as::<_, ShopPriceRow>(
            r#"
            SELECT shop_name, price, product_url, collected_at FROM (
                SELECT shop_name, price, product_url, collected_at,
                       ROW_NUMBER() OVER (PARTITION BY shop_name ORDER BY collected_at DESC, id DESC) AS rn
                FROM price_logs WHERE product_id = ?1
            ) WHERE rn = 1 ORDER BY price ASC
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Aggregate price statistics over the last `days` days (0 = all).
    pub async fn price_stats(&self, product_id: i64, days: i64) -> Result<PriceStatsRow> {
        let cutoff = history_cutoff(days);
        let row = sqlx::query_as::<_, PriceStatsRow>(
            r#"
            WITH win AS (
                SELECT id, price, shop_name, collected_at FROM price_logs
                WHERE product_id = ?1 AND collected_at >= ?2
            )
            SELECT MIN(price) AS min_price,
                   MAX(price) AS max_price,
                   AVG(price) AS avg_price,
                   (SELECT price FROM win ORDER BY collected_at DESC, id DESC LIMIT 1) AS current_price,
                   (SELECT price FROM win ORDER BY collected_at ASC, id ASC LIMIT 1) AS price_at_start,
                   (SELECT shop_name FROM win ORDER BY price ASC LIMIT 1) AS lowest_shop,
                   COUNT(*) AS data_count
            FROM win
            "#,
        )
        .bind(product_id)
        .bind(cutoff)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Most recently collected price logs, with the previous logged price
    /// for the same product alongside each.
    pub async fn recent_collections(&self, limit: i64) -> Result<Vec<RecentCollectionRow>> {
        let rows = sqlx::query_as::<_, RecentCollectionRow>(
            r#"
            SELECT id, product_name, shop_name, price, previous_price, collected_at FROM (
                SELECT pl.id AS id, p.keyword AS product_name, pl.shop_name AS shop_name,
                       pl.price AS price,
                       COALESCE(
                           LAG(pl.price) OVER (PARTITION BY pl.product_id ORDER BY pl.collected_at, pl.id),
                           pl.price
                       ) AS previous_price,
                       pl.collected_at AS collected_at
                FROM price_logs pl JOIN products p ON p.id = pl.product_id
            )
            ORDER BY collected_at DESC, id DESC LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary> {
        let total_products = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        let (goal_reached_count, avg_saving_rate) = sqlx::query_as::<_, (i64, f64)>(
            r#"
            WITH ranked AS (
                SELECT product_id, price,
                       DENSE_RANK() OVER (PARTITION BY product_id ORDER BY collected_at DESC) AS batch_rank
                FROM price_logs
            ),
            latest AS (
                SELECT product_id, MIN(price) AS price
                FROM ranked WHERE batch_rank = 1 GROUP BY product_id
            )
            SELECT COUNT(*),
                   COALESCE(AVG((p.target_price - l.price) * 100.0 / p.target_price), 0.0)
            FROM products p JOIN latest l ON l.product_id = p.id
            WHERE p.target_price IS NOT NULL AND p.target_price > 0 AND l.price <= p.target_price
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        let today_collected_count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM price_logs WHERE date(collected_at, 'unixepoch') = date('now')",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(DashboardSummary {
            total_products,
            goal_reached_count,
            today_collected_count,
            avg_saving_rate,
        })
    }
}

/// Epoch-seconds lower bound for a trailing window of `days`. 0 days means
/// the whole history.
fn history_cutoff(days: i64) -> i64 {
    if days <= 0 {
        0
    } else {
        Utc::now().timestamp() - days * 86_400
    }
}

/// Number of INSERT statements a buffer of `rows` rows flushes as.
pub fn chunk_count(rows: usize) -> usize {
    rows.div_ceil(BATCH_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> Store {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory pool");
        crate::db::MIGRATOR.run(&pool).await.expect("migrations");
        Store::new(pool)
    }

    fn log(product_id: i64, shop: &str, price: i64) -> NewPriceLog {
        NewPriceLog {
            product_id,
            shop_name: shop.to_string(),
            price,
            product_url: Some("https://shop.example/1".to_string()),
            raw_data: None,
        }
    }

    #[tokio::test]
    async fn create_get_delete_roundtrip() {
        let store = test_store().await;
        let product = store
            .create_product("제로콜라 190ml", Some(15000), Some("사무실 간식"))
            .await
            .unwrap();
        assert!(product.is_active);
        assert_eq!(product.target_price, Some(15000));

        let fetched = store.get_product(product.id).await.unwrap().unwrap();
        assert_eq!(fetched.keyword, "제로콜라 190ml");

        store.delete_product(product.id).await.unwrap();
        assert!(store.get_product(product.id).await.unwrap().is_none());
        assert!(matches!(
            store.delete_product(product.id).await,
            Err(AppError::ProductNotFound)
        ));
    }

    #[tokio::test]
    async fn duplicate_keyword_is_rejected() {
        let store = test_store().await;
        store.create_product("콜라", None, None).await.unwrap();
        let err = store.create_product("콜라", Some(1000), None).await;
        assert!(matches!(err, Err(AppError::DuplicateKeyword)));
    }

    #[tokio::test]
    async fn patch_only_touches_provided_fields() {
        let store = test_store().await;
        let product = store
            .create_product("콜라", Some(15000), Some("memo"))
            .await
            .unwrap();

        // Omitted fields stay as-is.
        let patch = ProductPatch {
            is_active: Some(false),
            ..Default::default()
        };
        let updated = store.update_product(product.id, &patch).await.unwrap();
        assert!(!updated.is_active);
        assert_eq!(updated.target_price, Some(15000));
        assert_eq!(updated.memo.as_deref(), Some("memo"));

        // Explicit null clears.
        let patch = ProductPatch {
            target_price: Some(None),
            ..Default::default()
        };
        let updated = store.update_product(product.id, &patch).await.unwrap();
        assert_eq!(updated.target_price, None);
        assert_eq!(updated.memo.as_deref(), Some("memo"));

        // Empty patch is a no-op, not an error.
        let updated = store
            .update_product(product.id, &ProductPatch::default())
            .await
            .unwrap();
        assert_eq!(updated.memo.as_deref(), Some("memo"));

        assert!(matches!(
            store.update_product(9999, &patch).await,
            Err(AppError::ProductNotFound)
        ));
    }

    #[tokio::test]
    async fn active_products_excludes_paused() {
        let store = test_store().await;
        let a = store.create_product("a", None, None).await.unwrap();
        let b = store.create_product("b", None, None).await.unwrap();
        let patch = ProductPatch {
            is_active: Some(false),
            ..Default::default()
        };
        store.update_product(b.id, &patch).await.unwrap();

        let active = store.active_products().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].id, a.id);
    }

    #[tokio::test]
    async fn batch_insert_chunks_and_reports_total() {
        let store = test_store().await;
        let product = store.create_product("콜라", None, None).await.unwrap();

        let rows: Vec<NewPriceLog> = (0..1200).map(|i| log(product.id, "X", 1000 + i)).collect();
        let saved = store.insert_price_logs(&rows).await.unwrap();
        assert_eq!(saved, 1200);

        // 500 + 500 + 200
        assert_eq!(chunk_count(1200), 3);
        assert_eq!(chunk_count(500), 1);
        assert_eq!(chunk_count(501), 2);
        assert_eq!(chunk_count(0), 0);

        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM price_logs")
            .fetch_one(&store.pool)
            .await
            .unwrap();
        assert_eq!(count, 1200);
    }

    #[tokio::test]
    async fn empty_buffers_insert_nothing() {
        let store = test_store().await;
        assert_eq!(store.insert_price_logs(&[]).await.unwrap(), 0);
        assert_eq!(store.insert_alerts(&[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn recent_alert_window() {
        let store = test_store().await;
        let product = store.create_product("콜라", Some(10000), None).await.unwrap();

        assert!(!store.has_recent_alert(product.id, 24).await.unwrap());

        let alerts = vec![NewAlert {
            product_id: product.id,
            triggered_price: 9500,
            target_price: 10000,
            shop_name: "X".to_string(),
        }];
        assert_eq!(store.insert_alerts(&alerts).await.unwrap(), 1);
        assert!(store.has_recent_alert(product.id, 24).await.unwrap());

        // Push the alert outside the window.
        sqlx::query("UPDATE alerts SET notified_at = notified_at - 90000")
            .execute(&store.pool)
            .await
            .unwrap();
        assert!(!store.has_recent_alert(product.id, 24).await.unwrap());
    }

    #[tokio::test]
    async fn latest_and_previous_batch_prices() {
        let store = test_store().await;
        let product = store.create_product("콜라", Some(10000), None).await.unwrap();

        store
            .insert_price_logs(&[log(product.id, "A", 12000), log(product.id, "B", 11000)])
            .await
            .unwrap();
        // Backdate the first batch so the second is distinct.
        sqlx::query("UPDATE price_logs SET collected_at = collected_at - 3600")
            .execute(&store.pool)
            .await
            .unwrap();
        store
            .insert_price_logs(&[log(product.id, "A", 9800), log(product.id, "B", 9900)])
            .await
            .unwrap();

        let rows = store.list_products_with_prices(None).await.unwrap();
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.latest_price, Some(9800));
        assert_eq!(row.latest_shop.as_deref(), Some("A"));
        assert_eq!(row.prev_price, Some(11000));

        let by_search = store.list_products_with_prices(Some("콜")).await.unwrap();
        assert_eq!(by_search.len(), 1);
        let none = store.list_products_with_prices(Some("사이다")).await.unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn shop_latest_prices_sorted_cheapest_first() {
        let store = test_store().await;
        let product = store.create_product("콜라", None, None).await.unwrap();

        store
            .insert_price_logs(&[log(product.id, "A", 12000), log(product.id, "B", 9000)])
            .await
            .unwrap();
        sqlx::query("UPDATE price_logs SET collected_at = collected_at - 3600")
            .execute(&store.pool)
            .await
            .unwrap();
        store
            .insert_price_logs(&[log(product.id, "A", 9500)])
            .await
            .unwrap();

        let shops = store.latest_prices(product.id).await.unwrap();
        assert_eq!(shops.len(), 2);
        assert_eq!(shops[0].shop_name, "B");
        assert_eq!(shops[0].price, 9000);
        // Shop A's newer 9500 replaces its older 12000.
        assert_eq!(shops[1].price, 9500);
    }

    #[tokio::test]
    async fn price_stats_over_window() {
        let store = test_store().await;
        let product = store.create_product("콜라", None, None).await.unwrap();

        let empty = store.price_stats(product.id, 30).await.unwrap();
        assert_eq!(empty.data_count, 0);
        assert_eq!(empty.min_price, None);

        store
            .insert_price_logs(&[log(product.id, "A", 10000)])
            .await
            .unwrap();
        sqlx::query("UPDATE price_logs SET collected_at = collected_at - 3600")
            .execute(&store.pool)
            .await
            .unwrap();
        store
            .insert_price_logs(&[log(product.id, "B", 8000)])
            .await
            .unwrap();

        let stats = store.price_stats(product.id, 30).await.unwrap();
        assert_eq!(stats.data_count, 2);
        assert_eq!(stats.min_price, Some(8000));
        assert_eq!(stats.max_price, Some(10000));
        assert_eq!(stats.price_at_start, Some(10000));
        assert_eq!(stats.current_price, Some(8000));
        assert_eq!(stats.lowest_shop.as_deref(), Some("B"));
    }

    #[tokio::test]
    async fn recent_collections_carry_previous_price() {
        let store = test_store().await;
        let product = store.create_product("콜라", None, None).await.unwrap();

        store.insert_price_logs(&[log(product.id, "A", 10000)]).await.unwrap();
        sqlx::query("UPDATE price_logs SET collected_at = collected_at - 3600")
            .execute(&store.pool)
            .await
            .unwrap();
        store.insert_price_logs(&[log(product.id, "A", 9500)]).await.unwrap();

        let recent = store.recent_collections(10).await.unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].price, 9500);
        assert_eq!(recent[0].previous_price, 10000);
        assert_eq!(recent[0].product_name, "콜라");
        // Oldest row has no predecessor; falls back to its own price.
        assert_eq!(recent[1].previous_price, 10000);
    }

    #[tokio::test]
    async fn dashboard_summary_counts() {
        let store = test_store().await;
        let hit = store.create_product("콜라", Some(10000), None).await.unwrap();
        let miss = store.create_product("사이다", Some(5000), None).await.unwrap();
        store.create_product("커피", None, None).await.unwrap();

        store
            .insert_price_logs(&[log(hit.id, "A", 9000), log(miss.id, "B", 6000)])
            .await
            .unwrap();

        let summary = store.dashboard_summary().await.unwrap();
        assert_eq!(summary.total_products, 3);
        assert_eq!(summary.goal_reached_count, 1);
        assert_eq!(summary.today_collected_count, 2);
        // (10000 - 9000) / 10000 = 10%
        assert!((summary.avg_saving_rate - 10.0).abs() < 1e-9);
    }
}
