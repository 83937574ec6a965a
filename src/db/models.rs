//! Database row types. Timestamps are Unix epoch seconds (UTC).

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductRow {
    pub id: i64,
    pub keyword: String,
    pub target_price: Option<i64>,
    pub memo: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Product joined with its latest and previous collection-batch prices.
/// "Latest" is the minimum price within the most recent collection batch,
/// "previous" within the one before.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ProductWithPricesRow {
    pub id: i64,
    pub keyword: String,
    pub target_price: Option<i64>,
    pub memo: Option<String>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
    pub latest_price: Option<i64>,
    pub latest_shop: Option<String>,
    pub latest_url: Option<String>,
    pub latest_collected_at: Option<i64>,
    pub prev_price: Option<i64>,
}

/// One day of price history: min/max plus the shop offering the day's
/// minimum.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceHistoryRow {
    pub day: String,
    pub min_price: i64,
    pub max_price: i64,
    pub shop: Option<String>,
    pub url: Option<String>,
    pub collected_count: i64,
}

/// Newest logged price for one shop.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ShopPriceRow {
    pub shop_name: String,
    pub price: i64,
    pub product_url: Option<String>,
    pub collected_at: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PriceStatsRow {
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub avg_price: Option<f64>,
    pub current_price: Option<i64>,
    pub price_at_start: Option<i64>,
    pub lowest_shop: Option<String>,
    pub data_count: i64,
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RecentCollectionRow {
    pub id: i64,
    pub product_name: String,
    pub shop_name: String,
    pub price: i64,
    pub previous_price: i64,
    pub collected_at: i64,
}

#[derive(Debug, Clone)]
pub struct DashboardSummary {
    pub total_products: i64,
    pub goal_reached_count: i64,
    pub today_collected_count: i64,
    pub avg_saving_rate: f64,
}
