use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

use super::routes::{rfc3339, ApiState};

#[derive(Deserialize)]
pub struct RecentQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct DaysQuery {
    /// Trailing window in days; 0 = whole history.
    pub days: Option<i64>,
}

#[derive(Serialize)]
pub struct RecentCollectionItem {
    pub id: i64,
    pub product_name: String,
    pub shop: String,
    pub price: i64,
    pub previous_price: i64,
    pub collected_at: String,
}

#[derive(Serialize)]
pub struct PriceHistoryItem {
    pub date: String,
    pub min_price: i64,
    pub max_price: i64,
    pub shop: Option<String>,
    pub url: Option<String>,
    pub collected_count: i64,
}

#[derive(Serialize)]
pub struct ShopPrice {
    pub shop_name: String,
    pub price: i64,
    pub url: Option<String>,
}

#[derive(Serialize)]
pub struct LatestPriceResponse {
    pub product_id: i64,
    pub keyword: String,
    pub min_price: Option<i64>,
    pub shop: Option<String>,
    pub url: Option<String>,
    pub collected_at: Option<String>,
    pub shops: Vec<ShopPrice>,
}

#[derive(Serialize)]
pub struct PriceStatsResponse {
    pub product_id: i64,
    pub period_days: i64,
    pub min_price: i64,
    pub max_price: i64,
    pub avg_price: i64,
    pub current_price: i64,
    pub price_at_start: i64,
    pub change_from_start: i64,
    pub change_rate_from_start: f64,
    pub lowest_shop: String,
    pub data_count: i64,
}

pub async fn recent_collections(
    State(state): State<ApiState>,
    Query(params): Query<RecentQuery>,
) -> Result<Json<Vec<RecentCollectionItem>>> {
    let limit = params.limit.unwrap_or(10).clamp(1, 100);
    let rows = state.store.recent_collections(limit).await?;
    let items = rows
        .into_iter()
        .map(|r| RecentCollectionItem {
            id: r.id,
            product_name: r.product_name,
            shop: r.shop_name,
            price: r.price,
            previous_price: r.previous_price,
            collected_at: rfc3339(r.collected_at),
        })
        .collect();
    Ok(Json(items))
}

pub async fn price_history(
    State(state): State<ApiState>,
    Path(product_id): Path<i64>,
    Query(params): Query<DaysQuery>,
) -> Result<Json<Vec<PriceHistoryItem>>> {
    let days = params.days.unwrap_or(30).max(0);
    state
        .store
        .get_product(product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;

    let rows = state.store.price_history(product_id, days).await?;
    let items = rows
        .into_iter()
        .map(|r| PriceHistoryItem {
            date: r.day,
            min_price: r.min_price,
            max_price: r.max_price,
            shop: r.shop,
            url: r.url,
            collected_count: r.collected_count,
        })
        .collect();
    Ok(Json(items))
}

pub async fn latest_prices(
    State(state): State<ApiState>,
    Path(product_id): Path<i64>,
) -> Result<Json<LatestPriceResponse>> {
    let product = state
        .store
        .get_product(product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;

    let shops = state.store.latest_prices(product_id).await?;
    // Cheapest shop first; the headline fields mirror it.
    let min = shops.first();

    let response = LatestPriceResponse {
        product_id,
        keyword: product.keyword,
        min_price: min.map(|s| s.price),
        shop: min.map(|s| s.shop_name.clone()),
        url: min.and_then(|s| s.product_url.clone()),
        collected_at: min.map(|s| rfc3339(s.collected_at)),
        shops: shops
            .into_iter()
            .map(|s| ShopPrice {
                shop_name: s.shop_name,
                price: s.price,
                url: s.product_url,
            })
            .collect(),
    };
    Ok(Json(response))
}

pub async fn price_stats(
    State(state): State<ApiState>,
    Path(product_id): Path<i64>,
    Query(params): Query<DaysQuery>,
) -> Result<Json<PriceStatsResponse>> {
    let days = params.days.unwrap_or(30).max(0);
    state
        .store
        .get_product(product_id)
        .await?
        .ok_or(AppError::ProductNotFound)?;

    let stats = state.store.price_stats(product_id, days).await?;

    let current_price = stats.current_price.unwrap_or(0);
    let price_at_start = stats.price_at_start.unwrap_or(0);
    let change_from_start = current_price - price_at_start;
    let change_rate_from_start = if price_at_start != 0 {
        change_from_start as f64 / price_at_start as f64 * 100.0
    } else {
        0.0
    };

    Ok(Json(PriceStatsResponse {
        product_id,
        period_days: days,
        min_price: stats.min_price.unwrap_or(0),
        max_price: stats.max_price.unwrap_or(0),
        avg_price: stats.avg_price.unwrap_or(0.0).round() as i64,
        current_price,
        price_at_start,
        change_from_start,
        change_rate_from_start,
        lowest_shop: stats.lowest_shop.unwrap_or_default(),
        data_count: stats.data_count,
    }))
}
