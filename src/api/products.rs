use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::db::models::{ProductRow, ProductWithPricesRow};
use crate::error::{AppError, Result};
use crate::types::{ProductPatch, ProductStatus};

use super::routes::{rfc3339, ApiState};

#[derive(Deserialize)]
pub struct ProductsQuery {
    pub search: Option<String>,
    /// goal_reached | monitoring | no_target
    pub status: Option<String>,
}

#[derive(Deserialize)]
pub struct ProductCreate {
    pub keyword: String,
    pub target_price: Option<i64>,
    pub memo: Option<String>,
}

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub keyword: String,
    pub target_price: Option<i64>,
    pub memo: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub latest_price: Option<i64>,
    pub latest_shop: Option<String>,
    pub latest_url: Option<String>,
    pub latest_collected_at: Option<String>,
    pub status: ProductStatus,
    pub price_change: Option<i64>,
    pub price_change_rate: Option<f64>,
}

impl ProductResponse {
    fn from_prices_row(row: ProductWithPricesRow) -> Self {
        let status = ProductStatus::derive(row.target_price, row.latest_price);
        let (price_change, price_change_rate) = match (row.latest_price, row.prev_price) {
            (Some(latest), Some(prev)) => {
                let change = latest - prev;
                let rate = if prev != 0 {
                    // One decimal place, like the dashboard shows.
                    (change as f64 / prev as f64 * 1000.0).round() / 10.0
                } else {
                    0.0
                };
                (Some(change), Some(rate))
            }
            _ => (None, None),
        };

        Self {
            id: row.id,
            keyword: row.keyword,
            target_price: row.target_price,
            memo: row.memo,
            is_active: row.is_active,
            created_at: rfc3339(row.created_at),
            updated_at: rfc3339(row.updated_at),
            latest_price: row.latest_price,
            latest_shop: row.latest_shop,
            latest_url: row.latest_url,
            latest_collected_at: row.latest_collected_at.map(rfc3339),
            status,
            price_change,
            price_change_rate,
        }
    }

    /// A product with no collected prices yet (fresh create).
    fn from_row(row: ProductRow) -> Self {
        Self {
            id: row.id,
            keyword: row.keyword,
            target_price: row.target_price,
            memo: row.memo,
            is_active: row.is_active,
            created_at: rfc3339(row.created_at),
            updated_at: rfc3339(row.updated_at),
            latest_price: None,
            latest_shop: None,
            latest_url: None,
            latest_collected_at: None,
            status: ProductStatus::derive(row.target_price, None),
            price_change: None,
            price_change_rate: None,
        }
    }
}

pub async fn list_products(
    State(state): State<ApiState>,
    Query(params): Query<ProductsQuery>,
) -> Result<Json<Vec<ProductResponse>>> {
    let rows = state
        .store
        .list_products_with_prices(params.search.as_deref())
        .await?;

    let products: Vec<ProductResponse> = rows
        .into_iter()
        .map(ProductResponse::from_prices_row)
        .filter(|p| {
            params
                .status
                .as_ref()
                .map_or(true, |s| p.status.to_string() == *s)
        })
        .collect();

    Ok(Json(products))
}

pub async fn create_product(
    State(state): State<ApiState>,
    Json(body): Json<ProductCreate>,
) -> Result<(StatusCode, Json<ProductResponse>)> {
    let keyword = body.keyword.trim();
    validate_keyword(keyword)?;
    validate_target_price(body.target_price)?;
    validate_memo(body.memo.as_deref())?;

    let row = state
        .store
        .create_product(keyword, body.target_price, body.memo.as_deref())
        .await?;
    Ok((StatusCode::CREATED, Json(ProductResponse::from_row(row))))
}

pub async fn update_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
    Json(patch): Json<ProductPatch>,
) -> Result<Json<ProductResponse>> {
    if let Some(target_price) = patch.target_price {
        validate_target_price(target_price)?;
    }
    if let Some(Some(memo)) = &patch.memo {
        validate_memo(Some(memo))?;
    }

    state.store.update_product(id, &patch).await?;
    let row = state
        .store
        .product_with_prices(id)
        .await?
        .ok_or(AppError::ProductNotFound)?;
    Ok(Json(ProductResponse::from_prices_row(row)))
}

pub async fn delete_product(
    State(state): State<ApiState>,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.store.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn validate_keyword(keyword: &str) -> Result<()> {
    if keyword.is_empty() {
        return Err(AppError::Validation("keyword must not be empty".to_string()));
    }
    if keyword.chars().count() > 100 {
        return Err(AppError::Validation(
            "keyword must be at most 100 characters".to_string(),
        ));
    }
    Ok(())
}

fn validate_target_price(target_price: Option<i64>) -> Result<()> {
    if let Some(p) = target_price {
        if p <= 0 {
            return Err(AppError::Validation(
                "target_price must be positive".to_string(),
            ));
        }
    }
    Ok(())
}

fn validate_memo(memo: Option<&str>) -> Result<()> {
    if let Some(m) = memo {
        if m.chars().count() > 500 {
            return Err(AppError::Validation(
                "memo must be at most 500 characters".to_string(),
            ));
        }
    }
    Ok(())
}
