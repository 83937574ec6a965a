use axum::{
    routing::{get, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

use crate::db::Store;

use super::{dashboard, health, prices, products};

#[derive(Clone)]
pub struct ApiState {
    pub store: Store,
}

pub fn router(state: ApiState) -> Router {
    // The API is consumed from a browser dashboard.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route(
            "/products",
            get(products::list_products).post(products::create_product),
        )
        .route(
            "/products/:id",
            put(products::update_product).delete(products::delete_product),
        )
        .route("/prices/recent", get(prices::recent_collections))
        .route("/prices/:id", get(prices::price_history))
        .route("/prices/:id/latest", get(prices::latest_prices))
        .route("/prices/:id/stats", get(prices::price_stats))
        .route("/dashboard/summary", get(dashboard::summary))
        .layer(cors)
        .with_state(state)
}

/// Unix epoch seconds → RFC 3339 string for API responses.
pub(crate) fn rfc3339(secs: i64) -> String {
    chrono::DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.to_rfc3339())
        .unwrap_or_default()
}
