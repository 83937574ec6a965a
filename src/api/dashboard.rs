use axum::{extract::State, Json};
use serde::Serialize;

use crate::error::Result;

use super::routes::ApiState;

#[derive(Serialize)]
pub struct DashboardSummaryResponse {
    pub total_products: i64,
    pub goal_reached_count: i64,
    pub today_collected_count: i64,
    pub avg_saving_rate: f64,
}

pub async fn summary(State(state): State<ApiState>) -> Result<Json<DashboardSummaryResponse>> {
    let s = state.store.dashboard_summary().await?;
    Ok(Json(DashboardSummaryResponse {
        total_products: s.total_products,
        goal_reached_count: s.goal_reached_count,
        today_collected_count: s.today_collected_count,
        avg_saving_rate: s.avg_saving_rate,
    }))
}
