//! Customer JSON API endpoints
//!
//! Endpoints:
//! - api_customers: Filtered customer summaries
//! - api_customer_detail: One customer with its transactions
//! - api_customer_daily: Daily totals for one customer

use axum::extract::{Path, Query, State};
use axum::Json;
use custdash_core::{CustomerFilter, CustomerSummary, DailyTotal, RecordId};

use crate::error::ApiError;
use crate::AppState;

/// Get customer summaries passing the name/amount filters (JSON API)
pub async fn api_customers(
    State(state): State<AppState>,
    Query(filter): Query<CustomerFilter>,
) -> Json<Vec<CustomerSummary>> {
    let dashboard = state.dashboard.read().await;
    Json(dashboard.filtered(&filter))
}

/// Get single customer detail (JSON API)
pub async fn api_customer_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CustomerSummary>, ApiError> {
    let dashboard = state.dashboard.read().await;
    Ok(Json(dashboard.customer(&RecordId::new(id))?))
}

/// Get a customer's per-date totals in chronological order (JSON API)
pub async fn api_customer_daily(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<DailyTotal>>, ApiError> {
    let dashboard = state.dashboard.read().await;
    Ok(Json(dashboard.customer_chart(&RecordId::new(id))?.daily))
}
