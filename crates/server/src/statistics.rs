//! Statistics API endpoints

use api_types::{ApiResponse, stats::StatsView};
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

/// Totals, count, average and per-category sums over every expense.
pub async fn get_stats(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<StatsView>>, ServerError> {
    let stats = state.engine.statistics().await?;

    Ok(Json(ApiResponse::ok(StatsView {
        total_amount: stats.total_amount.to_major(),
        expense_count: stats.expense_count,
        average_amount: stats.average_amount,
        by_category: stats
            .by_category
            .into_iter()
            .map(|(category, amount)| (category, amount.to_major()))
            .collect(),
    })))
}
