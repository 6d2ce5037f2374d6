//! Categories API endpoints.

use api_types::ApiResponse;
use axum::{Json, extract::State};

use crate::{ServerError, server::ServerState};

pub async fn list(
    State(state): State<ServerState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ServerError> {
    let categories = state.engine.categories().await?;
    Ok(Json(ApiResponse::ok(categories)))
}
