use axum::{Json, Router, extract::State, routing::get};

use crate::{
    dto::summary::DashboardSummary,
    error::AppResult,
    middleware::auth::AuthUser,
    response::ApiResponse,
    services::summary_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/summary", get(summary))
}

#[utoipa::path(
    get,
    path = "/api/dashboard/summary",
    responses(
        (status = 200, description = "Global dashboard aggregate", body = ApiResponse<DashboardSummary>)
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let resp = summary_service::dashboard_summary(&state).await?;
    Ok(Json(resp))
}
