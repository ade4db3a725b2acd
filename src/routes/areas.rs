use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get},
};
use uuid::Uuid;

use crate::{
    dto::areas::{AreaList, CreateAreaRequest},
    dto::summary::AreaDailySummary,
    error::AppResult,
    middleware::auth::AuthUser,
    models::Area,
    response::ApiResponse,
    routes::params::{DailySummaryQuery, Pagination},
    services::{area_service, summary_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_areas).post(create_area))
        .route("/{id}", delete(delete_area))
        .route("/area-summary/daily", get(daily_summary))
}

#[utoipa::path(
    get,
    path = "/api/areas",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20")
    ),
    responses(
        (status = 200, description = "List areas", body = ApiResponse<AreaList>)
    ),
    tag = "Areas"
)]
pub async fn list_areas(
    State(state): State<AppState>,
    Query(pagination): Query<Pagination>,
) -> AppResult<Json<ApiResponse<AreaList>>> {
    let resp = area_service::list_areas(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/areas",
    request_body = CreateAreaRequest,
    responses(
        (status = 200, description = "Create area", body = ApiResponse<Area>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Areas"
)]
pub async fn create_area(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateAreaRequest>,
) -> AppResult<Json<ApiResponse<Area>>> {
    let resp = area_service::create_area(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/areas/{id}",
    params(
        ("id" = Uuid, Path, description = "Area ID")
    ),
    responses(
        (status = 200, description = "Area deleted"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Area still referenced by master data"),
    ),
    security(("bearer_auth" = [])),
    tag = "Areas"
)]
pub async fn delete_area(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = area_service::delete_area(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/areas/area-summary/daily",
    params(
        ("date" = String, Query, description = "Calendar day, YYYY-MM-DD")
    ),
    responses(
        (status = 200, description = "Per-area activity for the day; inactive areas omitted", body = ApiResponse<AreaDailySummary>)
    ),
    tag = "Areas"
)]
pub async fn daily_summary(
    State(state): State<AppState>,
    Query(query): Query<DailySummaryQuery>,
) -> AppResult<Json<ApiResponse<AreaDailySummary>>> {
    let resp = summary_service::daily_area_summary(&state, query.date).await?;
    Ok(Json(resp))
}
