use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::master_data::{CreateMasterDataRequest, MasterDataList, RecordLedgerPaymentRequest},
    dto::summary::OverallSummary,
    error::AppResult,
    middleware::auth::AuthUser,
    models::MasterDataRecord,
    response::ApiResponse,
    routes::params::MasterDataQuery,
    services::{master_data_service, summary_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_records).post(create_record))
        .route("/summary", get(overall_summary))
        .route("/{id}", get(get_record))
        .route("/{id}/payments", post(record_payment))
}

#[utoipa::path(
    get,
    path = "/api/master-data",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("area_id" = Option<Uuid>, Query, description = "Filter by area")
    ),
    responses(
        (status = 200, description = "List purchase records", body = ApiResponse<MasterDataList>)
    ),
    security(("bearer_auth" = [])),
    tag = "MasterData"
)]
pub async fn list_records(
    State(state): State<AppState>,
    _user: AuthUser,
    Query(query): Query<MasterDataQuery>,
) -> AppResult<Json<ApiResponse<MasterDataList>>> {
    let resp = master_data_service::list_records(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/master-data",
    request_body = CreateMasterDataRequest,
    responses(
        (status = 200, description = "Create purchase record", body = ApiResponse<MasterDataRecord>),
        (status = 404, description = "Unknown area"),
    ),
    security(("bearer_auth" = [])),
    tag = "MasterData"
)]
pub async fn create_record(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateMasterDataRequest>,
) -> AppResult<Json<ApiResponse<MasterDataRecord>>> {
    let resp = master_data_service::create_record(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/master-data/{id}",
    params(
        ("id" = Uuid, Path, description = "Record ID")
    ),
    responses(
        (status = 200, description = "Get purchase record", body = ApiResponse<MasterDataRecord>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "MasterData"
)]
pub async fn get_record(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<MasterDataRecord>>> {
    let resp = master_data_service::get_record(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/master-data/{id}/payments",
    params(
        ("id" = Uuid, Path, description = "Record ID")
    ),
    request_body = RecordLedgerPaymentRequest,
    responses(
        (status = 200, description = "Record a due-clearing payment", body = ApiResponse<MasterDataRecord>),
        (status = 400, description = "Invalid amount"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "MasterData"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordLedgerPaymentRequest>,
) -> AppResult<Json<ApiResponse<MasterDataRecord>>> {
    let resp = master_data_service::record_payment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/master-data/summary",
    responses(
        (status = 200, description = "Global purchase/paid/due totals", body = ApiResponse<OverallSummary>)
    ),
    security(("bearer_auth" = [])),
    tag = "MasterData"
)]
pub async fn overall_summary(
    State(state): State<AppState>,
    _user: AuthUser,
) -> AppResult<Json<ApiResponse<OverallSummary>>> {
    let resp = summary_service::overall_summary(&state).await?;
    Ok(Json(resp))
}
