use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, patch, post},
};
use uuid::Uuid;

use crate::{
    dto::cashback::{
        CashbackAccountDto, CashbackPaymentList, RecordCashbackPaymentRequest,
        UpdateCashbackStatusRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::CashbackPayment,
    response::ApiResponse,
    services::cashback_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/{id}", get(get_account))
        .route("/{id}/payments", get(list_payments))
        .route("/{id}/pay", post(record_payment))
        .route("/{id}/status", patch(update_status))
}

#[utoipa::path(
    get,
    path = "/api/cashback/{id}",
    params(
        ("id" = Uuid, Path, description = "Master data record ID")
    ),
    responses(
        (status = 200, description = "Derived cashback account state", body = ApiResponse<CashbackAccountDto>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cashback"
)]
pub async fn get_account(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CashbackAccountDto>>> {
    let resp = cashback_service::get_account(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/cashback/{id}/payments",
    params(
        ("id" = Uuid, Path, description = "Master data record ID")
    ),
    responses(
        (status = 200, description = "Recorded cashback payments, newest first", body = ApiResponse<CashbackPaymentList>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cashback"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    _user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<CashbackPaymentList>>> {
    let resp = cashback_service::list_payments(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/cashback/{id}/pay",
    params(
        ("id" = Uuid, Path, description = "Master data record ID")
    ),
    request_body = RecordCashbackPaymentRequest,
    responses(
        (status = 200, description = "Cashback payment recorded", body = ApiResponse<CashbackPayment>),
        (status = 400, description = "Invalid amount or date"),
        (status = 404, description = "Not Found"),
        (status = 409, description = "Month already satisfied or account closed"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cashback"
)]
pub async fn record_payment(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RecordCashbackPaymentRequest>,
) -> AppResult<Json<ApiResponse<CashbackPayment>>> {
    let resp = cashback_service::record_payment(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/cashback/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Master data record ID")
    ),
    request_body = UpdateCashbackStatusRequest,
    responses(
        (status = 200, description = "Account opened or closed"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Cashback"
)]
pub async fn update_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCashbackStatusRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = cashback_service::update_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
