use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::master_data::{CreateMasterDataRequest, MasterDataList, RecordLedgerPaymentRequest},
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{CashbackStatus, MasterDataRecord},
    response::{ApiResponse, Meta},
    routes::params::MasterDataQuery,
    state::AppState,
};

pub async fn list_records(
    state: &AppState,
    query: MasterDataQuery,
) -> AppResult<ApiResponse<MasterDataList>> {
    let (page, limit, offset) = query.pagination.normalize();

    let (items, total): (Vec<MasterDataRecord>, i64) = if let Some(area_id) = query.area_id {
        let items = sqlx::query_as::<_, MasterDataRecord>(
            "SELECT * FROM master_data WHERE area_id = $1 ORDER BY created_at DESC LIMIT $2 OFFSET $3",
        )
        .bind(area_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM master_data WHERE area_id = $1")
            .bind(area_id)
            .fetch_one(&state.pool)
            .await?;
        (items, total.0)
    } else {
        let items = sqlx::query_as::<_, MasterDataRecord>(
            "SELECT * FROM master_data ORDER BY created_at DESC LIMIT $1 OFFSET $2",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&state.pool)
        .await?;
        let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM master_data")
            .fetch_one(&state.pool)
            .await?;
        (items, total.0)
    };

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Master data",
        MasterDataList { items },
        Some(meta),
    ))
}

/// Create a purchase record under an area. The record's amounts roll up into
/// the owning area in the same transaction; due is always derived.
pub async fn create_record(
    state: &AppState,
    user: &AuthUser,
    payload: CreateMasterDataRequest,
) -> AppResult<ApiResponse<MasterDataRecord>> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.purchase_amount <= 0 {
        return Err(AppError::Validation(
            "purchase amount must be greater than 0".into(),
        ));
    }
    if payload.paid_amount < 0 {
        return Err(AppError::Validation("paid amount must not be negative".into()));
    }

    let mut txn = state.pool.begin().await?;

    let area_exists: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM areas WHERE id = $1 FOR UPDATE")
            .bind(payload.area_id)
            .fetch_optional(&mut *txn)
            .await?;
    if area_exists.is_none() {
        return Err(AppError::NotFound);
    }

    let due_amount = payload.purchase_amount - payload.paid_amount;

    let record = sqlx::query_as::<_, MasterDataRecord>(
        r#"
        INSERT INTO master_data
            (id, area_id, name, nid, phone, payment_method, purchase_date,
             purchase_amount, paid_amount, due_amount, cashback_amount, cashback_status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 0, $11)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.area_id)
    .bind(payload.name.trim())
    .bind(payload.nid)
    .bind(payload.phone)
    .bind(payload.payment_method)
    .bind(payload.purchase_date)
    .bind(payload.purchase_amount)
    .bind(payload.paid_amount)
    .bind(due_amount)
    .bind(CashbackStatus::Active.as_str())
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query(
        r#"
        UPDATE areas
        SET purchase_amount = purchase_amount + $2,
            paid_amount = paid_amount + $3,
            due_amount = purchase_amount + $2 - (paid_amount + $3) - cashback_amount,
            package_quantity = package_quantity + 1
        WHERE id = $1
        "#,
    )
    .bind(payload.area_id)
    .bind(payload.purchase_amount)
    .bind(payload.paid_amount)
    .execute(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "master_data_create",
        Some("master_data"),
        Some(serde_json::json!({ "record_id": record.id, "area_id": record.area_id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Record created",
        record,
        Some(Meta::empty()),
    ))
}

pub async fn get_record(state: &AppState, id: Uuid) -> AppResult<ApiResponse<MasterDataRecord>> {
    let record = sqlx::query_as::<_, MasterDataRecord>("SELECT * FROM master_data WHERE id = $1")
        .bind(id)
        .fetch_optional(&state.pool)
        .await?;
    match record {
        Some(r) => Ok(ApiResponse::success("Record", r, None)),
        None => Err(AppError::NotFound),
    }
}

/// Record a due-clearing payment: paid goes up, due is re-derived, and the
/// owning area moves by the same amounts.
pub async fn record_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecordLedgerPaymentRequest,
) -> AppResult<ApiResponse<MasterDataRecord>> {
    if payload.amount <= 0 {
        return Err(AppError::Validation("amount must be greater than 0".into()));
    }

    let mut txn = state.pool.begin().await?;

    let existing: Option<MasterDataRecord> =
        sqlx::query_as("SELECT * FROM master_data WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *txn)
            .await?;
    let existing = match existing {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let record = sqlx::query_as::<_, MasterDataRecord>(
        r#"
        UPDATE master_data
        SET paid_amount = paid_amount + $2,
            due_amount = purchase_amount - (paid_amount + $2) - cashback_amount
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(payload.amount)
    .fetch_one(&mut *txn)
    .await?;

    sqlx::query(
        r#"
        UPDATE areas
        SET paid_amount = paid_amount + $2,
            due_amount = purchase_amount - (paid_amount + $2) - cashback_amount
        WHERE id = $1
        "#,
    )
    .bind(existing.area_id)
    .bind(payload.amount)
    .execute(&mut *txn)
    .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "ledger_payment",
        Some("master_data"),
        Some(serde_json::json!({ "record_id": id, "amount": payload.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment recorded",
        record,
        Some(Meta::empty()),
    ))
}
