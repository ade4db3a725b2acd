use chrono::Utc;
use sea_orm::sea_query::{Expr, LockType};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
    TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use uuid::Uuid;

use crate::{
    accrual,
    audit::log_audit,
    dto::cashback::{
        CashbackAccountDto, CashbackPaymentList, RecordCashbackPaymentRequest,
        UpdateCashbackStatusRequest,
    },
    entity::{
        areas::{Column as AreaCol, Entity as Areas},
        cashback_payments::{
            ActiveModel as PaymentActive, Column as PaymentCol, Entity as CashbackPayments,
            Model as PaymentModel,
        },
        master_data::{ActiveModel as RecordActive, Column as RecordCol, Entity as MasterData},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{CashbackPayment, CashbackStatus},
    response::{ApiResponse, Meta},
    state::AppState,
};

/// Derived cashback position for a purchase record, as of today.
pub async fn get_account(state: &AppState, id: Uuid) -> AppResult<ApiResponse<CashbackAccountDto>> {
    let record = MasterData::find_by_id(id).one(&state.orm).await?;
    let record = match record {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let payment_dates: Vec<chrono::NaiveDate> = CashbackPayments::find()
        .filter(PaymentCol::MasterDataId.eq(id))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|p| p.payment_date)
        .collect();

    let status = CashbackStatus::parse(&record.cashback_status)?;
    let as_of = Utc::now().date_naive();
    let accrual = accrual::compute_status(
        record.purchase_amount,
        record.purchase_date,
        &payment_dates,
        as_of,
        state.config.cashback_rate_bps,
        status,
    );

    let dto = CashbackAccountDto {
        master_data_id: record.id,
        cashback_status: accrual.cashback_status,
        total_purchase: record.purchase_amount,
        purchase_date: record.purchase_date,
        expected_monthly_cashback_amount: accrual.expected_monthly_cashback_amount,
        missed_cashback_count: accrual.missed_cashback_count,
        missed_cashback_amount: accrual.missed_cashback_amount,
        next_due_date: accrual.next_due_date,
    };

    Ok(ApiResponse::success("OK", dto, None))
}

pub async fn list_payments(
    state: &AppState,
    id: Uuid,
) -> AppResult<ApiResponse<CashbackPaymentList>> {
    let exists = MasterData::find_by_id(id).one(&state.orm).await?;
    if exists.is_none() {
        return Err(AppError::NotFound);
    }

    let items = CashbackPayments::find()
        .filter(PaymentCol::MasterDataId.eq(id))
        .order_by_desc(PaymentCol::PaymentDate)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(payment_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Payments",
        CashbackPaymentList { items },
        Some(Meta::empty()),
    ))
}

/// Append a cashback payment. One payment consumes one calendar month's
/// obligation, so a second payment in an already-satisfied month is a 409
/// regardless of what the client allowed.
pub async fn record_payment(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: RecordCashbackPaymentRequest,
) -> AppResult<ApiResponse<CashbackPayment>> {
    if payload.amount <= 0 {
        return Err(AppError::Validation("amount must be greater than 0".into()));
    }
    let today = Utc::now().date_naive();
    if payload.payment_date > today {
        return Err(AppError::Validation(
            "payment date cannot be in the future".into(),
        ));
    }

    let txn = state.orm.begin().await?;

    let record = MasterData::find_by_id(id)
        .lock(LockType::Update)
        .one(&txn)
        .await?;
    let record = match record {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    if payload.payment_date < record.purchase_date {
        return Err(AppError::Validation(
            "payment date cannot precede the purchase date".into(),
        ));
    }

    if CashbackStatus::parse(&record.cashback_status)? == CashbackStatus::Inactive {
        return Err(AppError::Conflict("cashback account is closed".into()));
    }

    let payment_dates: Vec<chrono::NaiveDate> = CashbackPayments::find()
        .filter(PaymentCol::MasterDataId.eq(id))
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| p.payment_date)
        .collect();

    if accrual::month_satisfied(&payment_dates, payload.payment_date) {
        return Err(AppError::Conflict(
            "a payment already exists for this month".into(),
        ));
    }

    let payment = PaymentActive {
        id: Set(Uuid::new_v4()),
        master_data_id: Set(id),
        amount: Set(payload.amount),
        payment_date: Set(payload.payment_date),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    MasterData::update_many()
        .col_expr(
            RecordCol::CashbackAmount,
            Expr::col(RecordCol::CashbackAmount).add(payload.amount),
        )
        .col_expr(
            RecordCol::DueAmount,
            Expr::col(RecordCol::DueAmount).sub(payload.amount),
        )
        .filter(RecordCol::Id.eq(id))
        .exec(&txn)
        .await?;

    Areas::update_many()
        .col_expr(
            AreaCol::CashbackAmount,
            Expr::col(AreaCol::CashbackAmount).add(payload.amount),
        )
        .col_expr(
            AreaCol::DueAmount,
            Expr::col(AreaCol::DueAmount).sub(payload.amount),
        )
        .filter(AreaCol::Id.eq(record.area_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cashback_payment",
        Some("cashback_payments"),
        Some(serde_json::json!({ "record_id": id, "amount": payload.amount })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Payment recorded",
        payment_from_entity(payment),
        Some(Meta::empty()),
    ))
}

/// Administrative open/close of the account. Closed accounts reject further
/// payments.
pub async fn update_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateCashbackStatusRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let record = MasterData::find_by_id(id).one(&state.orm).await?;
    let record = match record {
        Some(r) => r,
        None => return Err(AppError::NotFound),
    };

    let mut active: RecordActive = record.into();
    active.cashback_status = Set(payload.status.as_str().to_string());
    active.update(&state.orm).await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "cashback_status_update",
        Some("master_data"),
        Some(serde_json::json!({ "record_id": id, "status": payload.status.as_str() })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Status updated",
        serde_json::json!({ "status": payload.status.as_str() }),
        Some(Meta::empty()),
    ))
}

fn payment_from_entity(model: PaymentModel) -> CashbackPayment {
    CashbackPayment {
        id: model.id,
        master_data_id: model.master_data_id,
        amount: model.amount,
        payment_date: model.payment_date,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
