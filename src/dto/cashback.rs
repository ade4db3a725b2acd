use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{CashbackPayment, CashbackStatus};

/// Derived view of a purchase record's cashback position. Not stored;
/// computed from the record and its payment list on every read.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CashbackAccountDto {
    pub master_data_id: Uuid,
    pub cashback_status: CashbackStatus,
    pub total_purchase: i64,
    pub purchase_date: NaiveDate,
    pub expected_monthly_cashback_amount: i64,
    pub missed_cashback_count: i64,
    pub missed_cashback_amount: i64,
    pub next_due_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordCashbackPaymentRequest {
    pub amount: i64,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCashbackStatusRequest {
    pub status: CashbackStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CashbackPaymentList {
    pub items: Vec<CashbackPayment>,
}
