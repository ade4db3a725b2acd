use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::MasterDataRecord;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMasterDataRequest {
    pub area_id: Uuid,
    pub name: String,
    pub nid: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub purchase_date: NaiveDate,
    pub purchase_amount: i64,
    #[serde(default)]
    pub paid_amount: i64,
}

/// A due-clearing payment against a purchase record. Adds to `paidAmount`
/// and rolls up into the owning area; distinct from cashback payments.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordLedgerPaymentRequest {
    pub amount: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MasterDataList {
    pub items: Vec<MasterDataRecord>,
}
