use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AreaDailySummaryRow {
    pub area_id: Uuid,
    pub area_name: String,
    pub total_purchase: i64,
    pub total_quantity: i64,
    pub cashback_quantity: i64,
    pub total_cashback: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AreaDailySummary {
    pub items: Vec<AreaDailySummaryRow>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OverallSummary {
    pub total_purchase: i64,
    pub total_paid: i64,
    pub total_due: i64,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_purchase: i64,
    pub total_paid: i64,
    pub total_due: i64,
    pub paid_percent: f64,
    pub total_cashback_paid: i64,
    pub total_consumers: i64,
    pub average_purchase: f64,
}
