use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Area;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAreaRequest {
    pub name: String,
    #[serde(default)]
    pub purchase_amount: i64,
    #[serde(default)]
    pub paid_amount: i64,
    #[serde(default)]
    pub cashback_amount: i64,
    #[serde(default)]
    pub package_quantity: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AreaList {
    pub items: Vec<Area>,
}
