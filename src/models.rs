use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

/// User role carried in JWT claims. Unknown role strings are rejected at the
/// extractor boundary instead of being passed through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Customer,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Customer => "CUSTOMER",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "ADMIN" => Ok(Role::Admin),
            "CUSTOMER" => Ok(Role::Customer),
            _ => Err(AppError::Validation(format!("unknown role '{value}'"))),
        }
    }
}

/// Order lifecycle. Linear and forward-only: PLACED -> SHIPPED -> DELIVERED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Placed,
    Shipped,
    Delivered,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Placed => "PLACED",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "PLACED" => Ok(OrderStatus::Placed),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            _ => Err(AppError::Validation(format!(
                "unknown order status '{value}'"
            ))),
        }
    }

    /// The only legal transition target, if any.
    pub fn next(&self) -> Option<OrderStatus> {
        match self {
            OrderStatus::Placed => Some(OrderStatus::Shipped),
            OrderStatus::Shipped => Some(OrderStatus::Delivered),
            OrderStatus::Delivered => None,
        }
    }

    pub fn can_transition_to(&self, target: OrderStatus) -> bool {
        self.next() == Some(target)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum CashbackStatus {
    Active,
    Inactive,
}

impl CashbackStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CashbackStatus::Active => "ACTIVE",
            CashbackStatus::Inactive => "INACTIVE",
        }
    }

    pub fn parse(value: &str) -> Result<Self, AppError> {
        match value {
            "ACTIVE" => Ok(CashbackStatus::Active),
            "INACTIVE" => Ok(CashbackStatus::Inactive),
            _ => Err(AppError::Validation(format!(
                "unknown cashback status '{value}'"
            ))),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub user_id: Uuid,
    pub status: OrderStatus,
    pub subtotal: i64,
    pub shipping_fee: i64,
    pub total_amount: i64,
    pub shipping_address: String,
    pub order_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub price: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusChange {
    pub status: OrderStatus,
    pub changed_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Area {
    pub id: Uuid,
    pub name: String,
    pub purchase_amount: i64,
    pub paid_amount: i64,
    pub due_amount: i64,
    pub cashback_amount: i64,
    pub package_quantity: i64,
    pub created_at: DateTime<Utc>,
}

/// A consumer purchase record, owned by an area.
#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MasterDataRecord {
    pub id: Uuid,
    pub area_id: Uuid,
    pub name: String,
    pub nid: Option<String>,
    pub phone: Option<String>,
    pub payment_method: Option<String>,
    pub purchase_date: NaiveDate,
    pub purchase_amount: i64,
    pub paid_amount: i64,
    pub due_amount: i64,
    pub cashback_amount: i64,
    pub cashback_status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct CashbackPayment {
    pub id: Uuid,
    pub master_data_id: Uuid,
    pub amount: i64,
    pub payment_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_moves_forward_one_step() {
        assert!(OrderStatus::Placed.can_transition_to(OrderStatus::Shipped));
        assert!(OrderStatus::Shipped.can_transition_to(OrderStatus::Delivered));
    }

    #[test]
    fn order_status_rejects_backward_and_skipping() {
        assert!(!OrderStatus::Delivered.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Shipped.can_transition_to(OrderStatus::Placed));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Delivered));
        assert!(!OrderStatus::Placed.can_transition_to(OrderStatus::Placed));
    }

    #[test]
    fn delivered_is_terminal() {
        assert_eq!(OrderStatus::Delivered.next(), None);
    }

    #[test]
    fn unknown_status_words_are_rejected() {
        assert!(OrderStatus::parse("PENDING").is_err());
        assert!(OrderStatus::parse("PROCESSING").is_err());
        assert!(OrderStatus::parse("placed").is_err());
        assert_eq!(OrderStatus::parse("SHIPPED").unwrap(), OrderStatus::Shipped);
    }

    #[test]
    fn role_parsing_is_closed() {
        assert_eq!(Role::parse("ADMIN").unwrap(), Role::Admin);
        assert!(Role::parse("superuser").is_err());
    }
}
