pub mod areas;
pub mod audit_logs;
pub mod cart_items;
pub mod cashback_payments;
pub mod master_data;
pub mod order_items;
pub mod order_status_history;
pub mod orders;
pub mod products;
pub mod users;

pub use areas::Entity as Areas;
pub use audit_logs::Entity as AuditLogs;
pub use cart_items::Entity as CartItems;
pub use cashback_payments::Entity as CashbackPayments;
pub use master_data::Entity as MasterData;
pub use order_items::Entity as OrderItems;
pub use order_status_history::Entity as OrderStatusHistory;
pub use orders::Entity as Orders;
pub use products::Entity as Products;
pub use users::Entity as Users;
