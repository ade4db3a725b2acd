pub mod admin_service;
pub mod area_service;
pub mod auth_service;
pub mod cart_service;
pub mod cashback_service;
pub mod master_data_service;
pub mod order_service;
pub mod product_service;
pub mod summary_service;
