pub mod areas;
pub mod auth;
pub mod cart;
pub mod cashback;
pub mod master_data;
pub mod orders;
pub mod summary;
