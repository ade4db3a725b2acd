use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod areas;
pub mod auth;
pub mod cart;
pub mod cashback;
pub mod dashboard;
pub mod doc;
pub mod health;
pub mod master_data;
pub mod orders;
pub mod params;
pub mod products;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/products", products::router())
        .nest("/auth", auth::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest("/admin", admin::router())
        .nest("/areas", areas::router())
        .nest("/master-data", master_data::router())
        .nest("/cashback", cashback::router())
        .nest("/dashboard", dashboard::router())
}
