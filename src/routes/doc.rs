use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        areas::{AreaList, CreateAreaRequest},
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        cart::{AddToCartRequest, CartEstimate, CartItemDto, CartList, UpdateCartRequest},
        cashback::{
            CashbackAccountDto, CashbackPaymentList, RecordCashbackPaymentRequest,
            UpdateCashbackStatusRequest,
        },
        master_data::{CreateMasterDataRequest, MasterDataList, RecordLedgerPaymentRequest},
        orders::{CreateOrderRequest, OrderList, OrderWithItems},
        summary::{AreaDailySummary, AreaDailySummaryRow, DashboardSummary, OverallSummary},
    },
    models::{
        Area, CartItem, CashbackPayment, MasterDataRecord, Order, OrderItem, OrderStatusChange,
        Product, User,
    },
    response::{ApiResponse, Meta},
    routes::{
        admin, areas, auth, cart, cashback, dashboard, health, master_data, orders, params,
        products as product_routes,
    },
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::me,
        cart::cart_list,
        cart::add_to_cart,
        cart::update_quantity,
        cart::remove_from_cart,
        cart::estimate,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        orders::list_orders,
        orders::create_order,
        orders::get_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        areas::list_areas,
        areas::create_area,
        areas::delete_area,
        areas::daily_summary,
        master_data::list_records,
        master_data::create_record,
        master_data::get_record,
        master_data::record_payment,
        master_data::overall_summary,
        cashback::get_account,
        cashback::list_payments,
        cashback::record_payment,
        cashback::update_status,
        dashboard::summary
    ),
    components(
        schemas(
            User,
            Product,
            CartItem,
            Order,
            OrderItem,
            OrderStatusChange,
            Area,
            MasterDataRecord,
            CashbackPayment,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            UpdateCartRequest,
            CartItemDto,
            CartList,
            CartEstimate,
            CreateOrderRequest,
            OrderList,
            OrderWithItems,
            CreateAreaRequest,
            AreaList,
            CreateMasterDataRequest,
            RecordLedgerPaymentRequest,
            MasterDataList,
            CashbackAccountDto,
            RecordCashbackPaymentRequest,
            UpdateCashbackStatusRequest,
            CashbackPaymentList,
            AreaDailySummaryRow,
            AreaDailySummary,
            OverallSummary,
            DashboardSummary,
            admin::UpdateOrderStatusRequest,
            product_routes::CreateProductRequest,
            product_routes::UpdateProductRequest,
            product_routes::ProductList,
            params::Pagination,
            params::OrderListQuery,
            params::AdminOrderListQuery,
            params::MasterDataQuery,
            params::DailySummaryQuery,
            params::CartEstimateQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<AreaList>,
            ApiResponse<MasterDataList>,
            ApiResponse<CashbackAccountDto>,
            ApiResponse<DashboardSummary>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Products", description = "Product catalog endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Order endpoints"),
        (name = "Admin", description = "Admin endpoints"),
        (name = "Areas", description = "Area endpoints"),
        (name = "MasterData", description = "Purchase ledger endpoints"),
        (name = "Cashback", description = "Cashback account endpoints"),
        (name = "Dashboard", description = "Dashboard aggregate endpoints"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
