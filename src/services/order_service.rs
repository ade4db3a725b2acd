use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::LockType;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, JoinType, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::{ActiveModelTrait, ConnectionTrait};
use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::orders::{CreateOrderRequest, OrderList, OrderWithItems},
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{
            ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems,
            Model as OrderItemModel,
        },
        order_status_history::{
            ActiveModel as HistoryActive, Column as HistoryCol, Entity as OrderStatusHistory,
        },
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Column as ProdCol, Entity as Products},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus, OrderStatusChange},
    pricing::{self, PricedLine},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    state::AppState,
};

/// Snapshot the cart into a PLACED order: price it, copy the lines, reduce
/// stock, clear the cart and record the first status history row, all in one
/// transaction.
pub async fn create_order(
    state: &AppState,
    user: &AuthUser,
    payload: CreateOrderRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let shipping_address = payload.shipping_address.trim().to_string();
    if shipping_address.is_empty() {
        return Err(AppError::Validation("shipping address is required".into()));
    }

    let txn = state.orm.begin().await?;

    // Inner join: FOR UPDATE cannot lock the nullable side of an outer join,
    // and a cart row without a product would be invalid anyway.
    #[derive(Debug, FromQueryResult)]
    struct CartProductRow {
        #[sea_orm(column_name = "cart_items.product_id")]
        product_id: Uuid,
        #[sea_orm(column_name = "cart_items.quantity")]
        quantity: i32,
        #[sea_orm(column_name = "products.price")]
        price: i64,
        #[sea_orm(column_name = "products.stock")]
        stock: i32,
    }

    let rows = CartItems::find()
        .select_only()
        .column_as(CartCol::ProductId, "cart_items.product_id")
        .column_as(CartCol::Quantity, "cart_items.quantity")
        .join(JoinType::InnerJoin, CartItems::belongs_to(Products).into())
        .column_as(ProdCol::Price, "products.price")
        .column_as(ProdCol::Stock, "products.stock")
        .filter(CartCol::UserId.eq(user.user_id))
        .lock(LockType::Update)
        .into_model::<CartProductRow>()
        .all(&txn)
        .await?;

    if rows.is_empty() {
        return Err(AppError::Validation("cart is empty".into()));
    }

    let mut lines: Vec<(Uuid, PricedLine)> = Vec::with_capacity(rows.len());
    for row in &rows {
        if row.quantity <= 0 {
            return Err(AppError::Validation("cart has invalid quantity".into()));
        }
        if row.stock < row.quantity {
            return Err(AppError::Validation(format!(
                "insufficient stock for product {}",
                row.product_id
            )));
        }
        lines.push((
            row.product_id,
            PricedLine {
                price: row.price,
                quantity: row.quantity,
            },
        ));
    }

    let priced: Vec<PricedLine> = lines.iter().map(|(_, line)| *line).collect();
    let totals = pricing::compute_totals(&priced, &shipping_address, &state.config.shipping_policy());

    let order_id = Uuid::new_v4();
    let order = OrderActive {
        id: Set(order_id),
        user_id: Set(user.user_id),
        status: Set(OrderStatus::Placed.as_str().to_string()),
        subtotal: Set(totals.subtotal),
        shipping_fee: Set(totals.shipping_fee),
        total_amount: Set(totals.total),
        shipping_address: Set(shipping_address),
        order_date: NotSet,
        updated_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut order_items: Vec<OrderItem> = Vec::new();
    for (product_id, line) in &lines {
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(*product_id),
            quantity: Set(line.quantity),
            price: Set(line.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        order_items.push(order_item_from_entity(item));

        Products::update_many()
            .col_expr(
                ProdCol::Stock,
                sea_orm::sea_query::Expr::col(ProdCol::Stock).sub(line.quantity),
            )
            .filter(ProdCol::Id.eq(*product_id))
            .exec(&txn)
            .await?;
    }

    record_status_change(&txn, order.id, OrderStatus::Placed).await?;

    CartItems::delete_many()
        .filter(CartCol::UserId.eq(user.user_id))
        .exec(&txn)
        .await?;

    txn.commit().await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "order_placed",
        Some("orders"),
        Some(serde_json::json!({ "order_id": order.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    let order = order_from_entity(order)?;
    let history = vec![OrderStatusChange {
        status: OrderStatus::Placed,
        changed_at: order.order_date,
    }];

    Ok(ApiResponse::success(
        "Order placed",
        OrderWithItems {
            order,
            items: order_items,
            history,
        },
        Some(Meta::empty()),
    ))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination.normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
    if let Some(status) = query.status.as_ref().filter(|s| !s.is_empty()) {
        let status = OrderStatus::parse(status)?;
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let finder = Orders::find()
        .filter(condition)
        .order_by_desc(OrderCol::OrderDate);

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(order_from_entity)
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Ok",
        OrderList { items: orders },
        Some(meta),
    ))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let data = load_order_details(&state.orm, order).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

pub(crate) async fn record_status_change<C: ConnectionTrait>(
    conn: &C,
    order_id: Uuid,
    status: OrderStatus,
) -> AppResult<()> {
    HistoryActive {
        id: Set(Uuid::new_v4()),
        order_id: Set(order_id),
        status: Set(status.as_str().to_string()),
        changed_at: Set(Utc::now().into()),
    }
    .insert(conn)
    .await?;
    Ok(())
}

pub(crate) async fn load_order_details<C: ConnectionTrait>(
    conn: &C,
    order: OrderModel,
) -> AppResult<OrderWithItems> {
    let items = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(order.id))
        .all(conn)
        .await?
        .into_iter()
        .map(order_item_from_entity)
        .collect();

    let history = OrderStatusHistory::find()
        .filter(HistoryCol::OrderId.eq(order.id))
        .order_by_asc(HistoryCol::ChangedAt)
        .all(conn)
        .await?
        .into_iter()
        .map(|row| {
            Ok(OrderStatusChange {
                status: OrderStatus::parse(&row.status)?,
                changed_at: row.changed_at.with_timezone(&Utc),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    Ok(OrderWithItems {
        order: order_from_entity(order)?,
        items,
        history,
    })
}

pub(crate) fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        status: OrderStatus::parse(&model.status)?,
        subtotal: model.subtotal,
        shipping_fee: model.shipping_fee,
        total_amount: model.total_amount,
        shipping_address: model.shipping_address,
        order_date: model.order_date.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
    })
}

pub(crate) fn order_item_from_entity(model: OrderItemModel) -> OrderItem {
    OrderItem {
        id: model.id,
        order_id: model.order_id,
        product_id: model.product_id,
        quantity: model.quantity,
        price: model.price,
        created_at: model.created_at.with_timezone(&Utc),
    }
}
