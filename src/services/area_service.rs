use uuid::Uuid;

use crate::{
    audit::log_audit,
    dto::areas::{AreaList, CreateAreaRequest},
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Area,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
};

pub async fn list_areas(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<AreaList>> {
    let (page, limit, offset) = pagination.normalize();
    let items =
        sqlx::query_as::<_, Area>("SELECT * FROM areas ORDER BY name LIMIT $1 OFFSET $2")
            .bind(limit)
            .bind(offset)
            .fetch_all(&state.pool)
            .await?;

    let total: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM areas")
        .fetch_one(&state.pool)
        .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Areas", AreaList { items }, Some(meta)))
}

/// Create an area. `due_amount` is always derived as
/// purchase - paid - cashback, never accepted from the caller.
pub async fn create_area(
    state: &AppState,
    user: &AuthUser,
    payload: CreateAreaRequest,
) -> AppResult<ApiResponse<Area>> {
    ensure_admin(user)?;
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    if payload.purchase_amount < 0 || payload.paid_amount < 0 || payload.cashback_amount < 0 {
        return Err(AppError::Validation("amounts must not be negative".into()));
    }

    let due_amount = payload.purchase_amount - payload.paid_amount - payload.cashback_amount;

    let area = sqlx::query_as::<_, Area>(
        r#"
        INSERT INTO areas (id, name, purchase_amount, paid_amount, due_amount, cashback_amount, package_quantity)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(payload.name.trim())
    .bind(payload.purchase_amount)
    .bind(payload.paid_amount)
    .bind(due_amount)
    .bind(payload.cashback_amount)
    .bind(payload.package_quantity)
    .fetch_one(&state.pool)
    .await?;

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "area_create",
        Some("areas"),
        Some(serde_json::json!({ "area_id": area.id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success("Area created", area, Some(Meta::empty())))
}

/// Delete an area. Blocked with 409 while any master-data record still
/// references it.
pub async fn delete_area(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;

    let referenced: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM master_data WHERE area_id = $1")
            .bind(id)
            .fetch_one(&state.pool)
            .await?;
    if referenced.0 > 0 {
        return Err(AppError::Conflict(
            "area is referenced by master data records".into(),
        ));
    }

    let result = sqlx::query("DELETE FROM areas WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::NotFound);
    }

    if let Err(err) = log_audit(
        &state.pool,
        Some(user.user_id),
        "area_delete",
        Some("areas"),
        Some(serde_json::json!({ "area_id": id })),
    )
    .await
    {
        tracing::warn!(error = %err, "audit log failed");
    }

    Ok(ApiResponse::success(
        "Area deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
