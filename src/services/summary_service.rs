use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    dto::summary::{AreaDailySummary, AreaDailySummaryRow, DashboardSummary, OverallSummary},
    error::AppResult,
    response::{ApiResponse, Meta},
    state::AppState,
};

#[derive(FromRow)]
struct DailyRow {
    area_id: Uuid,
    area_name: String,
    total_purchase: i64,
    total_quantity: i64,
    cashback_quantity: i64,
    total_cashback: i64,
}

/// Per-area activity for one calendar day. Areas with no activity at all are
/// suppressed at read time, not deleted.
pub async fn daily_area_summary(
    state: &AppState,
    date: NaiveDate,
) -> AppResult<ApiResponse<AreaDailySummary>> {
    let rows = sqlx::query_as::<_, DailyRow>(
        r#"
        SELECT a.id AS area_id,
               a.name AS area_name,
               COALESCE(p.total_purchase, 0)::BIGINT AS total_purchase,
               COALESCE(p.total_quantity, 0)::BIGINT AS total_quantity,
               COALESCE(c.cashback_quantity, 0)::BIGINT AS cashback_quantity,
               COALESCE(c.total_cashback, 0)::BIGINT AS total_cashback
        FROM areas a
        LEFT JOIN (
            SELECT area_id, SUM(purchase_amount) AS total_purchase, COUNT(*) AS total_quantity
            FROM master_data
            WHERE purchase_date = $1
            GROUP BY area_id
        ) p ON p.area_id = a.id
        LEFT JOIN (
            SELECT md.area_id, COUNT(*) AS cashback_quantity, SUM(cp.amount) AS total_cashback
            FROM cashback_payments cp
            JOIN master_data md ON md.id = cp.master_data_id
            WHERE cp.payment_date = $1
            GROUP BY md.area_id
        ) c ON c.area_id = a.id
        ORDER BY a.name
        "#,
    )
    .bind(date)
    .fetch_all(&state.pool)
    .await?;

    let items = rows
        .into_iter()
        .map(|row| AreaDailySummaryRow {
            area_id: row.area_id,
            area_name: row.area_name,
            total_purchase: row.total_purchase,
            total_quantity: row.total_quantity,
            cashback_quantity: row.cashback_quantity,
            total_cashback: row.total_cashback,
        })
        .filter(has_activity)
        .collect();

    Ok(ApiResponse::success(
        "Daily area summary",
        AreaDailySummary { items },
        Some(Meta::empty()),
    ))
}

pub async fn overall_summary(state: &AppState) -> AppResult<ApiResponse<OverallSummary>> {
    let totals: (i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(purchase_amount), 0)::BIGINT,
               COALESCE(SUM(paid_amount), 0)::BIGINT,
               COALESCE(SUM(due_amount), 0)::BIGINT
        FROM master_data
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success(
        "Overall summary",
        OverallSummary {
            total_purchase: totals.0,
            total_paid: totals.1,
            total_due: totals.2,
        },
        None,
    ))
}

pub async fn dashboard_summary(state: &AppState) -> AppResult<ApiResponse<DashboardSummary>> {
    let totals: (i64, i64, i64, i64) = sqlx::query_as(
        r#"
        SELECT COALESCE(SUM(purchase_amount), 0)::BIGINT,
               COALESCE(SUM(paid_amount), 0)::BIGINT,
               COALESCE(SUM(due_amount), 0)::BIGINT,
               COUNT(*)::BIGINT
        FROM master_data
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    let cashback_paid: (i64,) =
        sqlx::query_as("SELECT COALESCE(SUM(amount), 0)::BIGINT FROM cashback_payments")
            .fetch_one(&state.pool)
            .await?;

    let (total_purchase, total_paid, total_due, total_consumers) = totals;

    Ok(ApiResponse::success(
        "Dashboard summary",
        DashboardSummary {
            total_purchase,
            total_paid,
            total_due,
            paid_percent: paid_percent(total_paid, total_purchase),
            total_cashback_paid: cashback_paid.0,
            total_consumers,
            average_purchase: average_purchase(total_purchase, total_consumers),
        },
        None,
    ))
}

fn has_activity(row: &AreaDailySummaryRow) -> bool {
    row.total_purchase > 0
        || row.total_quantity > 0
        || row.cashback_quantity > 0
        || row.total_cashback > 0
}

fn paid_percent(total_paid: i64, total_purchase: i64) -> f64 {
    if total_purchase == 0 {
        return 0.0;
    }
    total_paid as f64 / total_purchase as f64 * 100.0
}

fn average_purchase(total_purchase: i64, total_consumers: i64) -> f64 {
    if total_consumers == 0 {
        return 0.0;
    }
    total_purchase as f64 / total_consumers as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(purchase: i64, quantity: i64, cb_qty: i64, cashback: i64) -> AreaDailySummaryRow {
        AreaDailySummaryRow {
            area_id: Uuid::new_v4(),
            area_name: "Mirpur".into(),
            total_purchase: purchase,
            total_quantity: quantity,
            cashback_quantity: cb_qty,
            total_cashback: cashback,
        }
    }

    #[test]
    fn all_zero_rows_are_suppressed() {
        assert!(!has_activity(&row(0, 0, 0, 0)));
    }

    #[test]
    fn any_nonzero_measure_keeps_the_row() {
        assert!(has_activity(&row(100, 0, 0, 0)));
        assert!(has_activity(&row(0, 1, 0, 0)));
        assert!(has_activity(&row(0, 0, 2, 0)));
        assert!(has_activity(&row(0, 0, 0, 50)));
    }

    #[test]
    fn paid_percent_guards_division_by_zero() {
        assert_eq!(paid_percent(500, 0), 0.0);
        assert_eq!(paid_percent(500, 1000), 50.0);
    }

    #[test]
    fn average_purchase_guards_division_by_zero() {
        assert_eq!(average_purchase(1000, 0), 0.0);
        assert_eq!(average_purchase(1000, 4), 250.0);
    }
}
