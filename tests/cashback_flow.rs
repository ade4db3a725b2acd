use chrono::{Datelike, NaiveDate, Utc};
use commerce_ledger_api::{
    config::AppConfig,
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        areas::CreateAreaRequest,
        cashback::{RecordCashbackPaymentRequest, UpdateCashbackStatusRequest},
        master_data::{CreateMasterDataRequest, RecordLedgerPaymentRequest},
    },
    entity::users::ActiveModel as UserActive,
    error::AppError,
    middleware::auth::AuthUser,
    models::{Area, CashbackStatus, MasterDataRecord, Role},
    services::{area_service, cashback_service, master_data_service, summary_service},
    state::AppState,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set, Statement};
use uuid::Uuid;

// Integration flow: a purchase record accrues cashback month by month,
// payments roll up into the owning area, and the area ledger invariant
// (due = purchase - paid - cashback) holds after every write.
#[tokio::test]
async fn cashback_accrual_and_ledger_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin_id = create_user(&state, "Admin", "admin@example.com", "ADMIN").await?;
    let customer_id = create_user(&state, "Customer", "user@example.com", "CUSTOMER").await?;
    let auth_admin = AuthUser {
        user_id: admin_id,
        role: Role::Admin,
    };
    let auth_customer = AuthUser {
        user_id: customer_id,
        role: Role::Customer,
    };

    let area = area_service::create_area(
        &state,
        &auth_admin,
        CreateAreaRequest {
            name: "Mirpur".into(),
            purchase_amount: 0,
            paid_amount: 0,
            cashback_amount: 0,
            package_quantity: 0,
        },
    )
    .await?
    .data
    .unwrap();

    let today = Utc::now().date_naive();
    // First of the month three months back keeps the arithmetic stable
    // regardless of the day this test runs.
    let purchase_date = month_shift(today, -3);

    let record = master_data_service::create_record(
        &state,
        &auth_admin,
        CreateMasterDataRequest {
            area_id: area.id,
            name: "Rahim Uddin".into(),
            nid: Some("1990123456789".into()),
            phone: Some("01700000000".into()),
            payment_method: Some("cash".into()),
            purchase_date,
            purchase_amount: 10_000,
            paid_amount: 4_000,
        },
    )
    .await?
    .data
    .unwrap();

    assert_eq!(record.due_amount, 6_000);
    assert_eq!(record.cashback_amount, 0);

    // The area rolled the record up.
    let area_row = fetch_area(&state, area.id).await?;
    assert_eq!(area_row.purchase_amount, 10_000);
    assert_eq!(area_row.paid_amount, 4_000);
    assert_eq!(area_row.due_amount, 6_000);
    assert_eq!(area_row.package_quantity, 1);

    // Two whole months have elapsed with no payment; the running month is
    // payable, not missed.
    let account = cashback_service::get_account(&state, record.id)
        .await?
        .data
        .unwrap();
    assert_eq!(account.expected_monthly_cashback_amount, 500);
    assert_eq!(account.missed_cashback_count, 2);
    assert_eq!(account.missed_cashback_amount, 1_000);
    assert_eq!(account.next_due_date, month_shift(today, -2));
    assert_eq!(account.cashback_status, CashbackStatus::Active);

    // Pay the running month.
    cashback_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordCashbackPaymentRequest {
            amount: 500,
            payment_date: today,
        },
    )
    .await?;

    let record_row = fetch_record(&state, record.id).await?;
    assert_eq!(record_row.cashback_amount, 500);
    assert_eq!(record_row.due_amount, 5_500);

    let area_row = fetch_area(&state, area.id).await?;
    assert_eq!(area_row.cashback_amount, 500);
    assert_eq!(
        area_row.due_amount,
        area_row.purchase_amount - area_row.paid_amount - area_row.cashback_amount
    );

    // Same calendar month again is a conflict.
    let err = cashback_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordCashbackPaymentRequest {
            amount: 500,
            payment_date: today,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Post-dated payments never enter the ledger.
    let err = cashback_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordCashbackPaymentRequest {
            amount: 500,
            payment_date: today + chrono::Days::new(40),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A payment older than the purchase itself would anchor the next due
    // date before the purchase; it never enters the ledger.
    let err = cashback_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordCashbackPaymentRequest {
            amount: 500,
            payment_date: purchase_date - chrono::Days::new(1),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // Paying the running month does not rewrite history.
    let account = cashback_service::get_account(&state, record.id)
        .await?
        .data
        .unwrap();
    assert_eq!(account.missed_cashback_count, 2);
    assert_eq!(account.next_due_date, month_shift(today, 1));

    // A due-clearing payment moves paid, not cashback.
    master_data_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordLedgerPaymentRequest { amount: 1_000 },
    )
    .await?;

    let record_row = fetch_record(&state, record.id).await?;
    assert_eq!(record_row.paid_amount, 5_000);
    assert_eq!(record_row.due_amount, 4_500);

    let overall = summary_service::overall_summary(&state).await?.data.unwrap();
    assert_eq!(overall.total_purchase, 10_000);
    assert_eq!(overall.total_paid, 5_000);
    assert_eq!(overall.total_due, 4_500);

    let dashboard = summary_service::dashboard_summary(&state)
        .await?
        .data
        .unwrap();
    assert_eq!(dashboard.total_consumers, 1);
    assert_eq!(dashboard.total_cashback_paid, 500);
    assert!((dashboard.paid_percent - 50.0).abs() < f64::EPSILON);
    assert!((dashboard.average_purchase - 10_000.0).abs() < f64::EPSILON);

    // The purchase day shows activity; the day before does not.
    let active_day = summary_service::daily_area_summary(&state, purchase_date)
        .await?
        .data
        .unwrap();
    let row = active_day
        .items
        .iter()
        .find(|r| r.area_id == area.id)
        .expect("area row on purchase day");
    assert_eq!(row.total_purchase, 10_000);
    assert_eq!(row.total_quantity, 1);
    assert_eq!(row.total_cashback, 0);

    let quiet_day = summary_service::daily_area_summary(
        &state,
        purchase_date - chrono::Days::new(1),
    )
    .await?
    .data
    .unwrap();
    assert!(quiet_day.items.iter().all(|r| r.area_id != area.id));

    // Areas with records cannot be deleted.
    let err = area_service::delete_area(&state, &auth_admin, area.id)
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    // Only admins flip the account status.
    let err = cashback_service::update_status(
        &state,
        &auth_customer,
        record.id,
        UpdateCashbackStatusRequest {
            status: CashbackStatus::Inactive,
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Forbidden));

    cashback_service::update_status(
        &state,
        &auth_admin,
        record.id,
        UpdateCashbackStatusRequest {
            status: CashbackStatus::Inactive,
        },
    )
    .await?;

    // A closed account rejects payments even for unsatisfied months.
    let err = cashback_service::record_payment(
        &state,
        &auth_admin,
        record.id,
        RecordCashbackPaymentRequest {
            amount: 500,
            payment_date: month_shift(today, -1),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, AppError::Conflict(_)));

    Ok(())
}

/// First day of the month `delta` months away from `date`.
fn month_shift(date: NaiveDate, delta: i32) -> NaiveDate {
    let index = date.year() * 12 + date.month0() as i32 + delta;
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) as u32 + 1;
    NaiveDate::from_ymd_opt(year, month, 1).expect("first of month")
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE cashback_payments, master_data, areas, order_status_history, order_items, orders, cart_items, audit_logs, products, users RESTART IDENTITY CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        cashback_rate_bps: 500,
        metro_zone_keyword: "dhaka".into(),
        metro_shipping_fee: 60,
        standard_shipping_fee: 130,
    };
    Ok(AppState { pool, orm, config })
}

async fn create_user(
    state: &AppState,
    name: &str,
    email: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        name: Set(name.into()),
        email: Set(email.into()),
        phone: Set(None),
        address: Set(None),
        password_hash: Set("dummy".into()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(user.id)
}

async fn fetch_area(state: &AppState, id: Uuid) -> anyhow::Result<Area> {
    let area = sqlx::query_as::<_, Area>("SELECT * FROM areas WHERE id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    Ok(area)
}

async fn fetch_record(state: &AppState, id: Uuid) -> anyhow::Result<MasterDataRecord> {
    let record = sqlx::query_as::<_, MasterDataRecord>("SELECT * FROM master_data WHERE id = $1")
        .bind(id)
        .fetch_one(&state.pool)
        .await?;
    Ok(record)
}
