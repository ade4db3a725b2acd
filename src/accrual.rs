//! Cashback accrual. Pure calendar arithmetic over a purchase record and its
//! recorded payments; the service layer owns persistence and validation.
//!
//! One payment satisfies one calendar month. Obligation months start the
//! month after the purchase and run up to, but not including, the as-of
//! month: the running month can still be paid, so it is never counted as
//! missed.

use chrono::{Datelike, NaiveDate};

use crate::models::CashbackStatus;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccrualStatus {
    pub expected_monthly_cashback_amount: i64,
    pub missed_cashback_count: i64,
    pub missed_cashback_amount: i64,
    pub next_due_date: NaiveDate,
    pub cashback_status: CashbackStatus,
}

/// Monthly cashback owed on a purchase, in whole currency units.
/// `rate_bps` is basis points of the purchase amount.
pub fn expected_monthly(purchase_amount: i64, rate_bps: i64) -> i64 {
    purchase_amount * rate_bps / 10_000
}

fn month_index(date: NaiveDate) -> i64 {
    i64::from(date.year()) * 12 + i64::from(date.month0())
}

fn first_of_month(index: i64) -> NaiveDate {
    let year = index.div_euclid(12);
    let month = index.rem_euclid(12) + 1;
    NaiveDate::from_ymd_opt(year as i32, month as u32, 1).expect("first of month")
}

/// Whether the calendar month of `date` already has a recorded payment.
pub fn month_satisfied(payment_dates: &[NaiveDate], date: NaiveDate) -> bool {
    let target = month_index(date);
    payment_dates.iter().any(|p| month_index(*p) == target)
}

pub fn compute_status(
    purchase_amount: i64,
    purchase_date: NaiveDate,
    payment_dates: &[NaiveDate],
    as_of: NaiveDate,
    rate_bps: i64,
    status: CashbackStatus,
) -> AccrualStatus {
    let monthly = expected_monthly(purchase_amount, rate_bps);

    let start = month_index(purchase_date) + 1;
    let end = month_index(as_of);
    let mut missed = 0i64;
    let mut month = start;
    while month < end {
        if !payment_dates.iter().any(|p| month_index(*p) == month) {
            missed += 1;
        }
        month += 1;
    }

    let anchor = payment_dates
        .iter()
        .copied()
        .max()
        .unwrap_or(purchase_date);
    let next_due_date = first_of_month(month_index(anchor) + 1);

    AccrualStatus {
        expected_monthly_cashback_amount: monthly,
        missed_cashback_count: missed,
        missed_cashback_amount: missed * monthly,
        next_due_date,
        cashback_status: status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn expected_monthly_uses_basis_points() {
        assert_eq!(expected_monthly(10_000, 500), 500);
        assert_eq!(expected_monthly(25_000, 500), 1_250);
        assert_eq!(expected_monthly(0, 500), 0);
    }

    #[test]
    fn no_payments_counts_every_elapsed_month() {
        let status = compute_status(
            10_000,
            d(2025, 1, 15),
            &[],
            d(2025, 4, 10),
            500,
            CashbackStatus::Active,
        );
        // February and March missed; April is still running.
        assert_eq!(status.missed_cashback_count, 2);
        assert_eq!(status.missed_cashback_amount, 1_000);
        assert_eq!(status.next_due_date, d(2025, 2, 1));
        assert_eq!(status.cashback_status, CashbackStatus::Active);
    }

    #[test]
    fn a_payment_satisfies_its_calendar_month() {
        let status = compute_status(
            10_000,
            d(2025, 1, 15),
            &[d(2025, 2, 20)],
            d(2025, 4, 10),
            500,
            CashbackStatus::Active,
        );
        assert_eq!(status.missed_cashback_count, 1);
        assert_eq!(status.missed_cashback_amount, 500);
        assert_eq!(status.next_due_date, d(2025, 3, 1));
    }

    #[test]
    fn fully_paid_account_has_no_missed_months() {
        let status = compute_status(
            10_000,
            d(2025, 1, 15),
            &[d(2025, 2, 5), d(2025, 3, 28)],
            d(2025, 4, 10),
            500,
            CashbackStatus::Active,
        );
        assert_eq!(status.missed_cashback_count, 0);
        assert_eq!(status.missed_cashback_amount, 0);
        assert_eq!(status.next_due_date, d(2025, 4, 1));
    }

    #[test]
    fn purchase_month_carries_no_obligation() {
        let status = compute_status(
            10_000,
            d(2025, 3, 2),
            &[],
            d(2025, 3, 30),
            500,
            CashbackStatus::Active,
        );
        assert_eq!(status.missed_cashback_count, 0);
        assert_eq!(status.next_due_date, d(2025, 4, 1));
    }

    #[test]
    fn december_rolls_over_to_january() {
        let status = compute_status(
            10_000,
            d(2024, 12, 20),
            &[],
            d(2025, 2, 1),
            500,
            CashbackStatus::Active,
        );
        assert_eq!(status.missed_cashback_count, 1);
        assert_eq!(status.next_due_date, d(2025, 1, 1));
    }

    #[test]
    fn month_satisfaction_checks_calendar_month() {
        let payments = [d(2025, 2, 5)];
        assert!(month_satisfied(&payments, d(2025, 2, 28)));
        assert!(!month_satisfied(&payments, d(2025, 3, 1)));
    }

    #[test]
    fn inactive_status_is_preserved() {
        let status = compute_status(
            10_000,
            d(2025, 1, 15),
            &[],
            d(2025, 2, 10),
            500,
            CashbackStatus::Inactive,
        );
        assert_eq!(status.cashback_status, CashbackStatus::Inactive);
    }
}
