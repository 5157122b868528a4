//! Late-fee schedule.
//!
//! Overdue days are counted between calendar dates (UTC), so a book due at
//! 23:00 and returned at 01:00 the next morning is one day late.
//!
//! | days overdue | fee                         |
//! |--------------|-----------------------------|
//! | 0            | 0.00                        |
//! | 1..=7        | 0.50 per day                |
//! | 8 and more   | 3.50 + 1.00 per day after 7 |
//!
//! The fee for a single book never exceeds [`MAX_LATE_FEE`].

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

pub const FIRST_WEEK_DAYS: u32 = 7;
pub const FIRST_WEEK_DAILY_FEE: Decimal = dec!(0.50);
pub const LATER_DAILY_FEE: Decimal = dec!(1.00);
pub const MAX_LATE_FEE: Decimal = dec!(15.00);

/// Overdue days and the fee they cost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LateFee {
    pub days_overdue: u32,
    pub amount: Decimal,
}

impl LateFee {
    pub const NONE: Self = Self {
        days_overdue: 0,
        amount: Decimal::ZERO,
    };

    /// Applies the schedule to a loan due at `due_date`, evaluated at `now`.
    pub fn assess(due_date: DateTime<Utc>, now: DateTime<Utc>) -> Self {
        let days = (now.date_naive() - due_date.date_naive()).num_days();
        let days_overdue = u32::try_from(days.max(0)).unwrap_or(u32::MAX);
        Self {
            days_overdue,
            amount: fee_for_days(days_overdue),
        }
    }

    pub fn is_due(&self) -> bool {
        self.days_overdue > 0 && self.amount > Decimal::ZERO
    }
}

/// Fee owed for `days_overdue` days, capped and rounded to cents.
pub fn fee_for_days(days_overdue: u32) -> Decimal {
    let days = Decimal::from(days_overdue);
    let fee = if days_overdue == 0 {
        Decimal::ZERO
    } else if days_overdue <= FIRST_WEEK_DAYS {
        days * FIRST_WEEK_DAILY_FEE
    } else {
        Decimal::from(FIRST_WEEK_DAYS) * FIRST_WEEK_DAILY_FEE
            + (days - Decimal::from(FIRST_WEEK_DAYS)) * LATER_DAILY_FEE
    };
    fee.min(MAX_LATE_FEE).round_dp(2)
}

/// Outcome of looking up the fee for one patron/book pair.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub enum AssessmentStatus {
    #[serde(rename = "OK")]
    Ok,
    #[serde(rename = "Invalid patron ID")]
    InvalidPatronId,
    #[serde(rename = "Borrow record not found")]
    RecordNotFound,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
pub struct FeeAssessment {
    pub days_overdue: u32,
    pub fee_amount: Decimal,
    pub status: AssessmentStatus,
}

impl FeeAssessment {
    pub fn assessed(fee: LateFee) -> Self {
        Self {
            days_overdue: fee.days_overdue,
            fee_amount: fee.amount,
            status: AssessmentStatus::Ok,
        }
    }

    /// A zero assessment explaining why no fee could be looked up.
    pub fn unavailable(status: AssessmentStatus) -> Self {
        Self {
            days_overdue: 0,
            fee_amount: Decimal::ZERO,
            status,
        }
    }
}
