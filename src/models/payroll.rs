//! Payroll record, status, and period models.
//!
//! A [`Payroll`] is one employee's compensation for one month. Its
//! `final_salary` is derived and recomputed at every persist; its `status`
//! has no public setter and only the approval engine advances it.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{EngineError, EngineResult};

/// Processing state of a payroll.
///
/// Status only ever advances `Pending` → `Approved` → `Paid`; `Paid` is
/// terminal. Any other requested transition is reported as a failure outcome
/// and leaves the record unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollStatus {
    /// Created but not yet approved by a director.
    Pending,
    /// Approved and funds reserved, payment not yet processed.
    Approved,
    /// Payment has been processed. Terminal.
    Paid,
}

/// A (month, year) pair identifying one payroll cycle for one employee.
///
/// # Example
///
/// ```
/// use payroll_engine::models::PayPeriod;
///
/// let period = PayPeriod::new(3, 2026).unwrap();
/// assert_eq!(period.to_string(), "03/2026");
/// assert!(PayPeriod::new(13, 2026).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PayPeriod {
    /// Month in 1..=12.
    pub month: u32,
    /// Calendar year.
    pub year: i32,
}

impl PayPeriod {
    /// Creates a period, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> EngineResult<Self> {
        if !(1..=12).contains(&month) {
            return Err(EngineError::InvalidPeriod { month });
        }
        Ok(Self { month, year })
    }
}

impl fmt::Display for PayPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// One employee's compensation record for one pay period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Payroll {
    /// Unique identifier for the payroll record.
    pub id: u64,
    /// The employee this payroll belongs to.
    pub employee_id: u64,
    /// The (month, year) cycle. Unique per employee.
    pub period: PayPeriod,
    /// Number of days the employee attended work.
    pub attendance_days: u32,
    /// Bonus for the period. Never negative.
    pub bonus: Decimal,
    /// Deductions for the period. Never negative.
    pub deductions: Decimal,
    /// Derived amount: `base_salary + bonus - deductions`.
    ///
    /// Recomputed at every persist, never set by callers. May be negative
    /// when deductions exceed salary plus bonus; the ledger refuses to debit
    /// such an amount, so the payroll stays un-approvable until corrected.
    pub final_salary: Decimal,
    /// The date payment is scheduled for, if one has been set.
    pub payment_date: Option<NaiveDate>,
    /// Current processing state.
    pub status: PayrollStatus,
    /// The user who created this payroll.
    pub created_by: u64,
    /// The user who approved it, once it has been approved.
    pub approved_by: Option<u64>,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
    /// When the record was last persisted.
    pub updated_at: DateTime<Utc>,
}

impl Payroll {
    /// Computes the final salary for the given base salary.
    pub fn compute_final_salary(base_salary: Decimal, bonus: Decimal, deductions: Decimal) -> Decimal {
        base_salary + bonus - deductions
    }

    /// Recomputes `final_salary` against the employee's current base salary
    /// and bumps the update timestamp. Called by the store at every persist.
    pub fn recompute(&mut self, base_salary: Decimal) {
        self.final_salary = Self::compute_final_salary(base_salary, self.bonus, self.deductions);
        self.updated_at = Utc::now();
    }
}
