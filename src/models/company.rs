//! Company model and the money ledger.
//!
//! The company's `bank_balance` is the one shared resource in the system.
//! All mutation goes through [`Company::debit`] and [`Company::credit`];
//! nothing else in the crate assigns to the balance directly, which is what
//! keeps the non-negative invariant enforceable in one place.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A company with an available-funds balance for payroll.
///
/// # Example
///
/// ```
/// use payroll_engine::models::Company;
/// use rust_decimal::Decimal;
/// use chrono::Utc;
///
/// let mut company = Company {
///     id: 1,
///     name: "TechCorp".to_string(),
///     bank_balance: Decimal::new(100000, 2), // 1000.00
///     created_at: Utc::now(),
/// };
/// assert!(company.debit(Decimal::new(100000, 2)));
/// assert_eq!(company.bank_balance, Decimal::ZERO);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Company {
    /// Unique identifier for the company.
    pub id: u64,
    /// Unique company name.
    pub name: String,
    /// The company's available funds for payroll. Never negative.
    pub bank_balance: Decimal,
    /// When the company record was created.
    pub created_at: DateTime<Utc>,
}

impl Company {
    /// Returns true iff `amount` is non-negative and the balance covers it.
    ///
    /// Pure read, no side effect. A negative amount is never affordable; the
    /// ledger only moves money out through debits of non-negative amounts.
    pub fn can_afford(&self, amount: Decimal) -> bool {
        amount >= Decimal::ZERO && self.bank_balance >= amount
    }

    /// Debits `amount` from the balance iff [`Company::can_afford`] holds.
    ///
    /// Returns `true` when the debit applied and `false` otherwise. Failure
    /// is an expected outcome the caller must check, not an error. The
    /// check-then-write is only race-free when the caller holds the store's
    /// write transaction for the duration of the call.
    pub fn debit(&mut self, amount: Decimal) -> bool {
        if self.can_afford(amount) {
            self.bank_balance -= amount;
            true
        } else {
            false
        }
    }

    /// Credits `amount` to the balance (administrative top-up).
    ///
    /// Returns `false` without mutating for negative amounts.
    pub fn credit(&mut self, amount: Decimal) -> bool {
        if amount < Decimal::ZERO {
            return false;
        }
        self.bank_balance += amount;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn create_company(balance: Decimal) -> Company {
        Company {
            id: 1,
            name: "TechCorp".to_string(),
            bank_balance: balance,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_can_afford_exact_balance() {
        let company = create_company(dec!(1000.00));
        assert!(company.can_afford(dec!(1000.00)));
    }

    #[test]
    fn test_can_afford_rejects_over_balance() {
        let company = create_company(dec!(500.00));
        assert!(!company.can_afford(dec!(1000.00)));
    }

    #[test]
    fn test_can_afford_rejects_negative_amount() {
        let company = create_company(dec!(1000.00));
        assert!(!company.can_afford(dec!(-1.00)));
    }

    #[test]
    fn test_debit_reduces_balance() {
        let mut company = create_company(dec!(1000.00));
        assert!(company.debit(dec!(600.00)));
        assert_eq!(company.bank_balance, dec!(400.00));
    }

    #[test]
    fn test_debit_to_zero() {
        let mut company = create_company(dec!(1000.00));
        assert!(company.debit(dec!(1000.00)));
        assert_eq!(company.bank_balance, dec!(0.00));
    }

    #[test]
    fn test_failed_debit_leaves_balance_untouched() {
        let mut company = create_company(dec!(500.00));
        assert!(!company.debit(dec!(1000.00)));
        assert_eq!(company.bank_balance, dec!(500.00));
    }

    #[test]
    fn test_negative_debit_is_rejected() {
        // A negative debit would be a disguised credit.
        let mut company = create_company(dec!(500.00));
        assert!(!company.debit(dec!(-100.00)));
        assert_eq!(company.bank_balance, dec!(500.00));
    }

    #[test]
    fn test_credit_increases_balance() {
        let mut company = create_company(dec!(500.00));
        assert!(company.credit(dec!(250.50)));
        assert_eq!(company.bank_balance, dec!(750.50));
    }

    #[test]
    fn test_negative_credit_is_rejected() {
        let mut company = create_company(dec!(500.00));
        assert!(!company.credit(dec!(-250.00)));
        assert_eq!(company.bank_balance, dec!(500.00));
    }

    #[test]
    fn test_serialize_company_balance_as_string() {
        let company = create_company(dec!(1000.00));
        let json = serde_json::to_string(&company).unwrap();
        assert!(json.contains("\"bank_balance\":\"1000.00\""));
    }

    proptest! {
        /// The balance never goes negative for any sequence of debit attempts.
        #[test]
        fn prop_balance_never_negative(
            start in 0u64..1_000_000,
            amounts in proptest::collection::vec(-500_000i64..500_000, 0..64),
        ) {
            let mut company = create_company(Decimal::new(start as i64, 2));
            for raw in amounts {
                let _ = company.debit(Decimal::new(raw, 2));
                prop_assert!(company.bank_balance >= Decimal::ZERO);
            }
        }

        /// A successful debit removes exactly the requested amount.
        #[test]
        fn prop_debit_is_exact(
            start in 0i64..1_000_000,
            amount in 0i64..1_000_000,
        ) {
            let mut company = create_company(Decimal::new(start, 2));
            let before = company.bank_balance;
            let amount = Decimal::new(amount, 2);
            if company.debit(amount) {
                prop_assert_eq!(before - company.bank_balance, amount);
            } else {
                prop_assert_eq!(company.bank_balance, before);
            }
        }
    }
}
