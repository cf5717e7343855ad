//! Notification triggering and best-effort delivery.
//!
//! The engine appends a [`PayrollNotification`](crate::models::PayrollNotification)
//! record inside the transition's transaction; external delivery (email, SMS)
//! happens afterwards through the [`DeliveryChannel`] trait and is
//! fire-and-forget. A delivery failure must never roll back or fail the
//! payroll transition that triggered it, which is why the trait cannot
//! return an error.

use rust_decimal::Decimal;

use crate::models::{PayPeriod, PayrollEmployee, PayrollNotification};

/// Downstream consumer of appended notification records.
///
/// Implementations deliver the message over an external channel on a
/// best-effort basis. The default [`TracingDelivery`] just logs.
pub trait DeliveryChannel: Send + Sync {
    /// Delivers `notification` to `employee`. Best effort; infallible by contract.
    fn deliver(&self, notification: &PayrollNotification, employee: &PayrollEmployee);
}

/// Delivery channel that records the dispatch in the log stream.
#[derive(Debug, Default)]
pub struct TracingDelivery;

impl DeliveryChannel for TracingDelivery {
    fn deliver(&self, notification: &PayrollNotification, employee: &PayrollEmployee) {
        tracing::info!(
            notification_id = notification.id,
            employee_id = employee.id,
            phone = %employee.phone,
            message = %notification.message,
            "Dispatching payroll notification"
        );
    }
}

/// Message body for an approval notification.
pub fn approval_message(period: PayPeriod, amount: Decimal) -> String {
    format!("Your payroll for {period} has been approved. Amount: ${amount}")
}

/// Message body for a settlement notification.
pub fn settlement_message(period: PayPeriod, amount: Decimal) -> String {
    format!("Payment processed for {period}. Amount: ${amount}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_approval_message_format() {
        let period = PayPeriod::new(1, 2026).unwrap();
        assert_eq!(
            approval_message(period, dec!(1000.00)),
            "Your payroll for 01/2026 has been approved. Amount: $1000.00"
        );
    }

    #[test]
    fn test_settlement_message_format() {
        let period = PayPeriod::new(11, 2025).unwrap();
        assert_eq!(
            settlement_message(period, dec!(842.50)),
            "Payment processed for 11/2025. Amount: $842.50"
        );
    }
}
