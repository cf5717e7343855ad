//! Payroll notification model.
//!
//! Notifications are append-only: they are created as a side effect of a
//! payroll state transition (or manually) and afterwards only the read flag
//! ever changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A message for an employee, usually tied to a payroll transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollNotification {
    /// Unique identifier for the notification.
    pub id: u64,
    /// The employee this notification is addressed to.
    pub employee_id: u64,
    /// The payroll that triggered it, when there is one.
    pub payroll_id: Option<u64>,
    /// Free-text message body.
    pub message: String,
    /// When the notification was appended.
    pub sent_at: DateTime<Utc>,
    /// Whether the employee has read it. The only mutable field.
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notification_serde_round_trip() {
        let notification = PayrollNotification {
            id: 1,
            employee_id: 3,
            payroll_id: Some(9),
            message: "Your payroll for 01/2026 has been approved. Amount: $1000.00".to_string(),
            sent_at: Utc::now(),
            is_read: false,
        };

        let json = serde_json::to_string(&notification).unwrap();
        let deserialized: PayrollNotification = serde_json::from_str(&json).unwrap();
        assert_eq!(notification, deserialized);
    }
}
