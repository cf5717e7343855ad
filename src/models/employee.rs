//! Payroll employee model.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An employee on a company's payroll.
///
/// Employees are soft-deactivated rather than deleted because historical
/// payroll records and notifications keep referencing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayrollEmployee {
    /// Unique identifier for the employee record.
    pub id: u64,
    /// The person identity this record belongs to.
    pub user_id: u64,
    /// The company employing this person.
    pub company_id: u64,
    /// Display name used in notifications and reports.
    pub full_name: String,
    /// Contact phone number for SMS delivery.
    pub phone: String,
    /// The employee's job role (e.g., "Engineering - Backend").
    pub job_role: String,
    /// Monthly base salary. Never negative.
    pub base_salary: Decimal,
    /// Whether the employee is active. Deactivation is the soft delete.
    pub is_active: bool,
    /// When the employee record was created.
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_employee_serde_round_trip() {
        let employee = PayrollEmployee {
            id: 1,
            user_id: 10,
            company_id: 1,
            full_name: "Ada Lovelace".to_string(),
            phone: "+1-555-0101".to_string(),
            job_role: "Engineering - Backend".to_string(),
            base_salary: dec!(800.00),
            is_active: true,
            created_at: Utc::now(),
        };

        let json = serde_json::to_string(&employee).unwrap();
        let deserialized: PayrollEmployee = serde_json::from_str(&json).unwrap();
        assert_eq!(employee, deserialized);
    }

    #[test]
    fn test_base_salary_serializes_as_string() {
        let employee = PayrollEmployee {
            id: 1,
            user_id: 10,
            company_id: 1,
            full_name: "Ada Lovelace".to_string(),
            phone: String::new(),
            job_role: "Engineering".to_string(),
            base_salary: dec!(800.00),
            is_active: true,
            created_at: Utc::now(),
        };
        let json = serde_json::to_string(&employee).unwrap();
        assert!(json.contains("\"base_salary\":\"800.00\""));
    }
}
