//! Request types for the payroll engine API.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::engine::{NewEmployee, NewPayroll};
use crate::models::Role;

/// Request body for POST /users.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    /// Login name for the new identity.
    pub username: String,
    /// Role to attach; defaults to HR when omitted.
    #[serde(default)]
    pub role: Option<Role>,
}

/// Request body for POST /companies.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateCompanyRequest {
    /// Company name, unique across the system.
    pub name: String,
    /// Opening bank balance.
    #[serde(with = "rust_decimal::serde::str")]
    pub bank_balance: Decimal,
}

/// Request body for POST /companies/{id}/balance.
#[derive(Debug, Clone, Deserialize)]
pub struct TopUpRequest {
    /// Amount to credit; must be positive.
    #[serde(with = "rust_decimal::serde::str")]
    pub amount: Decimal,
}

/// Request body for POST /employees.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateEmployeeRequest {
    /// The user identity the record belongs to.
    pub user_id: u64,
    /// The employing company.
    pub company_id: u64,
    /// Display name.
    pub full_name: String,
    /// Contact phone number.
    #[serde(default)]
    pub phone: String,
    /// Job role label.
    #[serde(default)]
    pub job_role: String,
    /// Monthly base salary.
    #[serde(with = "rust_decimal::serde::str")]
    pub base_salary: Decimal,
}

impl CreateEmployeeRequest {
    /// Converts the request into engine input.
    pub fn into_new_employee(self) -> NewEmployee {
        NewEmployee {
            user_id: self.user_id,
            company_id: self.company_id,
            full_name: self.full_name,
            phone: self.phone,
            job_role: self.job_role,
            base_salary: self.base_salary,
        }
    }
}

/// Request body for POST /payrolls.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatePayrollRequest {
    /// The employee being paid.
    pub employee_id: u64,
    /// Month of the pay cycle.
    pub month: u32,
    /// Year of the pay cycle.
    pub year: i32,
    /// Days attended in the period.
    #[serde(default)]
    pub attendance_days: u32,
    /// Bonus for the period; defaults to zero.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub bonus: Decimal,
    /// Deductions for the period; defaults to zero.
    #[serde(default, with = "rust_decimal::serde::str")]
    pub deductions: Decimal,
    /// Scheduled payment date, if already known.
    #[serde(default)]
    pub payment_date: Option<NaiveDate>,
}

impl CreatePayrollRequest {
    /// Converts the request into engine input, recording who created it.
    pub fn into_new_payroll(self, created_by: u64) -> NewPayroll {
        NewPayroll {
            employee_id: self.employee_id,
            month: self.month,
            year: self.year,
            attendance_days: self.attendance_days,
            bonus: self.bonus,
            deductions: self.deductions,
            payment_date: self.payment_date,
            created_by,
        }
    }
}

/// Request body for POST /payrolls/approve.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchApproveRequest {
    /// The payrolls to approve, processed in order.
    pub payroll_ids: Vec<u64>,
}

/// Query parameters for GET /payrolls/summary.
#[derive(Debug, Clone, Deserialize)]
pub struct SummaryQuery {
    /// Month of the summarized period.
    pub month: u32,
    /// Year of the summarized period.
    pub year: i32,
}
