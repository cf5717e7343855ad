//! Error types for the payroll engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for all error conditions that can occur while processing payroll.
//!
//! Expected business outcomes such as insufficient funds or an illegal state
//! transition are *not* errors; they are reported through the outcome enums in
//! [`crate::engine`]. The variants here cover rejected input, unknown
//! entities, and transient store conditions.

use thiserror::Error;

/// The main error type for the payroll engine.
///
/// All fallible operations in the engine return this error type, making it
/// easy to handle errors consistently throughout the application.
///
/// # Example
///
/// ```
/// use payroll_engine::error::EngineError;
///
/// let error = EngineError::CompanyNotFound { id: 42 };
/// assert_eq!(error.to_string(), "Company not found: 42");
/// ```
#[derive(Debug, Error)]
pub enum EngineError {
    /// A request field failed validation.
    #[error("Invalid field '{field}': {message}")]
    Validation {
        /// The field that was invalid.
        field: String,
        /// A description of what made the field invalid.
        message: String,
    },

    /// A payroll period was outside the 1..=12 month range.
    #[error("Invalid payroll period: month {month} is not in 1..=12")]
    InvalidPeriod {
        /// The rejected month value.
        month: u32,
    },

    /// A payroll already exists for this employee and period.
    #[error("Payroll already exists for employee {employee_id} in {month:02}/{year}")]
    DuplicatePeriod {
        /// The employee the duplicate was created for.
        employee_id: u64,
        /// The month of the conflicting period.
        month: u32,
        /// The year of the conflicting period.
        year: i32,
    },

    /// A company name is already taken.
    #[error("Company name already in use: {name}")]
    DuplicateCompanyName {
        /// The conflicting name.
        name: String,
    },

    /// No company exists with the given id.
    #[error("Company not found: {id}")]
    CompanyNotFound {
        /// The id that was not found.
        id: u64,
    },

    /// No employee exists with the given id.
    #[error("Employee not found: {id}")]
    EmployeeNotFound {
        /// The id that was not found.
        id: u64,
    },

    /// No payroll exists with the given id.
    #[error("Payroll not found: {id}")]
    PayrollNotFound {
        /// The id that was not found.
        id: u64,
    },

    /// No user exists with the given id.
    #[error("User not found: {id}")]
    UserNotFound {
        /// The id that was not found.
        id: u64,
    },

    /// No notification exists with the given id.
    #[error("Notification not found: {id}")]
    NotificationNotFound {
        /// The id that was not found.
        id: u64,
    },

    /// The store lock could not be acquired within the bounded wait.
    ///
    /// This is a transient condition: the operation has not been applied and
    /// the caller may retry.
    #[error("Store busy: lock wait timed out, retry the operation")]
    StoreBusy,
}

/// A type alias for Results that return EngineError.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_displays_field_and_message() {
        let error = EngineError::Validation {
            field: "bonus".to_string(),
            message: "must not be negative".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Invalid field 'bonus': must not be negative"
        );
    }

    #[test]
    fn test_duplicate_period_displays_zero_padded_month() {
        let error = EngineError::DuplicatePeriod {
            employee_id: 7,
            month: 3,
            year: 2026,
        };
        assert_eq!(
            error.to_string(),
            "Payroll already exists for employee 7 in 03/2026"
        );
    }

    #[test]
    fn test_invalid_period_displays_month() {
        let error = EngineError::InvalidPeriod { month: 13 };
        assert_eq!(
            error.to_string(),
            "Invalid payroll period: month 13 is not in 1..=12"
        );
    }

    #[test]
    fn test_payroll_not_found_displays_id() {
        let error = EngineError::PayrollNotFound { id: 99 };
        assert_eq!(error.to_string(), "Payroll not found: 99");
    }

    #[test]
    fn test_errors_implement_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<EngineError>();
    }

    #[test]
    fn test_error_propagation_with_question_mark() {
        fn returns_store_busy() -> EngineResult<()> {
            Err(EngineError::StoreBusy)
        }

        fn propagates_error() -> EngineResult<()> {
            returns_store_busy()?;
            Ok(())
        }

        assert!(propagates_error().is_err());
    }
}
