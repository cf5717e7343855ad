//! In-memory transactional store for the payroll engine.
//!
//! The store supplies the transaction boundary the approval engine requires:
//! [`PayrollStore::write`] hands the closure exclusive access to the whole
//! state, so a check-then-write sequence such as the affordability check plus
//! balance debit is linearizable with respect to every other mutation. Write
//! closures are all-or-nothing by construction: every failure path returns
//! before the first mutation.
//!
//! Lock acquisition waits at most [`LOCK_WAIT`]; on expiry the operation
//! fails with the retryable [`EngineError::StoreBusy`] instead of blocking
//! indefinitely.

use std::collections::HashMap;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Company, PayrollEmployee, PayrollNotification, Payroll, UserAccount, UserProfile,
};

/// Upper bound on the time an operation waits for the store lock.
pub const LOCK_WAIT: Duration = Duration::from_secs(5);

/// The full mutable state behind the store lock.
#[derive(Debug, Default)]
pub(crate) struct Inner {
    pub(crate) users: HashMap<u64, UserAccount>,
    pub(crate) profiles: HashMap<u64, UserProfile>,
    pub(crate) companies: HashMap<u64, Company>,
    pub(crate) employees: HashMap<u64, PayrollEmployee>,
    pub(crate) payrolls: HashMap<u64, Payroll>,
    pub(crate) notifications: Vec<PayrollNotification>,
    next_user_id: u64,
    next_company_id: u64,
    next_employee_id: u64,
    next_payroll_id: u64,
    next_notification_id: u64,
}

impl Inner {
    pub(crate) fn alloc_user_id(&mut self) -> u64 {
        self.next_user_id += 1;
        self.next_user_id
    }

    pub(crate) fn alloc_company_id(&mut self) -> u64 {
        self.next_company_id += 1;
        self.next_company_id
    }

    pub(crate) fn alloc_employee_id(&mut self) -> u64 {
        self.next_employee_id += 1;
        self.next_employee_id
    }

    pub(crate) fn alloc_payroll_id(&mut self) -> u64 {
        self.next_payroll_id += 1;
        self.next_payroll_id
    }

    pub(crate) fn user(&self, id: u64) -> EngineResult<&UserAccount> {
        self.users.get(&id).ok_or(EngineError::UserNotFound { id })
    }

    pub(crate) fn profile(&self, user_id: u64) -> EngineResult<&UserProfile> {
        self.profiles
            .get(&user_id)
            .ok_or(EngineError::UserNotFound { id: user_id })
    }

    pub(crate) fn company(&self, id: u64) -> EngineResult<&Company> {
        self.companies
            .get(&id)
            .ok_or(EngineError::CompanyNotFound { id })
    }

    pub(crate) fn company_mut(&mut self, id: u64) -> EngineResult<&mut Company> {
        self.companies
            .get_mut(&id)
            .ok_or(EngineError::CompanyNotFound { id })
    }

    pub(crate) fn employee(&self, id: u64) -> EngineResult<&PayrollEmployee> {
        self.employees
            .get(&id)
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    pub(crate) fn employee_mut(&mut self, id: u64) -> EngineResult<&mut PayrollEmployee> {
        self.employees
            .get_mut(&id)
            .ok_or(EngineError::EmployeeNotFound { id })
    }

    pub(crate) fn payroll(&self, id: u64) -> EngineResult<&Payroll> {
        self.payrolls
            .get(&id)
            .ok_or(EngineError::PayrollNotFound { id })
    }

    pub(crate) fn payroll_mut(&mut self, id: u64) -> EngineResult<&mut Payroll> {
        self.payrolls
            .get_mut(&id)
            .ok_or(EngineError::PayrollNotFound { id })
    }

    /// Enforces the one-payroll-per-(employee, month, year) constraint.
    pub(crate) fn check_unique_period(
        &self,
        employee_id: u64,
        month: u32,
        year: i32,
    ) -> EngineResult<()> {
        let taken = self.payrolls.values().any(|p| {
            p.employee_id == employee_id && p.period.month == month && p.period.year == year
        });
        if taken {
            return Err(EngineError::DuplicatePeriod {
                employee_id,
                month,
                year,
            });
        }
        Ok(())
    }

    /// Enforces company-name uniqueness.
    pub(crate) fn check_unique_company_name(&self, name: &str) -> EngineResult<()> {
        if self.companies.values().any(|c| c.name == name) {
            return Err(EngineError::DuplicateCompanyName {
                name: name.to_string(),
            });
        }
        Ok(())
    }

    /// Appends a notification for an employee and returns the stored record.
    pub(crate) fn append_notification(
        &mut self,
        employee_id: u64,
        message: String,
        payroll_id: Option<u64>,
    ) -> PayrollNotification {
        self.next_notification_id += 1;
        let notification = PayrollNotification {
            id: self.next_notification_id,
            employee_id,
            payroll_id,
            message,
            sent_at: Utc::now(),
            is_read: false,
        };
        self.notifications.push(notification.clone());
        notification
    }

    pub(crate) fn notification_mut(&mut self, id: u64) -> EngineResult<&mut PayrollNotification> {
        self.notifications
            .iter_mut()
            .find(|n| n.id == id)
            .ok_or(EngineError::NotificationNotFound { id })
    }
}

/// Thread-safe in-memory store with a bounded-wait transaction boundary.
///
/// Uses a single `tokio::sync::RwLock` over the full state, which makes every
/// write transaction serialized against every other mutation; this is the
/// serialization the money ledger requires to keep a company balance from
/// being double-spent by concurrent approvals.
#[derive(Default)]
pub struct PayrollStore {
    inner: RwLock<Inner>,
}

impl PayrollStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs a read-only closure against a consistent snapshot of the state.
    pub(crate) async fn read<R>(
        &self,
        f: impl FnOnce(&Inner) -> EngineResult<R>,
    ) -> EngineResult<R> {
        let guard = tokio::time::timeout(LOCK_WAIT, self.inner.read())
            .await
            .map_err(|_| EngineError::StoreBusy)?;
        f(&guard)
    }

    /// Runs a write transaction with exclusive access to the state.
    ///
    /// The closure must not mutate before its last fallible check has passed;
    /// all engine transactions follow that shape, which is what makes a
    /// failed operation leave no partial state behind.
    pub(crate) async fn write<R>(
        &self,
        f: impl FnOnce(&mut Inner) -> EngineResult<R>,
    ) -> EngineResult<R> {
        let mut guard = tokio::time::timeout(LOCK_WAIT, self.inner.write())
            .await
            .map_err(|_| EngineError::StoreBusy)?;
        f(&mut guard)
    }
}
