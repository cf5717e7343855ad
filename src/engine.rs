//! The payroll approval engine.
//!
//! This module owns the Pending → Approved → Paid state machine and the
//! company-balance bookkeeping that goes with it. Approving a payroll debits
//! the company ledger and flips the status inside one store transaction, so
//! two concurrent approvals can never both pass the affordability check
//! against a stale balance. Illegal transitions and insufficient funds are
//! reported as outcome values, not errors; the payroll stays retryable.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::models::{
    Company, PayPeriod, Payroll, PayrollEmployee, PayrollNotification, PayrollStatus, Role,
    UserAccount, UserProfile,
};
use crate::notify::{self, DeliveryChannel};
use crate::store::PayrollStore;

/// Result of an approval attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum ApprovalOutcome {
    /// Funds were committed and the payroll advanced to Approved.
    Approved {
        /// The payroll after the transition.
        payroll: Payroll,
    },
    /// The company balance does not cover the final salary. The payroll
    /// remains Pending; a balance top-up makes a retry succeed.
    InsufficientFunds {
        /// The amount the approval needed.
        required: Decimal,
        /// The balance at the time of the check.
        available: Decimal,
        /// How much was missing.
        shortfall: Decimal,
    },
    /// The payroll was not Pending; nothing changed.
    NotPending {
        /// The status the payroll is in.
        status: PayrollStatus,
    },
}

/// Result of a settlement attempt.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum SettlementOutcome {
    /// The payroll advanced to Paid.
    Paid {
        /// The payroll after the transition.
        payroll: Payroll,
    },
    /// The payroll was not Approved; nothing changed.
    NotApproved {
        /// The status the payroll is in.
        status: PayrollStatus,
    },
}

/// Per-item result inside a batch approval report.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "result", rename_all = "snake_case")]
pub enum BatchItemOutcome {
    /// The item was approved.
    Approved {
        /// The amount debited from the company.
        final_salary: Decimal,
    },
    /// The company could not afford the item.
    InsufficientFunds {
        /// The amount the approval needed.
        required: Decimal,
        /// The balance at the time of the check.
        available: Decimal,
        /// How much was missing.
        shortfall: Decimal,
    },
    /// The item was not Pending.
    NotPending {
        /// The status the payroll is in.
        status: PayrollStatus,
    },
    /// No payroll exists with the requested id.
    NotFound,
}

/// One entry of a batch approval report.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    /// The payroll id the entry refers to.
    pub payroll_id: u64,
    /// What happened to it.
    pub outcome: BatchItemOutcome,
}

/// Report for a batch approval: partial success is the designed behavior.
#[derive(Debug, Clone, Serialize)]
pub struct BatchApprovalReport {
    /// How many items were approved.
    pub approved_count: usize,
    /// How many items were requested.
    pub total_requested: usize,
    /// Per-item breakdown, in request order.
    pub results: Vec<BatchItemResult>,
}

/// A company's funds against its pending payroll exposure.
#[derive(Debug, Clone, Serialize)]
pub struct FundsOverview {
    /// The company name.
    pub company_name: String,
    /// Current available balance.
    pub current_balance: Decimal,
    /// Sum of final salaries over Pending payrolls.
    pub pending_payroll_amount: Decimal,
    /// Balance minus pending amount; negative when underfunded.
    pub remaining_after_payroll: Decimal,
    /// Whether the balance covers every pending payroll at once.
    pub can_afford_pending: bool,
}

/// Aggregate payroll figures for one (month, year).
#[derive(Debug, Clone, Serialize)]
pub struct MonthlySummary {
    /// The summarized month.
    pub month: u32,
    /// The summarized year.
    pub year: i32,
    /// Payroll count for the period.
    pub total_payrolls: usize,
    /// Pending payrolls in the period.
    pub pending_count: usize,
    /// Approved payrolls in the period.
    pub approved_count: usize,
    /// Paid payrolls in the period.
    pub paid_count: usize,
    /// Sum of final salaries across the period.
    pub total_amount: Decimal,
    /// Sum of final salaries over Pending payrolls only.
    pub pending_amount: Decimal,
}

/// A user identity with its attached role, as returned to API callers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserView {
    /// The user id.
    pub id: u64,
    /// The login name.
    pub username: String,
    /// The attached role.
    pub role: Role,
}

/// Input for creating an employee.
#[derive(Debug, Clone)]
pub struct NewEmployee {
    /// The person identity the record belongs to.
    pub user_id: u64,
    /// The employing company.
    pub company_id: u64,
    /// Display name.
    pub full_name: String,
    /// Contact phone number.
    pub phone: String,
    /// Job role label.
    pub job_role: String,
    /// Monthly base salary.
    pub base_salary: Decimal,
}

/// Input for creating a payroll.
#[derive(Debug, Clone)]
pub struct NewPayroll {
    /// The employee being paid.
    pub employee_id: u64,
    /// Month of the pay cycle.
    pub month: u32,
    /// Year of the pay cycle.
    pub year: i32,
    /// Days attended in the period.
    pub attendance_days: u32,
    /// Bonus for the period.
    pub bonus: Decimal,
    /// Deductions for the period.
    pub deductions: Decimal,
    /// Scheduled payment date, if already known.
    pub payment_date: Option<NaiveDate>,
    /// The user creating the record.
    pub created_by: u64,
}

/// The approval engine: state machine plus ledger bookkeeping.
///
/// Holds the store (transaction boundary) and a delivery channel for
/// fire-and-forget external notification dispatch. The engine trusts the
/// caller's asserted identity; authorization happens at the API boundary.
pub struct ApprovalEngine {
    store: Arc<PayrollStore>,
    delivery: Arc<dyn DeliveryChannel>,
}

impl ApprovalEngine {
    /// Creates an engine over the given store and delivery channel.
    pub fn new(store: Arc<PayrollStore>, delivery: Arc<dyn DeliveryChannel>) -> Self {
        Self { store, delivery }
    }

    // ---- identities and roles ----

    /// Creates a user identity and attaches its role profile.
    ///
    /// The profile is attached by an explicit post-creation hook here, not by
    /// ambient event wiring; a missing role defaults to HR.
    pub async fn create_user(&self, username: &str, role: Option<Role>) -> EngineResult<UserView> {
        let username = username.trim().to_string();
        if username.is_empty() {
            return Err(EngineError::Validation {
                field: "username".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        self.store
            .write(move |inner| {
                let id = inner.alloc_user_id();
                inner.users.insert(
                    id,
                    UserAccount {
                        id,
                        username: username.clone(),
                    },
                );
                let profile = Self::attach_role_profile(inner, id, role);
                Ok(UserView {
                    id,
                    username,
                    role: profile.role,
                })
            })
            .await
    }

    /// Post-creation hook: ensures a role profile exists for the identity.
    fn attach_role_profile(
        inner: &mut crate::store::Inner,
        user_id: u64,
        role: Option<Role>,
    ) -> UserProfile {
        *inner.profiles.entry(user_id).or_insert(UserProfile {
            user_id,
            role: role.unwrap_or(Role::Hr),
        })
    }

    /// Resolves an asserted user id to its identity and role.
    pub async fn user_view(&self, user_id: u64) -> EngineResult<UserView> {
        self.store
            .read(|inner| {
                let account = inner.user(user_id)?;
                let profile = inner.profile(user_id)?;
                Ok(UserView {
                    id: account.id,
                    username: account.username.clone(),
                    role: profile.role,
                })
            })
            .await
    }

    // ---- companies and the ledger ----

    /// Creates a company with an opening balance.
    pub async fn create_company(&self, name: &str, bank_balance: Decimal) -> EngineResult<Company> {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::Validation {
                field: "name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if bank_balance < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "bank_balance".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        self.store
            .write(move |inner| {
                inner.check_unique_company_name(&name)?;
                let id = inner.alloc_company_id();
                let company = Company {
                    id,
                    name,
                    bank_balance,
                    created_at: Utc::now(),
                };
                inner.companies.insert(id, company.clone());
                Ok(company)
            })
            .await
    }

    /// Administrative top-up of a company balance.
    pub async fn top_up(&self, company_id: u64, amount: Decimal) -> EngineResult<Company> {
        if amount <= Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "amount".to_string(),
                message: "must be positive".to_string(),
            });
        }
        self.store
            .write(move |inner| {
                let company = inner.company_mut(company_id)?;
                company.credit(amount);
                Ok(company.clone())
            })
            .await
    }

    /// The company's balance against its pending payroll exposure.
    pub async fn funds_overview(&self, company_id: u64) -> EngineResult<FundsOverview> {
        self.store
            .read(|inner| {
                let company = inner.company(company_id)?;
                let pending: Decimal = inner
                    .payrolls
                    .values()
                    .filter(|p| p.status == PayrollStatus::Pending)
                    .filter(|p| {
                        inner
                            .employees
                            .get(&p.employee_id)
                            .is_some_and(|e| e.company_id == company_id)
                    })
                    .map(|p| p.final_salary)
                    .sum();
                Ok(FundsOverview {
                    company_name: company.name.clone(),
                    current_balance: company.bank_balance,
                    pending_payroll_amount: pending,
                    remaining_after_payroll: company.bank_balance - pending,
                    can_afford_pending: company.bank_balance >= pending,
                })
            })
            .await
    }

    // ---- employees ----

    /// Creates an employee record for a company.
    pub async fn create_employee(&self, new: NewEmployee) -> EngineResult<PayrollEmployee> {
        if new.full_name.trim().is_empty() {
            return Err(EngineError::Validation {
                field: "full_name".to_string(),
                message: "must not be empty".to_string(),
            });
        }
        if new.base_salary < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "base_salary".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        self.store
            .write(move |inner| {
                inner.user(new.user_id)?;
                inner.company(new.company_id)?;
                let id = inner.alloc_employee_id();
                let employee = PayrollEmployee {
                    id,
                    user_id: new.user_id,
                    company_id: new.company_id,
                    full_name: new.full_name.trim().to_string(),
                    phone: new.phone,
                    job_role: new.job_role,
                    base_salary: new.base_salary,
                    is_active: true,
                    created_at: Utc::now(),
                };
                inner.employees.insert(id, employee.clone());
                Ok(employee)
            })
            .await
    }

    /// Soft-deactivates an employee; historical records keep referencing it.
    pub async fn deactivate_employee(&self, employee_id: u64) -> EngineResult<PayrollEmployee> {
        self.store
            .write(move |inner| {
                let employee = inner.employee_mut(employee_id)?;
                employee.is_active = false;
                Ok(employee.clone())
            })
            .await
    }

    // ---- payroll records ----

    /// Creates a Pending payroll for an employee and period.
    ///
    /// Rejects duplicate (employee, month, year) combinations and negative
    /// bonus or deductions. The final salary is computed here and recomputed
    /// again at approval time.
    pub async fn create_payroll(&self, new: NewPayroll) -> EngineResult<Payroll> {
        let period = PayPeriod::new(new.month, new.year)?;
        if new.bonus < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "bonus".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        if new.deductions < Decimal::ZERO {
            return Err(EngineError::Validation {
                field: "deductions".to_string(),
                message: "must not be negative".to_string(),
            });
        }
        self.store
            .write(move |inner| {
                let employee = inner.employee(new.employee_id)?;
                let base_salary = employee.base_salary;
                inner.check_unique_period(new.employee_id, period.month, period.year)?;
                let id = inner.alloc_payroll_id();
                let now = Utc::now();
                let payroll = Payroll {
                    id,
                    employee_id: new.employee_id,
                    period,
                    attendance_days: new.attendance_days,
                    bonus: new.bonus,
                    deductions: new.deductions,
                    final_salary: Payroll::compute_final_salary(
                        base_salary,
                        new.bonus,
                        new.deductions,
                    ),
                    payment_date: new.payment_date,
                    status: PayrollStatus::Pending,
                    created_by: new.created_by,
                    approved_by: None,
                    created_at: now,
                    updated_at: now,
                };
                inner.payrolls.insert(id, payroll.clone());
                Ok(payroll)
            })
            .await
    }

    /// Fetches one payroll record.
    pub async fn payroll(&self, payroll_id: u64) -> EngineResult<Payroll> {
        self.store
            .read(|inner| inner.payroll(payroll_id).cloned())
            .await
    }

    /// Aggregate payroll figures for one (month, year).
    pub async fn monthly_summary(&self, month: u32, year: i32) -> EngineResult<MonthlySummary> {
        let period = PayPeriod::new(month, year)?;
        self.store
            .read(|inner| {
                let mut summary = MonthlySummary {
                    month: period.month,
                    year: period.year,
                    total_payrolls: 0,
                    pending_count: 0,
                    approved_count: 0,
                    paid_count: 0,
                    total_amount: Decimal::ZERO,
                    pending_amount: Decimal::ZERO,
                };
                for payroll in inner.payrolls.values().filter(|p| p.period == period) {
                    summary.total_payrolls += 1;
                    summary.total_amount += payroll.final_salary;
                    match payroll.status {
                        PayrollStatus::Pending => {
                            summary.pending_count += 1;
                            summary.pending_amount += payroll.final_salary;
                        }
                        PayrollStatus::Approved => summary.approved_count += 1,
                        PayrollStatus::Paid => summary.paid_count += 1,
                    }
                }
                Ok(summary)
            })
            .await
    }

    // ---- the state machine ----

    /// Approves a Pending payroll, debiting the company ledger.
    ///
    /// The affordability check, the debit, and the status change happen in
    /// one write transaction; a failed debit leaves no partial state and the
    /// payroll remains Pending. On success a notification is appended and
    /// handed to the delivery channel after the transaction commits.
    pub async fn approve(&self, payroll_id: u64, approver: u64) -> EngineResult<ApprovalOutcome> {
        let (outcome, dispatch) = self
            .store
            .write(|inner| {
                let payroll = inner.payroll(payroll_id)?;
                if payroll.status != PayrollStatus::Pending {
                    return Ok((
                        ApprovalOutcome::NotPending {
                            status: payroll.status,
                        },
                        None,
                    ));
                }
                let employee_id = payroll.employee_id;
                let period = payroll.period;
                let (bonus, deductions) = (payroll.bonus, payroll.deductions);

                let employee = inner.employee(employee_id)?.clone();
                // Recompute against the employee's current base salary.
                let required =
                    Payroll::compute_final_salary(employee.base_salary, bonus, deductions);

                let company = inner.company_mut(employee.company_id)?;
                let available = company.bank_balance;
                if !company.debit(required) {
                    return Ok((
                        ApprovalOutcome::InsufficientFunds {
                            required,
                            available,
                            shortfall: required - available,
                        },
                        None,
                    ));
                }

                let payroll = inner.payroll_mut(payroll_id)?;
                payroll.recompute(employee.base_salary);
                payroll.status = PayrollStatus::Approved;
                payroll.approved_by = Some(approver);
                let snapshot = payroll.clone();

                let notification = inner.append_notification(
                    employee_id,
                    notify::approval_message(period, required),
                    Some(payroll_id),
                );
                Ok((
                    ApprovalOutcome::Approved { payroll: snapshot },
                    Some((notification, employee)),
                ))
            })
            .await?;

        if let Some((notification, employee)) = dispatch {
            // Fire and forget; delivery cannot fail the transition.
            self.delivery.deliver(&notification, &employee);
            tracing::info!(payroll_id, approver, "Payroll approved");
        }
        Ok(outcome)
    }

    /// Marks an Approved payroll as Paid.
    ///
    /// No ledger interaction; funds were committed at approval time.
    pub async fn mark_paid(&self, payroll_id: u64) -> EngineResult<SettlementOutcome> {
        let (outcome, dispatch) = self
            .store
            .write(|inner| {
                let payroll = inner.payroll(payroll_id)?;
                if payroll.status != PayrollStatus::Approved {
                    return Ok((
                        SettlementOutcome::NotApproved {
                            status: payroll.status,
                        },
                        None,
                    ));
                }
                let employee = inner.employee(payroll.employee_id)?.clone();

                let payroll = inner.payroll_mut(payroll_id)?;
                payroll.status = PayrollStatus::Paid;
                payroll.updated_at = Utc::now();
                let snapshot = payroll.clone();

                let notification = inner.append_notification(
                    snapshot.employee_id,
                    notify::settlement_message(snapshot.period, snapshot.final_salary),
                    Some(payroll_id),
                );
                Ok((
                    SettlementOutcome::Paid { payroll: snapshot },
                    Some((notification, employee)),
                ))
            })
            .await?;

        if let Some((notification, employee)) = dispatch {
            self.delivery.deliver(&notification, &employee);
            tracing::info!(payroll_id, "Payroll settled");
        }
        Ok(outcome)
    }

    /// Applies [`ApprovalEngine::approve`] to each id independently.
    ///
    /// The batch never aborts on the first failure: every item gets its own
    /// transaction and its own entry in the report.
    pub async fn batch_approve(
        &self,
        payroll_ids: &[u64],
        approver: u64,
    ) -> EngineResult<BatchApprovalReport> {
        let mut results = Vec::with_capacity(payroll_ids.len());
        let mut approved_count = 0;
        for &payroll_id in payroll_ids {
            let outcome = match self.approve(payroll_id, approver).await {
                Ok(ApprovalOutcome::Approved { payroll }) => {
                    approved_count += 1;
                    BatchItemOutcome::Approved {
                        final_salary: payroll.final_salary,
                    }
                }
                Ok(ApprovalOutcome::InsufficientFunds {
                    required,
                    available,
                    shortfall,
                }) => BatchItemOutcome::InsufficientFunds {
                    required,
                    available,
                    shortfall,
                },
                Ok(ApprovalOutcome::NotPending { status }) => {
                    BatchItemOutcome::NotPending { status }
                }
                Err(EngineError::PayrollNotFound { .. }) => BatchItemOutcome::NotFound,
                Err(other) => return Err(other),
            };
            results.push(BatchItemResult {
                payroll_id,
                outcome,
            });
        }
        Ok(BatchApprovalReport {
            approved_count,
            total_requested: payroll_ids.len(),
            results,
        })
    }

    // ---- the notification sink ----

    /// Lists an employee's notifications, most recent first.
    pub async fn notifications_for_employee(
        &self,
        employee_id: u64,
    ) -> EngineResult<Vec<PayrollNotification>> {
        self.store
            .read(|inner| {
                inner.employee(employee_id)?;
                let mut list: Vec<_> = inner
                    .notifications
                    .iter()
                    .filter(|n| n.employee_id == employee_id)
                    .cloned()
                    .collect();
                list.sort_by(|a, b| b.id.cmp(&a.id));
                Ok(list)
            })
            .await
    }

    /// Counts an employee's unread notifications.
    pub async fn unread_count(&self, employee_id: u64) -> EngineResult<usize> {
        self.store
            .read(|inner| {
                inner.employee(employee_id)?;
                Ok(inner
                    .notifications
                    .iter()
                    .filter(|n| n.employee_id == employee_id && !n.is_read)
                    .count())
            })
            .await
    }

    /// Flips one notification's read flag.
    pub async fn mark_read(&self, notification_id: u64) -> EngineResult<PayrollNotification> {
        self.store
            .write(move |inner| {
                let notification = inner.notification_mut(notification_id)?;
                notification.is_read = true;
                Ok(notification.clone())
            })
            .await
    }

    /// Marks all of an employee's notifications read; returns how many flipped.
    pub async fn mark_all_read(&self, employee_id: u64) -> EngineResult<usize> {
        self.store
            .write(move |inner| {
                inner.employee(employee_id)?;
                let mut flipped = 0;
                for notification in inner
                    .notifications
                    .iter_mut()
                    .filter(|n| n.employee_id == employee_id && !n.is_read)
                {
                    notification.is_read = true;
                    flipped += 1;
                }
                Ok(flipped)
            })
            .await
    }
}
