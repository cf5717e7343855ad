//! Core data models for the payroll engine.
//!
//! This module contains all the domain models used throughout the engine.

mod company;
mod employee;
mod notification;
mod payroll;
mod role;

pub use company::Company;
pub use employee::PayrollEmployee;
pub use notification::PayrollNotification;
pub use payroll::{PayPeriod, Payroll, PayrollStatus};
pub use role::{Capability, Role, UserAccount, UserProfile};
