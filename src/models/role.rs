//! Roles, capabilities, and user identity.
//!
//! Authorization is a closed enumeration of roles mapped to capabilities in
//! one table, checked once at the API boundary. The engine itself trusts the
//! caller's asserted identity; authentication is an external collaborator's
//! responsibility.

use serde::{Deserialize, Serialize};

/// The closed set of roles in the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// System administrator with every capability.
    Admin,
    /// HR manager: manages employees and creates payrolls.
    Hr,
    /// Director: approves and settles payrolls, views company funds.
    Director,
}

/// An operation a role may or may not be allowed to perform.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Create user identities and assign roles.
    ManageUsers,
    /// Create companies and top up their balance.
    ManageCompanies,
    /// Create and deactivate employees.
    ManageEmployees,
    /// Create payroll records.
    CreatePayroll,
    /// Approve pending payrolls, committing company funds.
    ApprovePayroll,
    /// Mark approved payrolls as paid.
    SettlePayroll,
    /// View a company's balance and pending payroll exposure.
    ViewCompanyFunds,
    /// View payroll records and summaries.
    ViewPayroll,
    /// View and acknowledge notifications.
    ViewNotifications,
}

impl Role {
    /// The capability table: returns whether this role may perform `capability`.
    ///
    /// # Example
    ///
    /// ```
    /// use payroll_engine::models::{Capability, Role};
    ///
    /// assert!(Role::Director.allows(Capability::ApprovePayroll));
    /// assert!(!Role::Hr.allows(Capability::ApprovePayroll));
    /// ```
    pub fn allows(self, capability: Capability) -> bool {
        use Capability::*;
        match self {
            Role::Admin => true,
            Role::Hr => matches!(
                capability,
                ManageEmployees | CreatePayroll | ViewPayroll | ViewNotifications
            ),
            Role::Director => matches!(
                capability,
                ApprovePayroll | SettlePayroll | ViewCompanyFunds | ViewPayroll | ViewNotifications
            ),
        }
    }
}

/// A person identity known to the system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    /// Unique identifier for the user.
    pub id: u64,
    /// Login name, used for display only.
    pub username: String,
}

/// The role profile attached to a user identity.
///
/// Profiles are attached by an explicit post-creation hook when the identity
/// is created, never by ambient event wiring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user this profile belongs to.
    pub user_id: u64,
    /// The user's role.
    pub role: Role,
}
