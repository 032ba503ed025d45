//! The hub as seen from a recipient.
//!
//! The hub's internals (signature checks, nonce tracking, fee settlement)
//! live elsewhere. A recipient only needs to know the hub's identity and
//! to be able to issue its read-only balance query.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use crate::address::Address;

/// Read interface a conforming hub exposes to recipients.
///
/// `balance_of` must not mutate hub state; recipients call it to validate a
/// candidate hub and for diagnostics.
pub trait Hub: Send + Sync {
    /// The hub's own identity. Relayed calls arrive with this as the immediate caller.
    fn address(&self) -> Address;

    /// Returns the prepaid balance held by the hub for `account`.
    fn balance_of(&self, account: Address) -> Result<u128, HubQueryError>;
}

/// The hub's read query did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("hub query failed: {reason}")]
pub struct HubQueryError {
    reason: String,
}

impl HubQueryError {
    /// Creates a query error with a reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// Returns the reason the query failed.
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

/// A shared handle to the active hub.
#[derive(Clone)]
pub struct HubReference {
    address: Address,
    hub: Arc<dyn Hub>,
}

impl HubReference {
    /// Wraps a hub, capturing its identity once.
    pub fn new(hub: Arc<dyn Hub>) -> Self {
        Self {
            address: hub.address(),
            hub,
        }
    }

    /// Returns the hub identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Issues the read-only balance query.
    pub fn balance_of(&self, account: Address) -> Result<u128, HubQueryError> {
        self.hub.balance_of(account)
    }
}

impl fmt::Debug for HubReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HubReference")
            .field("address", &self.address)
            .finish()
    }
}
