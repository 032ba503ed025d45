//! Storage for the active hub reference.
//!
//! There is at most one active hub. Both write paths validate the candidate
//! with a balance read before touching the slot, so a failed validation
//! leaves the previous value in place.

use std::sync::Arc;

use crate::address::Address;
use crate::error::{violation, Error, ViolationKind};
use crate::hub::{Hub, HubReference};

/// Set-once hub slot with an owner-gated re-point path.
#[derive(Debug)]
pub struct HubRegistry {
    owner: Address,
    active: Option<HubReference>,
}

impl HubRegistry {
    /// Creates an empty registry administered by `owner`.
    pub fn new(owner: Address) -> Self {
        Self {
            owner,
            active: None,
        }
    }

    /// Returns the administering owner.
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Returns the active hub, if any.
    pub fn active(&self) -> Option<&HubReference> {
        self.active.as_ref()
    }

    /// Returns the active hub identity, if any.
    pub fn address(&self) -> Option<Address> {
        self.active.as_ref().map(HubReference::address)
    }

    /// One-shot initialization.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` if a hub is already set; `InvalidHub` if the
    /// candidate fails its validation read against `recipient`.
    pub fn initialize(&mut self, hub: Arc<dyn Hub>, recipient: Address) -> Result<Address, Error> {
        if let Some(current) = &self.active {
            return Err(violation(
                ViolationKind::AlreadyInitialized,
                format!("hub already set to {}", current.address()),
            ));
        }
        self.install(HubReference::new(hub), recipient)
    }

    /// Re-points the hub. Only the owner may do this.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `caller` is not the owner; `InvalidHub` if the candidate
    /// fails its validation read.
    pub fn reconfigure(
        &mut self,
        caller: Address,
        hub: Arc<dyn Hub>,
        recipient: Address,
    ) -> Result<Address, Error> {
        if caller != self.owner {
            return Err(violation(
                ViolationKind::NotOwner,
                format!("{} may not re-point the hub", caller),
            ));
        }
        self.install(HubReference::new(hub), recipient)
    }

    fn install(&mut self, candidate: HubReference, recipient: Address) -> Result<Address, Error> {
        let address = candidate.address();
        if address.is_zero() {
            return Err(violation(
                ViolationKind::InvalidHub,
                "hub address must not be zero",
            ));
        }

        let balance = candidate.balance_of(recipient).map_err(|e| {
            tracing::warn!(hub = %address, error = %e, "hub validation read failed");
            violation(
                ViolationKind::InvalidHub,
                format!("{} failed validation: {}", address, e),
            )
        })?;

        let previous = self.active.replace(candidate).map(|h| h.address());
        tracing::info!(hub = %address, previous = ?previous, balance = %balance, "hub configured");
        Ok(address)
    }
}
