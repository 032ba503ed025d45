use std::sync::Arc;

use crate::address::Address;
use crate::audit::{self, AuditEvent, AuditEventKind, AuditOutcome, AuditTrail};
use crate::call::{Envelope, OriginalCall, RawCall};
use crate::context::{RelayRequest, RelayResult};
use crate::error::{violation, Error, ViolationKind};
use crate::hub::Hub;
use crate::outcome::Outcome;
use crate::policy::RelayPolicy;
use crate::registry::HubRegistry;

/// A component that accepts both direct calls and calls relayed by a hub.
///
/// `RelayRecipient` owns the hub reference and is the only place where an
/// immediate caller is compared against it. Business logic asks it for the
/// true sender and original payload of each call, and the hub drives the
/// two callbacks around every relayed call:
///
/// ```text
/// accept_relayed_call --Accepted--> business call --> post_relayed_call
///                     --Rejected------------------> post_relayed_call (success = false)
/// ```
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use relay_recipient::{append_originator, AcceptAll, Address, Hub, HubQueryError, RelayRecipient};
///
/// struct LocalHub;
///
/// impl Hub for LocalHub {
///     fn address(&self) -> Address {
///         Address::new([0x11; 20])
///     }
///     fn balance_of(&self, _account: Address) -> Result<u128, HubQueryError> {
///         Ok(0)
///     }
/// }
///
/// let me = Address::new([0x02; 20]);
/// let owner = Address::new([0x01; 20]);
/// let mut recipient = RelayRecipient::new(me, owner, AcceptAll);
/// recipient.initialize(Arc::new(LocalHub)).expect("hub validates");
///
/// let alice = Address::new([0xaa; 20]);
/// let forwarded = append_originator(b"\x01\x02\x03\x04", alice);
///
/// let hub = Address::new([0x11; 20]);
/// assert_eq!(recipient.recover_sender(hub, &forwarded).unwrap(), alice);
/// assert_eq!(recipient.recover_original_payload(hub, &forwarded).unwrap(), b"\x01\x02\x03\x04");
/// ```
#[derive(Debug)]
pub struct RelayRecipient<P> {
    address: Address,
    registry: HubRegistry,
    policy: P,
    audit: Option<AuditTrail>,
}

impl<P: RelayPolicy> RelayRecipient<P> {
    /// Creates a recipient with no hub configured.
    ///
    /// Until a hub is set every call is treated as direct.
    pub fn new(address: Address, owner: Address, policy: P) -> Self {
        Self {
            address,
            registry: HubRegistry::new(owner),
            policy,
            audit: None,
        }
    }

    /// Returns this recipient's own identity.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Returns the owner allowed to re-point the hub.
    pub fn owner(&self) -> Address {
        self.registry.owner()
    }

    /// Returns the active hub identity, if any.
    pub fn hub(&self) -> Option<Address> {
        self.registry.address()
    }

    /// Returns true if `caller` is the active hub.
    pub fn is_hub(&self, caller: Address) -> bool {
        self.hub() == Some(caller)
    }

    /// Returns the authorization policy.
    pub fn policy(&self) -> &P {
        &self.policy
    }

    /// Returns the authorization policy for business-specific configuration.
    pub fn policy_mut(&mut self) -> &mut P {
        &mut self.policy
    }

    /// Keeps configuration changes and recorded calls in an in-memory trail.
    ///
    /// Every audit event is emitted through `tracing` regardless. Only the
    /// state-changing operations store into the trail; recovery and
    /// evaluation never do.
    pub fn with_audit_trail(mut self) -> Self {
        self.audit = Some(AuditTrail::new());
        self
    }

    /// Returns the audit trail, if one was enabled.
    pub fn audit_trail(&self) -> Option<&AuditTrail> {
        self.audit.as_ref()
    }

    /// Sets the hub, once.
    ///
    /// # Errors
    ///
    /// `AlreadyInitialized` if a hub is set; `InvalidHub` if the candidate's
    /// balance query fails. The hub reference is unchanged on error.
    pub fn initialize(&mut self, hub: Arc<dyn Hub>) -> Result<Address, Error> {
        let candidate = hub.address();
        let result = self.registry.initialize(hub, self.address);
        self.audit_configuration(candidate, &result);
        result
    }

    /// Re-points the hub. Only the owner may call this.
    ///
    /// # Errors
    ///
    /// `NotOwner` if `caller` is not the owner; `InvalidHub` if the candidate's
    /// balance query fails. The hub reference is unchanged on error.
    pub fn reconfigure(&mut self, caller: Address, hub: Arc<dyn Hub>) -> Result<Address, Error> {
        let candidate = hub.address();
        let result = self.registry.reconfigure(caller, hub, self.address);
        self.audit_configuration(candidate, &result);
        result
    }

    /// Queries the hub for this recipient's prepaid balance.
    ///
    /// # Errors
    ///
    /// `HubNotSet` if no hub is active; `HubQueryFailed` if the query fails.
    pub fn hub_balance(&self) -> Result<u128, Error> {
        let hub = self
            .registry
            .active()
            .ok_or_else(|| violation(ViolationKind::HubNotSet, "no hub configured"))?;
        hub.balance_of(self.address).map_err(|e| {
            violation(
                ViolationKind::HubQueryFailed,
                format!("balance query against {} failed: {}", hub.address(), e),
            )
        })
    }

    /// Makes the trust decision for a raw call.
    ///
    /// # Errors
    ///
    /// `MalformedRelayedPayload` if the hub is the caller but the payload is
    /// shorter than an address.
    pub fn envelope<'a>(&self, raw: RawCall<'a>) -> Result<Envelope<'a>, Error> {
        let result = Envelope::classify(raw, self.hub());
        match &result {
            Ok(env) => tracing::debug!(
                caller = %raw.caller(),
                sender = %env.sender(),
                relayed = env.is_relayed(),
                "call classified"
            ),
            Err(e) => audit::emit(
                &AuditEvent::new(AuditEventKind::TrustViolation, AuditOutcome::Error)
                    .with_subject(raw.caller())
                    .with_detail(e.kind().to_string()),
            ),
        }
        result
    }

    /// Returns the (originator, payload) pair business logic should act on.
    pub fn original_call<'a>(
        &self,
        caller: Address,
        payload: &'a [u8],
    ) -> Result<OriginalCall<'a>, Error> {
        self.envelope(RawCall::new(caller, payload))
            .map(Envelope::into_original)
    }

    /// Returns the true originator of a call.
    ///
    /// The immediate caller itself, unless it is the hub, in which case the
    /// last 20 bytes of the payload.
    ///
    /// # Errors
    ///
    /// `MalformedRelayedPayload` if the hub is the caller but the payload is
    /// shorter than an address.
    pub fn recover_sender(&self, caller: Address, payload: &[u8]) -> Result<Address, Error> {
        self.original_call(caller, payload).map(|call| call.sender())
    }

    /// Returns the payload the originator intended.
    ///
    /// The payload itself, unless the hub is the caller, in which case the
    /// payload without its last 20 bytes.
    ///
    /// # Errors
    ///
    /// `MalformedRelayedPayload` if the hub is the caller but the payload is
    /// shorter than an address.
    pub fn recover_original_payload<'a>(
        &self,
        caller: Address,
        payload: &'a [u8],
    ) -> Result<&'a [u8], Error> {
        self.original_call(caller, payload).map(|call| call.payload())
    }

    /// Pre-call authorization callback.
    ///
    /// Only the active hub may call this. A rejection is an ordinary
    /// `Ok(Outcome::Rejected(..))`; `Err` means the callback itself was
    /// misused. Never mutates policy state or the audit trail.
    pub fn accept_relayed_call(
        &self,
        caller: Address,
        request: &RelayRequest,
    ) -> Result<Outcome, Error> {
        self.require_hub(caller, "accept_relayed_call")?;

        let outcome = self.policy.evaluate(request);
        let audit_outcome = if outcome.is_accepted() {
            AuditOutcome::Success
        } else {
            AuditOutcome::Denied
        };
        audit::emit(
            &AuditEvent::new(AuditEventKind::RelayEvaluated, audit_outcome)
                .with_subject(request.originator)
                .with_relay(request.relay)
                .with_code(outcome.code()),
        );
        Ok(outcome)
    }

    /// Post-call accounting callback.
    ///
    /// Only the active hub may call this. Once the caller check passes it
    /// always succeeds: accounting never blocks settlement.
    pub fn post_relayed_call(&mut self, caller: Address, result: &RelayResult) -> Result<(), Error> {
        self.require_hub(caller, "post_relayed_call")?;

        self.policy.record(result);
        let audit_outcome = if result.success {
            AuditOutcome::Success
        } else {
            AuditOutcome::Error
        };
        self.record_audit(
            AuditEvent::new(AuditEventKind::RelayRecorded, audit_outcome)
                .with_subject(result.originator)
                .with_relay(result.relay)
                .with_detail(format!("used_gas={}", result.used_gas)),
        );
        Ok(())
    }

    fn require_hub(&self, caller: Address, callback: &str) -> Result<(), Error> {
        let err = match self.hub() {
            Some(hub) if hub == caller => return Ok(()),
            Some(hub) => violation(
                ViolationKind::CallerNotHub,
                format!("{} called by {}, hub is {}", callback, caller, hub),
            ),
            None => violation(
                ViolationKind::HubNotSet,
                format!("{} called by {} with no hub configured", callback, caller),
            ),
        };
        tracing::warn!(%caller, callback, "hub-only callback from foreign caller");
        audit::emit(
            &AuditEvent::new(AuditEventKind::TrustViolation, AuditOutcome::Error)
                .with_subject(caller)
                .with_detail(err.kind().to_string()),
        );
        Err(err)
    }

    fn audit_configuration(&self, candidate: Address, result: &Result<Address, Error>) {
        let event = match result {
            Ok(hub) => AuditEvent::new(AuditEventKind::HubConfigured, AuditOutcome::Success)
                .with_subject(*hub),
            Err(e) => AuditEvent::new(AuditEventKind::HubConfigured, AuditOutcome::Error)
                .with_subject(candidate)
                .with_detail(e.kind().to_string()),
        };
        self.record_audit(event);
    }

    fn record_audit(&self, event: AuditEvent) {
        match &self.audit {
            Some(trail) => trail.record(event),
            None => audit::emit(&event),
        }
    }
}
