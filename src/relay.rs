//! The hub's side of one relayed call.
//!
//! [`relay_call`] runs the fixed sequence a hub performs against a
//! recipient: authorize, execute, account. It exists so recipients can be
//! exercised end to end without a real hub, and so the ordering and
//! rollback rules live in one place.

use crate::address::Address;
use crate::call::{append_originator, OriginalCall};
use crate::context::{RelayRequest, RelayResult};
use crate::error::Error;
use crate::outcome::Outcome;
use crate::policy::RelayPolicy;
use crate::recipient::RelayRecipient;

/// What the business call reports back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Whether the call completed without reverting
    pub success: bool,
    /// Gas the call consumed
    pub used_gas: u64,
}

impl Execution {
    /// A call that completed.
    pub fn succeeded(used_gas: u64) -> Self {
        Self {
            success: true,
            used_gas,
        }
    }

    /// A call that reverted.
    pub fn reverted(used_gas: u64) -> Self {
        Self {
            success: false,
            used_gas,
        }
    }
}

/// Summary of one relayed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayReceipt {
    /// What the authorization callback decided
    pub outcome: Outcome,
    /// Whether the business call ran at all
    pub executed: bool,
    /// Whether the business call ran and succeeded
    pub success: bool,
    /// Gas reported to the accounting callback
    pub used_gas: u64,
}

/// Relays `request` to `recipient` as the hub at `hub`.
///
/// 1. `accept_relayed_call`. A rejection skips step 2.
/// 2. The business call receives the [`OriginalCall`] recovered from the
///    forwarded payload (`encoded_function ++ originator`). If it reverts,
///    `state` is restored to its value before the call.
/// 3. `post_relayed_call`, always, with the business outcome (`success = false`
///    when the call was rejected). Accounting lives in the recipient and is
///    never rolled back.
///
/// # Errors
///
/// Fails only if `hub` is not the recipient's active hub. Rejections are
/// reported in [`RelayReceipt::outcome`].
pub fn relay_call<P, S, F>(
    recipient: &mut RelayRecipient<P>,
    state: &mut S,
    hub: Address,
    request: &RelayRequest,
    business: F,
) -> Result<RelayReceipt, Error>
where
    P: RelayPolicy,
    S: Clone,
    F: FnOnce(&mut S, OriginalCall<'_>) -> Execution,
{
    let span = tracing::debug_span!(
        "relay_call",
        originator = %request.originator,
        relay = %request.relay
    );
    let _guard = span.enter();

    let outcome = recipient.accept_relayed_call(hub, request)?;
    if !outcome.is_accepted() {
        tracing::debug!(code = outcome.code(), "relayed call rejected");
        recipient.post_relayed_call(hub, &RelayResult::for_request(request, false, 0))?;
        return Ok(RelayReceipt {
            outcome,
            executed: false,
            success: false,
            used_gas: 0,
        });
    }

    let forwarded = append_originator(&request.encoded_function, request.originator);
    let call = recipient.original_call(hub, &forwarded)?;

    let snapshot = state.clone();
    let execution = business(state, call);
    if !execution.success {
        tracing::debug!(used_gas = execution.used_gas, "business call reverted");
        *state = snapshot;
    }

    recipient.post_relayed_call(
        hub,
        &RelayResult::for_request(request, execution.success, execution.used_gas),
    )?;

    Ok(RelayReceipt {
        outcome,
        executed: true,
        success: execution.success,
        used_gas: execution.used_gas,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::context::ApprovalData;
    use crate::error::ViolationKind;
    use crate::hub::{Hub, HubQueryError};
    use crate::policy::{policy_fn, AcceptAll, CallQuota};

    const HUB: Address = Address::new([0x11; 20]);
    const ALICE: Address = Address::new([0xaa; 20]);

    struct TestHub;

    impl Hub for TestHub {
        fn address(&self) -> Address {
            HUB
        }

        fn balance_of(&self, _account: Address) -> Result<u128, HubQueryError> {
            Ok(0)
        }
    }

    fn recipient<P: RelayPolicy>(policy: P) -> RelayRecipient<P> {
        let mut r = RelayRecipient::new(Address::new([0x02; 20]), Address::new([0x01; 20]), policy);
        r.initialize(Arc::new(TestHub)).unwrap();
        r
    }

    fn request() -> RelayRequest {
        RelayRequest {
            relay: Address::new([0x33; 20]),
            originator: ALICE,
            encoded_function: vec![0x60, 0xfe, 0x47, 0xb1, 0, 0, 0, 42],
            gas_price: 1,
            fee_rate: 10,
            approval: ApprovalData::default(),
        }
    }

    #[test]
    fn accepted_call_sees_original_sender_and_payload() {
        let mut r = recipient(AcceptAll);
        let mut seen = Vec::new();

        let receipt = relay_call(&mut r, &mut seen, HUB, &request(), |seen, call| {
            seen.push((call.sender(), call.payload().to_vec()));
            Execution::succeeded(30_000)
        })
        .unwrap();

        assert!(receipt.executed && receipt.success);
        assert_eq!(receipt.used_gas, 30_000);
        assert_eq!(seen, vec![(ALICE, request().encoded_function)]);
    }

    #[test]
    fn rejected_call_skips_business_but_is_recorded() {
        let mut r = RelayRecipient::new(
            Address::new([0x02; 20]),
            Address::new([0x01; 20]),
            policy_fn(|_: &RelayRequest| Outcome::reject(11).unwrap_or(Outcome::Accepted)),
        )
        .with_audit_trail();
        r.initialize(Arc::new(TestHub)).unwrap();
        let mut ran = false;

        let receipt = relay_call(&mut r, &mut ran, HUB, &request(), |ran, _| {
            *ran = true;
            Execution::succeeded(1)
        })
        .unwrap();

        assert!(!ran);
        assert_eq!(receipt.outcome.code(), 11);
        assert!(!receipt.executed);
        assert!(!receipt.success);

        let last = r.audit_trail().unwrap().last().unwrap();
        assert_eq!(last.kind(), crate::audit::AuditEventKind::RelayRecorded);
        assert_eq!(last.outcome(), crate::audit::AuditOutcome::Error);
    }

    #[test]
    fn reverted_call_rolls_back_state_but_keeps_accounting() {
        let mut r = recipient(CallQuota::new(5));
        let mut balance: u64 = 100;

        let receipt = relay_call(&mut r, &mut balance, HUB, &request(), |balance, _| {
            *balance -= 40;
            Execution::reverted(21_000)
        })
        .unwrap();

        assert!(receipt.executed);
        assert!(!receipt.success);
        assert_eq!(balance, 100);
        assert_eq!(r.policy().used(&ALICE), 1);
    }

    #[test]
    fn foreign_hub_cannot_drive_callbacks() {
        let mut r = recipient(AcceptAll);
        let err = relay_call(&mut r, &mut (), Address::new([0x66; 20]), &request(), |_, _| {
            Execution::succeeded(0)
        })
        .unwrap_err();

        assert_eq!(err.kind(), &ViolationKind::CallerNotHub);
    }
}
