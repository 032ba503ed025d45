//! Property tests for sender and payload recovery.
//!
//! These cover the laws every recovery must satisfy regardless of payload
//! contents: direct calls pass through, relayed calls split exactly, short
//! relayed payloads fail, and both recovery operations agree.

use std::sync::Arc;

use proptest::prelude::*;
use relay_recipient::{
    append_originator, AcceptAll, Address, Hub, HubQueryError, RelayRecipient, ViolationKind,
    ADDRESS_LEN,
};

const HUB: Address = Address::new([0x11; 20]);

struct MockHub;

impl Hub for MockHub {
    fn address(&self) -> Address {
        HUB
    }

    fn balance_of(&self, _account: Address) -> Result<u128, HubQueryError> {
        Ok(0)
    }
}

fn recipient() -> RelayRecipient<AcceptAll> {
    let mut r = RelayRecipient::new(Address::new([0x02; 20]), Address::new([0x01; 20]), AcceptAll);
    r.initialize(Arc::new(MockHub)).unwrap();
    r
}

// Strategy: any address other than the hub
fn arb_non_hub() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>()
        .prop_map(Address::new)
        .prop_filter("must not be the hub", |a| *a != HUB)
}

fn arb_address() -> impl Strategy<Value = Address> {
    any::<[u8; 20]>().prop_map(Address::new)
}

proptest! {
    /// Property: direct calls pass through untouched, for any length including zero
    #[test]
    fn proptest_direct_calls_pass_through(
        caller in arb_non_hub(),
        payload in prop::collection::vec(any::<u8>(), 0..128)
    ) {
        let r = recipient();
        prop_assert_eq!(r.recover_sender(caller, &payload).unwrap(), caller);
        prop_assert_eq!(r.recover_original_payload(caller, &payload).unwrap(), payload.as_slice());
    }

    /// Property: relayed calls split off exactly the trailing originator, and
    /// re-appending it reproduces the forwarded payload bit for bit
    #[test]
    fn proptest_relayed_calls_round_trip(
        payload in prop::collection::vec(any::<u8>(), ADDRESS_LEN..160)
    ) {
        let r = recipient();

        let sender = r.recover_sender(HUB, &payload).unwrap();
        let original = r.recover_original_payload(HUB, &payload).unwrap();

        prop_assert_eq!(sender.as_bytes().as_slice(), &payload[payload.len() - ADDRESS_LEN..]);
        prop_assert_eq!(original.len(), payload.len() - ADDRESS_LEN);
        prop_assert_eq!(append_originator(original, sender), payload);
    }

    /// Property: building a forwarded payload and recovering it is lossless
    #[test]
    fn proptest_forwarded_call_recovers_inputs(
        originator in arb_address(),
        call in prop::collection::vec(any::<u8>(), 0..128)
    ) {
        let r = recipient();
        let forwarded = append_originator(&call, originator);

        let recovered = r.original_call(HUB, &forwarded).unwrap();
        prop_assert!(recovered.is_relayed());
        prop_assert_eq!(recovered.sender(), originator);
        prop_assert_eq!(recovered.payload(), call.as_slice());
    }

    /// Property: short relayed payloads always fail, never defaulting an identity
    #[test]
    fn proptest_short_relayed_payloads_fail(
        payload in prop::collection::vec(any::<u8>(), 0..ADDRESS_LEN)
    ) {
        let r = recipient();
        let expected = ViolationKind::MalformedRelayedPayload { len: payload.len() };

        let sender = r.recover_sender(HUB, &payload).unwrap_err();
        let original = r.recover_original_payload(HUB, &payload).unwrap_err();
        prop_assert_eq!(sender.kind(), &expected);
        prop_assert_eq!(original.kind(), &expected);
    }

    /// Property: recovery is idempotent and both operations take the same branch
    #[test]
    fn proptest_recovery_is_idempotent_and_consistent(
        from_hub in any::<bool>(),
        other in arb_non_hub(),
        payload in prop::collection::vec(any::<u8>(), 0..64)
    ) {
        let r = recipient();
        let caller = if from_hub { HUB } else { other };

        let sender_a = r.recover_sender(caller, &payload).map_err(|e| e.kind().clone());
        let sender_b = r.recover_sender(caller, &payload).map_err(|e| e.kind().clone());
        let payload_a = r.recover_original_payload(caller, &payload).map_err(|e| e.kind().clone());
        let payload_b = r.recover_original_payload(caller, &payload).map_err(|e| e.kind().clone());

        prop_assert_eq!(&sender_a, &sender_b);
        prop_assert_eq!(&payload_a, &payload_b);
        prop_assert_eq!(sender_a.is_ok(), payload_a.is_ok());

        let env = r.original_call(caller, &payload);
        if let Ok(env) = env {
            prop_assert_eq!(env.is_relayed(), from_hub);
        }
    }
}
