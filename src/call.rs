//! Incoming calls and the relayed-call envelope.
//!
//! A [`RawCall`] is what the recipient observes: the immediate caller and
//! the payload bytes exactly as delivered. Nothing in a raw payload is
//! trusted. [`Envelope::classify`] is the single place where the immediate
//! caller is compared against the hub; everything downstream reads the
//! resulting [`Envelope`] or [`OriginalCall`] and never re-parses bytes.

use crate::address::{Address, ADDRESS_LEN};
use crate::error::{violation, Error, ViolationKind};

/// A call as observed at invocation time.
///
/// Ephemeral: borrows the payload for the duration of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCall<'a> {
    caller: Address,
    payload: &'a [u8],
}

impl<'a> RawCall<'a> {
    /// Wraps an immediate caller and its raw payload.
    pub fn new(caller: Address, payload: &'a [u8]) -> Self {
        Self { caller, payload }
    }

    /// Returns the immediate caller.
    pub fn caller(&self) -> Address {
        self.caller
    }

    /// Returns the payload exactly as delivered.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }
}

/// A call after the trust decision has been made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Envelope<'a> {
    /// The immediate caller is the originator; the payload is untouched.
    Direct {
        /// The immediate caller
        sender: Address,
        /// The full payload, including any bytes that merely look like a suffix
        payload: &'a [u8],
    },
    /// The hub forwarded the call and vouched for the originator.
    Relayed {
        /// The hub that forwarded the call
        hub: Address,
        /// The originator taken from the trusted suffix
        originator: Address,
        /// The payload with the suffix removed
        payload: &'a [u8],
    },
}

impl<'a> Envelope<'a> {
    /// Classifies a raw call against the active hub.
    ///
    /// When no hub is configured every call is direct. When the immediate
    /// caller is the hub the last [`ADDRESS_LEN`] bytes are the originator;
    /// a shorter payload fails with `MalformedRelayedPayload`.
    pub(crate) fn classify(raw: RawCall<'a>, hub: Option<Address>) -> Result<Self, Error> {
        if hub != Some(raw.caller) {
            return Ok(Envelope::Direct {
                sender: raw.caller,
                payload: raw.payload,
            });
        }

        let (payload, originator) = split_originator(raw.payload).ok_or_else(|| {
            tracing::warn!(
                hub = %raw.caller,
                len = raw.payload.len(),
                "relayed payload too short for originator suffix"
            );
            violation(
                ViolationKind::MalformedRelayedPayload {
                    len: raw.payload.len(),
                },
                format!(
                    "relayed payload of {} bytes cannot carry a {}-byte originator",
                    raw.payload.len(),
                    ADDRESS_LEN
                ),
            )
        })?;

        Ok(Envelope::Relayed {
            hub: raw.caller,
            originator,
            payload,
        })
    }

    /// Returns true if the hub forwarded this call.
    pub fn is_relayed(&self) -> bool {
        matches!(self, Envelope::Relayed { .. })
    }

    /// Returns the true originator.
    pub fn sender(&self) -> Address {
        match self {
            Envelope::Direct { sender, .. } => *sender,
            Envelope::Relayed { originator, .. } => *originator,
        }
    }

    /// Returns the payload the originator intended.
    pub fn payload(&self) -> &'a [u8] {
        match self {
            Envelope::Direct { payload, .. } | Envelope::Relayed { payload, .. } => payload,
        }
    }

    /// Collapses the envelope into the pair business logic works with.
    pub fn into_original(self) -> OriginalCall<'a> {
        OriginalCall {
            sender: self.sender(),
            payload: self.payload(),
            relayed: self.is_relayed(),
        }
    }
}

/// The reconstructed (originator, payload) pair.
///
/// Only obtainable from an [`Envelope`], so holding one proves the trust
/// decision was made.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OriginalCall<'a> {
    sender: Address,
    payload: &'a [u8],
    relayed: bool,
}

impl<'a> OriginalCall<'a> {
    /// Returns the true originator.
    pub fn sender(&self) -> Address {
        self.sender
    }

    /// Returns the original payload.
    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// Returns true if the call arrived through the hub.
    pub fn is_relayed(&self) -> bool {
        self.relayed
    }

    /// Returns the 4-byte function selector, if the payload has one.
    pub fn selector(&self) -> Option<[u8; 4]> {
        self.payload.get(..4).and_then(|s| <[u8; 4]>::try_from(s).ok())
    }
}

/// Splits a relayed payload into the original bytes and the trailing originator.
///
/// Returns `None` if the payload is shorter than [`ADDRESS_LEN`].
pub fn split_originator(payload: &[u8]) -> Option<(&[u8], Address)> {
    let cut = payload.len().checked_sub(ADDRESS_LEN)?;
    let (original, suffix) = payload.split_at(cut);
    Address::from_slice(suffix).map(|originator| (original, originator))
}

/// Builds a forwarded payload: `original ++ originator`.
///
/// This is the hub's half of the calling convention.
pub fn append_originator(original: &[u8], originator: Address) -> Vec<u8> {
    let mut forwarded = Vec::with_capacity(original.len() + ADDRESS_LEN);
    forwarded.extend_from_slice(original);
    forwarded.extend_from_slice(originator.as_bytes());
    forwarded
}

#[cfg(test)]
mod tests {
    use super::*;

    const HUB: Address = Address::new([0x11; 20]);
    const ALICE: Address = Address::new([0xaa; 20]);
    const MALLORY: Address = Address::new([0x66; 20]);

    fn business_payload() -> Vec<u8> {
        let mut payload = vec![0xa9, 0x05, 0x9c, 0xbb];
        payload.extend_from_slice(&[0u8; 32]);
        payload
    }

    #[test]
    fn direct_call_passes_through() {
        let payload = business_payload();
        let env = Envelope::classify(RawCall::new(MALLORY, &payload), Some(HUB)).unwrap();

        assert!(!env.is_relayed());
        assert_eq!(env.sender(), MALLORY);
        assert_eq!(env.payload(), payload.as_slice());
    }

    #[test]
    fn empty_direct_payload_passes_through() {
        let env = Envelope::classify(RawCall::new(MALLORY, &[]), Some(HUB)).unwrap();

        assert!(!env.is_relayed());
        assert_eq!(env.sender(), MALLORY);
        assert!(env.payload().is_empty());
    }

    #[test]
    fn relayed_call_strips_suffix() {
        let original = business_payload();
        let forwarded = append_originator(&original, ALICE);
        let env = Envelope::classify(RawCall::new(HUB, &forwarded), Some(HUB)).unwrap();

        assert_eq!(
            env,
            Envelope::Relayed {
                hub: HUB,
                originator: ALICE,
                payload: original.as_slice(),
            }
        );
    }

    #[test]
    fn suffix_from_non_hub_is_ordinary_data() {
        let forwarded = append_originator(&business_payload(), ALICE);
        let env = Envelope::classify(RawCall::new(MALLORY, &forwarded), Some(HUB)).unwrap();

        assert_eq!(env.sender(), MALLORY);
        assert_eq!(env.payload(), forwarded.as_slice());
    }

    #[test]
    fn short_relayed_payload_is_malformed() {
        let err = Envelope::classify(RawCall::new(HUB, &[0x12, 0x34]), Some(HUB)).unwrap_err();
        assert_eq!(
            err.kind(),
            &ViolationKind::MalformedRelayedPayload { len: 2 }
        );
    }

    #[test]
    fn exactly_suffix_sized_payload_yields_empty_original() {
        let forwarded = append_originator(&[], ALICE);
        let env = Envelope::classify(RawCall::new(HUB, &forwarded), Some(HUB)).unwrap();

        assert_eq!(env.sender(), ALICE);
        assert!(env.payload().is_empty());
    }

    #[test]
    fn without_hub_everything_is_direct() {
        let forwarded = append_originator(&business_payload(), ALICE);
        let env = Envelope::classify(RawCall::new(HUB, &forwarded), None).unwrap();

        assert!(!env.is_relayed());
        assert_eq!(env.sender(), HUB);
    }

    #[test]
    fn original_call_exposes_selector() {
        let original = business_payload();
        let forwarded = append_originator(&original, ALICE);
        let call = Envelope::classify(RawCall::new(HUB, &forwarded), Some(HUB))
            .unwrap()
            .into_original();

        assert!(call.is_relayed());
        assert_eq!(call.selector(), Some([0xa9, 0x05, 0x9c, 0xbb]));

        let empty = Envelope::classify(RawCall::new(ALICE, &[]), Some(HUB))
            .unwrap()
            .into_original();
        assert_eq!(empty.selector(), None);
    }

    #[test]
    fn split_originator_requires_full_suffix() {
        assert!(split_originator(&[0u8; 19]).is_none());
        let (rest, who) = split_originator(&[0xaa; 20]).unwrap();
        assert!(rest.is_empty());
        assert_eq!(who, ALICE);
    }
}
