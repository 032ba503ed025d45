//! Sender recovery and relayed-call authorization behind a trusted hub.
//!
//! A recipient accepts calls directly from their originators and also calls
//! forwarded by a single trusted hub, which appends the originator's 20-byte
//! identity to the payload. This crate provides:
//! - **Sender recovery**: the true originator and original payload of any call,
//!   trusting the appended suffix only when the immediate caller is the hub
//! - **Hub registration**: a set-once, owner-re-pointable hub reference that is
//!   validated with a read query before it becomes active
//! - **Callbacks**: the pre-call authorization and post-call accounting hooks
//!   the hub invokes around every relayed call, backed by pluggable policies
//!
//! # Core Types
//!
//! - [`RelayRecipient`]: Owns the hub reference, policy and optional audit trail
//! - [`Envelope`]: A call after the trust decision, direct or relayed
//! - [`RelayPolicy`]: Authorization and accounting strategy
//! - [`Outcome`]: Accept, or reject with a reserved or recipient-specific code
//!
//! # Examples
//!
//! ```
//! use relay_recipient::{Address, AllowList, RawCall, RelayRecipient};
//!
//! let me = Address::new([0x02; 20]);
//! let owner = Address::new([0x01; 20]);
//! let recipient = RelayRecipient::new(me, owner, AllowList::default());
//!
//! // With no hub configured every call is direct.
//! let caller = Address::new([0xaa; 20]);
//! let env = recipient.envelope(RawCall::new(caller, b"payload")).unwrap();
//! assert!(!env.is_relayed());
//! assert_eq!(env.sender(), caller);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod address;
pub mod audit;
mod call;
mod config;
mod context;
mod error;
mod hub;
mod outcome;
mod policy;
mod recipient;
mod registry;
mod relay;

pub use address::{Address, ADDRESS_LEN};
pub use call::{append_originator, split_originator, Envelope, OriginalCall, RawCall};
pub use config::RecipientConfig;
pub use context::{ApprovalData, RelayRequest, RelayResult, HUB_SIGNATURE_LEN};
pub use error::{Error, Violation, ViolationKind};
pub use hub::{Hub, HubQueryError, HubReference};
pub use outcome::{
    BaseReason, Outcome, RecipientCode, Rejection, ACCEPT_CODE, FIRST_RECIPIENT_CODE,
};
pub use policy::{
    policy_fn, AcceptAll, AllOf, AllowList, CallQuota, DenyList, FnPolicy, RelayPolicy,
};
pub use recipient::RelayRecipient;
pub use registry::HubRegistry;
pub use relay::{relay_call, Execution, RelayReceipt};
