use std::fmt;

use thiserror::Error as ThisError;

/// Errors that can occur in the relay recipient crate.
///
/// Authorization rejections are *not* errors. A policy that declines a
/// relayed call produces [`Outcome::Rejected`](crate::Outcome::Rejected);
/// this type is reserved for faults.
#[derive(Debug, ThisError)]
pub enum Error {
    /// A trust or configuration rule was violated
    #[error("Relay violation: {0}")]
    Violation(#[from] Violation),
}

impl Error {
    /// Returns the kind of the underlying violation.
    pub fn kind(&self) -> &ViolationKind {
        match self {
            Error::Violation(v) => &v.kind,
        }
    }
}

/// A violation with details about what failed.
#[derive(Debug, ThisError)]
#[error("{kind}: {message}")]
pub struct Violation {
    /// The kind of violation that occurred
    pub kind: ViolationKind,
    /// Human-readable message explaining the violation
    pub message: String,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// The kind of violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViolationKind {
    /// The one-shot hub initialization was called while a hub is already set
    AlreadyInitialized,
    /// A candidate hub failed its validation read
    InvalidHub,
    /// The active hub failed a balance query after it was installed
    HubQueryFailed,
    /// The hub is the immediate caller but the payload cannot hold the originator suffix
    MalformedRelayedPayload {
        /// Length of the offending payload in bytes
        len: usize,
    },
    /// An operation needs an active hub and none is configured
    HubNotSet,
    /// A hub-only callback was invoked by some other caller
    CallerNotHub,
    /// A privileged operation was invoked by someone other than the owner
    NotOwner,
    /// A recipient-specific outcome code collides with the reserved base range
    ReservedOutcomeCode(u32),
    /// Bytes or text could not be decoded as an address
    InvalidAddress,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationKind::AlreadyInitialized => write!(f, "AlreadyInitialized"),
            ViolationKind::InvalidHub => write!(f, "InvalidHub"),
            ViolationKind::HubQueryFailed => write!(f, "HubQueryFailed"),
            ViolationKind::MalformedRelayedPayload { len } => {
                write!(f, "MalformedRelayedPayload (len {})", len)
            }
            ViolationKind::HubNotSet => write!(f, "HubNotSet"),
            ViolationKind::CallerNotHub => write!(f, "CallerNotHub"),
            ViolationKind::NotOwner => write!(f, "NotOwner"),
            ViolationKind::ReservedOutcomeCode(code) => {
                write!(f, "ReservedOutcomeCode ({})", code)
            }
            ViolationKind::InvalidAddress => write!(f, "InvalidAddress"),
        }
    }
}

/// Shorthand for building an [`Error`] from a kind and message.
pub(crate) fn violation(kind: ViolationKind, message: impl Into<String>) -> Error {
    Error::Violation(Violation::new(kind, message))
}
