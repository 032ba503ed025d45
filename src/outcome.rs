//! Outcomes of the pre-call authorization callback.
//!
//! On the wire an outcome is a single number: `0` accepts, `1..=9` are
//! reserved for reasons shared by every recipient, and anything from `10`
//! upward is free for recipient-specific rejections.

use std::fmt;

use crate::error::{violation, Error, ViolationKind};

/// Wire code for an accepted call.
pub const ACCEPT_CODE: u32 = 0;

/// Lowest wire code available to recipient-specific rejections.
pub const FIRST_RECIPIENT_CODE: u32 = 10;

/// Result of evaluating a relayed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Outcome {
    /// The hub may proceed with the call
    Accepted,
    /// The hub must not proceed
    Rejected(Rejection),
}

impl Outcome {
    /// Rejects with a recipient-specific code.
    ///
    /// # Errors
    ///
    /// `ReservedOutcomeCode` if `code` is below [`FIRST_RECIPIENT_CODE`].
    pub fn reject(code: u32) -> Result<Self, Error> {
        RecipientCode::new(code).map(Self::from)
    }

    /// Returns true if the call was accepted.
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted)
    }

    /// Returns the numeric wire code.
    pub fn code(&self) -> u32 {
        match self {
            Outcome::Accepted => ACCEPT_CODE,
            Outcome::Rejected(rejection) => rejection.code(),
        }
    }

    /// Decodes a numeric wire code.
    ///
    /// # Errors
    ///
    /// `ReservedOutcomeCode` for codes in the reserved range that carry no
    /// assigned meaning.
    pub fn from_code(code: u32) -> Result<Self, Error> {
        if code == ACCEPT_CODE {
            return Ok(Outcome::Accepted);
        }
        if code >= FIRST_RECIPIENT_CODE {
            return Ok(RecipientCode(code).into());
        }
        BaseReason::from_code(code).map(Self::from).ok_or_else(|| {
            violation(
                ViolationKind::ReservedOutcomeCode(code),
                format!("code {} is reserved but unassigned", code),
            )
        })
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Accepted => write!(f, "accepted"),
            Outcome::Rejected(rejection) => write!(f, "rejected ({})", rejection),
        }
    }
}

/// Why a relayed call was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// A reason from the shared taxonomy
    Base(BaseReason),
    /// A recipient-defined reason
    Recipient(RecipientCode),
}

impl Rejection {
    /// Returns the numeric wire code.
    pub fn code(&self) -> u32 {
        match self {
            Rejection::Base(reason) => reason.code(),
            Rejection::Recipient(code) => code.get(),
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::Base(reason) => write!(f, "{}", reason),
            Rejection::Recipient(code) => write!(f, "recipient code {}", code.get()),
        }
    }
}

/// Shared rejection reasons occupying the reserved range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BaseReason {
    /// The hub could not verify the request signature
    WrongSignature,
    /// The request nonce was out of sequence
    WrongNonce,
    /// The recipient's callback itself failed
    CallbackFailed,
    /// The recipient answered with an unusable code
    InvalidStatusCode,
    /// The originator is not on the recipient's allow-list
    NotAllowed,
    /// The originator is on the recipient's deny-list
    Denied,
    /// The originator has used up its relayed-call allowance
    QuotaExceeded,
}

impl BaseReason {
    /// Returns the numeric wire code.
    pub fn code(&self) -> u32 {
        match self {
            BaseReason::WrongSignature => 1,
            BaseReason::WrongNonce => 2,
            BaseReason::CallbackFailed => 3,
            BaseReason::InvalidStatusCode => 4,
            BaseReason::NotAllowed => 5,
            BaseReason::Denied => 6,
            BaseReason::QuotaExceeded => 7,
        }
    }

    /// Decodes a reserved-range wire code.
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            1 => Some(BaseReason::WrongSignature),
            2 => Some(BaseReason::WrongNonce),
            3 => Some(BaseReason::CallbackFailed),
            4 => Some(BaseReason::InvalidStatusCode),
            5 => Some(BaseReason::NotAllowed),
            6 => Some(BaseReason::Denied),
            7 => Some(BaseReason::QuotaExceeded),
            _ => None,
        }
    }
}

impl fmt::Display for BaseReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BaseReason::WrongSignature => write!(f, "wrong_signature"),
            BaseReason::WrongNonce => write!(f, "wrong_nonce"),
            BaseReason::CallbackFailed => write!(f, "callback_failed"),
            BaseReason::InvalidStatusCode => write!(f, "invalid_status_code"),
            BaseReason::NotAllowed => write!(f, "not_allowed"),
            BaseReason::Denied => write!(f, "denied"),
            BaseReason::QuotaExceeded => write!(f, "quota_exceeded"),
        }
    }
}

/// A recipient-specific rejection code, always `>= 10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipientCode(u32);

impl RecipientCode {
    /// Creates a recipient code.
    ///
    /// # Errors
    ///
    /// `ReservedOutcomeCode` if `code` falls in the reserved range.
    pub fn new(code: u32) -> Result<Self, Error> {
        if code < FIRST_RECIPIENT_CODE {
            return Err(violation(
                ViolationKind::ReservedOutcomeCode(code),
                format!(
                    "recipient codes start at {}, got {}",
                    FIRST_RECIPIENT_CODE, code
                ),
            ));
        }
        Ok(Self(code))
    }

    /// Returns the numeric code.
    pub fn get(&self) -> u32 {
        self.0
    }
}

// Conversions to Outcome
impl From<BaseReason> for Outcome {
    fn from(reason: BaseReason) -> Self {
        Outcome::Rejected(Rejection::Base(reason))
    }
}

impl From<RecipientCode> for Outcome {
    fn from(code: RecipientCode) -> Self {
        Outcome::Rejected(Rejection::Recipient(code))
    }
}
