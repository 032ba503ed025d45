//! Audit event schema and types.

use std::fmt;

use crate::address::Address;

/// Kind of audit event being recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditEventKind {
    /// A hub was installed or re-pointed (or an attempt failed)
    HubConfigured,
    /// The pre-call callback produced an outcome
    RelayEvaluated,
    /// The post-call callback accounted for a call
    RelayRecorded,
    /// A trust rule was broken: foreign callback caller or malformed relayed payload
    TrustViolation,
}

impl fmt::Display for AuditEventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditEventKind::HubConfigured => write!(f, "hub_configured"),
            AuditEventKind::RelayEvaluated => write!(f, "relay_evaluated"),
            AuditEventKind::RelayRecorded => write!(f, "relay_recorded"),
            AuditEventKind::TrustViolation => write!(f, "trust_violation"),
        }
    }
}

/// Outcome of an audited operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuditOutcome {
    /// Operation succeeded
    Success,
    /// Operation was declined by policy
    Denied,
    /// Operation failed due to error
    Error,
}

impl fmt::Display for AuditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOutcome::Success => write!(f, "success"),
            AuditOutcome::Denied => write!(f, "denied"),
            AuditOutcome::Error => write!(f, "error"),
        }
    }
}

/// A structured audit event.
///
/// # Example
///
/// ```
/// use relay_recipient::Address;
/// use relay_recipient::audit::{AuditEvent, AuditEventKind, AuditOutcome};
///
/// let originator = Address::new([0xaa; 20]);
/// let event = AuditEvent::new(AuditEventKind::RelayEvaluated, AuditOutcome::Denied)
///     .with_subject(originator)
///     .with_code(11);
///
/// assert_eq!(event.subject(), Some(originator));
/// assert_eq!(event.code(), Some(11));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    kind: AuditEventKind,
    outcome: AuditOutcome,
    /// Originator for relay events, hub for configuration events
    subject: Option<Address>,
    relay: Option<Address>,
    /// Outcome code for evaluations
    code: Option<u32>,
    detail: Option<String>,
}

impl AuditEvent {
    /// Creates a new audit event with required fields.
    pub fn new(kind: AuditEventKind, outcome: AuditOutcome) -> Self {
        Self {
            kind,
            outcome,
            subject: None,
            relay: None,
            code: None,
            detail: None,
        }
    }

    /// Sets the identity the event is about.
    pub fn with_subject(mut self, subject: Address) -> Self {
        self.subject = Some(subject);
        self
    }

    /// Sets the relay involved.
    pub fn with_relay(mut self, relay: Address) -> Self {
        self.relay = Some(relay);
        self
    }

    /// Sets the outcome code.
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Sets a short free-form detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// Returns the event kind.
    pub fn kind(&self) -> AuditEventKind {
        self.kind
    }

    /// Returns the operation outcome.
    pub fn outcome(&self) -> AuditOutcome {
        self.outcome
    }

    /// Returns the subject, if set.
    pub fn subject(&self) -> Option<Address> {
        self.subject
    }

    /// Returns the relay, if set.
    pub fn relay(&self) -> Option<Address> {
        self.relay
    }

    /// Returns the outcome code, if set.
    pub fn code(&self) -> Option<u32> {
        self.code
    }

    /// Returns the detail, if set.
    pub fn detail(&self) -> Option<&str> {
        self.detail.as_deref()
    }
}

impl fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuditEvent[kind={}, outcome={}", self.kind, self.outcome)?;

        if let Some(subject) = &self.subject {
            write!(f, ", subject={}", subject)?;
        }
        if let Some(relay) = &self.relay {
            write!(f, ", relay={}", relay)?;
        }
        if let Some(code) = self.code {
            write!(f, ", code={}", code)?;
        }
        if let Some(detail) = &self.detail {
            write!(f, ", detail={}", detail)?;
        }

        write!(f, "]")
    }
}
