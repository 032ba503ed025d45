//! In-memory audit trail recorder.

use super::AuditEvent;
use std::cell::RefCell;

/// In-memory recorder for audit events.
///
/// Recipients only hold one when built with
/// [`RelayRecipient::with_audit_trail`](crate::RelayRecipient::with_audit_trail).
///
/// # Example
///
/// ```
/// use relay_recipient::audit::{AuditTrail, AuditEvent, AuditEventKind, AuditOutcome};
///
/// let trail = AuditTrail::new();
/// trail.record(AuditEvent::new(AuditEventKind::HubConfigured, AuditOutcome::Success));
///
/// assert_eq!(trail.events().len(), 1);
/// ```
#[derive(Debug)]
pub struct AuditTrail {
    events: RefCell<Vec<AuditEvent>>,
}

impl AuditTrail {
    /// Creates a new empty audit trail.
    pub fn new() -> Self {
        Self {
            events: RefCell::new(Vec::new()),
        }
    }

    /// Emits an event through `tracing` and stores it.
    pub fn record(&self, event: AuditEvent) {
        super::emit(&event);
        self.events.borrow_mut().push(event);
    }

    /// Returns a snapshot of all recorded events.
    pub fn events(&self) -> Vec<AuditEvent> {
        self.events.borrow().clone()
    }

    /// Returns the most recent event.
    pub fn last(&self) -> Option<AuditEvent> {
        self.events.borrow().last().cloned()
    }

    /// Returns the number of recorded events.
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    /// Returns true if no events have been recorded.
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Clears all recorded events.
    pub fn clear(&self) {
        self.events.borrow_mut().clear();
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audit::{AuditEventKind, AuditOutcome};

    #[test]
    fn audit_trail_starts_empty() {
        let trail = AuditTrail::new();
        assert!(trail.is_empty());
        assert_eq!(trail.len(), 0);
        assert!(trail.last().is_none());
    }

    #[test]
    fn audit_trail_records_in_order() {
        let trail = AuditTrail::new();

        trail.record(AuditEvent::new(
            AuditEventKind::RelayEvaluated,
            AuditOutcome::Success,
        ));
        trail.record(AuditEvent::new(
            AuditEventKind::RelayRecorded,
            AuditOutcome::Error,
        ));

        let events = trail.events();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind(), AuditEventKind::RelayEvaluated);
        assert_eq!(events[1].kind(), AuditEventKind::RelayRecorded);
        assert_eq!(trail.last().map(|e| e.outcome()), Some(AuditOutcome::Error));
    }

    #[test]
    fn audit_trail_can_be_cleared() {
        let trail = AuditTrail::default();
        trail.record(AuditEvent::new(
            AuditEventKind::TrustViolation,
            AuditOutcome::Error,
        ));
        trail.clear();
        assert!(trail.is_empty());
    }
}
