//! Audit trail for hub configuration and relayed-call decisions.
//!
//! This module provides:
//! - `AuditEvent`: Structured audit event schema
//! - `AuditTrail`: In-memory audit event recorder
//! - `emit`: Structured emission through `tracing`
//!
//! Events carry identities, codes and lengths only. Payload bytes and
//! approval blobs are never recorded.

mod event;
mod trail;

pub use event::{AuditEvent, AuditEventKind, AuditOutcome};
pub use trail::AuditTrail;

/// Emits an audit event through the tracing infrastructure.
pub fn emit(event: &AuditEvent) {
    tracing::info!(
        target: "relay_audit",
        kind = %event.kind(),
        outcome = %event.outcome(),
        subject = ?event.subject().map(|a| a.to_string()),
        relay = ?event.relay().map(|a| a.to_string()),
        code = ?event.code(),
        detail = ?event.detail(),
        "audit event"
    );
}
