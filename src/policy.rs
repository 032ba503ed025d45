//! Pluggable authorization and accounting policies.
//!
//! A recipient is composed with one [`RelayPolicy`]. The hub asks it to
//! [`evaluate`](RelayPolicy::evaluate) every relayed call before executing
//! it, and tells it to [`record`](RelayPolicy::record) the result afterwards.

use std::collections::{HashMap, HashSet};

use crate::address::Address;
use crate::context::{RelayRequest, RelayResult};
use crate::outcome::{BaseReason, Outcome};

/// Authorization and accounting hooks around a relayed call.
pub trait RelayPolicy {
    /// Decides whether the hub may execute the call.
    ///
    /// Takes `&self`: the hub may call this speculatively, so it must not
    /// change any state.
    fn evaluate(&self, request: &RelayRequest) -> Outcome;

    /// Accounts for a call after it ran, whether it succeeded or not.
    ///
    /// Cannot fail. A policy that wants to stop future calls records that
    /// here and rejects them in `evaluate`.
    fn record(&mut self, _result: &RelayResult) {}
}

impl<P: RelayPolicy + ?Sized> RelayPolicy for Box<P> {
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        (**self).evaluate(request)
    }

    fn record(&mut self, result: &RelayResult) {
        (**self).record(result)
    }
}

/// Accepts every relayed call.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl RelayPolicy for AcceptAll {
    fn evaluate(&self, _request: &RelayRequest) -> Outcome {
        Outcome::Accepted
    }
}

/// Accepts only originators on the list.
#[derive(Debug, Clone, Default)]
pub struct AllowList {
    allowed: HashSet<Address>,
}

impl AllowList {
    /// Creates an allow-list from the given originators.
    pub fn new(allowed: impl IntoIterator<Item = Address>) -> Self {
        Self {
            allowed: allowed.into_iter().collect(),
        }
    }

    /// Adds an originator to the list.
    pub fn allow(&mut self, originator: Address) -> bool {
        self.allowed.insert(originator)
    }

    /// Returns true if `originator` is on the list.
    pub fn contains(&self, originator: &Address) -> bool {
        self.allowed.contains(originator)
    }
}

impl RelayPolicy for AllowList {
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        if self.allowed.contains(&request.originator) {
            Outcome::Accepted
        } else {
            BaseReason::NotAllowed.into()
        }
    }
}

/// Rejects originators on the list.
#[derive(Debug, Clone, Default)]
pub struct DenyList {
    denied: HashSet<Address>,
}

impl DenyList {
    /// Creates a deny-list from the given originators.
    pub fn new(denied: impl IntoIterator<Item = Address>) -> Self {
        Self {
            denied: denied.into_iter().collect(),
        }
    }

    /// Adds an originator to the list.
    pub fn deny(&mut self, originator: Address) -> bool {
        self.denied.insert(originator)
    }
}

impl RelayPolicy for DenyList {
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        if self.denied.contains(&request.originator) {
            BaseReason::Denied.into()
        } else {
            Outcome::Accepted
        }
    }
}

/// Limits how many relayed calls each originator may make.
///
/// Every recorded call counts, whether or not the business call succeeded,
/// since the recipient is charged either way.
#[derive(Debug, Clone)]
pub struct CallQuota {
    limit: u32,
    used: HashMap<Address, u32>,
}

impl CallQuota {
    /// Creates a quota of `limit` relayed calls per originator.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            used: HashMap::new(),
        }
    }

    /// Returns how many calls `originator` has used.
    pub fn used(&self, originator: &Address) -> u32 {
        self.used.get(originator).copied().unwrap_or(0)
    }

    /// Returns how many calls `originator` has left.
    pub fn remaining(&self, originator: &Address) -> u32 {
        self.limit.saturating_sub(self.used(originator))
    }
}

impl RelayPolicy for CallQuota {
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        if self.remaining(&request.originator) == 0 {
            BaseReason::QuotaExceeded.into()
        } else {
            Outcome::Accepted
        }
    }

    fn record(&mut self, result: &RelayResult) {
        let used = self.used.entry(result.originator).or_insert(0);
        *used = used.saturating_add(1);
        tracing::debug!(
            originator = %result.originator,
            used = *used,
            limit = self.limit,
            "relayed call counted against quota"
        );
    }
}

/// Accepts only when every inner policy accepts.
///
/// Evaluation stops at the first rejection; recording reaches every policy.
#[derive(Default)]
pub struct AllOf {
    policies: Vec<Box<dyn RelayPolicy + Send>>,
}

impl AllOf {
    /// Creates an empty combinator, which accepts everything.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a policy.
    pub fn with(mut self, policy: impl RelayPolicy + Send + 'static) -> Self {
        self.policies.push(Box::new(policy));
        self
    }

    /// Returns the number of inner policies.
    pub fn len(&self) -> usize {
        self.policies.len()
    }

    /// Returns true if there are no inner policies.
    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }
}

impl RelayPolicy for AllOf {
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        self.policies
            .iter()
            .map(|p| p.evaluate(request))
            .find(|outcome| !outcome.is_accepted())
            .unwrap_or(Outcome::Accepted)
    }

    fn record(&mut self, result: &RelayResult) {
        for policy in &mut self.policies {
            policy.record(result);
        }
    }
}

/// A stateless policy backed by a function.
#[derive(Debug, Clone, Copy)]
pub struct FnPolicy<F>(F);

/// Wraps a function as a stateless policy.
pub fn policy_fn<F>(f: F) -> FnPolicy<F>
where
    F: Fn(&RelayRequest) -> Outcome,
{
    FnPolicy(f)
}

impl<F> RelayPolicy for FnPolicy<F>
where
    F: Fn(&RelayRequest) -> Outcome,
{
    fn evaluate(&self, request: &RelayRequest) -> Outcome {
        (self.0)(request)
    }
}
