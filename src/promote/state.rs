// ABOUTME: Promotion state types for the type state pattern.
// ABOUTME: Each step consumes one state and yields the next, fixing the step order.

use super::redeploy::DomainSelection;
use crate::api::IssuedToken;

/// Destination environment found or cloned.
/// Available actions: `configure()`
#[derive(Debug, Clone, Copy, Default)]
pub struct Resolved;

/// Variables propagated and project token rotated.
/// Available actions: `await_settled()`
#[derive(Debug, Clone)]
pub struct Configured {
    pub(crate) token: IssuedToken,
}

/// Latest deployment reached SUCCESS; triggers may now move.
/// Available actions: `rebind_triggers()`
#[derive(Debug, Clone)]
pub struct Settled {
    pub(crate) token: IssuedToken,
}

/// Triggers point at the preview branch.
/// Available actions: `redeploy()`
#[derive(Debug, Clone)]
pub struct Rebound {
    pub(crate) token: IssuedToken,
}

/// Services redeployed and the public domain chosen.
/// Available actions: `finish()`
#[derive(Debug, Clone)]
pub struct Completed {
    pub(crate) token: IssuedToken,
    pub(crate) domain: Option<DomainSelection>,
}
