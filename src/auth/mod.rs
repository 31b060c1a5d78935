//! Capability checks for destructive operations
//!
//! Authorization itself (sessions, users, roles) lives outside this
//! service; the HTTP layer only needs a yes/no answer per capability
//! before a delete or settings write reaches the store. `Gatekeeper` is
//! that seam. The default implementation allows everything, which is the
//! behavior when no authorization collaborator is wired in.

/// Actions that require an authorization decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    /// Delete a single message by id
    DeleteSingle,
    /// Batch, filtered, or full deletion
    DeleteBulk,
    /// Replace the retention settings
    ManageSettings,
}

/// Boolean capability check consumed by the HTTP layer.
pub trait Gatekeeper: Send + Sync {
    fn allows(&self, capability: Capability) -> bool;
}

/// Permits every capability.
pub struct AllowAll;

impl Gatekeeper for AllowAll {
    fn allows(&self, _capability: Capability) -> bool {
        true
    }
}

/// Denies every capability. Useful as a safe default in locked-down
/// deployments and in tests.
pub struct DenyAll;

impl Gatekeeper for DenyAll {
    fn allows(&self, _capability: Capability) -> bool {
        false
    }
}
