//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::sync::Arc;

use tracing::debug;

use crate::error::PoolQueryError;
use crate::pool::{PoolIdentity, PoolMember};
use crate::services::PoolQueryService;

/// Derived health of a pool at read time.
///
/// A pure function of the member-state snapshot; no state is carried
/// between control steps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthVerdict {
    Healthy,
    Unhealthy,
}

impl HealthVerdict {
    /// Healthy iff at least one member is in service. An empty snapshot is
    /// unhealthy. This is an any-match predicate, not a threshold: one
    /// healthy member suffices to skip failover.
    pub fn from_members(members: &[PoolMember]) -> Self {
        if members.iter().any(|m| m.lifecycle.is_in_service()) {
            HealthVerdict::Healthy
        } else {
            HealthVerdict::Unhealthy
        }
    }

    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthVerdict::Healthy)
    }
}

/// Reads the primary pool and reduces its members to a [`HealthVerdict`].
pub struct HealthInspector {
    query: Arc<dyn PoolQueryService>,
}

impl HealthInspector {
    pub fn new(query: Arc<dyn PoolQueryService>) -> Self {
        Self { query }
    }

    /// Fetch the current member snapshot and derive the verdict.
    ///
    /// Purely a read. Query failures (not-found, auth, transport) are
    /// signalled to the caller, never swallowed.
    pub async fn inspect(&self, pool: &PoolIdentity) -> Result<HealthVerdict, PoolQueryError> {
        let members = self.query.describe(pool).await?;
        let in_service = members
            .iter()
            .filter(|m| m.lifecycle.is_in_service())
            .count();
        let verdict = HealthVerdict::from_members(&members);
        debug!(
            pool = %pool,
            members = members.len(),
            in_service,
            healthy = verdict.is_healthy(),
            "inspected primary pool"
        );
        Ok(verdict)
    }
}

impl std::fmt::Debug for HealthInspector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HealthInspector").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::LifecycleState;

    fn member(id: &str, state: LifecycleState) -> PoolMember {
        PoolMember::new(id, state)
    }

    #[test]
    fn empty_snapshot_is_unhealthy() {
        assert_eq!(HealthVerdict::from_members(&[]), HealthVerdict::Unhealthy);
    }

    #[test]
    fn single_in_service_member_suffices() {
        let members = vec![
            member("m-1", LifecycleState::Terminated),
            member("m-2", LifecycleState::InService),
            member("m-3", LifecycleState::Terminating),
        ];
        assert_eq!(
            HealthVerdict::from_members(&members),
            HealthVerdict::Healthy
        );
    }

    #[test]
    fn pending_and_terminated_members_do_not_count() {
        let members = vec![
            member("m-1", LifecycleState::Pending),
            member("m-2", LifecycleState::Terminated),
            member("m-3", LifecycleState::Standby),
        ];
        assert_eq!(
            HealthVerdict::from_members(&members),
            HealthVerdict::Unhealthy
        );
    }
}
