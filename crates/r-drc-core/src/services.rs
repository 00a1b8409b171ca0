//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! The three capabilities the control step consumes, modelled as injected
//! trait objects so tests and simulation mode can substitute in-memory
//! implementations without contacting real infrastructure.

use async_trait::async_trait;

use crate::error::{NotifyError, PoolQueryError, PoolUpdateError};
use crate::notify::NotificationEvent;
use crate::pool::{FailoverDirective, PoolIdentity, PoolMember};

/// Read-only access to a pool's member snapshot.
#[async_trait]
pub trait PoolQueryService: Send + Sync {
    /// Fetch the current members of the given pool.
    async fn describe(&self, pool: &PoolIdentity) -> Result<Vec<PoolMember>, PoolQueryError>;
}

/// Mutating access to a pool's scaling configuration.
#[async_trait]
pub trait PoolControlService: Send + Sync {
    /// Raise the pool's minimum size and desired capacity to at least the
    /// directive's targets. Must be safe to repeat with the same directive.
    async fn set_minimum_and_desired(
        &self,
        pool: &PoolIdentity,
        directive: FailoverDirective,
    ) -> Result<(), PoolUpdateError>;
}

/// Fire-and-forget publication to an alerting channel.
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Publish one event to the channel. No retries, no batching.
    async fn publish(&self, channel: &str, event: &NotificationEvent) -> Result<(), NotifyError>;
}
