//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! Closed error taxonomy for the control step.
//!
//! Callers distinguish "primary unreachable" from "standby update failed"
//! from "notification failed" by variant, never by matching message text.
//! Nothing here is retried internally; retry policy belongs to the
//! invoking scheduler.

use thiserror::Error;

use crate::pool::PoolIdentity;

/// The primary pool could not be read.
#[derive(Debug, Error)]
pub enum PoolQueryError {
    #[error("pool {pool} was not found")]
    NotFound { pool: PoolIdentity },
    #[error("access to pool {pool} was denied: {reason}")]
    Denied { pool: PoolIdentity, reason: String },
    #[error("failed to query pool {pool}: {source}")]
    Transport {
        pool: PoolIdentity,
        #[source]
        source: anyhow::Error,
    },
}

/// The standby pool could not be updated.
#[derive(Debug, Error)]
pub enum PoolUpdateError {
    #[error("pool {pool} was not found")]
    NotFound { pool: PoolIdentity },
    #[error("access to pool {pool} was denied: {reason}")]
    Denied { pool: PoolIdentity, reason: String },
    #[error("pool {pool} rejected directive: {reason}")]
    Rejected { pool: PoolIdentity, reason: String },
    #[error("failed to update pool {pool}: {source}")]
    Transport {
        pool: PoolIdentity,
        #[source]
        source: anyhow::Error,
    },
}

/// A notification publish failed.
#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("notification channel '{channel}' is unknown")]
    ChannelUnknown { channel: String },
    #[error("failed to publish to channel '{channel}': {source}")]
    Transport {
        channel: String,
        #[source]
        source: anyhow::Error,
    },
}

/// Any failure surfaced by one control step.
///
/// Caught exactly once at the orchestrator boundary for the sole purpose
/// of emitting one best-effort error notification before re-raising.
#[derive(Debug, Error)]
pub enum StepError {
    #[error(transparent)]
    Query(#[from] PoolQueryError),
    #[error(transparent)]
    Update(#[from] PoolUpdateError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

impl StepError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            StepError::Query(_) => "pool-query",
            StepError::Update(_) => "pool-update",
            StepError::Notify(_) => "notify",
        }
    }
}
