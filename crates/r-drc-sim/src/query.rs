//! ---
//! drc_section: "11-simulation"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "In-memory capability doubles for simulation and tests."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use std::collections::HashMap;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use r_drc_common::config::SimulationConfig;
use r_drc_core::{LifecycleState, PoolIdentity, PoolMember, PoolQueryError, PoolQueryService};
use tracing::debug;

/// Pool query double serving fixed member snapshots, keyed by pool name.
///
/// Pools without a registered snapshot resolve to `NotFound`, matching a
/// query against a pool that does not exist.
#[derive(Debug, Default)]
pub struct StaticPoolQuery {
    snapshots: HashMap<String, Vec<PoolMember>>,
    fail_reason: Option<String>,
}

impl StaticPoolQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a member snapshot for a pool.
    pub fn with_members(mut self, pool_name: impl Into<String>, members: Vec<PoolMember>) -> Self {
        self.snapshots.insert(pool_name.into(), members);
        self
    }

    /// Make every query fail with a transport error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            snapshots: HashMap::new(),
            fail_reason: Some(reason.into()),
        }
    }

    /// Build the double the daemon uses in simulation mode: the primary
    /// pool gets the configured member states, the standby pool exists and
    /// is empty.
    pub fn from_simulation(
        config: &SimulationConfig,
        primary: &PoolIdentity,
        standby: &PoolIdentity,
    ) -> Result<Self> {
        if config.inject_query_failure {
            return Ok(Self::failing("injected simulation query failure"));
        }
        let members = config
            .primary_member_states
            .iter()
            .enumerate()
            .map(|(index, raw)| {
                let lifecycle = raw
                    .parse::<LifecycleState>()
                    .map_err(|err| anyhow!("simulation.primary_member_states[{}]: {}", index, err))?;
                Ok(PoolMember::new(format!("sim-member-{}", index), lifecycle))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::new()
            .with_members(primary.name.clone(), members)
            .with_members(standby.name.clone(), Vec::new()))
    }
}

#[async_trait]
impl PoolQueryService for StaticPoolQuery {
    async fn describe(&self, pool: &PoolIdentity) -> Result<Vec<PoolMember>, PoolQueryError> {
        if let Some(reason) = &self.fail_reason {
            return Err(PoolQueryError::Transport {
                pool: pool.clone(),
                source: anyhow!("{}", reason),
            });
        }
        let members = self
            .snapshots
            .get(&pool.name)
            .cloned()
            .ok_or_else(|| PoolQueryError::NotFound { pool: pool.clone() })?;
        debug!(pool = %pool, members = members.len(), "served simulated member snapshot");
        Ok(members)
    }
}
