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

use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use r_drc_core::{FailoverDirective, PoolControlService, PoolIdentity, PoolUpdateError};
use tracing::info;

/// Scaling capacity tracked for one simulated pool.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Capacity {
    pub min_size: u32,
    pub desired_capacity: u32,
}

#[derive(Debug, Default)]
struct ControlInner {
    capacities: HashMap<String, Capacity>,
    applied: Vec<(String, FailoverDirective)>,
}

/// Pool control double tracking capacity per pool name.
///
/// Directives are applied as raise-to-at-least: a pool already scaled above
/// the requested target keeps its capacity, and re-asserting the same
/// directive never errors.
#[derive(Debug, Default)]
pub struct InMemoryPoolControl {
    inner: Mutex<ControlInner>,
    fail_reason: Option<String>,
}

impl InMemoryPoolControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a pool with a starting capacity.
    pub fn with_pool(self, pool_name: impl Into<String>, capacity: Capacity) -> Self {
        self.inner.lock().capacities.insert(pool_name.into(), capacity);
        self
    }

    /// Make every update fail with a transport error.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            inner: Mutex::new(ControlInner::default()),
            fail_reason: Some(reason.into()),
        }
    }

    /// Current capacity of a pool, if it has ever been seen.
    pub fn capacity(&self, pool_name: &str) -> Option<Capacity> {
        self.inner.lock().capacities.get(pool_name).copied()
    }

    /// Every directive applied so far, in order.
    pub fn applied(&self) -> Vec<(String, FailoverDirective)> {
        self.inner.lock().applied.clone()
    }
}

#[async_trait]
impl PoolControlService for InMemoryPoolControl {
    async fn set_minimum_and_desired(
        &self,
        pool: &PoolIdentity,
        directive: FailoverDirective,
    ) -> Result<(), PoolUpdateError> {
        if let Some(reason) = &self.fail_reason {
            return Err(PoolUpdateError::Transport {
                pool: pool.clone(),
                source: anyhow!("{}", reason),
            });
        }
        let mut inner = self.inner.lock();
        let capacity = inner.capacities.entry(pool.name.clone()).or_default();
        capacity.min_size = capacity.min_size.max(directive.min_size);
        capacity.desired_capacity = capacity.desired_capacity.max(directive.desired_capacity);
        let capacity = *capacity;
        inner.applied.push((pool.name.clone(), directive));
        info!(
            pool = %pool,
            min = capacity.min_size,
            desired = capacity.desired_capacity,
            "applied simulated capacity directive"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn directives_raise_capacity_to_at_least_the_target() {
        let control = InMemoryPoolControl::new();
        let standby = PoolIdentity::new("app-standby", "eu-west-1");

        let directive = FailoverDirective::activate_standby();
        control.set_minimum_and_desired(&standby, directive).await.unwrap();
        control.set_minimum_and_desired(&standby, directive).await.unwrap();

        let capacity = control.capacity("app-standby").unwrap();
        assert_eq!(capacity, Capacity { min_size: 1, desired_capacity: 1 });
        assert_eq!(control.applied().len(), 2);
    }

    #[tokio::test]
    async fn already_scaled_pools_are_not_shrunk() {
        let control = InMemoryPoolControl::new().with_pool(
            "app-standby",
            Capacity {
                min_size: 2,
                desired_capacity: 3,
            },
        );
        let standby = PoolIdentity::new("app-standby", "eu-west-1");

        control
            .set_minimum_and_desired(&standby, FailoverDirective::activate_standby())
            .await
            .unwrap();
        let capacity = control.capacity("app-standby").unwrap();
        assert_eq!(capacity, Capacity { min_size: 2, desired_capacity: 3 });
    }
}
