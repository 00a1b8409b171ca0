//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use r_drc_common::config::PoolConfig;
use serde::{Deserialize, Serialize};

/// Opaque identifier of a compute pool plus the region it lives in.
///
/// Supplied via configuration at invocation time and never mutated by the
/// control step. Primary and standby identities are guaranteed distinct by
/// configuration validation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct PoolIdentity {
    pub name: String,
    pub region: String,
}

impl PoolIdentity {
    pub fn new(name: impl Into<String>, region: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            region: region.into(),
        }
    }
}

impl From<&PoolConfig> for PoolIdentity {
    fn from(config: &PoolConfig) -> Self {
        Self {
            name: config.name.clone(),
            region: config.region.clone(),
        }
    }
}

impl std::fmt::Display for PoolIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.region)
    }
}

/// Lifecycle state of a single pool member.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum LifecycleState {
    Pending,
    InService,
    Standby,
    Detached,
    Terminating,
    Terminated,
}

impl LifecycleState {
    /// The one state that counts as healthy for the any-match verdict.
    pub fn is_in_service(&self) -> bool {
        matches!(self, LifecycleState::InService)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifecycleState::Pending => "pending",
            LifecycleState::InService => "in-service",
            LifecycleState::Standby => "standby",
            LifecycleState::Detached => "detached",
            LifecycleState::Terminating => "terminating",
            LifecycleState::Terminated => "terminated",
        }
    }
}

impl std::fmt::Display for LifecycleState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for LifecycleState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(LifecycleState::Pending),
            "in-service" => Ok(LifecycleState::InService),
            "standby" => Ok(LifecycleState::Standby),
            "detached" => Ok(LifecycleState::Detached),
            "terminating" => Ok(LifecycleState::Terminating),
            "terminated" => Ok(LifecycleState::Terminated),
            other => Err(format!("unknown lifecycle state: {}", other)),
        }
    }
}

/// Read-only snapshot of a single member within a pool.
///
/// Fetched fresh on every control step; never cached across invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PoolMember {
    pub member_id: String,
    pub lifecycle: LifecycleState,
}

impl PoolMember {
    pub fn new(member_id: impl Into<String>, lifecycle: LifecycleState) -> Self {
        Self {
            member_id: member_id.into(),
            lifecycle,
        }
    }
}

/// Remediation command issued against the standby pool.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FailoverDirective {
    pub min_size: u32,
    pub desired_capacity: u32,
}

impl FailoverDirective {
    /// The standby-activation directive: at least one active member.
    ///
    /// Re-asserting the same target is safe; the control side raises to at
    /// least the requested capacity and never errors on "already there".
    pub fn activate_standby() -> Self {
        Self {
            min_size: 1,
            desired_capacity: 1,
        }
    }
}

impl std::fmt::Display for FailoverDirective {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "min={} desired={}",
            self.min_size, self.desired_capacity
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_state_round_trips_through_wire_spelling() {
        for state in [
            LifecycleState::Pending,
            LifecycleState::InService,
            LifecycleState::Standby,
            LifecycleState::Detached,
            LifecycleState::Terminating,
            LifecycleState::Terminated,
        ] {
            let parsed: LifecycleState = state.as_str().parse().expect("must parse");
            assert_eq!(parsed, state);
        }
        assert!("in_service".parse::<LifecycleState>().is_err());
    }

    #[test]
    fn activation_directive_requests_at_least_one_member() {
        let directive = FailoverDirective::activate_standby();
        assert_eq!(directive.min_size, 1);
        assert_eq!(directive.desired_capacity, 1);
    }
}
