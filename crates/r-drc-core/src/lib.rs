//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! The R-DRC control step.
//!
//! One invocation runs the inspector, the actuator, and the notifier in
//! sequence: the primary pool's members are fetched and reduced to a verdict,
//! an unhealthy primary triggers a capacity directive against the standby
//! pool, and operators are told what happened. Every inspector or actuator
//! failure is caught exactly once at the [`step::FailoverStep`] boundary,
//! reported, and re-raised for the external scheduler.

pub mod actuator;
pub mod error;
pub mod health;
pub mod metrics;
pub mod notify;
pub mod pool;
pub mod services;
pub mod step;

pub use actuator::FailoverActuator;
pub use error::{NotifyError, PoolQueryError, PoolUpdateError, StepError};
pub use health::{HealthInspector, HealthVerdict};
pub use metrics::{new_registry, SharedRegistry, StepMetrics};
pub use notify::{NotificationEvent, Severity};
pub use pool::{FailoverDirective, LifecycleState, PoolIdentity, PoolMember};
pub use services::{NotificationService, PoolControlService, PoolQueryService};
pub use step::{FailoverStep, StepOutcome};
