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

use tracing::info;

use crate::error::PoolUpdateError;
use crate::pool::{FailoverDirective, PoolIdentity};
use crate::services::PoolControlService;

/// Issues the standby-activation directive against the pool control service.
pub struct FailoverActuator {
    control: Arc<dyn PoolControlService>,
}

impl FailoverActuator {
    pub fn new(control: Arc<dyn PoolControlService>) -> Self {
        Self { control }
    }

    /// Ensure the standby pool requests at least one active member.
    ///
    /// The directive is issued unconditionally rather than conditionally
    /// skipped when the standby already sits at target: re-asserting the
    /// same capacity is safe, and repetition must converge without error
    /// even under overlapping scheduler invocations.
    pub async fn activate(
        &self,
        standby: &PoolIdentity,
    ) -> Result<FailoverDirective, PoolUpdateError> {
        let directive = FailoverDirective::activate_standby();
        self.control
            .set_minimum_and_desired(standby, directive)
            .await?;
        info!(pool = %standby, directive = %directive, "standby pool activation directive applied");
        Ok(directive)
    }
}

impl std::fmt::Debug for FailoverActuator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverActuator").finish_non_exhaustive()
    }
}
