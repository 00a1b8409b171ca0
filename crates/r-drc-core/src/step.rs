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
use std::time::Instant;

use r_drc_common::config::DrcConfig;
use tracing::{error, info, warn};

use crate::actuator::FailoverActuator;
use crate::error::StepError;
use crate::health::HealthInspector;
use crate::metrics::StepMetrics;
use crate::notify::NotificationEvent;
use crate::pool::{FailoverDirective, PoolIdentity};
use crate::services::{NotificationService, PoolControlService, PoolQueryService};

/// Terminal outcome of one successful control step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The primary pool had at least one in-service member; nothing ran.
    PrimaryHealthy,
    /// The standby pool was activated and operators were notified.
    FailoverActivated {
        standby: PoolIdentity,
        directive: FailoverDirective,
    },
}

impl StepOutcome {
    /// Stable label for logs and metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            StepOutcome::PrimaryHealthy => "healthy",
            StepOutcome::FailoverActivated { .. } => "failover",
        }
    }
}

/// One inspect-decide-act-notify cycle.
///
/// Stateless across invocations: each step fetches a fresh member snapshot
/// and carries nothing over. The step runs strictly sequentially, with no
/// internal concurrency, timeouts, or retries; the invoking scheduler owns
/// cadence, cancellation, and re-execution.
pub struct FailoverStep {
    primary: PoolIdentity,
    standby: PoolIdentity,
    channel: String,
    inspector: HealthInspector,
    actuator: FailoverActuator,
    notifier: Arc<dyn NotificationService>,
    metrics: Option<StepMetrics>,
}

impl FailoverStep {
    pub fn new(
        config: &DrcConfig,
        query: Arc<dyn PoolQueryService>,
        control: Arc<dyn PoolControlService>,
        notifier: Arc<dyn NotificationService>,
        metrics: Option<StepMetrics>,
    ) -> Self {
        Self {
            primary: PoolIdentity::from(&config.primary),
            standby: PoolIdentity::from(&config.standby),
            channel: config.notification.channel.clone(),
            inspector: HealthInspector::new(query),
            actuator: FailoverActuator::new(control),
            notifier,
            metrics,
        }
    }

    pub fn primary(&self) -> &PoolIdentity {
        &self.primary
    }

    pub fn standby(&self) -> &PoolIdentity {
        &self.standby
    }

    /// Execute one control step.
    ///
    /// Any inspector or actuator failure is caught exactly once here: one
    /// error notification is attempted, then the failure propagates so the
    /// scheduler observes a failed step. A healthy primary produces no
    /// notification at all.
    pub async fn run(&self) -> Result<StepOutcome, StepError> {
        let started = Instant::now();
        let result = match self.execute().await {
            Ok(outcome) => Ok(outcome),
            Err(err) => Err(self.escalate(err).await),
        };

        if let Some(metrics) = &self.metrics {
            let label = match &result {
                Ok(outcome) => outcome.as_label(),
                Err(_) => "error",
            };
            metrics.observe_step(label, started.elapsed());
            if let Ok(StepOutcome::FailoverActivated { standby, .. }) = &result {
                metrics.record_failover(&standby.name, &standby.region);
            }
        }
        result
    }

    async fn execute(&self) -> Result<StepOutcome, StepError> {
        let verdict = self.inspector.inspect(&self.primary).await?;
        if verdict.is_healthy() {
            info!(pool = %self.primary, "primary pool is healthy; no action required");
            return Ok(StepOutcome::PrimaryHealthy);
        }

        warn!(
            primary = %self.primary,
            standby = %self.standby,
            "no in-service members in primary pool; activating standby"
        );
        let directive = self.actuator.activate(&self.standby).await?;

        let event = NotificationEvent::failover_activated(&self.primary, &self.standby);
        self.notifier.publish(&self.channel, &event).await?;
        info!(
            standby = %self.standby,
            channel = %self.channel,
            "failover notification published"
        );

        Ok(StepOutcome::FailoverActivated {
            standby: self.standby.clone(),
            directive,
        })
    }

    /// Publish one best-effort error notification, then hand back the error
    /// that should propagate.
    ///
    /// A failed publish on the success path gets no secondary notification
    /// about itself. On the escalation path the publish is not shielded:
    /// when it fails, that failure propagates instead of the original, and
    /// the scheduler sees a failed step either way.
    async fn escalate(&self, err: StepError) -> StepError {
        if matches!(err, StepError::Notify(_)) {
            if let Some(metrics) = &self.metrics {
                metrics.record_notify_failure();
            }
            error!(channel = %self.channel, error = %err, "notification publish failed");
            return err;
        }

        error!(error = %err, kind = err.kind(), "control step failed; escalating");
        let event = NotificationEvent::escalation(&err);
        match self.notifier.publish(&self.channel, &event).await {
            Ok(()) => err,
            Err(notify_err) => {
                if let Some(metrics) = &self.metrics {
                    metrics.record_notify_failure();
                }
                error!(
                    original = %err,
                    error = %notify_err,
                    "failed to publish escalation notification"
                );
                StepError::Notify(notify_err)
            }
        }
    }
}

impl std::fmt::Debug for FailoverStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FailoverStep")
            .field("primary", &self.primary)
            .field("standby", &self.standby)
            .field("channel", &self.channel)
            .finish_non_exhaustive()
    }
}
