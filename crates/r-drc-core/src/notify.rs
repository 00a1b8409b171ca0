//! ---
//! drc_section: "07-resilience-fault-tolerance"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "Failover control step: inspection, actuation, notification."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pool::PoolIdentity;

/// Severity attached to a published notification.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Error => "error",
        }
    }
}

/// One human-readable message published to the alerting channel.
///
/// Fire-and-forget: the core models no delivery guarantee, retry, or
/// deduplication. Exactly one event is emitted per control-step outcome
/// (none on the healthy path).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NotificationEvent {
    pub subject: String,
    pub message: String,
    pub severity: Severity,
    pub raised_at: DateTime<Utc>,
}

impl NotificationEvent {
    /// Success event: the standby pool has been scaled up.
    pub fn failover_activated(primary: &PoolIdentity, standby: &PoolIdentity) -> Self {
        Self {
            subject: "DR Failover Triggered".to_owned(),
            message: format!(
                "Primary pool {} has no in-service members. Standby pool {} has been scaled up.",
                primary, standby
            ),
            severity: Severity::Info,
            raised_at: Utc::now(),
        }
    }

    /// Escalation event carrying the stringified cause.
    pub fn escalation(cause: &impl std::fmt::Display) -> Self {
        Self {
            subject: "DR Failover Error".to_owned(),
            message: format!("An error occurred while handling DR failover: {}", cause),
            severity: Severity::Error,
            raised_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failover_event_names_both_pools() {
        let primary = PoolIdentity::new("app-primary", "eu-north-1");
        let standby = PoolIdentity::new("app-standby", "eu-west-1");
        let event = NotificationEvent::failover_activated(&primary, &standby);
        assert_eq!(event.severity, Severity::Info);
        assert!(event.message.contains("app-primary"));
        assert!(event.message.contains("app-standby"));
        assert!(event.message.contains("eu-west-1"));
    }

    #[test]
    fn escalation_event_carries_the_cause_text() {
        let cause = anyhow::anyhow!("connection refused");
        let event = NotificationEvent::escalation(&cause);
        assert_eq!(event.severity, Severity::Error);
        assert!(event.message.contains("connection refused"));
    }
}
