//! ---
//! drc_section: "11-simulation"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "In-memory capability doubles for simulation and tests."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use anyhow::anyhow;
use async_trait::async_trait;
use parking_lot::Mutex;
use r_drc_core::{NotificationEvent, NotificationService, NotifyError};
use tracing::info;

/// Notification double collecting every published event.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, NotificationEvent)>>,
    fail_reason: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every publish fail with a transport error. The attempt is still
    /// recorded so tests can assert on publish counts.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            fail_reason: Some(reason.into()),
        }
    }

    /// Events published so far, in order, with their channels.
    pub fn published(&self) -> Vec<(String, NotificationEvent)> {
        self.published.lock().clone()
    }

    pub fn publish_count(&self) -> usize {
        self.published.lock().len()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn publish(&self, channel: &str, event: &NotificationEvent) -> Result<(), NotifyError> {
        self.published
            .lock()
            .push((channel.to_owned(), event.clone()));
        if let Some(reason) = &self.fail_reason {
            return Err(NotifyError::Transport {
                channel: channel.to_owned(),
                source: anyhow!("{}", reason),
            });
        }
        info!(
            channel = channel,
            subject = %event.subject,
            severity = event.severity.as_str(),
            "recorded simulated notification"
        );
        Ok(())
    }
}
