//! ---
//! drc_section: "05-networking-external-interfaces"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "HTTP capability adapters for the R-DRC control step."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use url::Url;

use r_drc_core::{NotificationEvent, NotificationService, NotifyError};

use crate::join_endpoint;

/// Notification API client.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    client: Client,
    base: Url,
}

impl HttpNotifier {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl NotificationService for HttpNotifier {
    async fn publish(&self, channel: &str, event: &NotificationEvent) -> Result<(), NotifyError> {
        let url = join_endpoint(&self.base, &format!("v1/channels/{}/messages", channel))
            .map_err(|err| NotifyError::Transport {
                channel: channel.to_owned(),
                source: err,
            })?;
        debug!(channel = channel, subject = %event.subject, "publishing notification");

        let response = self
            .client
            .post(url)
            .json(event)
            .send()
            .await
            .map_err(|err| NotifyError::Transport {
                channel: channel.to_owned(),
                source: anyhow::Error::new(err),
            })?;

        let status = response.status();
        match status {
            StatusCode::NOT_FOUND => Err(NotifyError::ChannelUnknown {
                channel: channel.to_owned(),
            }),
            status if status.is_success() => Ok(()),
            other => Err(NotifyError::Transport {
                channel: channel.to_owned(),
                source: anyhow::anyhow!("notification API responded with {}", other),
            }),
        }
    }
}
