//! ---
//! drc_section: "05-networking-external-interfaces"
//! drc_subsection: "module"
//! drc_type: "source"
//! drc_scope: "code"
//! drc_description: "HTTP capability adapters for the R-DRC control step."
//! drc_version: "v0.0.0-prealpha"
//! drc_owner: "tbd"
//! ---
//! Production adapters for the three control-step capabilities.
//!
//! Each adapter wraps a `reqwest` client pointed at a per-region base URL:
//! the pool-manager API serves member snapshots and capacity updates, the
//! notification API accepts channel messages. HTTP status codes map onto
//! the closed error taxonomy (404 not-found, 401/403 denied, anything else
//! transport), so callers never match on response text.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::Client;
use url::Url;

pub mod notify_api;
pub mod pool_api;

pub use notify_api::HttpNotifier;
pub use pool_api::{HttpPoolControl, HttpPoolQuery};

/// Build the shared HTTP client with the configured request timeout.
pub fn build_client(request_timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(request_timeout)
        .build()
        .context("failed to build HTTP client")
}

/// Parse a configured endpoint into a base URL.
pub fn parse_endpoint(raw: &str) -> Result<Url> {
    Url::parse(raw).with_context(|| format!("invalid service endpoint '{}'", raw))
}

pub(crate) fn join_endpoint(base: &Url, path: &str) -> Result<Url> {
    let joined = format!("{}/{}", base.as_str().trim_end_matches('/'), path);
    Url::parse(&joined).with_context(|| format!("invalid request url '{}'", joined))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_join_tolerates_trailing_slashes() {
        let base = parse_endpoint("https://pools.eu-north-1.internal/").unwrap();
        let url = join_endpoint(&base, "v1/pools/app-primary/members").unwrap();
        assert_eq!(
            url.as_str(),
            "https://pools.eu-north-1.internal/v1/pools/app-primary/members"
        );
    }

    #[test]
    fn garbage_endpoints_are_rejected() {
        assert!(parse_endpoint("not a url").is_err());
    }
}
