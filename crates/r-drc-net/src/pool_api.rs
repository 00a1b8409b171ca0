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

use r_drc_core::{
    FailoverDirective, PoolControlService, PoolIdentity, PoolMember, PoolQueryError,
    PoolQueryService, PoolUpdateError,
};

use crate::join_endpoint;

/// Pool-manager read client for one region.
#[derive(Debug, Clone)]
pub struct HttpPoolQuery {
    client: Client,
    base: Url,
}

impl HttpPoolQuery {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl PoolQueryService for HttpPoolQuery {
    async fn describe(&self, pool: &PoolIdentity) -> Result<Vec<PoolMember>, PoolQueryError> {
        let url = join_endpoint(&self.base, &format!("v1/pools/{}/members", pool.name))
            .map_err(|err| PoolQueryError::Transport {
                pool: pool.clone(),
                source: err,
            })?;
        debug!(pool = %pool, url = %url, "querying pool members");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|err| PoolQueryError::Transport {
                pool: pool.clone(),
                source: anyhow::Error::new(err),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(query_error_for_status(pool, status));
        }

        response
            .json::<Vec<PoolMember>>()
            .await
            .map_err(|err| PoolQueryError::Transport {
                pool: pool.clone(),
                source: anyhow::Error::new(err),
            })
    }
}

/// Pool-manager control client for one region.
#[derive(Debug, Clone)]
pub struct HttpPoolControl {
    client: Client,
    base: Url,
}

impl HttpPoolControl {
    pub fn new(client: Client, base: Url) -> Self {
        Self { client, base }
    }
}

#[async_trait]
impl PoolControlService for HttpPoolControl {
    async fn set_minimum_and_desired(
        &self,
        pool: &PoolIdentity,
        directive: FailoverDirective,
    ) -> Result<(), PoolUpdateError> {
        let url = join_endpoint(&self.base, &format!("v1/pools/{}/capacity", pool.name))
            .map_err(|err| PoolUpdateError::Transport {
                pool: pool.clone(),
                source: err,
            })?;
        debug!(pool = %pool, url = %url, directive = %directive, "applying capacity directive");

        let response = self
            .client
            .post(url)
            .json(&directive)
            .send()
            .await
            .map_err(|err| PoolUpdateError::Transport {
                pool: pool.clone(),
                source: anyhow::Error::new(err),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(update_error_for_status(pool, status));
        }
        Ok(())
    }
}

pub(crate) fn query_error_for_status(pool: &PoolIdentity, status: StatusCode) -> PoolQueryError {
    match status {
        StatusCode::NOT_FOUND => PoolQueryError::NotFound { pool: pool.clone() },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PoolQueryError::Denied {
            pool: pool.clone(),
            reason: status.to_string(),
        },
        other => PoolQueryError::Transport {
            pool: pool.clone(),
            source: anyhow::anyhow!("pool-manager responded with {}", other),
        },
    }
}

pub(crate) fn update_error_for_status(pool: &PoolIdentity, status: StatusCode) -> PoolUpdateError {
    match status {
        StatusCode::NOT_FOUND => PoolUpdateError::NotFound { pool: pool.clone() },
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PoolUpdateError::Denied {
            pool: pool.clone(),
            reason: status.to_string(),
        },
        StatusCode::UNPROCESSABLE_ENTITY | StatusCode::CONFLICT => PoolUpdateError::Rejected {
            pool: pool.clone(),
            reason: status.to_string(),
        },
        other => PoolUpdateError::Transport {
            pool: pool.clone(),
            source: anyhow::anyhow!("pool-manager responded with {}", other),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> PoolIdentity {
        PoolIdentity::new("app-primary", "eu-north-1")
    }

    #[test]
    fn missing_pool_maps_to_not_found() {
        let err = query_error_for_status(&pool(), StatusCode::NOT_FOUND);
        assert!(matches!(err, PoolQueryError::NotFound { .. }));
    }

    #[test]
    fn auth_failures_map_to_denied() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = query_error_for_status(&pool(), status);
            assert!(matches!(err, PoolQueryError::Denied { .. }));
        }
    }

    #[test]
    fn server_errors_map_to_transport() {
        let err = query_error_for_status(&pool(), StatusCode::BAD_GATEWAY);
        assert!(matches!(err, PoolQueryError::Transport { .. }));
    }

    #[test]
    fn capacity_conflicts_map_to_rejected() {
        let err = update_error_for_status(&pool(), StatusCode::CONFLICT);
        assert!(matches!(err, PoolUpdateError::Rejected { .. }));
    }
}
