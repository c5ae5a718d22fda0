use std::{sync::Arc, time::Duration};

use crate::{
    catalog::port::CatalogPort,
    config::CatalogConfig,
    domain::{Credential, Identifier, LookupResult, PhotoUrl},
    errors::CatalogError,
};

/// Looks up one identifier, falling back across credentials in priority order.
#[derive(Clone)]
pub struct CatalogLookupClient {
    port: Arc<dyn CatalogPort>,
    credentials: Vec<Credential>,
    timeout: Duration,
}

impl CatalogLookupClient {
    pub fn new(port: Arc<dyn CatalogPort>, credentials: Vec<Credential>, timeout: Duration) -> Self {
        Self {
            port,
            credentials,
            timeout,
        }
    }

    pub fn from_config(port: Arc<dyn CatalogPort>, cfg: &CatalogConfig) -> Self {
        Self::new(port, cfg.credentials.clone(), cfg.request_timeout)
    }

    /// `Found` on the first credential that yields a photo; `NotFound` once all are exhausted.
    ///
    /// Failures are never propagated: a failed credential just hands over to the next one.
    pub async fn lookup(&self, identifier: &Identifier) -> LookupResult {
        for (idx, credential) in self.credentials.iter().enumerate() {
            if !credential.is_usable() {
                continue;
            }

            match self.attempt(credential, identifier).await {
                Ok(Some(url)) => {
                    tracing::debug!(%identifier, credential = idx, "photo found");
                    return LookupResult::Found(url);
                }
                Ok(None) => {
                    tracing::debug!(%identifier, credential = idx, "no photo for identifier");
                }
                Err(e) => {
                    tracing::warn!(%identifier, credential = idx, error = %e, "catalog lookup failed");
                }
            }
        }

        LookupResult::NotFound
    }

    async fn attempt(
        &self,
        credential: &Credential,
        identifier: &Identifier,
    ) -> Result<Option<PhotoUrl>, CatalogError> {
        let resp = tokio::time::timeout(self.timeout, self.port.fetch_cards(credential, identifier))
            .await
            .map_err(|_| CatalogError::Network(format!("timed out after {:?}", self.timeout)))??;
        Ok(resp.first_photo_url())
    }
}
