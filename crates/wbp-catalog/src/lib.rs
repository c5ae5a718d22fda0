//! Catalog adapter (Wildberries content API).
//!
//! Implements the `wbp-core` CatalogPort: one `cards/list` search per call.

use std::time::Duration;

use async_trait::async_trait;

use wbp_core::{
    catalog::{
        types::{CardsRequest, CardsResponse},
        CatalogPort,
    },
    config::CatalogConfig,
    domain::{Credential, Identifier},
    errors::{CatalogError, Error},
    Result,
};

#[derive(Clone, Debug)]
pub struct HttpCatalog {
    endpoint: String,
    http: reqwest::Client,
}

impl HttpCatalog {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::External(format!("catalog http client build error: {e}")))?;
        Ok(Self {
            endpoint: endpoint.into(),
            http,
        })
    }

    pub fn from_config(cfg: &CatalogConfig) -> Result<Self> {
        Self::new(cfg.endpoint.clone(), cfg.request_timeout)
    }

    fn request(&self, credential: &Credential, identifier: &Identifier) -> reqwest::RequestBuilder {
        self.http
            .post(&self.endpoint)
            .header(reqwest::header::AUTHORIZATION, credential.as_str())
            .json(&CardsRequest::for_identifier(identifier))
    }
}

/// Map an HTTP status + body to the port result.
fn decode_response(status: u16, body: &[u8]) -> std::result::Result<CardsResponse, CatalogError> {
    if !(200..300).contains(&status) {
        return Err(CatalogError::Status(status));
    }
    serde_json::from_slice(body).map_err(|e| CatalogError::Decode(e.to_string()))
}

#[async_trait]
impl CatalogPort for HttpCatalog {
    async fn fetch_cards(
        &self,
        credential: &Credential,
        identifier: &Identifier,
    ) -> std::result::Result<CardsResponse, CatalogError> {
        let resp = self
            .request(credential, identifier)
            .send()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .map_err(|e| CatalogError::Network(e.to_string()))?;

        if status >= 300 {
            tracing::debug!(
                %identifier,
                status,
                body = %String::from_utf8_lossy(&body).chars().take(200).collect::<String>(),
                "catalog rejected request"
            );
        }

        decode_response(status, &body)
    }
}
