use async_trait::async_trait;

use crate::{
    catalog::types::CardsResponse,
    domain::{Credential, Identifier},
    errors::CatalogError,
};

/// One catalog search request made with one credential.
///
/// Implementations apply their own request timeout and must not retry.
#[async_trait]
pub trait CatalogPort: Send + Sync {
    async fn fetch_cards(
        &self,
        credential: &Credential,
        identifier: &Identifier,
    ) -> Result<CardsResponse, CatalogError>;
}
