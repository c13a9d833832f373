use async_trait::async_trait;

use crate::domain::EnrichmentResult;

/// Port for best-effort brand enrichment.
#[async_trait]
pub trait BrandEnricher: Send + Sync {
    /// Look up brand data for a domain. `None` means nothing is available,
    /// for whatever reason.
    async fn enrich(&self, domain: &str) -> Option<EnrichmentResult>;
}
