use serde::{Deserialize, Serialize};

/// Brand data returned by the enrichment API. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnrichmentResult {
    pub name: Option<String>,
    pub description: Option<String>,
    pub industry: Option<String>,
    /// Country (optionally prefixed with the city).
    pub country: Option<String>,
    pub founded_year: Option<u32>,
    /// Free-form employee range label, e.g. "1001-5000".
    pub employees: Option<String>,
    pub domain: Option<String>,
}
