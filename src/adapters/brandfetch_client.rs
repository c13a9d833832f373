use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::domain::config::ApiConfig;
use crate::domain::{EnrichmentResult, SharedCredentials};
use crate::ports::{BrandEnricher, HttpClient};

/// Brand record as returned by the API. Accepts both the flat field layout and
/// Brandfetch's nested `company` block; flat fields win.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BrandRecord {
    name: Option<String>,
    domain: Option<String>,
    description: Option<String>,
    long_description: Option<String>,
    industry: Option<String>,
    country: Option<String>,
    founded_year: Option<u32>,
    employees: Option<serde_json::Value>,
    company: Option<CompanyBlock>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CompanyBlock {
    founded_year: Option<u32>,
    employees: Option<serde_json::Value>,
    location: Option<Location>,
    #[serde(default)]
    industries: Vec<Industry>,
}

#[derive(Debug, Default, Deserialize)]
struct Location {
    city: Option<String>,
    country: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Industry {
    name: Option<String>,
}

/// Employee counts come as either a number or a range label.
fn employee_label(value: serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl From<BrandRecord> for EnrichmentResult {
    fn from(record: BrandRecord) -> Self {
        let company = record.company.unwrap_or_default();

        let nested_country = company.location.and_then(|loc| {
            match (non_empty(loc.city), non_empty(loc.country)) {
                (Some(city), Some(country)) => Some(format!("{}, {}", city, country)),
                (None, country) => country,
                (city, None) => city,
            }
        });

        EnrichmentResult {
            name: non_empty(record.name),
            description: non_empty(record.description).or(non_empty(record.long_description)),
            industry: non_empty(record.industry).or_else(|| {
                company
                    .industries
                    .into_iter()
                    .find_map(|i| non_empty(i.name))
            }),
            country: non_empty(record.country).or(nested_country),
            founded_year: record.founded_year.or(company.founded_year),
            employees: record
                .employees
                .and_then(employee_label)
                .or_else(|| company.employees.and_then(employee_label)),
            domain: non_empty(record.domain),
        }
    }
}

/// Brandfetch brand API client.
pub struct BrandfetchClient {
    http: Arc<dyn HttpClient>,
    credentials: Arc<SharedCredentials>,
    endpoint: String,
}

impl BrandfetchClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        credentials: Arc<SharedCredentials>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            http,
            credentials,
            endpoint: config.brandfetch_endpoint.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl BrandEnricher for BrandfetchClient {
    async fn enrich(&self, domain: &str) -> Option<EnrichmentResult> {
        let key = self.credentials.enrichment_key()?;
        if domain.is_empty() {
            return None;
        }

        let url = format!("{}/{}", self.endpoint, domain);
        let response = match self.http.get(&url, Some(key.as_str())).await {
            Ok(r) => r,
            Err(e) => {
                warn!(domain = domain, error = %e, "Brand lookup failed");
                return None;
            }
        };

        if !response.is_success() {
            debug!(domain = domain, status = response.status, "No brand data for domain");
            return None;
        }

        match response.json::<BrandRecord>() {
            Ok(record) => {
                debug!(domain = domain, "Brand data found");
                Some(record.into())
            }
            Err(e) => {
                warn!(domain = domain, error = %e, "Unreadable brand response");
                None
            }
        }
    }
}
