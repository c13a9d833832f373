use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::domain::enrichment::EnrichmentResult;
use crate::domain::recognition::DetectionSource;

/// Suffix appended to the source label when enrichment contributed data.
pub const ENRICHMENT_SUFFIX: &str = " + Brandfetch";

pub const DETECTION_FAILED_TITLE: &str = "Detection Failed";
pub const GENERIC_ERROR_TITLE: &str = "Error";
pub const GENERIC_ERROR_MESSAGE: &str =
    "Unable to analyze this image. It may be hosted on a domain that blocks cross-origin access.";

/// Company details shown in the tooltip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    pub name: String,
    /// Business description, or a templated detection summary.
    pub business: String,
    pub domain: String,
    pub location: Option<String>,
    pub industry: Option<String>,
    pub founded: Option<u32>,
    pub employees: Option<String>,
    pub confidence_percent: u8,
    pub source_label: String,
}

/// Final payload of a lookup, cached per image source URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CompanyInfo {
    Company(CompanyDetails),
    Error { title: String, message: String },
}

impl CompanyInfo {
    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        CompanyInfo::Error {
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn detection_failed(message: impl Into<String>) -> Self {
        Self::error(DETECTION_FAILED_TITLE, message)
    }

    /// Catch-all for encoding/transport failures.
    pub fn generic_error() -> Self {
        Self::error(GENERIC_ERROR_TITLE, GENERIC_ERROR_MESSAGE)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, CompanyInfo::Error { .. })
    }

    /// Merge a detection with optional enrichment data.
    ///
    /// `matched_domain` is the domain the enrichment was found at, or the
    /// primary guess when nothing was found.
    pub fn compose(
        brand_name: &str,
        confidence_percent: u8,
        source: DetectionSource,
        matched_domain: &str,
        enrichment: Option<EnrichmentResult>,
    ) -> Self {
        let mut source_label = source.to_string();
        let enrichment = match enrichment {
            Some(e) => {
                source_label.push_str(ENRICHMENT_SUFFIX);
                e
            }
            None => EnrichmentResult::default(),
        };

        CompanyInfo::Company(CompanyDetails {
            name: enrichment.name.unwrap_or_else(|| brand_name.to_string()),
            business: enrichment.description.unwrap_or_else(|| {
                format!(
                    "Detected as {} logo with {}% confidence",
                    brand_name, confidence_percent
                )
            }),
            domain: enrichment
                .domain
                .unwrap_or_else(|| matched_domain.to_string()),
            location: enrichment.country,
            industry: enrichment.industry,
            founded: enrichment.founded_year,
            employees: enrichment.employees,
            confidence_percent,
            source_label,
        })
    }
}

/// What the tooltip renderer is asked to display.
#[derive(Debug, Clone, PartialEq)]
pub enum TooltipPayload {
    Loading,
    Company(Arc<CompanyInfo>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_enrichment() {
        let info = CompanyInfo::compose("Acme", 93, DetectionSource::LogoDetection, "acme.com", None);
        let CompanyInfo::Company(details) = info else {
            panic!("expected company details");
        };
        assert_eq!(details.name, "Acme");
        assert_eq!(details.business, "Detected as Acme logo with 93% confidence");
        assert_eq!(details.domain, "acme.com");
        assert_eq!(details.source_label, "LogoDetection");
        assert!(details.location.is_none());
        assert!(details.founded.is_none());
    }

    #[test]
    fn test_compose_prefers_enrichment_fields() {
        let enrichment = EnrichmentResult {
            name: Some("Acme Corporation".into()),
            description: Some("Maker of anvils".into()),
            industry: Some("Manufacturing".into()),
            country: Some("United States".into()),
            founded_year: Some(1949),
            employees: Some("1001-5000".into()),
            domain: Some("acme.co".into()),
        };
        let info = CompanyInfo::compose(
            "Acme",
            71,
            DetectionSource::WebDetection,
            "acme.com",
            Some(enrichment),
        );
        let CompanyInfo::Company(details) = info else {
            panic!("expected company details");
        };
        assert_eq!(details.name, "Acme Corporation");
        assert_eq!(details.business, "Maker of anvils");
        assert_eq!(details.domain, "acme.co");
        assert_eq!(details.founded, Some(1949));
        assert_eq!(details.source_label, "WebDetection + Brandfetch");
    }

    #[test]
    fn test_compose_partial_enrichment_falls_back() {
        let enrichment = EnrichmentResult {
            industry: Some("Retail".into()),
            ..EnrichmentResult::default()
        };
        let info = CompanyInfo::compose(
            "Big Blue",
            50,
            DetectionSource::LogoDetection,
            "big-blue.com",
            Some(enrichment),
        );
        let CompanyInfo::Company(details) = info else {
            panic!("expected company details");
        };
        assert_eq!(details.name, "Big Blue");
        assert_eq!(details.domain, "big-blue.com");
        assert_eq!(details.industry.as_deref(), Some("Retail"));
        assert_eq!(details.source_label, "LogoDetection + Brandfetch");
    }

    #[test]
    fn test_error_serializes_with_kind_tag() {
        let info = CompanyInfo::detection_failed("No logo detected in this image.");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["kind"], "error");
        assert_eq!(json["title"], "Detection Failed");
    }
}
