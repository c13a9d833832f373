pub mod brand_domain;
pub mod company;
pub mod config;
pub mod credentials;
pub mod enrichment;
pub mod error;
pub mod hover;
pub mod image;
pub mod recognition;

pub use brand_domain::{domain_variants, guess_domain};
pub use company::{CompanyDetails, CompanyInfo, TooltipPayload};
pub use config::AppConfig;
pub use credentials::{Credentials, SharedCredentials};
pub use enrichment::EnrichmentResult;
pub use error::DomainError;
pub use hover::{HoverEvent, HoverState};
pub use image::{CandidateFilter, CandidateImage, EncodedPayload, WeakImageSet};
pub use recognition::{DetectionSource, RecognitionResult};
