pub mod config;
pub mod credentials;
pub mod encoder;
pub mod enrichment;
pub mod http;
pub mod recognition;
pub mod renderer;

pub use config::ConfigStore;
pub use credentials::CredentialsProvider;
pub use encoder::ImageEncoder;
pub use enrichment::BrandEnricher;
pub use http::{HttpClient, HttpResponse};
pub use recognition::LogoDetector;
pub use renderer::{Anchor, TooltipRenderer};
