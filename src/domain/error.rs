use thiserror::Error;

/// Domain-level errors for LogoLens.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("API credentials are not configured")]
    ConfigurationMissing,

    #[error("Logo detection failed: {0}")]
    DetectionFailed(String),

    #[error("No logo detected in this image")]
    NoLogoFound,

    #[error("Image encoding failed: {0}")]
    EncodingFailed(String),

    #[error("Transport failed: {0}")]
    TransportFailed(String),

    #[error("Lookup cancelled")]
    Cancelled,

    #[error("HTTP request failed: {0}")]
    HttpRequest(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("IO error: {0}")]
    Io(String),
}

impl DomainError {
    /// Whether this error should produce a tooltip and a cache entry.
    #[must_use]
    pub fn is_user_visible(&self) -> bool {
        !matches!(self, DomainError::Cancelled)
    }
}

impl From<std::io::Error> for DomainError {
    fn from(err: std::io::Error) -> Self {
        DomainError::Io(err.to_string())
    }
}

impl From<toml::de::Error> for DomainError {
    fn from(err: toml::de::Error) -> Self {
        DomainError::Config(err.to_string())
    }
}

impl From<toml::ser::Error> for DomainError {
    fn from(err: toml::ser::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
