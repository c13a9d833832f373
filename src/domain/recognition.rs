use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Which Vision feature produced the brand name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionSource {
    LogoDetection,
    WebDetection,
}

impl fmt::Display for DetectionSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DetectionSource::LogoDetection => f.write_str("LogoDetection"),
            DetectionSource::WebDetection => f.write_str("WebDetection"),
        }
    }
}

/// Outcome of a single recognition call. Failures are values, not errors:
/// the message is meant for the user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RecognitionResult {
    Detected {
        brand_name: String,
        /// Score in [0, 1], when the API reported one.
        confidence: Option<f32>,
        source: DetectionSource,
    },
    Failed {
        message: String,
    },
}

impl RecognitionResult {
    pub const NO_LOGO_MESSAGE: &'static str = "No logo detected in this image.";
    pub const MISSING_KEY_MESSAGE: &'static str =
        "Please configure your Google Cloud Vision API key in the extension settings.";
    pub const GENERIC_FAILURE_MESSAGE: &'static str = "Logo detection request failed.";

    pub fn failed(message: impl Into<String>) -> Self {
        RecognitionResult::Failed {
            message: message.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RecognitionResult::Detected { .. })
    }

    /// Confidence as a whole percentage; 0 when unknown.
    pub fn confidence_percent(&self) -> u8 {
        match self {
            RecognitionResult::Detected {
                confidence: Some(c),
                ..
            } => (c.clamp(0.0, 1.0) * 100.0).round() as u8,
            _ => 0,
        }
    }
}

impl From<DomainError> for RecognitionResult {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::ConfigurationMissing => Self::failed(Self::MISSING_KEY_MESSAGE),
            DomainError::NoLogoFound => Self::failed(Self::NO_LOGO_MESSAGE),
            DomainError::DetectionFailed(message) => Self::failed(message),
            other => Self::failed(format!("Error calling Vision API: {}", other)),
        }
    }
}
