use serde::{Deserialize, Serialize};

use crate::domain::credentials::Credentials;

/// Remote API configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Cloud Vision `images:annotate` endpoint.
    pub vision_endpoint: String,
    /// Brandfetch brand lookup base URL (domain is appended as a path segment).
    pub brandfetch_endpoint: String,
    /// Per-request transport timeout in seconds.
    pub request_timeout_secs: u64,
    /// Maximum results requested per Vision feature.
    pub max_results: u32,
    /// Web entities at or below this score are ignored.
    pub web_entity_min_score: f32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            vision_endpoint: "https://vision.googleapis.com/v1/images:annotate".to_string(),
            brandfetch_endpoint: "https://api.brandfetch.io/v2/brands".to_string(),
            request_timeout_secs: 30,
            max_results: 5,
            web_entity_min_score: 0.5,
        }
    }
}

/// Candidate filter configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Keywords searched for in the image URL, alt text and class string.
    pub keywords: Vec<String>,
    /// Minimum natural width/height in pixels (inclusive).
    pub min_size: u32,
    /// Maximum natural width/height in pixels (inclusive).
    pub max_size: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            keywords: Self::default_keywords(),
            min_size: 40,
            max_size: 600,
        }
    }
}

impl FilterConfig {
    pub fn default_keywords() -> Vec<String> {
        ["logo", "brand", "company", "corp", "trademark", "icon"]
            .iter()
            .map(|k| k.to_string())
            .collect()
    }
}

/// Image encoder configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncoderConfig {
    /// Upper bound for each canvas axis.
    pub max_dimension: u32,
    /// JPEG quality (1-100).
    pub jpeg_quality: u8,
}

impl Default for EncoderConfig {
    fn default() -> Self {
        Self {
            max_dimension: 640,
            jpeg_quality: 80,
        }
    }
}

/// Hover interaction configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionConfig {
    /// Delay between pointer-enter and lookup start.
    pub debounce_ms: u64,
    /// Offset in px added to the pointer position for the tooltip anchor.
    pub tooltip_offset: f64,
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            debounce_ms: 500,
            tooltip_offset: 15.0,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "trace", "debug", "info", "warn", "error".
    pub level: String,
    /// Enable file logging with rotation.
    pub file_logging: bool,
    /// Maximum number of log files to keep.
    pub max_files: u32,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_logging: false,
            max_files: 7,
        }
    }
}

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub credentials: Credentials,
    pub api: ApiConfig,
    pub filter: FilterConfig,
    pub encoder: EncoderConfig,
    pub interaction: InteractionConfig,
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Create a new AppConfig with default values.
    pub fn new() -> Self {
        Self::default()
    }
}
