use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::config::ApiConfig;
use crate::domain::{DetectionSource, DomainError, EncodedPayload, RecognitionResult, SharedCredentials};
use crate::ports::{HttpClient, LogoDetector};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageAnnotation>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageAnnotation {
    #[serde(default)]
    logo_annotations: Vec<EntityAnnotation>,
    web_detection: Option<WebDetection>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct EntityAnnotation {
    #[serde(default)]
    description: String,
    score: Option<f32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WebDetection {
    #[serde(default)]
    web_entities: Vec<WebEntity>,
}

#[derive(Debug, Deserialize)]
struct WebEntity {
    description: Option<String>,
    #[serde(default)]
    score: f32,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    message: String,
}

/// Google Cloud Vision client asking for logo and web-entity detection.
pub struct GoogleVisionClient {
    http: Arc<dyn HttpClient>,
    credentials: Arc<SharedCredentials>,
    endpoint: String,
    max_results: u32,
    web_entity_min_score: f32,
}

impl GoogleVisionClient {
    pub fn new(
        http: Arc<dyn HttpClient>,
        credentials: Arc<SharedCredentials>,
        config: &ApiConfig,
    ) -> Self {
        Self {
            http,
            credentials,
            endpoint: config.vision_endpoint.clone(),
            max_results: config.max_results,
            web_entity_min_score: config.web_entity_min_score,
        }
    }

    fn request_body(&self, payload: &EncodedPayload) -> serde_json::Value {
        json!({
            "requests": [{
                "image": { "content": payload.as_str() },
                "features": [
                    { "type": "LOGO_DETECTION", "maxResults": self.max_results },
                    { "type": "WEB_DETECTION", "maxResults": self.max_results },
                ],
            }],
        })
    }

    async fn call(&self, key: &str, payload: &EncodedPayload) -> Result<RecognitionResult, DomainError> {
        let url = Url::parse_with_params(&self.endpoint, &[("key", key)])
            .map_err(|e| DomainError::Config(format!("Invalid Vision endpoint: {}", e)))?;

        let response = self.http.post_json(url.as_str(), &self.request_body(payload)).await?;

        if !response.is_success() {
            let message = response
                .json::<ErrorEnvelope>()
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| RecognitionResult::GENERIC_FAILURE_MESSAGE.to_string());
            warn!(status = response.status, message = %message, "Vision API returned an error");
            return Err(DomainError::DetectionFailed(message));
        }

        let parsed: AnnotateResponse = response.json()?;
        self.resolve(parsed)
    }

    /// Pick a brand from the annotations: first logo, else the first
    /// confident web entity.
    fn resolve(&self, response: AnnotateResponse) -> Result<RecognitionResult, DomainError> {
        let annotation = response
            .responses
            .into_iter()
            .next()
            .ok_or(DomainError::NoLogoFound)?;

        if let Some(message) = annotation.error.map(|e| e.message).filter(|m| !m.is_empty()) {
            return Err(DomainError::DetectionFailed(message));
        }

        // Logo annotations arrive sorted by descending score.
        if let Some(logo) = annotation.logo_annotations.into_iter().next() {
            return Ok(RecognitionResult::Detected {
                brand_name: logo.description,
                confidence: logo.score,
                source: DetectionSource::LogoDetection,
            });
        }

        annotation
            .web_detection
            .unwrap_or_default()
            .web_entities
            .into_iter()
            .filter(|e| e.score > self.web_entity_min_score)
            .find_map(|e| {
                let score = e.score;
                e.description
                    .filter(|d| !d.is_empty())
                    .map(|description| RecognitionResult::Detected {
                        brand_name: description,
                        confidence: Some(score),
                        source: DetectionSource::WebDetection,
                    })
            })
            .ok_or(DomainError::NoLogoFound)
    }
}

#[async_trait]
impl LogoDetector for GoogleVisionClient {
    fn is_configured(&self) -> bool {
        self.credentials.recognition_key().is_some()
    }

    async fn detect(&self, payload: &EncodedPayload) -> RecognitionResult {
        let Some(key) = self.credentials.recognition_key() else {
            info!("Vision API key not configured, skipping detection");
            return DomainError::ConfigurationMissing.into();
        };

        debug!(payload = ?payload, "Requesting logo detection");

        match self.call(key.as_str(), payload).await {
            Ok(result) => {
                debug!(result = ?result, "Logo detection finished");
                result
            }
            Err(DomainError::NoLogoFound) => {
                debug!("No logo or confident web entity found");
                DomainError::NoLogoFound.into()
            }
            Err(e) => {
                warn!(error = %e, "Logo detection failed");
                e.into()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ReqwestHttpClient;
    use crate::domain::Credentials;
    use std::time::Duration;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer, key: Option<&str>) -> GoogleVisionClient {
        let http = Arc::new(ReqwestHttpClient::new(Duration::from_secs(5)).unwrap());
        let credentials = Arc::new(SharedCredentials::new(Credentials::new(
            key.map(str::to_string),
            None,
        )));
        let config = ApiConfig {
            vision_endpoint: format!("{}/v1/images:annotate", server.uri()),
            ..ApiConfig::default()
        };
        GoogleVisionClient::new(http, credentials, &config)
    }

    fn payload() -> EncodedPayload {
        EncodedPayload::new("aGVsbG8=".to_string())
    }

    async fn mount(server: &MockServer, template: ResponseTemplate) {
        Mock::given(method("POST"))
            .and(path("/v1/images:annotate"))
            .and(query_param("key", "test-key"))
            .respond_with(template)
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_missing_key_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = client_for(&server, None);
        assert!(!client.is_configured());
        assert_eq!(
            client.detect(&payload()).await,
            RecognitionResult::failed(RecognitionResult::MISSING_KEY_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_first_logo_annotation_wins() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{
                    "logoAnnotations": [
                        {"description": "Acme", "score": 0.93},
                        {"description": "Acme Labs", "score": 0.41}
                    ],
                    "webDetection": {"webEntities": [{"description": "Other", "score": 0.9}]}
                }]
            })),
        )
        .await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(
            result,
            RecognitionResult::Detected {
                brand_name: "Acme".into(),
                confidence: Some(0.93),
                source: DetectionSource::LogoDetection,
            }
        );
    }

    #[tokio::test]
    async fn test_web_entity_fallback_skips_weak_and_unnamed() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{
                    "logoAnnotations": [],
                    "webDetection": {"webEntities": [
                        {"entityId": "/m/1", "score": 0.95},
                        {"entityId": "/m/2", "description": "", "score": 0.9},
                        {"entityId": "/m/3", "description": "Weak", "score": 0.5},
                        {"entityId": "/m/4", "description": "Globex", "score": 0.72}
                    ]}
                }]
            })),
        )
        .await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(
            result,
            RecognitionResult::Detected {
                brand_name: "Globex".into(),
                confidence: Some(0.72),
                source: DetectionSource::WebDetection,
            }
        );
    }

    #[tokio::test]
    async fn test_nothing_found() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({"responses": [{}]})),
        )
        .await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(result, RecognitionResult::failed(RecognitionResult::NO_LOGO_MESSAGE));
    }

    #[tokio::test]
    async fn test_server_error_message_is_surfaced() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(403).set_body_json(json!({
                "error": {"code": 403, "message": "API key not valid.", "status": "PERMISSION_DENIED"}
            })),
        )
        .await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(result, RecognitionResult::failed("API key not valid."));
    }

    #[tokio::test]
    async fn test_server_error_without_body_uses_generic_message() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(500)).await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(
            result,
            RecognitionResult::failed(RecognitionResult::GENERIC_FAILURE_MESSAGE)
        );
    }

    #[tokio::test]
    async fn test_per_image_error_is_surfaced() {
        let server = MockServer::start().await;
        mount(
            &server,
            ResponseTemplate::new(200).set_body_json(json!({
                "responses": [{"error": {"code": 3, "message": "Bad image data."}}]
            })),
        )
        .await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert_eq!(result, RecognitionResult::failed("Bad image data."));
    }

    #[tokio::test]
    async fn test_malformed_body_becomes_failed_result() {
        let server = MockServer::start().await;
        mount(&server, ResponseTemplate::new(200).set_body_string("<html>")).await;

        let result = client_for(&server, Some("test-key")).detect(&payload()).await;
        assert!(!result.is_success());
    }

    #[test]
    fn test_request_body_shape() {
        let http = Arc::new(ReqwestHttpClient::new(Duration::from_secs(5)).unwrap());
        let client = GoogleVisionClient::new(
            http,
            Arc::new(SharedCredentials::default()),
            &ApiConfig::default(),
        );
        let body = client.request_body(&payload());
        let request = &body["requests"][0];
        assert_eq!(request["image"]["content"], "aGVsbG8=");
        assert_eq!(request["features"][0]["type"], "LOGO_DETECTION");
        assert_eq!(request["features"][0]["maxResults"], 5);
        assert_eq!(request["features"][1]["type"], "WEB_DETECTION");
    }
}
