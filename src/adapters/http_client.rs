use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};
use url::Url;

use crate::domain::DomainError;
use crate::ports::{HttpClient, HttpResponse};

/// reqwest-backed implementation of the HTTP port.
///
/// Requests carry no cookies or ambient credentials; only http(s) URLs with a
/// host are accepted.
pub struct ReqwestHttpClient {
    client: Client,
}

impl ReqwestHttpClient {
    /// Create a client with the given per-request timeout.
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        let client = Client::builder()
            .use_rustls_tls()
            .timeout(timeout)
            .user_agent(format!("LogoLens/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DomainError::HttpRequest(format!("Failed to create HTTP client: {}", e)))?;

        debug!(timeout_secs = timeout.as_secs(), "HTTP client initialized");

        Ok(Self { client })
    }

    /// Reject anything that is not an absolute http(s) URL.
    fn check_url(url: &str) -> Result<(), DomainError> {
        let parsed = Url::parse(url).map_err(|e| DomainError::HttpRequest(e.to_string()))?;

        if !matches!(parsed.scheme(), "http" | "https") {
            warn!(scheme = parsed.scheme(), "Request blocked: unsupported scheme");
            return Err(DomainError::HttpRequest(format!(
                "Unsupported URL scheme '{}'",
                parsed.scheme()
            )));
        }

        if parsed.host_str().is_none() {
            return Err(DomainError::HttpRequest("Invalid URL: no host".to_string()));
        }

        Ok(())
    }

    async fn read(response: reqwest::Response) -> Result<HttpResponse, DomainError> {
        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DomainError::TransportFailed(e.to_string()))?;

        debug!(status = status, size = body.len(), "HTTP response received");
        Ok(HttpResponse::new(status, body.to_vec()))
    }
}

#[async_trait]
impl HttpClient for ReqwestHttpClient {
    async fn get(&self, url: &str, bearer_token: Option<&str>) -> Result<HttpResponse, DomainError> {
        Self::check_url(url)?;

        let mut request = self.client.get(url);
        if let Some(token) = bearer_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| DomainError::TransportFailed(e.to_string()))?;

        Self::read(response).await
    }

    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError> {
        Self::check_url(url)?;

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| DomainError::TransportFailed(e.to_string()))?;

        Self::read(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client() -> ReqwestHttpClient {
        ReqwestHttpClient::new(Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_rejects_non_http_schemes() {
        assert!(ReqwestHttpClient::check_url("ftp://example.com/logo.png").is_err());
        assert!(ReqwestHttpClient::check_url("file:///etc/passwd").is_err());
        assert!(ReqwestHttpClient::check_url("not a url").is_err());
        assert!(ReqwestHttpClient::check_url("https://example.com/logo.png").is_ok());
    }

    #[tokio::test]
    async fn test_get_with_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/brands/acme.com"))
            .and(header("authorization", "Bearer secret"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&server)
            .await;

        let response = client()
            .get(&format!("{}/brands/acme.com", server.uri()), Some("secret"))
            .await
            .unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, b"{}");
    }

    #[tokio::test]
    async fn test_non_success_status_is_returned() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404).set_body_string("missing"))
            .mount(&server)
            .await;

        let response = client().get(&server.uri(), None).await.unwrap();
        assert!(!response.is_success());
        assert_eq!(response.status, 404);
    }

    #[tokio::test]
    async fn test_post_json_sends_body() {
        let server = MockServer::start().await;
        let body = serde_json::json!({"requests": []});
        Mock::given(method("POST"))
            .and(path("/annotate"))
            .and(body_json(&body))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let response = client()
            .post_json(&format!("{}/annotate", server.uri()), &body)
            .await
            .unwrap();
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["ok"], true);
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Nothing listens on port 9 on loopback.
        let result = client().get("http://127.0.0.1:9/", None).await;
        assert!(matches!(result, Err(DomainError::TransportFailed(_))));
    }
}
