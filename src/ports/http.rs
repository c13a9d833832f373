use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::domain::DomainError;

/// Raw HTTP response: status plus body bytes.
///
/// Non-2xx statuses are returned, not converted to errors, so callers can
/// read server-supplied error messages.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Deserialize the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, DomainError> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

/// HTTP client port for all network requests.
/// All network traffic, including image loads, must go through this interface.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// Perform a GET request, optionally with a bearer token.
    async fn get(&self, url: &str, bearer_token: Option<&str>) -> Result<HttpResponse, DomainError>;

    /// Perform a POST request with a JSON body.
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_range() {
        assert!(HttpResponse::new(200, "").is_success());
        assert!(HttpResponse::new(204, "").is_success());
        assert!(!HttpResponse::new(301, "").is_success());
        assert!(!HttpResponse::new(404, "").is_success());
    }

    #[test]
    fn test_json_body() {
        let response = HttpResponse::new(200, r#"{"name":"Acme"}"#);
        let value: serde_json::Value = response.json().unwrap();
        assert_eq!(value["name"], "Acme");

        let broken = HttpResponse::new(200, "not json");
        assert!(broken.json::<serde_json::Value>().is_err());
    }
}
