use async_trait::async_trait;

use crate::domain::{EncodedPayload, RecognitionResult};

/// Port for logo recognition.
#[async_trait]
pub trait LogoDetector: Send + Sync {
    /// Whether a recognition key is currently configured.
    fn is_configured(&self) -> bool;

    /// Identify the brand in an encoded image.
    ///
    /// Never fails: missing configuration, transport errors and empty results
    /// all come back as [`RecognitionResult::Failed`].
    async fn detect(&self, payload: &EncodedPayload) -> RecognitionResult;
}
