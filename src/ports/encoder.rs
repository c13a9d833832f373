use async_trait::async_trait;

use crate::domain::{CandidateImage, DomainError, EncodedPayload};

/// Port for turning a page image into a recognition payload.
#[async_trait]
pub trait ImageEncoder: Send + Sync {
    /// Load and re-encode the image.
    ///
    /// Returns [`DomainError::EncodingFailed`] when the image cannot be
    /// loaded or read back.
    async fn encode(&self, image: &CandidateImage) -> Result<EncodedPayload, DomainError>;
}
