use async_trait::async_trait;
use tokio::sync::broadcast;

use crate::domain::{Credentials, DomainError};

/// Port for the settings surface that owns the API keys.
#[async_trait]
pub trait CredentialsProvider: Send + Sync {
    /// Load the current credentials.
    async fn get(&self) -> Result<Credentials, DomainError>;

    /// Subscribe to credential changes. Each message carries the full new set.
    fn subscribe(&self) -> broadcast::Receiver<Credentials>;
}
