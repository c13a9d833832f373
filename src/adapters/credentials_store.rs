use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::info;

use crate::domain::{Credentials, DomainError};
use crate::ports::{ConfigStore, CredentialsProvider};

const CHANGE_CHANNEL_CAPACITY: usize = 8;

const MISSING_RECOGNITION_KEY: &str = "Google Cloud Vision API Key is required";

/// Credentials persisted in the `[credentials]` section of the config file.
///
/// `update` plays the role of the settings form: it validates and trims both
/// keys, writes them and notifies subscribers.
pub struct StoredCredentials<S: ConfigStore> {
    store: Arc<S>,
    changes: broadcast::Sender<Credentials>,
}

impl<S: ConfigStore> StoredCredentials<S> {
    pub fn new(store: Arc<S>) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self { store, changes }
    }

    /// Persist new keys and broadcast them. The Vision key is mandatory; the
    /// Brandfetch key may be left blank.
    pub fn update(&self, credentials: Credentials) -> Result<(), DomainError> {
        let credentials = credentials.trimmed();
        if credentials.recognition_key().is_none() {
            return Err(DomainError::Config(MISSING_RECOGNITION_KEY.to_string()));
        }

        let mut config = self.store.load()?;
        config.credentials = credentials.clone();
        self.store.save(&config)?;

        info!(credentials = ?credentials, "Credentials updated");
        // No receivers is fine: nobody is listening yet.
        let _ = self.changes.send(credentials);
        Ok(())
    }
}

#[async_trait]
impl<S: ConfigStore + 'static> CredentialsProvider for StoredCredentials<S> {
    async fn get(&self) -> Result<Credentials, DomainError> {
        Ok(self.store.load()?.credentials.clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<Credentials> {
        self.changes.subscribe()
    }
}

/// Process-local credentials, for embedding hosts that manage keys themselves.
pub struct InMemoryCredentials {
    current: RwLock<Credentials>,
    changes: broadcast::Sender<Credentials>,
}

impl InMemoryCredentials {
    pub fn new(credentials: Credentials) -> Self {
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            current: RwLock::new(credentials),
            changes,
        }
    }

    pub fn set(&self, credentials: Credentials) {
        *self.current.write() = credentials.clone();
        let _ = self.changes.send(credentials);
    }
}

impl Default for InMemoryCredentials {
    fn default() -> Self {
        Self::new(Credentials::default())
    }
}

#[async_trait]
impl CredentialsProvider for InMemoryCredentials {
    async fn get(&self) -> Result<Credentials, DomainError> {
        Ok(self.current.read().clone())
    }

    fn subscribe(&self) -> broadcast::Receiver<Credentials> {
        self.changes.subscribe()
    }
}
