use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{
    BrandfetchClient, GoogleVisionClient, JpegImageEncoder, ReqwestHttpClient, StoredCredentials,
    TomlConfigStore,
};
use crate::app::{InteractionController, LookupOrchestrator};
use crate::domain::{AppConfig, CandidateFilter, DomainError, SharedCredentials};
use crate::infrastructure::init_logging;
use crate::ports::{ConfigStore, CredentialsProvider, HttpClient, TooltipRenderer};

/// Application controller that wires the lookup pipeline to its collaborators.
pub struct AppController {
    config: AppConfig,
    credentials: Arc<SharedCredentials>,
    provider: Arc<dyn CredentialsProvider>,
    orchestrator: Arc<LookupOrchestrator>,
    interaction: Arc<InteractionController>,
    watcher: JoinHandle<()>,
    _log_guard: Option<WorkerGuard>,
}

impl AppController {
    /// Initialize from the on-disk configuration.
    /// This sets up configuration, logging, the HTTP client and credentials.
    pub async fn new(renderer: Arc<dyn TooltipRenderer>) -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration
        let config = config_store.load()?;

        // Step 3: Initialize logging
        let log_guard = init_logging(
            &config_store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
            config.logging.max_files,
        )?;

        info!("LogoLens starting up");

        // Step 4: HTTP client and credentials provider
        let http = Arc::new(ReqwestHttpClient::new(Duration::from_secs(
            config.api.request_timeout_secs,
        ))?);
        let provider = Arc::new(StoredCredentials::new(config_store));

        let mut controller = Self::with_parts(config, provider, http, renderer).await?;
        controller._log_guard = log_guard;
        Ok(controller)
    }

    /// Wire everything from explicit parts. Does not touch the filesystem or
    /// install a log subscriber.
    pub async fn with_parts(
        config: AppConfig,
        provider: Arc<dyn CredentialsProvider>,
        http: Arc<dyn HttpClient>,
        renderer: Arc<dyn TooltipRenderer>,
    ) -> Result<Self, DomainError> {
        // Subscribe before loading so no change slips between the two.
        let changes = provider.subscribe();
        let credentials = Arc::new(SharedCredentials::new(provider.get().await?));

        let detector = Arc::new(GoogleVisionClient::new(http.clone(), credentials.clone(), &config.api));
        let enricher = Arc::new(BrandfetchClient::new(http.clone(), credentials.clone(), &config.api));
        let encoder = Arc::new(JpegImageEncoder::new(http, &config.encoder));

        let orchestrator = Arc::new(LookupOrchestrator::new(encoder, detector, enricher));
        let interaction = Arc::new(InteractionController::new(
            orchestrator.clone(),
            renderer,
            CandidateFilter::from_config(&config.filter),
            &config.interaction,
        ));

        let watcher = tokio::spawn(watch_credentials(changes, credentials.clone()));

        info!(credentials = ?credentials.snapshot(), "AppController initialized");

        Ok(Self {
            config,
            credentials,
            provider,
            orchestrator,
            interaction,
            watcher,
            _log_guard: None,
        })
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn credentials(&self) -> &Arc<SharedCredentials> {
        &self.credentials
    }

    pub fn orchestrator(&self) -> &Arc<LookupOrchestrator> {
        &self.orchestrator
    }

    pub fn interaction(&self) -> &Arc<InteractionController> {
        &self.interaction
    }

    /// Re-read credentials from the provider, for hosts without change events.
    pub async fn reload_credentials(&self) -> Result<(), DomainError> {
        self.credentials.replace(self.provider.get().await?);
        info!("Credentials reloaded");
        Ok(())
    }
}

impl Drop for AppController {
    fn drop(&mut self) {
        self.watcher.abort();
        self.orchestrator.cancel();
    }
}

/// Apply credential change notifications until the provider goes away.
async fn watch_credentials(
    mut changes: tokio::sync::broadcast::Receiver<crate::domain::Credentials>,
    credentials: Arc<SharedCredentials>,
) {
    loop {
        match changes.recv().await {
            Ok(updated) => {
                info!(credentials = ?updated, "Credentials changed");
                credentials.replace(updated);
            }
            Err(RecvError::Lagged(skipped)) => {
                warn!(skipped = skipped, "Missed credential updates");
            }
            Err(RecvError::Closed) => break,
        }
    }
}
