use std::collections::HashMap;
use std::iter;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use futures_util::future::{AbortHandle, Abortable, Aborted};
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    domain_variants, guess_domain, CandidateImage, CompanyInfo, DomainError, EnrichmentResult,
    RecognitionResult,
};
use crate::ports::{BrandEnricher, ImageEncoder, LogoDetector};

/// The single lookup allowed to write results.
struct ActiveRequest {
    generation: u64,
    abort: AbortHandle,
}

/// Cached, cancellable lookup pipeline:
/// encode → detect → guess domain → enrich (with fallbacks) → compose.
///
/// Only the most recently started lookup is active. Starting another aborts
/// it, and a superseded lookup resolves to `None` without touching the cache.
pub struct LookupOrchestrator {
    encoder: Arc<dyn ImageEncoder>,
    detector: Arc<dyn LogoDetector>,
    enricher: Arc<dyn BrandEnricher>,
    /// Source URL → result. Grows for the page lifetime; failures are cached too.
    cache: Mutex<HashMap<String, Arc<CompanyInfo>>>,
    active: Mutex<Option<ActiveRequest>>,
    next_generation: AtomicU64,
}

impl LookupOrchestrator {
    pub fn new(
        encoder: Arc<dyn ImageEncoder>,
        detector: Arc<dyn LogoDetector>,
        enricher: Arc<dyn BrandEnricher>,
    ) -> Self {
        Self {
            encoder,
            detector,
            enricher,
            cache: Mutex::new(HashMap::new()),
            active: Mutex::new(None),
            next_generation: AtomicU64::new(0),
        }
    }

    /// Identify the company behind an image.
    ///
    /// Returns `None` only when this lookup was cancelled or superseded.
    pub async fn lookup(&self, image: &CandidateImage) -> Option<Arc<CompanyInfo>> {
        if let Some(hit) = self.cached(&image.src) {
            debug!(src = %image.src, "Lookup served from cache");
            return Some(hit);
        }

        let (abort, registration) = AbortHandle::new_pair();
        let generation = self.begin(abort);
        debug!(src = %image.src, generation = generation, "Lookup started");

        let outcome = Abortable::new(self.run(image), registration)
            .await
            .unwrap_or_else(|Aborted| Err(DomainError::Cancelled));

        let info = match outcome {
            Ok(info) => info,
            Err(e) if !e.is_user_visible() => {
                debug!(src = %image.src, generation = generation, "Lookup cancelled");
                return None;
            }
            Err(e) => {
                warn!(src = %image.src, error = %e, "Lookup failed");
                CompanyInfo::generic_error()
            }
        };

        self.complete(generation, &image.src, info)
    }

    /// Abort the active lookup, if any.
    pub fn cancel(&self) {
        if let Some(previous) = self.active.lock().take() {
            previous.abort.abort();
            debug!(generation = previous.generation, "Active lookup cancelled");
        }
    }

    pub fn cached(&self, src: &str) -> Option<Arc<CompanyInfo>> {
        self.cache.lock().get(src).cloned()
    }

    pub fn cache_len(&self) -> usize {
        self.cache.lock().len()
    }

    #[cfg(test)]
    pub(crate) fn has_active_request(&self) -> bool {
        self.active.lock().is_some()
    }

    /// Install a new active request, aborting the one it replaces.
    fn begin(&self, abort: AbortHandle) -> u64 {
        let generation = self.next_generation.fetch_add(1, Ordering::Relaxed) + 1;
        let previous = self
            .active
            .lock()
            .replace(ActiveRequest { generation, abort });

        if let Some(previous) = previous {
            previous.abort.abort();
            debug!(
                superseded = previous.generation,
                by = generation,
                "Lookup superseded"
            );
        }
        generation
    }

    /// Cache and return the result if `generation` still owns the active slot.
    fn complete(&self, generation: u64, src: &str, info: CompanyInfo) -> Option<Arc<CompanyInfo>> {
        let mut active = self.active.lock();
        if active.as_ref().map(|a| a.generation) != Some(generation) {
            debug!(src = src, generation = generation, "Discarding stale lookup result");
            return None;
        }
        *active = None;

        let entry = self
            .cache
            .lock()
            .entry(src.to_string())
            .or_insert_with(|| Arc::new(info))
            .clone();

        info!(src = src, error = entry.is_error(), "Lookup complete");
        Some(entry)
    }

    async fn run(&self, image: &CandidateImage) -> Result<CompanyInfo, DomainError> {
        if !self.detector.is_configured() {
            return Ok(CompanyInfo::detection_failed(
                RecognitionResult::MISSING_KEY_MESSAGE,
            ));
        }

        let payload = self.encoder.encode(image).await?;
        let detection = self.detector.detect(&payload).await;
        let confidence_percent = detection.confidence_percent();

        let (brand_name, source) = match detection {
            RecognitionResult::Detected {
                brand_name, source, ..
            } => (brand_name, source),
            RecognitionResult::Failed { message } => {
                return Ok(CompanyInfo::detection_failed(message));
            }
        };

        let primary = guess_domain(&brand_name);
        let (matched_domain, enrichment) = self.enrich_with_fallbacks(&brand_name, &primary).await;

        Ok(CompanyInfo::compose(
            &brand_name,
            confidence_percent,
            source,
            &matched_domain,
            enrichment,
        ))
    }

    /// Try the primary domain, then each variant in order.
    ///
    /// A variant equal to a domain already queried is skipped rather than
    /// requested again, so a one-word brand costs a single request: its
    /// compact, hyphenated and first-word variants all equal the primary guess.
    async fn enrich_with_fallbacks(
        &self,
        brand_name: &str,
        primary: &str,
    ) -> (String, Option<EnrichmentResult>) {
        let mut tried: Vec<String> = Vec::new();

        for domain in iter::once(primary.to_string()).chain(domain_variants(brand_name)) {
            if domain.is_empty() || tried.contains(&domain) {
                continue;
            }
            if let Some(found) = self.enricher.enrich(&domain).await {
                debug!(brand = brand_name, domain = %domain, "Enrichment found");
                return (domain, Some(found));
            }
            tried.push(domain);
        }

        debug!(brand = brand_name, attempts = tried.len(), "No enrichment available");
        (primary.to_string(), None)
    }
}
