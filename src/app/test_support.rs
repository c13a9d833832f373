//! Scripted port implementations shared by the app-layer tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::Notify;

use crate::domain::{
    CandidateImage, DetectionSource, DomainError, EncodedPayload, EnrichmentResult,
    RecognitionResult, TooltipPayload,
};
use crate::ports::{Anchor, BrandEnricher, ImageEncoder, LogoDetector, TooltipRenderer};

/// Encoder that echoes the source URL as payload.
///
/// Sources containing "slow" block until `release` is notified; sources
/// containing "broken" fail.
#[derive(Default)]
pub struct FakeEncoder {
    pub calls: AtomicUsize,
    pub started: Notify,
    pub release: Notify,
}

#[async_trait]
impl ImageEncoder for FakeEncoder {
    async fn encode(&self, image: &CandidateImage) -> Result<EncodedPayload, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.started.notify_one();
        if image.src.contains("slow") {
            self.release.notified().await;
        }
        if image.src.contains("broken") {
            return Err(DomainError::EncodingFailed("tainted canvas".into()));
        }
        Ok(EncodedPayload::new(image.src.clone()))
    }
}

/// Detector answering from a payload → result table.
pub struct FakeDetector {
    pub configured: AtomicBool,
    pub calls: AtomicUsize,
    results: Mutex<HashMap<String, RecognitionResult>>,
}

impl FakeDetector {
    pub fn new() -> Self {
        Self {
            configured: AtomicBool::new(true),
            calls: AtomicUsize::new(0),
            results: Mutex::new(HashMap::new()),
        }
    }

    pub fn unconfigured() -> Self {
        let detector = Self::new();
        detector.configured.store(false, Ordering::SeqCst);
        detector
    }

    pub fn answer(&self, src: &str, result: RecognitionResult) {
        self.results.lock().insert(src.to_string(), result);
    }

    pub fn logo(&self, src: &str, brand: &str, confidence: f32) {
        self.answer(
            src,
            RecognitionResult::Detected {
                brand_name: brand.to_string(),
                confidence: Some(confidence),
                source: DetectionSource::LogoDetection,
            },
        );
    }
}

#[async_trait]
impl LogoDetector for FakeDetector {
    fn is_configured(&self) -> bool {
        self.configured.load(Ordering::SeqCst)
    }

    async fn detect(&self, payload: &EncodedPayload) -> RecognitionResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.results
            .lock()
            .get(payload.as_str())
            .cloned()
            .unwrap_or_else(|| RecognitionResult::failed(RecognitionResult::NO_LOGO_MESSAGE))
    }
}

/// Enricher answering from a domain → record table, recording every query.
#[derive(Default)]
pub struct FakeEnricher {
    pub queried: Mutex<Vec<String>>,
    records: Mutex<HashMap<String, EnrichmentResult>>,
}

impl FakeEnricher {
    pub fn knows(&self, domain: &str, record: EnrichmentResult) {
        self.records.lock().insert(domain.to_string(), record);
    }
}

#[async_trait]
impl BrandEnricher for FakeEnricher {
    async fn enrich(&self, domain: &str) -> Option<EnrichmentResult> {
        self.queried.lock().push(domain.to_string());
        self.records.lock().get(domain).cloned()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderCall {
    Show(TooltipPayload, Anchor),
    Reposition(Anchor),
    Hide,
}

#[derive(Default)]
pub struct RecordingRenderer {
    pub calls: Mutex<Vec<RenderCall>>,
}

impl RecordingRenderer {
    pub fn calls(&self) -> Vec<RenderCall> {
        self.calls.lock().clone()
    }
}

impl TooltipRenderer for RecordingRenderer {
    fn show(&self, payload: TooltipPayload, anchor: Anchor) {
        self.calls.lock().push(RenderCall::Show(payload, anchor));
    }

    fn reposition(&self, anchor: Anchor) {
        self.calls.lock().push(RenderCall::Reposition(anchor));
    }

    fn hide(&self) {
        self.calls.lock().push(RenderCall::Hide);
    }
}

pub struct Fixture {
    pub encoder: Arc<FakeEncoder>,
    pub detector: Arc<FakeDetector>,
    pub enricher: Arc<FakeEnricher>,
}

impl Fixture {
    pub fn new() -> Self {
        Self::with_detector(FakeDetector::new())
    }

    pub fn with_detector(detector: FakeDetector) -> Self {
        Self {
            encoder: Arc::new(FakeEncoder::default()),
            detector: Arc::new(detector),
            enricher: Arc::new(FakeEnricher::default()),
        }
    }

    pub fn orchestrator(&self) -> crate::app::LookupOrchestrator {
        crate::app::LookupOrchestrator::new(
            self.encoder.clone(),
            self.detector.clone(),
            self.enricher.clone(),
        )
    }
}
