use std::fmt;
use std::sync::{Arc, Weak};

use serde::{Deserialize, Serialize};

use crate::domain::config::FilterConfig;

/// A page image observed by the lookup pipeline.
///
/// The host page owns these and hands them out as `Arc<CandidateImage>`;
/// identity is pointer identity, not field equality.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateImage {
    /// Source URL (`src` attribute), also the cache key.
    pub src: String,
    pub alt: String,
    /// Raw CSS class string.
    pub class_name: String,
    pub natural_width: Option<u32>,
    pub natural_height: Option<u32>,
    /// Rendered width, used when the natural size is unknown.
    pub width: Option<u32>,
    /// Rendered height, used when the natural size is unknown.
    pub height: Option<u32>,
}

impl CandidateImage {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    pub fn with_alt(mut self, alt: impl Into<String>) -> Self {
        self.alt = alt.into();
        self
    }

    pub fn with_class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = class_name.into();
        self
    }

    pub fn with_natural_size(mut self, width: u32, height: u32) -> Self {
        self.natural_width = Some(width);
        self.natural_height = Some(height);
        self
    }

    pub fn with_rendered_size(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Heuristic logo detector over image attributes.
#[derive(Debug, Clone)]
pub struct CandidateFilter {
    keywords: Vec<String>,
    min_size: u32,
    max_size: u32,
}

impl Default for CandidateFilter {
    fn default() -> Self {
        Self::from_config(&FilterConfig::default())
    }
}

impl CandidateFilter {
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            keywords: config.keywords.iter().map(|k| k.to_lowercase()).collect(),
            min_size: config.min_size,
            max_size: config.max_size,
        }
    }

    /// True iff a keyword appears in the URL, alt text or class string and
    /// both natural dimensions are within bounds.
    #[must_use]
    pub fn is_candidate(&self, image: &CandidateImage) -> bool {
        self.within_bounds(image) && self.has_keyword(image)
    }

    fn within_bounds(&self, image: &CandidateImage) -> bool {
        let range = self.min_size..=self.max_size;
        range.contains(&image.natural_width.unwrap_or(0))
            && range.contains(&image.natural_height.unwrap_or(0))
    }

    fn has_keyword(&self, image: &CandidateImage) -> bool {
        [&image.src, &image.alt, &image.class_name]
            .iter()
            .map(|field| field.to_lowercase())
            .any(|field| self.keywords.iter().any(|k| field.contains(k.as_str())))
    }
}

/// Base64 JPEG body ready for the recognition API, without a `data:` prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    pub fn new(base64: String) -> Self {
        Self(base64)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

}

impl fmt::Debug for EncodedPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncodedPayload({} bytes)", self.0.len())
    }
}

/// Membership set that does not keep page images alive.
///
/// Used to make listener registration idempotent: once an image has been
/// seen it is never registered again, and once the page drops it the entry
/// is pruned on the next insert.
#[derive(Debug, Default)]
pub struct WeakImageSet {
    entries: Vec<Weak<CandidateImage>>,
}

impl WeakImageSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an image. Returns false if it was already present.
    pub fn insert(&mut self, image: &Arc<CandidateImage>) -> bool {
        self.entries.retain(|w| w.strong_count() > 0);
        if self.contains(image) {
            return false;
        }
        self.entries.push(Arc::downgrade(image));
        true
    }

    pub fn contains(&self, image: &Arc<CandidateImage>) -> bool {
        let target = Arc::as_ptr(image);
        self.entries.iter().any(|w| std::ptr::eq(w.as_ptr(), target))
    }

    /// Number of entries whose image is still alive.
    #[cfg(test)]
    pub(crate) fn live_count(&self) -> usize {
        self.entries.iter().filter(|w| w.strong_count() > 0).count()
    }
}
