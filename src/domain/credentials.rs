use std::fmt;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// The two API secrets the lookup pipeline needs.
///
/// Either key may be absent. Empty or whitespace-only values count as absent.
/// Keys are wiped from memory when the value is dropped.
///
/// Defaults are per field: a struct-level serde default would move fields out
/// of a `Drop` type.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Credentials {
    /// Google Cloud Vision API key.
    #[serde(default)]
    recognition_key: Option<String>,
    /// Brandfetch API key.
    #[serde(default)]
    enrichment_key: Option<String>,
}

impl Credentials {
    pub fn new(recognition_key: Option<String>, enrichment_key: Option<String>) -> Self {
        Self {
            recognition_key,
            enrichment_key,
        }
    }

    pub fn recognition_key(&self) -> Option<&str> {
        non_blank(self.recognition_key.as_deref())
    }

    pub fn enrichment_key(&self) -> Option<&str> {
        non_blank(self.enrichment_key.as_deref())
    }

    /// Copy with surrounding whitespace removed and blank keys cleared.
    pub fn trimmed(&self) -> Self {
        Self::new(
            self.recognition_key().map(str::to_string),
            self.enrichment_key().map(str::to_string),
        )
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let redact = |v: Option<&str>| if v.is_some() { "<set>" } else { "<unset>" };
        f.debug_struct("Credentials")
            .field("recognition_key", &redact(self.recognition_key()))
            .field("enrichment_key", &redact(self.enrichment_key()))
            .finish()
    }
}

/// Live credential slot shared between the clients and the change watcher.
#[derive(Debug, Default)]
pub struct SharedCredentials {
    inner: RwLock<Credentials>,
}

impl SharedCredentials {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: RwLock::new(credentials),
        }
    }

    /// Swap in a new set of credentials.
    pub fn replace(&self, credentials: Credentials) {
        *self.inner.write() = credentials;
    }

    pub fn recognition_key(&self) -> Option<Zeroizing<String>> {
        self.inner
            .read()
            .recognition_key()
            .map(|k| Zeroizing::new(k.to_string()))
    }

    pub fn enrichment_key(&self) -> Option<Zeroizing<String>> {
        self.inner
            .read()
            .enrichment_key()
            .map(|k| Zeroizing::new(k.to_string()))
    }

    pub fn snapshot(&self) -> Credentials {
        self.inner.read().clone()
    }
}
