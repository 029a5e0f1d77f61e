use crate::language::Language;
use crate::signatures::extract_signatures;
use crate::types::SignatureReport;
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

type ContentKey = [u8; 32];

/// Hit/miss counters for a [`SignatureCache`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Fixed-capacity LRU of signature reports keyed by content digest.
///
/// The cache is owned by the caller and shared by reference; there is no
/// process-wide instance. Reports carry no path, so two files with identical
/// content and extension share one entry.
pub struct SignatureCache {
    entries: Mutex<LruCache<ContentKey, Arc<SignatureReport>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl SignatureCache {
    pub fn new(capacity: usize) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    fn key(path: &str, language: Language, content: &str) -> ContentKey {
        let extension = path.rsplit_once('.').map_or("", |(_, ext)| ext);
        let mut hasher = Sha256::new();
        hasher.update(language.as_str().as_bytes());
        hasher.update([0]);
        hasher.update(extension.to_lowercase().as_bytes());
        hasher.update([0]);
        hasher.update(content.as_bytes());
        hasher.finalize().into()
    }

    /// Cached [`extract_signatures`]; extraction runs outside the lock
    pub fn get_or_extract(
        &self,
        path: &str,
        language: Language,
        content: &str,
    ) -> Arc<SignatureReport> {
        let key = Self::key(path, language, content);

        let cached = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(report) = cached {
            self.hits.fetch_add(1, Ordering::Relaxed);
            log::debug!("Signature cache hit for {path}");
            return report;
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let report = Arc::new(extract_signatures(path, language, content));
        let evicted = self
            .entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(key, Arc::clone(&report));
        if matches!(evicted, Some((old, _)) if old != key) {
            log::debug!("Signature cache evicted an entry for {path}");
        }
        report
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl Default for SignatureCache {
    fn default() -> Self {
        Self::new(crate::ExtractConfig::default().cache_capacity)
    }
}

impl std::fmt::Debug for SignatureCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SignatureCache")
            .field("stats", &self.stats())
            .finish()
    }
}
