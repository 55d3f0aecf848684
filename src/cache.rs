//! Result caching around the generation walk.
//!
//! The tree walk is the expensive part of serving a sitemap, so the
//! rendered document can be kept in a TTL-bounded [`ResultCache`] keyed by
//! a fingerprint of everything that affects the output.
//!
//! ## Fingerprint
//!
//! The cache key is a SHA-256 over the crate version, the canonical JSON
//! serialization of the full [`FilterConfig`] snapshot, and the debug flag.
//! Any option change produces a fresh key (reverting it restores potential
//! hits until the TTL runs out), a crate upgrade invalidates everything,
//! and debug and non-debug documents cache independently.
//!
//! ## Concurrency
//!
//! Two requests racing on the same cold key may both regenerate; both write
//! the same bytes, so no lock is taken around the miss path. The store
//! itself must tolerate concurrent readers and writers — [`MemoryCache`]
//! does so with an `RwLock`.
//!
//! ## Failure
//!
//! A failing store behaves like a miss: generation always proceeds, the
//! result is simply not reused. Store problems are never fatal.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::time::{Duration, Instant};
use tracing::debug;

use crate::config::{self, ConfigProvider, FilterConfig};
use crate::generate::Generator;
use crate::lang::LanguageSet;
use crate::page::Page;

/// Key-value store for rendered documents with TTL expiry.
///
/// Lookups must not fail: an unavailable store returns `None` and the
/// caller regenerates.
pub trait ResultCache {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str, ttl: Duration);
    /// When the entry under `key` expires, for debug introspection.
    fn expires_at(&self, key: &str) -> Option<DateTime<Utc>>;
}

impl<T: ResultCache + ?Sized> ResultCache for &T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        (**self).set(key, value, ttl)
    }

    fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        (**self).expires_at(key)
    }
}

#[derive(Debug)]
struct CacheEntry {
    value: String,
    expires_at: DateTime<Utc>,
}

/// Reference in-process [`ResultCache`]. Expired entries are treated as
/// absent on read and overwritten on the next write.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: RwLock<HashMap<String, CacheEntry>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

fn expiry_for(ttl: Duration) -> DateTime<Utc> {
    Utc::now()
        .checked_add_signed(TimeDelta::from_std(ttl).unwrap_or(TimeDelta::MAX))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl ResultCache for MemoryCache {
    fn get(&self, key: &str) -> Option<String> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if entry.expires_at <= Utc::now() {
            return None;
        }
        Some(entry.value.clone())
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) {
        self.entries.write().insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: expiry_for(ttl),
            },
        );
    }

    fn expires_at(&self, key: &str) -> Option<DateTime<Utc>> {
        self.entries.read().get(key).map(|e| e.expires_at)
    }
}

/// Cache key for one option snapshot + debug flag under the current crate
/// version.
pub fn fingerprint(cfg: &FilterConfig, debug: bool) -> String {
    let mut hasher = Sha256::new();
    hasher.update(env!("CARGO_PKG_VERSION").as_bytes());
    hasher.update(b"\0");
    hasher.update(serde_json::to_string(cfg).unwrap_or_default().as_bytes());
    hasher.update(b"\0");
    hasher.update(if debug { b"\x01" } else { b"\x00" });
    format!("{:x}", hasher.finalize())
}

/// The engine's front door: a fingerprinted, TTL-bounded cache wrapped
/// around the [`Generator`].
///
/// Options are re-read from the provider on every call; the language set
/// is fixed at construction (it is part of the site, not of the options).
pub struct Sitemap<P, C> {
    provider: P,
    cache: C,
    languages: Option<LanguageSet>,
}

impl<P: ConfigProvider, C: ResultCache> Sitemap<P, C> {
    pub fn new(provider: P, cache: C) -> Self {
        Self {
            provider,
            cache,
            languages: None,
        }
    }

    /// Activate multi-language generation.
    pub fn with_languages(mut self, languages: LanguageSet) -> Self {
        self.languages = Some(languages);
        self
    }

    /// Whether the engine is switched on at all (`disable` option).
    pub fn enabled(&self) -> bool {
        config::enabled(&self.provider)
    }

    /// Produce the sitemap document for a root page collection, consulting
    /// the cache when a TTL is configured.
    pub fn document(&self, pages: &[Page], debug: bool) -> String {
        let started = Instant::now();
        let cfg = FilterConfig::from_provider(&self.provider);
        let generator = Generator::new(&cfg, self.languages.as_ref(), debug);

        let mut doc;
        if cfg.cache_ttl == 0 {
            doc = generator.document(pages);
            if debug {
                doc.push_str("<!-- freshly generated; caching disabled -->\n");
            }
        } else {
            let key = fingerprint(&cfg, debug);
            match self.cache.get(&key) {
                Some(cached) => {
                    debug!(%key, "sitemap cache hit");
                    doc = cached;
                    if debug {
                        let countdown = self
                            .cache
                            .expires_at(&key)
                            .map(|at| (at - Utc::now()).num_seconds())
                            .unwrap_or(0);
                        doc.push_str(&format!(
                            "<!-- retrieved {key} from cache; expires in {countdown} seconds -->\n"
                        ));
                    }
                }
                None => {
                    debug!(%key, ttl_minutes = cfg.cache_ttl, "sitemap cache miss");
                    doc = generator.document(pages);
                    self.cache
                        .set(&key, &doc, Duration::from_secs(cfg.cache_ttl * 60));
                    if debug {
                        doc.push_str(&format!(
                            "<!-- freshly generated; cached as {key} for {} minute(s) -->\n",
                            cfg.cache_ttl
                        ));
                    }
                }
            }
        }

        if debug {
            doc.push_str(&format!(
                "<!-- in total {} us -->\n",
                started.elapsed().as_micros()
            ));
        }
        doc
    }
}
