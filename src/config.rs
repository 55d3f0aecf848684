//! Option lookup and the per-run filter snapshot.
//!
//! The engine never reads configuration files itself; it asks a
//! [`ConfigProvider`] for namespaced options and snapshots them into an
//! immutable [`FilterConfig`] at the start of every generation run. The
//! snapshot is recomputed per call (it is cheap) and threaded explicitly
//! through the run, so concurrent runs with different options cannot leak
//! into each other.
//!
//! ## Option keys
//!
//! All options live under the `sitewright` namespace prefix:
//!
//! | key | type | effect |
//! |-----|------|--------|
//! | `disable` | string | `"true"` turns the engine off entirely |
//! | `cache-ttl` | string/int | result cache TTL in minutes; `0`/absent disables caching |
//! | `disable-images` | string | `"true"` drops all `<image:image>` blocks |
//! | `include-unlisted-when-slug-is` | list | unlisted pages with these slugs stay in |
//! | `exclude-children-when-template-is` | list | child pages of these templates are skipped |
//! | `exclude-page-when-template-is` | list | pages with these templates are dropped |
//! | `exclude-page-when-slug-is` | list | pages with these slugs are dropped |
//! | `homepage-shim` | string | `"true"` emits the synthetic multi-language homepage entry |
//! | `stylesheet` | string | path overriding the bundled XSL asset |
//!
//! Unknown or absent keys resolve to an absent value, never an error: every
//! filtering rule is opt-in by presence.
//!
//! ## Resolution order
//!
//! A provider resolves the aggregate-table form first, the discrete
//! dotted-key form second:
//!
//! ```toml
//! [sitewright]                            # aggregate form (wins)
//! cache-ttl = 10
//! exclude-page-when-slug-is = ["secret"]
//!
//! "sitewright.disable-images" = "true"    # discrete form
//! ```

use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Namespace prefix all engine options live under.
pub const CONFIG_PREFIX: &str = "sitewright";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Namespaced option lookup the host must provide.
///
/// Keys are given without the namespace prefix. Absent keys resolve to
/// `None`; providers must not fail lookups.
pub trait ConfigProvider {
    /// Scalar option as a string.
    fn string(&self, key: &str) -> Option<String>;
    /// List option as strings.
    fn list(&self, key: &str) -> Option<Vec<String>>;
}

/// Reference [`ConfigProvider`] over a parsed TOML document.
#[derive(Debug, Clone, Default)]
pub struct TomlProvider {
    root: toml::Table,
}

impl TomlProvider {
    pub fn new(root: toml::Table) -> Self {
        Self { root }
    }

    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        Ok(Self::new(text.parse::<toml::Table>()?))
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        Self::parse(&fs::read_to_string(path)?)
    }

    /// Aggregate `[sitewright]` table first, then the discrete
    /// `"sitewright.key"` top-level entry.
    fn lookup(&self, key: &str) -> Option<&toml::Value> {
        if let Some(value) = self
            .root
            .get(CONFIG_PREFIX)
            .and_then(|v| v.as_table())
            .and_then(|t| t.get(key))
        {
            return Some(value);
        }
        self.root.get(&format!("{CONFIG_PREFIX}.{key}"))
    }
}

impl ConfigProvider for TomlProvider {
    fn string(&self, key: &str) -> Option<String> {
        scalar_to_string(self.lookup(key)?)
    }

    fn list(&self, key: &str) -> Option<Vec<String>> {
        let items = self.lookup(key)?.as_array()?;
        Some(items.iter().filter_map(scalar_to_string).collect())
    }
}

fn scalar_to_string(value: &toml::Value) -> Option<String> {
    match value {
        toml::Value::String(s) => Some(s.clone()),
        toml::Value::Integer(n) => Some(n.to_string()),
        toml::Value::Float(f) => Some(f.to_string()),
        toml::Value::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Whether the engine is enabled at all. The host decides what to serve
/// when it is not.
pub fn enabled(provider: &impl ConfigProvider) -> bool {
    provider.string("disable").as_deref() != Some("true")
}

/// True for `"true"` or `"1"`.
fn flag(provider: &impl ConfigProvider, key: &str) -> bool {
    matches!(provider.string(key).as_deref(), Some("true") | Some("1"))
}

/// Immutable snapshot of all options affecting one generation run.
///
/// Serializes canonically (field order is fixed) so the cache fingerprint
/// can be computed over it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterConfig {
    /// Cache TTL in minutes. Zero disables the result cache.
    pub cache_ttl: u64,
    /// Include `<image:image>` blocks.
    pub images: bool,
    /// Slugs that keep an unlisted page in the sitemap.
    pub include_unlisted_slugs: Vec<String>,
    /// Templates whose child pages are skipped (their images are not).
    pub exclude_children_templates: Vec<String>,
    /// Templates excluding a page outright.
    pub exclude_page_templates: Vec<String>,
    /// Slugs excluding a page outright.
    pub exclude_page_slugs: Vec<String>,
    /// Emit the synthetic homepage entry in multi-language mode.
    pub homepage_shim: bool,
}

impl FilterConfig {
    /// Snapshot the provider's current option values.
    pub fn from_provider(provider: &impl ConfigProvider) -> Self {
        Self {
            cache_ttl: provider
                .string("cache-ttl")
                .and_then(|s| s.trim().parse().ok())
                .unwrap_or(0),
            images: !flag(provider, "disable-images"),
            include_unlisted_slugs: provider
                .list("include-unlisted-when-slug-is")
                .unwrap_or_default(),
            exclude_children_templates: provider
                .list("exclude-children-when-template-is")
                .unwrap_or_default(),
            exclude_page_templates: provider
                .list("exclude-page-when-template-is")
                .unwrap_or_default(),
            exclude_page_slugs: provider
                .list("exclude-page-when-slug-is")
                .unwrap_or_default(),
            homepage_shim: flag(provider, "homepage-shim"),
        }
    }
}
