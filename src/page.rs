//! The in-memory page tree the engine consumes.
//!
//! The engine is not a crawler: the host (a CMS, a static site generator, a
//! test fixture) hands it a fully materialized tree of [`Page`] values and
//! gets XML back. These types are serde-serializable so a tree can also be
//! loaded from a JSON site manifest (see [`Site`]), mirroring how the build
//! pipeline passes structured data between stages.
//!
//! ## Content variants
//!
//! Every page carries untranslated base content (`content`, `modified`) plus
//! zero or more [`Translation`] variants. Lookups go through
//! [`Page::content_for`] / [`Page::modified_for`] with an optional language
//! code: `None` addresses the base variant, `Some(code)` a translation.
//! A missing translation degrades to the base fields rather than failing —
//! corrupted or absent translation data is never an error.
//!
//! ## Optional capabilities
//!
//! Some hosts can answer "is this page sunset?" or "is this page under
//! embargo?"; most cannot. These are modeled as `Option<bool>` extension
//! fields: `None` means the capability is not supported and the
//! corresponding filter rule does not apply.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::lang::LanguageSet;

/// Visibility status of a page within the content tree.
///
/// `Draft` exists for model fidelity only: hosts are expected to keep drafts
/// out of the collections they pass in, so no filter rule consults it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageStatus {
    #[default]
    Listed,
    Unlisted,
    Draft,
}

impl std::fmt::Display for PageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            PageStatus::Listed => "listed",
            PageStatus::Unlisted => "unlisted",
            PageStatus::Draft => "draft",
        })
    }
}

/// Raw content fields of one variant, keyed by field name.
///
/// Field names are conventionally lowercase (`updatedat`, `date`,
/// `excludefromxmlsitemap`); lookups are exact-match.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, String>);

impl Fields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn has(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Fields {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One translated variant of a page's content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Translation {
    /// Language code this variant belongs to (e.g. `"fr"`).
    pub code: String,
    /// Content fields of this variant.
    #[serde(default)]
    pub fields: Fields,
    /// Modification time of the backing content record, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
}

/// An image attached to a page, addressed by its public URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageRef {
    pub url: String,
}

/// A single page in the content tree.
///
/// Children are owned: a page's subtree is only reachable through it, so a
/// page excluded from traversal takes its descendants with it (their images
/// being the one documented exception, see the generation walk).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Final path segment identifying the page.
    pub slug: String,
    /// Parent path, for diagnostics only. Empty for root-level pages.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub parent: String,
    /// Canonical URL.
    pub url: String,
    /// Per-language URLs, keyed by language code.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub language_urls: BTreeMap<String, String>,
    #[serde(default)]
    pub status: PageStatus,
    /// Error pages never appear in the sitemap.
    #[serde(default)]
    pub error_page: bool,
    /// The home page is exempt from the unlisted exclusion.
    #[serde(default)]
    pub home_page: bool,
    /// Template identifier the page is configured to render with,
    /// independent of whether that template exists.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub template: String,
    /// Untranslated base content fields.
    #[serde(default)]
    pub content: Fields,
    /// Modification time of the base content record, when one exists.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modified: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<Translation>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageRef>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Page>,
    /// Optional capability: page retired after a sunset date.
    /// `None` = the host does not support this check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunset: Option<bool>,
    /// Optional capability: page under publication embargo.
    /// `None` = the host does not support this check.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embargo: Option<bool>,
}

impl Page {
    /// Content fields of a variant: `None` addresses the base content,
    /// `Some(code)` a translation. A missing translation falls back to the
    /// base fields.
    pub fn content_for(&self, code: Option<&str>) -> &Fields {
        match code {
            Some(code) => self
                .translation(code)
                .map(|t| &t.fields)
                .unwrap_or(&self.content),
            None => &self.content,
        }
    }

    /// Modification time of a variant's backing content record. Unlike
    /// [`content_for`](Self::content_for) there is no base fallback: a
    /// missing translation has no record of its own.
    pub fn modified_for(&self, code: Option<&str>) -> Option<DateTime<Utc>> {
        match code {
            Some(code) => self.translation(code).and_then(|t| t.modified),
            None => self.modified,
        }
    }

    pub fn translation(&self, code: &str) -> Option<&Translation> {
        self.translations.iter().find(|t| t.code == code)
    }

    /// URL of the page in the given language, falling back to the canonical
    /// URL when no language-specific URL is recorded.
    pub fn url_for_language(&self, code: &str) -> &str {
        self.language_urls
            .get(code)
            .map(String::as_str)
            .unwrap_or(&self.url)
    }

    /// Diagnostic path: `parent/slug`, or just the slug at root level.
    pub fn path(&self) -> String {
        if self.parent.is_empty() {
            self.slug.clone()
        } else {
            format!("{}/{}", self.parent, self.slug)
        }
    }
}

/// A site manifest: the root page collection plus the optional language set.
///
/// This is the JSON document the CLI consumes; hosts embedding the engine
/// can construct the parts directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub languages: Option<LanguageSet>,
    #[serde(default)]
    pub pages: Vec<Page>,
}
