//! Language set and per-pass language addressing.
//!
//! Multi-language generation runs the full traversal once per configured
//! language. The default language's pass is special: language-specific URL
//! resolution is known to misbehave for the default language in some hosts,
//! so that pass is marked with a dedicated [`LanguagePass::Primary`] variant
//! instead of its code, and resolves URLs and content through the page's
//! untranslated base. The original engine used a `"--"` string sentinel for
//! this; an enum makes the three modes impossible to confuse.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum LanguageError {
    #[error("language set must contain at least one code")]
    Empty,
    #[error("default language '{0}' is not in the language set")]
    UnknownDefault(String),
}

/// Ordered set of site language codes with a designated default.
///
/// Invariant: non-empty, and the default code is a member. Enforced at
/// construction and on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLanguageSet", into = "RawLanguageSet")]
pub struct LanguageSet {
    codes: Vec<String>,
    default: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawLanguageSet {
    codes: Vec<String>,
    default: String,
}

impl TryFrom<RawLanguageSet> for LanguageSet {
    type Error = LanguageError;

    fn try_from(raw: RawLanguageSet) -> Result<Self, Self::Error> {
        LanguageSet::new(raw.codes, raw.default)
    }
}

impl From<LanguageSet> for RawLanguageSet {
    fn from(set: LanguageSet) -> Self {
        Self {
            codes: set.codes,
            default: set.default,
        }
    }
}

impl LanguageSet {
    pub fn new(
        codes: impl IntoIterator<Item = impl Into<String>>,
        default: impl Into<String>,
    ) -> Result<Self, LanguageError> {
        let codes: Vec<String> = codes.into_iter().map(Into::into).collect();
        let default = default.into();
        if codes.is_empty() {
            return Err(LanguageError::Empty);
        }
        if !codes.contains(&default) {
            return Err(LanguageError::UnknownDefault(default));
        }
        Ok(Self { codes, default })
    }

    /// All language codes, in configuration order.
    pub fn codes(&self) -> &[String] {
        &self.codes
    }

    pub fn default_code(&self) -> &str {
        &self.default
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// The traversal pass for a given code: [`LanguagePass::Primary`] for
    /// the default language, [`LanguagePass::Secondary`] otherwise.
    pub fn pass_for<'a>(&self, code: &'a str) -> LanguagePass<'a> {
        if code == self.default {
            LanguagePass::Primary
        } else {
            LanguagePass::Secondary(code)
        }
    }
}

/// Which language a traversal pass addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguagePass<'a> {
    /// Single-language site; no alternate links are emitted.
    Single,
    /// The default language's pass on a multi-language site. Resolves
    /// through the page's untranslated base content and canonical URL.
    Primary,
    /// A secondary language's pass.
    Secondary(&'a str),
}

impl<'a> LanguagePass<'a> {
    /// The content-variant code this pass reads from: `Some(code)` only for
    /// secondary languages. Both `Single` and `Primary` address the
    /// untranslated base variant.
    pub fn content_code(&self) -> Option<&'a str> {
        match self {
            LanguagePass::Secondary(code) => Some(code),
            _ => None,
        }
    }

    pub fn is_secondary(&self) -> bool {
        matches!(self, LanguagePass::Secondary(_))
    }
}
