//! Shared fixtures for the sitewright test suite.
//!
//! Pages are plain structs, so most tests build them with struct-update
//! syntax on top of these starting points.

use crate::lang::LanguageSet;
use crate::page::Page;

/// A listed page at `https://example.com/{path}` with the `default`
/// template. The last path segment becomes the slug, the rest the parent.
pub fn page(path: &str) -> Page {
    let (parent, slug) = match path.rsplit_once('/') {
        Some((parent, slug)) => (parent.to_string(), slug.to_string()),
        None => (String::new(), path.to_string()),
    };
    Page {
        slug,
        parent,
        url: format!("https://example.com/{path}"),
        template: "default".into(),
        ..Page::default()
    }
}

/// The two-language setup most multi-language tests use: `en` (default)
/// and `fr`.
pub fn en_fr() -> LanguageSet {
    LanguageSet::new(["en", "fr"], "en").unwrap()
}
