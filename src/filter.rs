//! Page eligibility rules.
//!
//! Two independent predicates drive the traversal: whether a page gets its
//! own `<url>` entry, and whether the walk descends into its children. Both
//! are pure functions of the page and the run's [`FilterConfig`] snapshot.
//!
//! ## Rule order
//!
//! [`page_verdict`] applies its rules in a fixed order with first-match-wins
//! semantics; once a rule excludes a page no later rule is consulted:
//!
//! 1. error page
//! 2. unlisted and not the home page — unless the slug is in
//!    `include-unlisted-when-slug-is`, which cancels *this rule only*;
//!    the rescued page still runs the remaining checks
//! 3. template in `exclude-page-when-template-is`
//! 4. slug in `exclude-page-when-slug-is`
//! 5. content field `excludefromxmlsitemap` equal to the literal `"true"`
//! 6. supported-and-true `sunset` capability
//! 7. supported-and-true `embargo` capability
//!
//! Exclusion of a page suppresses its whole subtree (siblings continue).
//! [`children_included`] is separate: a page can keep its own entry while
//! its child *pages* are skipped; child *images* are still collected in
//! that case — see the generation walk for that asymmetry.

use crate::config::FilterConfig;
use crate::page::{Page, PageStatus};

/// Outcome of the eligibility check, carrying the deciding rule so debug
/// output can annotate why a page was kept or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Included,
    /// Unlisted page kept because its slug is in `include-unlisted-when-slug-is`.
    IncludedUnlisted,
    ErrorPage,
    Unlisted,
    TemplateExcluded,
    SlugExcluded,
    ContentFlag,
    Sunset,
    Embargo,
}

impl Verdict {
    pub fn included(self) -> bool {
        matches!(self, Verdict::Included | Verdict::IncludedUnlisted)
    }
}

/// Decide whether a page gets a `<url>` entry.
pub fn page_verdict(page: &Page, cfg: &FilterConfig) -> Verdict {
    if page.error_page {
        return Verdict::ErrorPage;
    }

    let mut rescued = false;
    if page.status == PageStatus::Unlisted && !page.home_page {
        if cfg.include_unlisted_slugs.contains(&page.slug) {
            rescued = true;
        } else {
            return Verdict::Unlisted;
        }
    }

    if cfg.exclude_page_templates.contains(&page.template) {
        return Verdict::TemplateExcluded;
    }

    if cfg.exclude_page_slugs.contains(&page.slug) {
        return Verdict::SlugExcluded;
    }

    if page.content.get("excludefromxmlsitemap") == Some("true") {
        return Verdict::ContentFlag;
    }

    if page.sunset == Some(true) {
        return Verdict::Sunset;
    }

    if page.embargo == Some(true) {
        return Verdict::Embargo;
    }

    if rescued {
        Verdict::IncludedUnlisted
    } else {
        Verdict::Included
    }
}

/// Decide whether the walk descends into a page's children.
///
/// When false, child pages are skipped but child images may still be
/// emitted by the walk.
pub fn children_included(page: &Page, cfg: &FilterConfig) -> bool {
    !cfg.exclude_children_templates.contains(&page.template)
}
