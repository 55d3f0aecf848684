//! # sitewright
//!
//! An XML sitemap generation engine for content-tree sites. The host (a
//! CMS, a static site generator, a test harness) hands the engine an
//! in-memory page tree; the engine hands back a complete sitemap document
//! with multi-language alternate links, image entries, per-page and global
//! exclusion rules, and an optional TTL-bounded result cache.
//!
//! It is deliberately *not* a crawler: no URL is ever fetched. Everything
//! the engine knows about a page arrives through the [`page::Page`] value
//! the host constructs.
//!
//! # Architecture
//!
//! One generation run flows through a small pipeline:
//!
//! ```text
//! cache::Sitemap        TTL cache keyed by a config fingerprint
//!   └─ generate::Generator   document shell + recursive walk
//!        ├─ filter        include this page? descend into children?
//!        ├─ lastmod       updatedat → date → record mtime → epoch
//!        └─ render        <url>, <loc>, alternates, <image:image>
//! ```
//!
//! The walk recurses over sibling collections in URL order, one full pass
//! per configured language in multi-language mode. All options are
//! snapshotted into an immutable [`config::FilterConfig`] at the start of
//! every run and threaded through the calls explicitly — there is no
//! process-wide state, so concurrent runs with different options cannot
//! leak into each other.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`page`] | The page tree model the host constructs (`Page`, `Site`, translations, images) |
//! | [`lang`] | Language set and per-pass language addressing |
//! | [`config`] | `ConfigProvider` trait, TOML reference provider, per-run `FilterConfig` snapshot |
//! | [`filter`] | Eligibility rules: page inclusion and child descent |
//! | [`lastmod`] | Last-modified resolution with per-variant fallback chain |
//! | [`generate`] | The traversal: document shell, language passes, homepage shim, debug annotations |
//! | [`cache`] | `ResultCache` trait, in-memory store, fingerprinting, the `Sitemap` front door |
//! | [`stylesheet`] | The bundled XSL asset and its override hook |
//!
//! # Design Decisions
//!
//! ## Hosts integrate through three seams
//!
//! A trait for options ([`config::ConfigProvider`]), a trait for the result
//! store ([`cache::ResultCache`]), and a plain data model for pages. The
//! engine ships working reference implementations of the first two
//! (TOML-backed options, an in-process TTL map) so the CLI and tests run
//! out of the box, but a CMS can plug in its own option registry and cache
//! backend without touching the core.
//!
//! ## Quirks are contract
//!
//! Two behaviors look like bugs and are not: a page whose template
//! suppresses its children still contributes those children's *images*
//! (inside its own `<url>` block), and the `x-default` alternate link
//! always uses the page's plain canonical URL instead of the
//! language-qualified one. Both shapes are load-bearing for downstream
//! consumers and are preserved exactly; see the `generate` and `render`
//! module docs.
//!
//! ## Degradation over failure
//!
//! Generation never fails on bad content: unparseable dates resolve to the
//! epoch through a fallback chain, missing translations fall back to the
//! untranslated base, absent options mean "rule off", and a broken cache
//! store behaves like a miss. The only hard error surface is the host
//! handing in invalid structure (e.g. a language set whose default is not
//! a member), which is rejected at construction.

pub mod cache;
pub mod config;
pub mod filter;
pub mod generate;
pub mod lang;
pub mod lastmod;
pub mod page;
mod render;
pub mod stylesheet;

#[cfg(test)]
pub(crate) mod test_helpers;
