//! End-to-end tests over the public API: manifest in, document out.

use sitewright::cache::{MemoryCache, Sitemap};
use sitewright::config::TomlProvider;
use sitewright::lang::LanguageSet;
use sitewright::page::{ImageRef, Page, PageStatus};

fn page(path: &str) -> Page {
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

fn sitemap(options: &str) -> Sitemap<TomlProvider, MemoryCache> {
    Sitemap::new(TomlProvider::parse(options).unwrap(), MemoryCache::new())
}

// =============================================================================
// Golden document
// =============================================================================

#[test]
fn single_language_document_matches_expected_bytes() {
    let mut home = page("");
    home.slug = "home".into();
    home.url = "https://example.com/".into();
    home.home_page = true;
    home.content.set("updatedat", "2026-01-15");
    home.images = vec![ImageRef {
        url: "https://example.com/hero.jpg".into(),
    }];

    let mut about = page("about");
    about.content.set("date", "2025-03-10");

    let doc = sitemap("").document(&[about, home], false);

    let expected = concat!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n",
        "<?xml-stylesheet type=\"text/xsl\" href=\"/sitemap.xsl\"?>\n",
        "<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"",
        " xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\">\n",
        "<url>\n",
        "  <loc>https://example.com/</loc>\n",
        "  <lastmod>2026-01-15T00:00:00+00:00</lastmod>\n",
        "  <image:image>\n",
        "    <image:loc>https://example.com/hero.jpg</image:loc>\n",
        "  </image:image>\n",
        "</url>\n",
        "<url>\n",
        "  <loc>https://example.com/about</loc>\n",
        "  <lastmod>2025-03-10T00:00:00+00:00</lastmod>\n",
        "</url>\n",
        "</urlset>\n",
        "<!-- Sitemap generated by sitewright (https://github.com/arthur-debert/sitewright) -->\n",
    );
    assert_eq!(doc, expected);
}

// =============================================================================
// Filtering end to end
// =============================================================================

#[test]
fn error_page_dropped_siblings_survive() {
    let mut error = page("error");
    error.error_page = true;
    let doc = sitemap("").document(&[error, page("about")], false);
    assert!(!doc.contains("/error"));
    assert!(doc.contains("<loc>https://example.com/about</loc>"));
}

#[test]
fn unlisted_rescue_by_slug_list() {
    let mut hidden = page("campaign");
    hidden.status = PageStatus::Unlisted;

    let excluded = sitemap("").document(std::slice::from_ref(&hidden), false);
    assert!(!excluded.contains("<loc>"));

    let options = "[sitewright]\ninclude-unlisted-when-slug-is = [\"campaign\"]\n";
    let included = sitemap(options).document(&[hidden], false);
    assert!(included.contains("<loc>https://example.com/campaign</loc>"));
}

#[test]
fn content_flag_excludes_independently_of_lists() {
    let mut p = page("about");
    p.content.set("excludefromxmlsitemap", "true");
    let doc = sitemap("").document(&[p], false);
    assert!(!doc.contains("<loc>"));
}

#[test]
fn child_suppression_keeps_child_images() {
    let mut child = page("portfolio/shoot");
    child.images = vec![ImageRef {
        url: "https://example.com/shoot/01.jpg".into(),
    }];
    let mut parent = page("portfolio");
    parent.template = "portfolio".into();
    parent.children = vec![child];

    let options = "[sitewright]\nexclude-children-when-template-is = [\"portfolio\"]\n";
    let doc = sitemap(options).document(&[parent], false);

    assert!(doc.contains("<loc>https://example.com/portfolio</loc>"));
    assert!(!doc.contains("<loc>https://example.com/portfolio/shoot</loc>"));
    assert!(doc.contains("<image:loc>https://example.com/shoot/01.jpg</image:loc>"));
}

// =============================================================================
// Multi-language end to end
// =============================================================================

#[test]
fn two_languages_duplicate_entries_with_full_alternate_blocks() {
    let languages = LanguageSet::new(["en", "fr"], "en").unwrap();
    let mut p = page("about");
    p.language_urls
        .insert("fr".into(), "https://example.com/fr/a-propos".into());

    let doc = sitemap("")
        .with_languages(languages)
        .document(&[p], false);

    // One entry per language pass.
    assert_eq!(doc.matches("<url>").count(), 2);
    assert!(doc.contains("<loc>https://example.com/about</loc>"));
    assert!(doc.contains("<loc>https://example.com/fr/a-propos</loc>"));

    // Every entry carries x-default plus one link per language, even the
    // default language's own entry.
    assert_eq!(doc.matches("hreflang=\"x-default\"").count(), 2);
    assert_eq!(doc.matches("hreflang=\"en\"").count(), 2);
    assert_eq!(doc.matches("hreflang=\"fr\"").count(), 2);

    // x-default always points at the plain canonical URL.
    assert_eq!(
        doc.matches("hreflang=\"x-default\" href=\"https://example.com/about\"")
            .count(),
        2
    );
}

#[test]
fn homepage_shim_adds_single_leading_entry() {
    let languages = LanguageSet::new(["en", "fr"], "en").unwrap();
    let mut home = page("");
    home.slug = "home".into();
    home.url = "https://example.com/".into();
    home.home_page = true;
    home.language_urls
        .insert("fr".into(), "https://example.com/fr".into());

    let options = "[sitewright]\nhomepage-shim = \"true\"\n";
    let doc = sitemap(options)
        .with_languages(languages)
        .document(&[home], false);

    // Shim entry plus one real entry per pass; the shim has no lastmod.
    assert_eq!(doc.matches("<url>").count(), 3);
    assert_eq!(doc.matches("<lastmod>").count(), 2);
}

// =============================================================================
// Lastmod end to end
// =============================================================================

#[test]
fn record_mtime_formats_into_lastmod() {
    let mut p = page("about");
    p.modified = chrono::DateTime::parse_from_rfc3339("2024-11-30T08:15:00+00:00")
        .map(|t| t.to_utc())
        .ok();
    let doc = sitemap("").document(&[p], false);
    assert!(doc.contains("<lastmod>2024-11-30T08:15:00+00:00</lastmod>"));
}

#[test]
fn no_sources_resolve_to_epoch() {
    let doc = sitemap("").document(&[page("about")], false);
    assert!(doc.contains("<lastmod>1970-01-01T00:00:00+00:00</lastmod>"));
}

// =============================================================================
// Cache behavior
// =============================================================================

#[test]
fn disabled_cache_is_byte_stable() {
    let pages = vec![page("b"), page("a")];
    let s = sitemap("");
    assert_eq!(s.document(&pages, false), s.document(&pages, false));
}

#[test]
fn cached_document_survives_tree_changes_until_options_change() {
    let options = "[sitewright]\ncache-ttl = 10\n";
    let s = sitemap(options);
    let first = s.document(&[page("a")], false);

    // Same options: the stale cached document is served even though the
    // tree differs — that is the cache contract.
    let second = s.document(&[page("a"), page("b")], false);
    assert_eq!(first, second);

    // Changed options produce a fresh fingerprint and a fresh document.
    let changed = "[sitewright]\ncache-ttl = 10\nexclude-page-when-slug-is = [\"none\"]\n";
    let third = sitemap(changed).document(&[page("a"), page("b")], false);
    assert!(third.contains("<loc>https://example.com/b</loc>"));
}

#[test]
fn debug_comments_do_not_leak_into_non_debug_documents() {
    let options = "[sitewright]\ncache-ttl = 10\n";
    let s = sitemap(options);
    let debug_doc = s.document(&[page("a")], true);
    let plain_doc = s.document(&[page("a")], false);
    assert!(debug_doc.contains("<!-- considering"));
    assert_eq!(plain_doc.matches("<!--").count(), 1);
}
