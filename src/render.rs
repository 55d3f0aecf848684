//! XML fragment emission for sitemap entries.
//!
//! Fragments are written into an explicit output buffer threaded through
//! the traversal — no shared mutable state between sibling recursive calls.
//! The walk in [`generate`](crate::generate) decides *what* to emit; this
//! module only knows how one page becomes markup.
//!
//! ## Alternate-link protocol
//!
//! In multi-language mode every entry carries, on every language pass, an
//! `x-default` link followed by one link per configured language. The
//! duplication across passes is deliberate and load-bearing for consumers.
//! The `x-default` href is always the page's *plain canonical URL*: routing
//! a default-language URL through the language-specific resolver is known
//! to produce wrong URLs in some hosts, so it is never done here. The
//! per-language links do use the language-specific URLs.

use chrono::{DateTime, SecondsFormat, Utc};
use std::borrow::Cow;

use crate::lang::{LanguagePass, LanguageSet};
use crate::page::Page;

/// Escape a value for use in XML text content or a quoted attribute.
pub(crate) fn escape(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"']) {
        return Cow::Borrowed(text);
    }
    let mut escaped = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    Cow::Owned(escaped)
}

/// Format an instant the way `<lastmod>` wants it: RFC-3339 with a numeric
/// offset, e.g. `2020-06-01T12:30:00+00:00`.
pub(crate) fn format_lastmod(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Secs, false)
}

/// The `<loc>` URL for a pass. Secondary passes resolve the language URL;
/// the primary pass and single-language mode use the canonical URL.
fn loc_url<'a>(page: &'a Page, pass: LanguagePass) -> &'a str {
    match pass {
        LanguagePass::Secondary(code) => page.url_for_language(code),
        LanguagePass::Single | LanguagePass::Primary => &page.url,
    }
}

/// Write the `x-default` link plus one alternate link per configured
/// language.
pub(crate) fn alternates(out: &mut String, page: &Page, languages: &LanguageSet) {
    out.push_str(&format!(
        "  <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"{}\" />\n",
        escape(&page.url)
    ));
    for code in languages.codes() {
        out.push_str(&format!(
            "  <xhtml:link rel=\"alternate\" hreflang=\"{}\" href=\"{}\" />\n",
            escape(code),
            escape(page.url_for_language(code))
        ));
    }
}

/// Open a page's `<url>` element: `<loc>`, alternates (multi-language
/// only), `<lastmod>`. The caller emits images and closes the element.
pub(crate) fn entry_head(
    out: &mut String,
    page: &Page,
    pass: LanguagePass,
    languages: Option<&LanguageSet>,
    lastmod: DateTime<Utc>,
) {
    out.push_str("<url>\n");
    out.push_str(&format!("  <loc>{}</loc>\n", escape(loc_url(page, pass))));
    if pass != LanguagePass::Single
        && let Some(languages) = languages
    {
        alternates(out, page, languages);
    }
    out.push_str(&format!("  <lastmod>{}</lastmod>\n", format_lastmod(lastmod)));
}

pub(crate) fn entry_close(out: &mut String) {
    out.push_str("</url>\n");
}

/// One `<image:image>` block per image of the page.
pub(crate) fn page_images(out: &mut String, page: &Page) {
    for image in &page.images {
        out.push_str("  <image:image>\n");
        out.push_str(&format!("    <image:loc>{}</image:loc>\n", escape(&image.url)));
        out.push_str("  </image:image>\n");
    }
}

/// The synthetic homepage entry emitted ahead of the language passes when
/// the homepage shim is enabled: location plus alternates, no `<lastmod>`,
/// no images.
pub(crate) fn homepage_entry(out: &mut String, home: &Page, languages: &LanguageSet) {
    out.push_str("<url>\n");
    out.push_str(&format!("  <loc>{}</loc>\n", escape(&home.url)));
    alternates(out, home, languages);
    entry_close(out);
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn multilang() -> LanguageSet {
        LanguageSet::new(["en", "fr"], "en").unwrap()
    }

    fn page() -> Page {
        Page {
            slug: "about".into(),
            url: "https://example.com/about".into(),
            language_urls: BTreeMap::from([
                ("en".to_string(), "https://example.com/en/about".to_string()),
                ("fr".to_string(), "https://example.com/fr/a-propos".to_string()),
            ]),
            ..Page::default()
        }
    }

    // =========================================================================
    // Escaping and formatting
    // =========================================================================

    #[test]
    fn escape_passes_clean_text_through_borrowed() {
        assert!(matches!(escape("https://example.com/a"), Cow::Borrowed(_)));
    }

    #[test]
    fn escape_replaces_specials() {
        assert_eq!(
            escape(r#"a&b<c>d"e"#),
            "a&amp;b&lt;c&gt;d&quot;e".to_string()
        );
    }

    #[test]
    fn lastmod_format_has_numeric_offset() {
        assert_eq!(
            format_lastmod(DateTime::UNIX_EPOCH),
            "1970-01-01T00:00:00+00:00"
        );
    }

    // =========================================================================
    // Entry head
    // =========================================================================

    #[test]
    fn single_language_entry_has_no_alternates() {
        let mut out = String::new();
        entry_head(
            &mut out,
            &page(),
            LanguagePass::Single,
            None,
            DateTime::UNIX_EPOCH,
        );
        entry_close(&mut out);
        let expected = "<url>\n  <loc>https://example.com/about</loc>\n  <lastmod>1970-01-01T00:00:00+00:00</lastmod>\n</url>\n";
        assert_eq!(out, expected);
    }

    #[test]
    fn primary_pass_uses_canonical_loc() {
        let mut out = String::new();
        let languages = multilang();
        entry_head(
            &mut out,
            &page(),
            LanguagePass::Primary,
            Some(&languages),
            DateTime::UNIX_EPOCH,
        );
        assert!(out.contains("<loc>https://example.com/about</loc>"));
    }

    #[test]
    fn secondary_pass_uses_language_loc() {
        let mut out = String::new();
        let languages = multilang();
        entry_head(
            &mut out,
            &page(),
            LanguagePass::Secondary("fr"),
            Some(&languages),
            DateTime::UNIX_EPOCH,
        );
        assert!(out.contains("<loc>https://example.com/fr/a-propos</loc>"));
    }

    // =========================================================================
    // Alternates
    // =========================================================================

    #[test]
    fn alternates_emit_x_default_plus_one_per_language() {
        let mut out = String::new();
        alternates(&mut out, &page(), &multilang());
        let expected = "\
  <xhtml:link rel=\"alternate\" hreflang=\"x-default\" href=\"https://example.com/about\" />
  <xhtml:link rel=\"alternate\" hreflang=\"en\" href=\"https://example.com/en/about\" />
  <xhtml:link rel=\"alternate\" hreflang=\"fr\" href=\"https://example.com/fr/a-propos\" />
";
        assert_eq!(out, expected);
    }

    #[test]
    fn x_default_never_uses_language_urls() {
        // Even with a recorded URL for the default language, x-default must
        // point at the plain canonical URL.
        let mut out = String::new();
        alternates(&mut out, &page(), &multilang());
        assert!(out.contains("hreflang=\"x-default\" href=\"https://example.com/about\""));
    }

    // =========================================================================
    // Images and shim
    // =========================================================================

    #[test]
    fn image_blocks() {
        let mut p = page();
        p.images = vec![
            crate::page::ImageRef {
                url: "https://example.com/a.jpg".into(),
            },
            crate::page::ImageRef {
                url: "https://example.com/b.jpg".into(),
            },
        ];
        let mut out = String::new();
        page_images(&mut out, &p);
        assert_eq!(out.matches("<image:image>").count(), 2);
        assert!(out.contains("    <image:loc>https://example.com/a.jpg</image:loc>\n"));
    }

    #[test]
    fn homepage_entry_has_no_lastmod() {
        let mut out = String::new();
        homepage_entry(&mut out, &page(), &multilang());
        assert!(out.starts_with("<url>\n  <loc>https://example.com/about</loc>\n"));
        assert!(out.ends_with("</url>\n"));
        assert!(!out.contains("<lastmod>"));
        assert_eq!(out.matches("<xhtml:link").count(), 3);
    }
}
