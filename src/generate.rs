//! Sitemap document generation.
//!
//! [`Generator`] owns one run: it takes the immutable [`FilterConfig`]
//! snapshot, the optional language set, and the debug flag, and turns a
//! root page collection into the complete XML document. All state is
//! threaded through the call explicitly — two concurrent runs with
//! different options cannot observe each other.
//!
//! ## The walk
//!
//! Within each sibling collection pages are visited in URL-ascending order.
//! An excluded page takes its subtree with it; siblings continue. An
//! included page is serialized, then the walk descends into its children —
//! unless the page's template is in `exclude-children-when-template-is`,
//! in which case the child *pages* are dropped but their *images* are
//! still emitted (inside the parent's `<url>` block, with no `<url>`
//! wrappers of their own, and without descending further). That asymmetry
//! is deliberate; consumers depend on the exact output shape.
//!
//! ## Language passes
//!
//! With a language set active the whole traversal runs once per configured
//! language, in configuration order. The default language's pass uses
//! [`LanguagePass::Primary`] so URL and content resolution stay on the
//! untranslated base. Before the passes, an optional homepage shim entry
//! points language-sniffing crawlers at the localized home pages.
//!
//! ## Debug annotations
//!
//! With the debug flag set, the document carries HTML comments tracing
//! every decision: the option snapshot, each page considered and why it
//! was kept or dropped, per-language pass markers, timing. They are
//! advisory output for humans, never data.

use chrono::{SecondsFormat, Utc};
use std::time::Instant;

use crate::config::FilterConfig;
use crate::filter::{self, Verdict};
use crate::lang::{LanguagePass, LanguageSet};
use crate::lastmod;
use crate::page::Page;
use crate::render;

/// Appended to every document, debug or not.
const ATTRIBUTION: &str =
    "<!-- Sitemap generated by sitewright (https://github.com/arthur-debert/sitewright) -->\n";

/// One generation run over a page tree.
pub struct Generator<'a> {
    cfg: &'a FilterConfig,
    languages: Option<&'a LanguageSet>,
    debug: bool,
}

impl<'a> Generator<'a> {
    pub fn new(cfg: &'a FilterConfig, languages: Option<&'a LanguageSet>, debug: bool) -> Self {
        Self {
            cfg,
            languages,
            debug,
        }
    }

    /// Generate the complete sitemap document for a root page collection.
    pub fn document(&self, pages: &[Page]) -> String {
        let started = Instant::now();
        let mut out = String::new();

        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        out.push_str("<?xml-stylesheet type=\"text/xsl\" href=\"/sitemap.xsl\"?>\n");
        out.push_str("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\"");
        if self.languages.is_some() {
            out.push_str(" xmlns:xhtml=\"http://www.w3.org/1999/xhtml\"");
        }
        if self.cfg.images {
            out.push_str(" xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\"");
        }
        out.push_str(">\n");

        if self.debug {
            self.dump_options(&mut out);
        }

        match self.languages {
            Some(languages) => {
                if self.debug {
                    self.comment(
                        &mut out,
                        &format!(
                            "multi-language: {} languages {:?}, default '{}'",
                            languages.len(),
                            languages.codes(),
                            languages.default_code()
                        ),
                    );
                }

                if self.cfg.homepage_shim {
                    self.homepage_shim(&mut out, pages, languages);
                }

                for code in languages.codes() {
                    let pass = languages.pass_for(code);
                    if self.debug {
                        let marker = if pass == LanguagePass::Primary {
                            " (default)"
                        } else {
                            ""
                        };
                        self.comment(&mut out, &format!("language pass: {code}{marker}"));
                    }
                    self.walk(&mut out, pages, pass, 1);
                }
            }
            None => {
                self.comment(&mut out, "single-language");
                self.walk(&mut out, pages, LanguagePass::Single, 1);
            }
        }

        out.push_str("</urlset>\n");
        out.push_str(ATTRIBUTION);

        if self.debug {
            self.comment(&mut out, concat!("v", env!("CARGO_PKG_VERSION")));
            self.comment(
                &mut out,
                &format!("generation took {} us", started.elapsed().as_micros()),
            );
            self.comment(
                &mut out,
                &format!(
                    "generated at {}",
                    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, false)
                ),
            );
        }

        out
    }

    /// Recursive traversal of one sibling collection for one language pass.
    fn walk(&self, out: &mut String, pages: &[Page], pass: LanguagePass<'a>, depth: usize) {
        let mut ordered: Vec<&Page> = pages.iter().collect();
        ordered.sort_by(|a, b| a.url.cmp(&b.url));

        for page in ordered {
            if self.debug {
                let home = if page.home_page { " (home)" } else { "" };
                self.comment(
                    out,
                    &format!(
                        "considering {} [template={} status={} depth={}]{}",
                        page.path(),
                        page.template,
                        page.status,
                        depth,
                        home
                    ),
                );
                self.title_comment(out, page, pass);
            }

            let verdict = filter::page_verdict(page, self.cfg);
            if let Some(note) = exclusion_note(page, verdict) {
                self.comment(out, &note);
                continue;
            }
            if verdict == Verdict::IncludedUnlisted {
                self.comment(
                    out,
                    "keeping: unlisted but slug in include-unlisted-when-slug-is",
                );
            }

            let lastmod = lastmod::resolve(page, pass);
            render::entry_head(out, page, pass, self.languages, lastmod);
            if self.cfg.images {
                render::page_images(out, page);
            }

            if !page.children.is_empty() && !filter::children_included(page, self.cfg) {
                self.comment(
                    out,
                    &format!(
                        "skipping child pages but keeping child images: template '{}' in exclude-children-when-template-is",
                        page.template
                    ),
                );
                if self.cfg.images {
                    for child in &page.children {
                        if self.debug {
                            self.comment(
                                out,
                                &format!("imaging {} [template={}]", child.url, child.template),
                            );
                        }
                        render::page_images(out, child);
                    }
                }
                render::entry_close(out);
            } else {
                render::entry_close(out);
                self.walk(out, &page.children, pass, depth + 1);
            }
        }
    }

    /// Emit the synthetic homepage entry ahead of the language passes.
    fn homepage_shim(&self, out: &mut String, pages: &[Page], languages: &LanguageSet) {
        match find_home(pages) {
            Some(home) => {
                self.comment(out, "synthesizing homepage entry");
                render::homepage_entry(out, home, languages);
            }
            None => {
                self.comment(out, "homepage shim enabled but no home page in tree");
            }
        }
    }

    /// Debug title line, falling back to the base title when a
    /// translation is missing or has no title of its own.
    fn title_comment(&self, out: &mut String, page: &Page, pass: LanguagePass) {
        let base = page.content.get("title").unwrap_or("");
        match pass {
            LanguagePass::Single => self.comment(out, &format!("title: \"{base}\"")),
            LanguagePass::Primary => self.comment(out, &format!("title (default): \"{base}\"")),
            LanguagePass::Secondary(code) => {
                match page.translation(code).and_then(|t| t.fields.get("title")) {
                    Some(title) => self.comment(out, &format!("title ({code}): \"{title}\"")),
                    None => self.comment(
                        out,
                        &format!("title ({code}): \"{base}\" (translation missing)"),
                    ),
                }
            }
        }
    }

    /// Option snapshot dump after the `urlset` open.
    fn dump_options(&self, out: &mut String) {
        self.comment(out, &format!("images = {}", self.cfg.images));
        self.comment(
            out,
            &format!(
                "include-unlisted-when-slug-is = {:?}",
                self.cfg.include_unlisted_slugs
            ),
        );
        self.comment(
            out,
            &format!(
                "exclude-children-when-template-is = {:?}",
                self.cfg.exclude_children_templates
            ),
        );
        self.comment(
            out,
            &format!(
                "exclude-page-when-template-is = {:?}",
                self.cfg.exclude_page_templates
            ),
        );
        self.comment(
            out,
            &format!(
                "exclude-page-when-slug-is = {:?}",
                self.cfg.exclude_page_slugs
            ),
        );
        self.comment(out, &format!("homepage-shim = {}", self.cfg.homepage_shim));
    }

    fn comment(&self, out: &mut String, message: &str) {
        if self.debug {
            out.push_str("<!-- ");
            out.push_str(message);
            out.push_str(" -->\n");
        }
    }
}

/// Why a page is dropped, as a debug annotation. `None` for included pages.
fn exclusion_note(page: &Page, verdict: Verdict) -> Option<String> {
    match verdict {
        Verdict::Included | Verdict::IncludedUnlisted => None,
        Verdict::ErrorPage => Some("skipping: error page".into()),
        Verdict::Unlisted => Some("skipping: unlisted".into()),
        Verdict::TemplateExcluded => Some(format!(
            "skipping {}: template '{}' in exclude-page-when-template-is",
            page.url, page.template
        )),
        Verdict::SlugExcluded => Some(format!(
            "skipping: slug '{}' in exclude-page-when-slug-is",
            page.slug
        )),
        Verdict::ContentFlag => Some("skipping: excludefromxmlsitemap".into()),
        Verdict::Sunset => Some("skipping: sunset".into()),
        Verdict::Embargo => Some("skipping: under embargo".into()),
    }
}

/// First home page in document order, depth-first.
fn find_home(pages: &[Page]) -> Option<&Page> {
    for page in pages {
        if page.home_page {
            return Some(page);
        }
        if let Some(home) = find_home(&page.children) {
            return Some(home);
        }
    }
    None
}
