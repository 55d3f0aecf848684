//! Last-modified resolution.
//!
//! Every `<url>` entry carries a `<lastmod>`. The value is resolved per
//! language variant through a fallback chain, first *present* source wins:
//!
//! 1. content field `updatedat`, parsed as a datetime string
//! 2. content field `date`, parsed the same way
//! 3. the modification time of the variant's backing content record
//! 4. the Unix epoch
//!
//! A present-but-unparseable field fails the whole variant rather than
//! falling through to the next source. On a secondary language's pass a
//! failed variant retries against the untranslated base variant; if that
//! also fails the result is the epoch. Malformed data is never an error —
//! the chain always produces a timestamp.
//!
//! Parsing is deliberately lenient about input shape: RFC-3339, a plain
//! `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD` all resolve (naive values
//! are taken as UTC).

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::lang::LanguagePass;
use crate::page::Page;

/// Resolve the last-modified instant of a page for one traversal pass.
pub fn resolve(page: &Page, pass: LanguagePass) -> DateTime<Utc> {
    match variant_lastmod(page, pass.content_code()) {
        Some(t) => t,
        None if pass.is_secondary() => {
            variant_lastmod(page, None).unwrap_or(DateTime::UNIX_EPOCH)
        }
        None => DateTime::UNIX_EPOCH,
    }
}

/// The fallback chain for a single variant. `None` when the committed
/// source is unparseable or no source exists.
fn variant_lastmod(page: &Page, code: Option<&str>) -> Option<DateTime<Utc>> {
    let fields = page.content_for(code);
    if let Some(raw) = fields.get("updatedat") {
        return parse_datetime(raw);
    }
    if let Some(raw) = fields.get("date") {
        return parse_datetime(raw);
    }
    page.modified_for(code)
}

/// Lenient datetime parsing for content field values.
pub(crate) fn parse_datetime(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Some(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(t.and_utc());
    }
    if let Ok(d) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
    }
    None
}
