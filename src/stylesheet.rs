//! The XSL stylesheet referenced by the document's processing instruction.
//!
//! The asset ships inside the binary via `include_str!`, so a missing
//! bundled stylesheet is a packaging defect caught at compile time. Hosts
//! that want their own styling configure a `stylesheet` option pointing at
//! a file; an unreadable override logs a warning and falls back to the
//! bundled asset rather than failing the request.

use tracing::warn;

use crate::config::ConfigProvider;

const BUNDLED: &str = include_str!("../assets/sitemap.xsl");

/// The stylesheet to serve at `/sitemap.xsl`.
pub fn stylesheet(provider: &impl ConfigProvider) -> String {
    if let Some(path) = provider.string("stylesheet") {
        match std::fs::read_to_string(&path) {
            Ok(text) => return text,
            Err(err) => {
                warn!(%path, %err, "stylesheet override unreadable, using bundled asset");
            }
        }
    }
    BUNDLED.to_string()
}
