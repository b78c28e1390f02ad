//! Text-processing core of the colophon book-library toolkit.
//!
//! Two entry routes produce the same normalized record:
//!
//! 1. [`bulk::parse_bulk`] — the positional newline-delimited shorthand, one
//!    field per line by fixed index, with a trailing variable-length quote
//!    region.
//! 2. [`analyzer::CatalogAnalyzer`] — a best-effort heuristic scanner over
//!    free-form text copy-pasted from a book-catalog detail page, classifying
//!    lines into sections (genres, publication, awards, series, characters,
//!    edition, details) and extracting typed fields from each.
//!
//! [`adapter::to_bulk_format`] serializes analyzer output back into the bulk
//! layout so one downstream finalization path serves both routes.

pub mod adapter;
pub mod analyzer;
pub mod bulk;
pub mod config;
pub mod section;
pub mod text_processing;

pub use adapter::to_bulk_format;
pub use analyzer::CatalogAnalyzer;
pub use bulk::{BulkError, parse_bulk, parse_bulk_with_config};
pub use config::{AnalyzerConfig, AnalyzerConfigBuilder, ListOverride};
pub use section::{Section, Transition, next_section};
// Re-export domain types from core (canonical definitions live there)
pub use colophon_core::{AnalysisResult, AnalyzedBook, BookRecord, QuoteRecord, ScanStats};

/// Analyze pasted catalog text with the default configuration.
///
/// Pipeline:
/// 1. Normalize browser-paste artifacts (CRLF, BOM, NBSP, curly quotes)
/// 2. Detect section headers line by line, tracking the active section
/// 3. Skip the synopsis blurb between the byline and the metadata blocks
/// 4. Run the active section's field extractor on each surviving line
///
/// Always succeeds; unmatched lines are dropped and missing fields keep
/// their defaults.
pub fn analyze(text: &str) -> AnalysisResult {
    CatalogAnalyzer::new().analyze(text)
}
