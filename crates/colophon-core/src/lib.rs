use serde::{Deserialize, Serialize};

pub mod config_file;
pub mod fields;
pub mod resolver;

// Re-export for convenience
pub use fields::{Field, LIST_DELIMITER, QUOTE_DELIMITER, QUOTES_START};
pub use resolver::{
    BackendError, Catalog, CatalogEntry, EntityId, EntityKind, EntityResolver, InMemoryBackend,
    LibraryBackend, Resolution,
};

/// A quote captured alongside a book entry.
///
/// Bulk input encodes quotes as `text|page|type|category`; missing parts
/// default to the empty string, except `type` which defaults to "General".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteRecord {
    pub text: String,
    pub page: String,
    #[serde(rename = "type")]
    pub quote_type: String,
    pub category: String,
}

/// A full book entry parsed from the positional bulk format.
///
/// Every field the dictionary declares is always present; absent input lines
/// leave their field at its default so downstream consumers never branch on
/// missing keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub rating: String,
    pub book_type: String,
    pub pages: String,
    pub start_date: String,
    pub end_date: String,
    pub year: String,
    pub publisher: String,
    pub language: String,
    pub era: String,
    pub format: String,
    pub audience: String,
    pub density: String,
    pub awards: String,
    pub cover_url: String,
    pub main_characters: Vec<String>,
    pub favorite_character: String,
    pub is_favorite: bool,
    pub summary: String,
    pub review: String,
    pub series: String,
    pub quotes: Vec<QuoteRecord>,
}

/// Structured fields extracted from pasted catalog text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyzedBook {
    pub title: String,
    pub author: String,
    pub genres: Vec<String>,
    pub pages: u32,
    pub language: String,
    pub series: Option<String>,
    pub published_year: Option<String>,
    pub publisher: Option<String>,
    pub awards: Vec<String>,
    pub characters: Vec<String>,
}

impl Default for AnalyzedBook {
    fn default() -> Self {
        Self {
            title: String::new(),
            author: String::new(),
            genres: Vec::new(),
            pages: 0,
            language: "English".to_string(),
            series: None,
            published_year: None,
            publisher: None,
            awards: Vec::new(),
            characters: Vec::new(),
        }
    }
}

/// Statistics about how the analyzer classified the scanned lines.
///
/// Informational only; the extracted fields never depend on these counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanStats {
    pub total_lines: usize,
    pub blank_lines: usize,
    /// Section headers and UI chrome consumed by trigger detection.
    pub header_lines: usize,
    /// Lines swallowed by the description-skip heuristic.
    pub description_lines: usize,
    /// Lines that reached a section extractor but matched nothing.
    pub ignored_lines: usize,
}

/// Result of analyzing pasted catalog text.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub book: AnalyzedBook,
    pub stats: ScanStats,
}
