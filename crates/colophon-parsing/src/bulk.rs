//! Parser for the positional bulk book-entry format.
//!
//! One field per line in the order [`Field::ALL`] declares; blank lines are
//! meaningful placeholders that keep later fields on their indices. Lines
//! from [`QUOTES_START`] onward each encode a quote as
//! `text|page|type|category`.

use thiserror::Error;

use colophon_core::{BookRecord, Field, LIST_DELIMITER, QUOTE_DELIMITER, QUOTES_START, QuoteRecord};

use crate::config::AnalyzerConfig;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BulkError {
    /// The entry has no title or author line.
    #[error("bulk entry is missing a title or author")]
    MissingRequiredFields,
}

/// Parse a bulk entry with the default configuration.
pub fn parse_bulk(text: &str) -> Result<BookRecord, BulkError> {
    parse_bulk_with_config(text, &AnalyzerConfig::default())
}

/// Parse a bulk entry into a [`BookRecord`].
///
/// Splits on `'\n'` rather than iterating non-blank lines: a blank line is
/// a placeholder for an empty field, so collapsing them would shift every
/// field after it onto the wrong index.
pub fn parse_bulk_with_config(
    text: &str,
    config: &AnalyzerConfig,
) -> Result<BookRecord, BulkError> {
    let lines: Vec<&str> = text.split('\n').map(str::trim).collect();
    if lines.len() < 2 || lines[0].is_empty() || lines[1].is_empty() {
        return Err(BulkError::MissingRequiredFields);
    }

    let mut record = BookRecord::default();
    for (index, line) in lines.iter().enumerate() {
        if index >= QUOTES_START {
            if let Some(quote) = parse_quote_line(line) {
                record.quotes.push(quote);
            }
            continue;
        }
        let Some(field) = Field::from_index(index) else {
            continue;
        };
        set_field(&mut record, field, line);
    }

    if record.format.is_empty() {
        record.format = config.default_format.clone();
    }
    if record.audience.is_empty() {
        record.audience = config.default_audience.clone();
    }

    Ok(record)
}

fn set_field(record: &mut BookRecord, field: Field, value: &str) {
    match field {
        Field::Title => record.title = value.to_string(),
        Field::Author => record.author = value.to_string(),
        Field::Genres => record.genres = split_list(value),
        Field::Rating => record.rating = value.to_string(),
        Field::BookType => record.book_type = value.to_string(),
        Field::Pages => record.pages = value.to_string(),
        Field::StartDate => record.start_date = value.to_string(),
        Field::EndDate => record.end_date = value.to_string(),
        Field::Year => record.year = value.to_string(),
        Field::Publisher => record.publisher = value.to_string(),
        Field::Language => record.language = value.to_string(),
        Field::Era => record.era = value.to_string(),
        Field::Format => record.format = value.to_string(),
        Field::Audience => record.audience = value.to_string(),
        Field::Density => record.density = value.to_string(),
        Field::Awards => record.awards = value.to_string(),
        Field::CoverUrl => record.cover_url = value.to_string(),
        Field::MainCharacters => record.main_characters = split_list(value),
        Field::FavoriteCharacter => record.favorite_character = value.to_string(),
        Field::IsFavorite => record.is_favorite = value.eq_ignore_ascii_case("true"),
        Field::Summary => record.summary = value.to_string(),
        Field::Review => record.review = value.to_string(),
        Field::Series => record.series = value.to_string(),
    }
}

/// Split a comma-separated list field, dropping empty entries.
fn split_list(value: &str) -> Vec<String> {
    value
        .split(LIST_DELIMITER)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse one `text|page|type|category` quote line. Blank lines yield no
/// quote; a missing type defaults to "General".
fn parse_quote_line(line: &str) -> Option<QuoteRecord> {
    if line.is_empty() {
        return None;
    }
    let mut parts = line.splitn(4, QUOTE_DELIMITER);
    let text = parts.next().unwrap_or("").trim();
    if text.is_empty() {
        return None;
    }
    let page = parts.next().unwrap_or("").trim();
    let quote_type = parts.next().unwrap_or("").trim();
    let category = parts.next().unwrap_or("").trim();
    Some(QuoteRecord {
        text: text.to_string(),
        page: page.to_string(),
        quote_type: if quote_type.is_empty() {
            "General".to_string()
        } else {
            quote_type.to_string()
        },
        category: category.to_string(),
    })
}
