//! Bridge from analyzed catalog text to the positional bulk format.

use colophon_core::{AnalyzedBook, Field, LIST_DELIMITER};

/// Render an [`AnalyzedBook`] as a bulk entry.
///
/// Fields the analyzer has no value for stay blank so that downstream bulk
/// parsing keeps every line on its declared index. The output round-trips
/// through [`parse_bulk`](crate::bulk::parse_bulk).
pub fn to_bulk_format(book: &AnalyzedBook) -> String {
    let mut lines = vec![String::new(); Field::COUNT];
    let sep = format!("{LIST_DELIMITER} ");

    lines[Field::Title.index()] = book.title.clone();
    lines[Field::Author.index()] = book.author.clone();
    lines[Field::Genres.index()] = book.genres.join(&sep);
    if book.pages > 0 {
        lines[Field::Pages.index()] = book.pages.to_string();
    }
    if let Some(year) = &book.published_year {
        lines[Field::Year.index()] = year.clone();
    }
    if let Some(publisher) = &book.publisher {
        lines[Field::Publisher.index()] = publisher.clone();
    }
    lines[Field::Language.index()] = book.language.clone();
    lines[Field::Awards.index()] = book.awards.join(&sep);
    lines[Field::MainCharacters.index()] = book.characters.join(&sep);
    if let Some(series) = &book.series {
        lines[Field::Series.index()] = series.clone();
    }

    lines.join("\n")
}
