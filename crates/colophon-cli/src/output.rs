use std::io::Write;

use colophon_core::{AnalysisResult, BookRecord, Field, Resolution};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the fields extracted by the analyzer, then a scan summary.
pub fn print_analysis(
    w: &mut dyn Write,
    result: &AnalysisResult,
    color: ColorMode,
) -> std::io::Result<()> {
    let book = &result.book;
    print_field(w, "Title", &book.title, color)?;
    print_field(w, "Author", &book.author, color)?;
    print_field(w, "Series", book.series.as_deref().unwrap_or(""), color)?;
    print_field(w, "Genres", &book.genres.join(", "), color)?;
    let pages = if book.pages > 0 {
        book.pages.to_string()
    } else {
        String::new()
    };
    print_field(w, "Pages", &pages, color)?;
    print_field(
        w,
        "First published",
        book.published_year.as_deref().unwrap_or(""),
        color,
    )?;
    print_field(w, "Publisher", book.publisher.as_deref().unwrap_or(""), color)?;
    print_field(w, "Language", &book.language, color)?;
    print_field(w, "Awards", &book.awards.join(", "), color)?;
    print_field(w, "Characters", &book.characters.join(", "), color)?;

    let stats = &result.stats;
    let summary = format!(
        "(scanned {} lines: {} blank, {} headers, {} description, {} unmatched)",
        stats.total_lines,
        stats.blank_lines,
        stats.header_lines,
        stats.description_lines,
        stats.ignored_lines
    );
    writeln!(w)?;
    if color.enabled() {
        writeln!(w, "{}", summary.dimmed())?;
    } else {
        writeln!(w, "{}", summary)?;
    }
    Ok(())
}

/// Print a parsed bulk record, one labelled line per non-empty field.
pub fn print_record(
    w: &mut dyn Write,
    record: &BookRecord,
    color: ColorMode,
) -> std::io::Result<()> {
    for field in Field::ALL {
        print_field(w, field.label(), &field_value(record, field), color)?;
    }
    if !record.quotes.is_empty() {
        writeln!(w)?;
        writeln!(w, "Quotes:")?;
        for quote in &record.quotes {
            let page = if quote.page.is_empty() {
                String::new()
            } else {
                format!(" (p. {})", quote.page)
            };
            writeln!(w, "  \"{}\"{} [{}]", quote.text, page, quote.quote_type)?;
        }
    }
    Ok(())
}

/// Print what entity resolution looked up, created, and failed on.
pub fn print_resolution(
    w: &mut dyn Write,
    resolution: &Resolution,
    color: ColorMode,
) -> std::io::Result<()> {
    writeln!(w)?;
    for (label, map) in [
        ("Authors", &resolution.authors),
        ("Series", &resolution.series),
        ("Genres", &resolution.genres),
    ] {
        for (name, id) in map {
            writeln!(w, "{}: {} -> #{}", label, name, id)?;
        }
    }
    for (kind, name) in &resolution.created {
        let msg = format!("Created {} \"{}\"", kind, name);
        if color.enabled() {
            writeln!(w, "{}", msg.green())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    for failure in &resolution.errors {
        let msg = format!(
            "Failed to create {} \"{}\": {}",
            failure.kind, failure.name, failure.error
        );
        if color.enabled() {
            writeln!(w, "{}", msg.red())?;
        } else {
            writeln!(w, "{}", msg)?;
        }
    }
    Ok(())
}

fn print_field(
    w: &mut dyn Write,
    label: &str,
    value: &str,
    color: ColorMode,
) -> std::io::Result<()> {
    if value.is_empty() {
        return Ok(());
    }
    if color.enabled() {
        writeln!(w, "{}: {}", label.bold(), value)?;
    } else {
        writeln!(w, "{}: {}", label, value)?;
    }
    Ok(())
}

fn field_value(record: &BookRecord, field: Field) -> String {
    match field {
        Field::Title => record.title.clone(),
        Field::Author => record.author.clone(),
        Field::Genres => record.genres.join(", "),
        Field::Rating => record.rating.clone(),
        Field::BookType => record.book_type.clone(),
        Field::Pages => record.pages.clone(),
        Field::StartDate => record.start_date.clone(),
        Field::EndDate => record.end_date.clone(),
        Field::Year => record.year.clone(),
        Field::Publisher => record.publisher.clone(),
        Field::Language => record.language.clone(),
        Field::Era => record.era.clone(),
        Field::Format => record.format.clone(),
        Field::Audience => record.audience.clone(),
        Field::Density => record.density.clone(),
        Field::Awards => record.awards.clone(),
        Field::CoverUrl => record.cover_url.clone(),
        Field::MainCharacters => record.main_characters.join(", "),
        Field::FavoriteCharacter => record.favorite_character.clone(),
        // Only worth a line when set.
        Field::IsFavorite => {
            if record.is_favorite {
                "yes".to_string()
            } else {
                String::new()
            }
        }
        Field::Summary => record.summary.clone(),
        Field::Review => record.review.clone(),
        Field::Series => record.series.clone(),
    }
}
