//! Heuristic analysis of catalog text pasted from a book page.
//!
//! The input is free text: a title/author block, a rating followed by a
//! description of unknown length, genre chip rows, publication and edition
//! details, awards, and characters, in no guaranteed order. The analyzer
//! walks the text line by line, tracking the current [`Section`], and fills
//! an [`AnalyzedBook`] from whatever it can recognize.

use once_cell::sync::Lazy;
use regex::Regex;

use colophon_core::{AnalysisResult, AnalyzedBook, ScanStats};

use crate::config::AnalyzerConfig;
use crate::section::{Section, next_section};
use crate::text_processing::normalize_pasted;

/// Genre-chip tokens that are page chrome, not genre names.
static GENRE_NOISE: Lazy<Vec<String>> = Lazy::new(|| vec!["Genres".to_string()]);

/// Line-by-line analyzer for pasted catalog text.
#[derive(Debug, Clone, Default)]
pub struct CatalogAnalyzer {
    config: AnalyzerConfig,
}

impl CatalogAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: AnalyzerConfig) -> Self {
        Self { config }
    }

    /// Analyze pasted catalog text into a structured book plus scan stats.
    pub fn analyze(&self, text: &str) -> AnalysisResult {
        let text = normalize_pasted(text);
        let lines: Vec<&str> = text.lines().collect();

        let mut book = AnalyzedBook {
            language: self.config.default_language.clone(),
            ..AnalyzedBook::default()
        };
        let mut stats = ScanStats::default();
        let mut section = Section::Default;
        let mut in_description = false;
        // Two-line sliding window: some extractors look back one line.
        let mut prev_line: Option<&str> = None;

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            stats.total_lines += 1;
            if line.is_empty() {
                stats.blank_lines += 1;
                prev_line = None;
                continue;
            }

            // Section triggers win over everything, including description
            // skipping: a recognized header is how we find our way back out
            // of a description of unknown length.
            if let Some(transition) = next_section(section, line, &self.config) {
                in_description = false;
                section = transition.section;
                if transition.consumed {
                    stats.header_lines += 1;
                    prev_line = Some(line);
                    continue;
                }
            }

            let is_last = i + 1 == lines.len();
            let used = match section {
                Section::Default => {
                    if in_description {
                        stats.description_lines += 1;
                        prev_line = Some(line);
                        continue;
                    }
                    if self.is_rating_noise(line) && !is_last {
                        // A rating line marks the start of the description
                        // blurb. Everything after it is skipped until the
                        // next section trigger.
                        in_description = true;
                        stats.ignored_lines += 1;
                        prev_line = Some(line);
                        continue;
                    }
                    self.extract_default(&mut book, line, prev_line)
                }
                Section::Genres => self.extract_genres(&mut book, line),
                Section::Publication => self.extract_year(&mut book, line),
                Section::Awards => extract_award(&mut book, line),
                Section::Series => extract_series(&mut book, line),
                Section::Characters => extract_characters(&mut book, line),
                Section::Edition => extract_edition(&mut book, line),
                Section::Details => {
                    let used = extract_pages(&mut book, line);
                    // The page-count line is the whole details region.
                    if line.to_lowercase().contains("pages") {
                        section = Section::Default;
                    }
                    used
                }
            };
            if !used {
                stats.ignored_lines += 1;
            }
            prev_line = Some(line);
        }

        AnalysisResult { book, stats }
    }

    fn is_rating_noise(&self, line: &str) -> bool {
        static RATING_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d+\.\d+").unwrap());
        static COUNTS_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"(?i)\d[\d,]*\s*(ratings|reviews)").unwrap());

        self.config
            .rating_re
            .as_ref()
            .unwrap_or(&RATING_RE)
            .is_match(line)
            || COUNTS_RE.is_match(line)
    }

    /// Title, author, and series-marker lines before any header.
    fn extract_default(
        &self,
        book: &mut AnalyzedBook,
        line: &str,
        prev_line: Option<&str>,
    ) -> bool {
        static SERIES_MARKER_RE: Lazy<Regex> =
            Lazy::new(|| Regex::new(r"^(.*?)\s*#\d+").unwrap());

        // "Dune Chronicles #1" above the title names the series. A bare
        // "#1" line borrows the previous line as the series name.
        if let Some(caps) = SERIES_MARKER_RE.captures(line) {
            if book.series.is_none() {
                let name = caps.get(1).map_or("", |m| m.as_str()).trim();
                if !name.is_empty() {
                    book.series = Some(name.to_string());
                } else if let Some(prev) = prev_line {
                    let prev = prev.trim();
                    book.series = Some(prev.to_string());
                    // The previous line was the series name, not the title.
                    if book.title == prev && book.author.is_empty() {
                        book.title.clear();
                    }
                }
            }
            return true;
        }

        if book.title.is_empty() {
            // Digit-initial lines are counts or page numbers, never titles.
            if line.chars().next().is_some_and(|c| c.is_ascii_digit()) {
                return false;
            }
            book.title = line.to_string();
            return true;
        }

        if book.author.is_empty() {
            // Contributor credits, counts, and echoes of the title are not
            // the author line.
            let all_digits = line.chars().all(|c| c.is_ascii_digit());
            if all_digits
                || self.is_rating_noise(line)
                || line == book.title
                || line.ends_with("(Illustrator)")
                || line.starts_with(',')
            {
                return false;
            }
            book.author = line.to_string();
            return true;
        }

        false
    }

    /// Genre chips, several per line, separated by runs of whitespace.
    fn extract_genres(&self, book: &mut AnalyzedBook, line: &str) -> bool {
        static CHIP_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}").unwrap());

        let noise = self.config.genre_noise.resolve(&GENRE_NOISE);
        let mut added = false;
        for token in CHIP_SPLIT_RE.split(line) {
            let token = token.trim();
            if token.is_empty()
                || token.to_lowercase().contains("show")
                || token.contains("...")
                || noise.iter().any(|n| n == token)
            {
                continue;
            }
            if book.genres.len() >= self.config.max_genres {
                break;
            }
            book.genres.push(token.to_string());
            added = true;
        }
        added
    }

    /// The publication year, from "First published August 1, 1965" style
    /// lines. A later match within the section overwrites an earlier one.
    fn extract_year(&self, book: &mut AnalyzedBook, line: &str) -> bool {
        static YEAR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\b(\d{4})\b").unwrap());

        let re = self.config.year_re.as_ref().unwrap_or(&YEAR_RE);
        if let Some(caps) = re.captures(line) {
            let year = caps
                .get(1)
                .unwrap_or_else(|| caps.get(0).unwrap())
                .as_str();
            book.published_year = Some(year.to_string());
            return true;
        }
        false
    }
}

/// One award per line, with the "Literary awards" header prefix stripped.
fn extract_award(book: &mut AnalyzedBook, line: &str) -> bool {
    let lower = line.to_lowercase();
    let rest = if let Some(pos) = lower.find("literary awards") {
        line[pos + "literary awards".len()..].trim()
    } else {
        line
    };
    if rest.is_empty() {
        // Header-only line.
        return true;
    }
    let award = rest.trim_end_matches(',').trim();
    book.awards.push(award.to_string());
    true
}

/// The series name from a "Series Dune #1" line. First match wins.
fn extract_series(book: &mut AnalyzedBook, line: &str) -> bool {
    static SERIES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)Series\s*(.+)").unwrap());
    static TRAILING_INDEX_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"\s*#\d+\s*$").unwrap());

    if book.series.is_some() {
        return false;
    }
    if let Some(caps) = SERIES_RE.captures(line) {
        let name = caps.get(1).map_or("", |m| m.as_str());
        let name = TRAILING_INDEX_RE.replace(name, "");
        let name = name.trim();
        if !name.is_empty() {
            book.series = Some(name.to_string());
            return true;
        }
    }
    false
}

/// Character names, chip rows or comma-separated.
fn extract_characters(book: &mut AnalyzedBook, line: &str) -> bool {
    static CHARACTER_SPLIT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s{2,}|,").unwrap());

    let mut added = false;
    for token in CHARACTER_SPLIT_RE.split(line) {
        let token = token.trim();
        if token.is_empty() || token == "Characters" || token.contains("Show") {
            continue;
        }
        book.characters.push(token.to_string());
        added = true;
    }
    added
}

/// Publisher and language from the edition block. The publisher is never
/// overwritten once set.
fn extract_edition(book: &mut AnalyzedBook, line: &str) -> bool {
    static BY_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bby\s+(.+)$").unwrap());
    static PUBLISHED_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)Published\s*(.+)").unwrap());
    static LANGUAGE_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"(?i)Language\s*(.+)").unwrap());

    let lower = line.to_lowercase();

    if book.publisher.is_none() {
        if let Some(caps) = BY_RE.captures(line) {
            book.publisher = Some(caps[1].trim().to_string());
            return true;
        }
        if lower.contains("published") && !lower.contains("first published") {
            if let Some(caps) = PUBLISHED_RE.captures(line) {
                book.publisher = Some(caps[1].trim().to_string());
                return true;
            }
        }
    }

    if let Some(caps) = LANGUAGE_RE.captures(line) {
        let language = caps[1].trim();
        if !language.is_empty() {
            book.language = language.to_string();
            return true;
        }
    }

    false
}

/// The page count from "412 pages, Kindle Edition". A line that names pages
/// but carries no parseable number leaves the previous count in place.
fn extract_pages(book: &mut AnalyzedBook, line: &str) -> bool {
    static PAGES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)(\d+)\s*pages").unwrap());

    if let Some(caps) = PAGES_RE.captures(line) {
        if let Ok(pages) = caps[1].parse::<u32>() {
            book.pages = pages;
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalyzerConfigBuilder;

    fn analyze(text: &str) -> AnalysisResult {
        CatalogAnalyzer::new().analyze(text)
    }

    const DUNE: &str = "\
Dune Chronicles #1
Dune
Frank Herbert
4.27
1,234,567 ratings  98,765 reviews
Set on the desert planet Arrakis, Dune is the story of Paul Atreides.
A stunning blend of adventure and mysticism.
Genres
Science Fiction  Fantasy  Classics  Fiction
...show all 12 genres
412 pages, Kindle Edition
First published August 1, 1965
Literary awards
Hugo Award for Best Novel (1966),
Nebula Award for Best Novel (1965)
Characters
Paul Atreides, Lady Jessica  Duncan Idaho
This edition
Format
412 pages, Paperback
Published September 1, 1990 by Ace Books
Language
English";

    #[test]
    fn test_title_and_author() {
        let result = analyze(DUNE);
        assert_eq!(result.book.title, "Dune");
        assert_eq!(result.book.author, "Frank Herbert");
    }

    #[test]
    fn test_series_from_marker_line() {
        let result = analyze(DUNE);
        assert_eq!(result.book.series.as_deref(), Some("Dune Chronicles"));
    }

    #[test]
    fn test_description_skipped() {
        let result = analyze(DUNE);
        assert!(result.stats.description_lines >= 2);
        assert!(!result.book.genres.iter().any(|g| g.contains("Arrakis")));
    }

    #[test]
    fn test_genres_collected() {
        let result = analyze(DUNE);
        assert_eq!(
            result.book.genres,
            vec!["Science Fiction", "Fantasy", "Classics", "Fiction"]
        );
    }

    #[test]
    fn test_pages_and_year() {
        let result = analyze(DUNE);
        assert_eq!(result.book.pages, 412);
        assert_eq!(result.book.published_year.as_deref(), Some("1965"));
    }

    #[test]
    fn test_awards_collected() {
        let result = analyze(DUNE);
        assert_eq!(
            result.book.awards,
            vec![
                "Hugo Award for Best Novel (1966)",
                "Nebula Award for Best Novel (1965)"
            ]
        );
    }

    #[test]
    fn test_characters_collected() {
        let result = analyze(DUNE);
        assert_eq!(
            result.book.characters,
            vec!["Paul Atreides", "Lady Jessica", "Duncan Idaho"]
        );
    }

    #[test]
    fn test_publisher_from_edition_block() {
        let result = analyze(DUNE);
        assert_eq!(result.book.publisher.as_deref(), Some("Ace Books"));
    }

    #[test]
    fn test_publisher_first_match_wins() {
        let text = "Title\nAuthor\nThis edition\nPublished 1990 by Ace Books\nPublished 2005 by Tor";
        let result = analyze(text);
        assert_eq!(result.book.publisher.as_deref(), Some("Ace Books"));
    }

    #[test]
    fn test_series_header_line() {
        let text = "The Fellowship of the Ring\nJ.R.R. Tolkien\nSeries The Lord of the Rings #1";
        let result = analyze(text);
        assert_eq!(
            result.book.series.as_deref(),
            Some("The Lord of the Rings")
        );
    }

    #[test]
    fn test_series_first_match_wins() {
        let text = "Title\nAuthor\nSeries First Saga #1\nSeries Second Saga #2";
        let result = analyze(text);
        assert_eq!(result.book.series.as_deref(), Some("First Saga"));
    }

    #[test]
    fn test_bare_series_marker_uses_previous_line() {
        let text = "Earthsea Cycle\n#1\nA Wizard of Earthsea\nUrsula K. Le Guin";
        let result = analyze(text);
        assert_eq!(result.book.series.as_deref(), Some("Earthsea Cycle"));
        assert_eq!(result.book.author, "Ursula K. Le Guin");
    }

    #[test]
    fn test_author_guards() {
        let text = "Dune\nDune\n12345\n, and others\nJohn Schoenherr (Illustrator)\nFrank Herbert";
        let result = analyze(text);
        assert_eq!(result.book.author, "Frank Herbert");
    }

    #[test]
    fn test_default_language_applied() {
        let result = analyze("Dune\nFrank Herbert");
        assert_eq!(result.book.language, "English");
    }

    #[test]
    fn test_language_from_edition_block() {
        let text = "Der Prozess\nFranz Kafka\nThis edition\nLanguage German";
        let result = analyze(text);
        assert_eq!(result.book.language, "German");
    }

    #[test]
    fn test_year_reassigned_within_section() {
        let text = "Title\nAuthor\nFirst published 1965\nrepublished 1990";
        let result = analyze(text);
        assert_eq!(result.book.published_year.as_deref(), Some("1990"));
    }

    #[test]
    fn test_max_genres_cap() {
        let config = AnalyzerConfigBuilder::new().max_genres(2).build().unwrap();
        let result = CatalogAnalyzer::with_config(config)
            .analyze("Title\nAuthor\nGenres\nScience Fiction  Fantasy  Classics");
        assert_eq!(result.book.genres, vec!["Science Fiction", "Fantasy"]);
    }

    #[test]
    fn test_genre_noise_override() {
        let config = AnalyzerConfigBuilder::new()
            .add_genre_noise("Audiobook".to_string())
            .build()
            .unwrap();
        let result = CatalogAnalyzer::with_config(config)
            .analyze("Title\nAuthor\nGenres\nAudiobook  Fantasy");
        assert_eq!(result.book.genres, vec!["Fantasy"]);
    }

    #[test]
    fn test_trailing_rating_line_not_description_start() {
        let result = analyze("Dune\nFrank Herbert\n4.27");
        assert_eq!(result.book.author, "Frank Herbert");
        assert_eq!(result.stats.description_lines, 0);
    }

    #[test]
    fn test_stats_counts() {
        let result = analyze("Dune\nFrank Herbert\n\nGenres\nFantasy");
        assert_eq!(result.stats.total_lines, 5);
        assert_eq!(result.stats.blank_lines, 1);
        assert_eq!(result.stats.header_lines, 1);
    }

    #[test]
    fn test_empty_input() {
        let result = analyze("");
        assert!(result.book.title.is_empty());
        assert_eq!(result.stats.total_lines, 0);
    }

    #[test]
    fn test_pages_line_returns_to_default_section() {
        // After the details line, plain lines are ignored rather than
        // treated as more details.
        let text = "Dune\nFrank Herbert\n412 pages, Kindle Edition\nSome stray line";
        let result = analyze(text);
        assert_eq!(result.book.pages, 412);
        assert!(result.stats.ignored_lines >= 1);
    }
}
