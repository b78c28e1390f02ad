//! Section tracking for catalog-text analysis.
//!
//! Pasted catalog pages are a sequence of labelled regions (genres, awards,
//! edition details, ...) without any markup. The analyzer models this as an
//! explicit state machine: each line either triggers a transition into a new
//! section or is handed to the current section's extractor.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::config::AnalyzerConfig;

/// The region of the pasted page the analyzer is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Section {
    /// Before any header has been seen: title, author, rating.
    #[default]
    Default,
    /// Genre chip rows.
    Genres,
    /// The "First published ..." line.
    Publication,
    /// Lines under a "Literary awards" header.
    Awards,
    /// Lines under a "Series" header.
    Series,
    /// Lines under a "Characters" header.
    Characters,
    /// Lines under a "This edition" header.
    Edition,
    /// A standalone page-count line ("412 pages, Kindle Edition").
    Details,
}

/// The outcome of a section trigger.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// The section the analyzer moves into.
    pub section: Section,
    /// Whether the trigger line is pure chrome (consumed) or also carries
    /// data the new section's extractor should see.
    pub consumed: bool,
}

/// Decide whether `line` moves the analyzer into a new section.
///
/// Returns `None` when the line belongs to the current section. A trigger
/// phrase naming the section that is already active does not re-transition;
/// the line falls through to that section's extractor instead.
pub fn next_section(
    current: Section,
    line: &str,
    config: &AnalyzerConfig,
) -> Option<Transition> {
    static PAGES_TRIGGER_RE: Lazy<Regex> =
        Lazy::new(|| Regex::new(r"^\d+\s*pages").unwrap());

    let lower = line.to_lowercase();

    // Expand/collapse chips are chrome wherever they appear. Staying in the
    // current section clears any description-skip state.
    if lower.contains("show more") || lower.contains("show less") {
        return Some(Transition {
            section: current,
            consumed: true,
        });
    }

    let (target, consumed) = if lower.contains("genres") || lower.contains("show all") {
        (Section::Genres, true)
    } else if lower.contains("first published") {
        (Section::Publication, false)
    } else if lower.contains("literary awards") {
        (Section::Awards, false)
    } else if lower.contains("series") {
        (Section::Series, false)
    } else if lower.contains("characters") {
        (Section::Characters, false)
    } else if lower.contains("this edition") || lower.contains("format") {
        (Section::Edition, true)
    } else if current != Section::Edition
        && config
            .pages_trigger_re
            .as_ref()
            .unwrap_or(&PAGES_TRIGGER_RE)
            .is_match(line)
    {
        // A bare page count outside the edition block ("412 pages, Kindle
        // Edition") starts the details region.
        (Section::Details, false)
    } else {
        return None;
    };

    if target == current {
        return None;
    }
    Some(Transition {
        section: target,
        consumed,
    })
}
