//! Normalization of pasted catalog text before analysis.
//!
//! Browser copy-paste produces CRLF line endings, non-breaking spaces, and
//! typographic quotes. All of these break the whitespace-sensitive regexes
//! in the analyzer, so the text is normalized once up front.

/// Normalize line endings, exotic spaces, and typographic punctuation in
/// pasted text.
pub fn normalize_pasted(text: &str) -> String {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                out.push('\n');
            }
            // NBSP and narrow NBSP collapse to a plain space.
            '\u{a0}' | '\u{202f}' => out.push(' '),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201c}' | '\u{201d}' => out.push('"'),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crlf_to_lf() {
        assert_eq!(normalize_pasted("a\r\nb\rc\nd"), "a\nb\nc\nd");
    }

    #[test]
    fn test_bom_stripped() {
        assert_eq!(normalize_pasted("\u{feff}Dune"), "Dune");
    }

    #[test]
    fn test_nbsp_to_space() {
        assert_eq!(normalize_pasted("412\u{a0}pages"), "412 pages");
        assert_eq!(normalize_pasted("412\u{202f}pages"), "412 pages");
    }

    #[test]
    fn test_curly_quotes() {
        assert_eq!(
            normalize_pasted("\u{201c}Fear\u{201d} is the mind\u{2019}s killer"),
            "\"Fear\" is the mind's killer"
        );
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "Dune\nFrank Herbert\n4.27";
        assert_eq!(normalize_pasted(text), text);
    }
}
