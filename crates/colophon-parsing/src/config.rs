use regex::Regex;

/// Controls how a list of patterns/values is overridden from its defaults.
#[derive(Debug, Clone, Default)]
pub enum ListOverride<T> {
    /// Use the built-in defaults.
    #[default]
    Default,
    /// Completely replace the defaults with these values.
    Replace(Vec<T>),
    /// Append these values to the defaults.
    Extend(Vec<T>),
}

impl<T: Clone> ListOverride<T> {
    /// Resolve this override against the given defaults.
    pub fn resolve(&self, defaults: &[T]) -> Vec<T> {
        match self {
            ListOverride::Default => defaults.to_vec(),
            ListOverride::Replace(v) => v.clone(),
            ListOverride::Extend(v) => {
                let mut result = defaults.to_vec();
                result.extend(v.iter().cloned());
                result
            }
        }
    }
}

/// Configuration for bulk parsing and catalog-text analysis.
///
/// All regex fields are `Option<Regex>` — `None` means "use the built-in
/// default". Use [`AnalyzerConfigBuilder`] to construct with string patterns.
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    // ── section.rs ──
    /// Regex that force-enters the details section (`^\d+\s*pages`).
    pub(crate) pages_trigger_re: Option<Regex>,

    // ── analyzer.rs ──
    /// Regex for a bare rating line (`^\d+\.\d+`), the description boundary.
    pub(crate) rating_re: Option<Regex>,
    /// Regex capturing the publication year (first 4-digit run).
    pub(crate) year_re: Option<Regex>,
    /// Genre-chip tokens treated as UI chrome rather than genre names.
    pub(crate) genre_noise: ListOverride<String>,
    /// Maximum genres collected per book (default: 15).
    pub(crate) max_genres: usize,
    /// Language assumed when the text names none (default: "English").
    pub(crate) default_language: String,

    // ── bulk.rs ──
    /// Format assumed when the bulk line is empty (default: "Digital").
    pub(crate) default_format: String,
    /// Audience assumed when the bulk line is empty (default: "Young Adult").
    pub(crate) default_audience: String,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            pages_trigger_re: None,
            rating_re: None,
            year_re: None,
            genre_noise: ListOverride::Default,
            max_genres: 15,
            default_language: "English".to_string(),
            default_format: "Digital".to_string(),
            default_audience: "Young Adult".to_string(),
        }
    }
}

impl AnalyzerConfig {
    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    pub fn default_format(&self) -> &str {
        &self.default_format
    }

    pub fn default_audience(&self) -> &str {
        &self.default_audience
    }

    pub fn max_genres(&self) -> usize {
        self.max_genres
    }
}

/// Builder for [`AnalyzerConfig`].
///
/// Accepts string patterns that are compiled to `Regex` in
/// [`build()`](Self::build). Fails fast with `regex::Error` if any pattern
/// is invalid.
#[derive(Debug, Clone, Default)]
pub struct AnalyzerConfigBuilder {
    pages_trigger_re: Option<String>,
    rating_re: Option<String>,
    year_re: Option<String>,
    genre_noise: ListOverrideBuilder,
    max_genres: Option<usize>,
    default_language: Option<String>,
    default_format: Option<String>,
    default_audience: Option<String>,
}

/// Helper for building `ListOverride<String>`.
#[derive(Debug, Clone, Default)]
enum ListOverrideBuilder {
    #[default]
    Default,
    Replace(Vec<String>),
    Extend(Vec<String>),
}

impl AnalyzerConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Regex overrides ──

    pub fn pages_trigger_regex(mut self, pattern: &str) -> Self {
        self.pages_trigger_re = Some(pattern.to_string());
        self
    }

    pub fn rating_regex(mut self, pattern: &str) -> Self {
        self.rating_re = Some(pattern.to_string());
        self
    }

    pub fn year_regex(mut self, pattern: &str) -> Self {
        self.year_re = Some(pattern.to_string());
        self
    }

    // ── Genre noise tokens ──

    pub fn set_genre_noise(mut self, tokens: Vec<String>) -> Self {
        self.genre_noise = ListOverrideBuilder::Replace(tokens);
        self
    }

    pub fn add_genre_noise(mut self, token: String) -> Self {
        match &mut self.genre_noise {
            ListOverrideBuilder::Extend(v) => v.push(token),
            _ => self.genre_noise = ListOverrideBuilder::Extend(vec![token]),
        }
        self
    }

    // ── Scalars ──

    pub fn max_genres(mut self, n: usize) -> Self {
        self.max_genres = Some(n);
        self
    }

    pub fn default_language(mut self, language: impl Into<String>) -> Self {
        self.default_language = Some(language.into());
        self
    }

    pub fn default_format(mut self, format: impl Into<String>) -> Self {
        self.default_format = Some(format.into());
        self
    }

    pub fn default_audience(mut self, audience: impl Into<String>) -> Self {
        self.default_audience = Some(audience.into());
        self
    }

    /// Compile all string patterns into regexes and produce an
    /// [`AnalyzerConfig`].
    pub fn build(self) -> Result<AnalyzerConfig, regex::Error> {
        let compile = |opt: Option<String>| -> Result<Option<Regex>, regex::Error> {
            opt.map(|p| Regex::new(&p)).transpose()
        };

        let genre_noise = match self.genre_noise {
            ListOverrideBuilder::Default => ListOverride::Default,
            ListOverrideBuilder::Replace(v) => ListOverride::Replace(v),
            ListOverrideBuilder::Extend(v) => ListOverride::Extend(v),
        };

        let defaults = AnalyzerConfig::default();
        Ok(AnalyzerConfig {
            pages_trigger_re: compile(self.pages_trigger_re)?,
            rating_re: compile(self.rating_re)?,
            year_re: compile(self.year_re)?,
            genre_noise,
            max_genres: self.max_genres.unwrap_or(defaults.max_genres),
            default_language: self
                .default_language
                .unwrap_or(defaults.default_language),
            default_format: self.default_format.unwrap_or(defaults.default_format),
            default_audience: self
                .default_audience
                .unwrap_or(defaults.default_audience),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.max_genres, 15);
        assert_eq!(config.default_language, "English");
        assert_eq!(config.default_format, "Digital");
        assert_eq!(config.default_audience, "Young Adult");
        assert!(config.pages_trigger_re.is_none());
    }

    #[test]
    fn test_builder_basic() {
        let config = AnalyzerConfigBuilder::new()
            .max_genres(5)
            .default_language("German")
            .default_audience("Adult")
            .build()
            .unwrap();
        assert_eq!(config.max_genres, 5);
        assert_eq!(config.default_language, "German");
        assert_eq!(config.default_audience, "Adult");
        // Unset scalars keep their defaults.
        assert_eq!(config.default_format, "Digital");
    }

    #[test]
    fn test_builder_custom_regex() {
        let config = AnalyzerConfigBuilder::new()
            .pages_trigger_regex(r"^\d+\s*Seiten")
            .build()
            .unwrap();
        assert!(config.pages_trigger_re.is_some());
    }

    #[test]
    fn test_builder_invalid_regex() {
        let result = AnalyzerConfigBuilder::new()
            .year_regex(r"[invalid")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn test_list_override_resolve() {
        let defaults = vec!["a".to_string(), "b".to_string()];

        let d: ListOverride<String> = ListOverride::Default;
        assert_eq!(d.resolve(&defaults), defaults);

        let r: ListOverride<String> = ListOverride::Replace(vec!["x".to_string()]);
        assert_eq!(r.resolve(&defaults), vec!["x".to_string()]);

        let e: ListOverride<String> = ListOverride::Extend(vec!["c".to_string()]);
        assert_eq!(
            e.resolve(&defaults),
            vec!["a".to_string(), "b".to_string(), "c".to_string()]
        );
    }

    #[test]
    fn test_add_genre_noise_accumulates() {
        let config = AnalyzerConfigBuilder::new()
            .add_genre_noise("Audiobook".to_string())
            .add_genre_noise("Kindle".to_string())
            .build()
            .unwrap();
        match config.genre_noise {
            ListOverride::Extend(v) => assert_eq!(v, vec!["Audiobook", "Kindle"]),
            _ => panic!("expected Extend"),
        }
    }
}
