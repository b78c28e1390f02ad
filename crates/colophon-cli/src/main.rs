use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};

mod output;

use colophon_core::config_file::{self, ConfigFile};
use colophon_core::{
    AnalyzedBook, BookRecord, Catalog, EntityResolver, InMemoryBackend, Resolution, ScanStats,
};
use colophon_parsing::{
    AnalyzerConfig, AnalyzerConfigBuilder, CatalogAnalyzer, parse_bulk_with_config,
    to_bulk_format,
};
use output::ColorMode;

/// Colophon - personal book-library text tools
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Analyze catalog text pasted from a book detail page
    Analyze {
        /// Path to the text file, or "-" for stdin
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to a JSON library catalog for entity resolution
        #[arg(long)]
        library: Option<PathBuf>,

        /// Write entities created during resolution back to the catalog
        #[arg(long, requires = "library")]
        save_library: bool,

        /// Language to assume when the text names none
        #[arg(long)]
        language: Option<String>,
    },

    /// Parse a bulk book entry (one field per line, fixed order)
    Bulk {
        /// Path to the bulk entry file, or "-" for stdin
        file_path: PathBuf,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
        format: OutputFormat,

        /// Path to a JSON library catalog for entity resolution
        #[arg(long)]
        library: Option<PathBuf>,

        /// Write entities created during resolution back to the catalog
        #[arg(long, requires = "library")]
        save_library: bool,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
enum OutputFormat {
    Text,
    Json,
    /// The positional bulk layout (analyze only)
    Bulk,
}

#[derive(serde::Serialize)]
struct AnalyzeReport<'a> {
    book: &'a AnalyzedBook,
    stats: &'a ScanStats,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a Resolution>,
}

#[derive(serde::Serialize)]
struct BulkReport<'a> {
    record: &'a BookRecord,
    #[serde(skip_serializing_if = "Option::is_none")]
    resolution: Option<&'a Resolution>,
}

fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Command::Analyze {
            file_path,
            no_color,
            output,
            format,
            library,
            save_library,
            language,
        } => analyze(
            file_path,
            no_color,
            output,
            format,
            library,
            save_library,
            language,
        ),
        Command::Bulk {
            file_path,
            no_color,
            output,
            format,
            library,
            save_library,
        } => bulk(file_path, no_color, output, format, library, save_library),
    }
}

#[allow(clippy::too_many_arguments)]
fn analyze(
    file_path: PathBuf,
    no_color: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
    library: Option<PathBuf>,
    save_library: bool,
    language: Option<String>,
) -> anyhow::Result<()> {
    let file_config = config_file::load_config();
    let config = build_analyzer_config(&file_config, language)?;
    let text = read_input(&file_path)?;

    let result = CatalogAnalyzer::with_config(config).analyze(&text);
    tracing::debug!(
        title = %result.book.title,
        lines = result.stats.total_lines,
        "analysis complete"
    );

    let resolution = resolve_with_library(library.as_deref(), save_library, |resolver| {
        resolver.resolve_analyzed(&result.book)
    })?;

    let color = color_mode(no_color, &output, &file_config);
    let mut writer = open_writer(&output)?;
    match format {
        OutputFormat::Text => {
            output::print_analysis(&mut *writer, &result, color)?;
            if let Some(resolution) = &resolution {
                output::print_resolution(&mut *writer, resolution, color)?;
            }
        }
        OutputFormat::Json => {
            let report = AnalyzeReport {
                book: &result.book,
                stats: &result.stats,
                resolution: resolution.as_ref(),
            };
            serde_json::to_writer_pretty(&mut *writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Bulk => {
            writeln!(writer, "{}", to_bulk_format(&result.book))?;
        }
    }
    Ok(())
}

fn bulk(
    file_path: PathBuf,
    no_color: bool,
    output: Option<PathBuf>,
    format: OutputFormat,
    library: Option<PathBuf>,
    save_library: bool,
) -> anyhow::Result<()> {
    if format == OutputFormat::Bulk {
        anyhow::bail!("the bulk output format is only available with the analyze command");
    }

    let file_config = config_file::load_config();
    let config = build_analyzer_config(&file_config, None)?;
    let text = read_input(&file_path)?;

    let record = parse_bulk_with_config(&text, &config)
        .map_err(|e| anyhow::anyhow!("invalid bulk entry: {}", e))?;

    let resolution = resolve_with_library(library.as_deref(), save_library, |resolver| {
        resolver.resolve_record(&record)
    })?;

    let color = color_mode(no_color, &output, &file_config);
    let mut writer = open_writer(&output)?;
    match format {
        OutputFormat::Text => {
            output::print_record(&mut *writer, &record, color)?;
            if let Some(resolution) = &resolution {
                output::print_resolution(&mut *writer, resolution, color)?;
            }
        }
        OutputFormat::Json => {
            let report = BulkReport {
                record: &record,
                resolution: resolution.as_ref(),
            };
            serde_json::to_writer_pretty(&mut *writer, &report)?;
            writeln!(writer)?;
        }
        OutputFormat::Bulk => unreachable!(),
    }
    Ok(())
}

/// Resolve configuration: CLI flags > env vars > config file > defaults.
fn build_analyzer_config(
    file: &ConfigFile,
    language_flag: Option<String>,
) -> anyhow::Result<AnalyzerConfig> {
    let mut builder = AnalyzerConfigBuilder::new();

    if let Some(defaults) = &file.defaults {
        if let Some(format) = &defaults.format {
            builder = builder.default_format(format);
        }
        if let Some(audience) = &defaults.audience {
            builder = builder.default_audience(audience);
        }
    }
    if let Some(analyzer) = &file.analyzer {
        if let Some(noise) = &analyzer.genre_noise {
            for token in noise {
                builder = builder.add_genre_noise(token.clone());
            }
        }
        if let Some(max) = analyzer.max_genres {
            builder = builder.max_genres(max);
        }
    }

    let language = language_flag
        .or_else(|| std::env::var("COLOPHON_LANGUAGE").ok())
        .or_else(|| file.defaults.as_ref().and_then(|d| d.language.clone()));
    if let Some(language) = language {
        builder = builder.default_language(language);
    }

    builder
        .build()
        .map_err(|e| anyhow::anyhow!("invalid pattern in configuration: {}", e))
}

fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        std::io::stdin().read_to_string(&mut text)?;
        return Ok(text);
    }
    if !path.exists() {
        anyhow::bail!("File not found: {}", path.display());
    }
    Ok(std::fs::read_to_string(path)?)
}

fn color_mode(no_color: bool, output: &Option<PathBuf>, file: &ConfigFile) -> ColorMode {
    let config_color = file
        .display
        .as_ref()
        .and_then(|d| d.color)
        .unwrap_or(true);
    ColorMode(!no_color && output.is_none() && config_color)
}

fn open_writer(output: &Option<PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(if let Some(path) = output {
        Box::new(std::fs::File::create(path)?)
    } else {
        Box::new(std::io::stdout())
    })
}

/// Run a resolution pass against the JSON catalog at `path`, optionally
/// writing created entities back.
fn resolve_with_library(
    path: Option<&Path>,
    save: bool,
    run: impl FnOnce(&mut EntityResolver<InMemoryBackend>) -> Resolution,
) -> anyhow::Result<Option<Resolution>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let backend = load_library(path)?;
    let mut resolver = EntityResolver::new(backend);
    let resolution = run(&mut resolver);
    if save {
        save_library(path, resolver.backend())?;
    }
    Ok(Some(resolution))
}

fn load_library(path: &Path) -> anyhow::Result<InMemoryBackend> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "library catalog not found, starting empty");
        return Ok(InMemoryBackend::new());
    }
    let data = std::fs::read_to_string(path)?;
    let catalog: Catalog = serde_json::from_str(&data)
        .map_err(|e| anyhow::anyhow!("invalid library catalog {}: {}", path.display(), e))?;
    Ok(catalog.into_backend())
}

fn save_library(path: &Path, backend: &InMemoryBackend) -> anyhow::Result<()> {
    let catalog = Catalog::from(backend);
    std::fs::write(path, serde_json::to_string_pretty(&catalog)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colophon_core::{EntityKind, LibraryBackend};

    #[test]
    fn test_build_analyzer_config_language_cascade() {
        let mut file = ConfigFile::default();
        file.defaults = Some(config_file::DefaultsConfig {
            language: Some("French".to_string()),
            format: None,
            audience: None,
        });
        // Flag wins over the config file.
        let config =
            build_analyzer_config(&file, Some("German".to_string())).unwrap();
        assert_eq!(config.default_language(), "German");
        // Without a flag the config file applies.
        let config = build_analyzer_config(&file, None).unwrap();
        assert_eq!(config.default_language(), "French");
    }

    #[test]
    fn test_color_mode_disabled_for_file_output() {
        let file = ConfigFile::default();
        assert!(color_mode(false, &None, &file).enabled());
        assert!(!color_mode(true, &None, &file).enabled());
        assert!(!color_mode(false, &Some(PathBuf::from("out.txt")), &file).enabled());
    }

    #[test]
    fn test_library_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        // Missing catalogs start empty rather than failing.
        let backend = load_library(&path).unwrap();
        assert!(backend.is_empty());

        let mut backend = InMemoryBackend::new();
        backend.insert(EntityKind::Author, 3, "Frank Herbert");
        save_library(&path, &backend).unwrap();

        let reloaded = load_library(&path).unwrap();
        assert_eq!(
            reloaded.lookup(EntityKind::Author, "Frank Herbert"),
            Some(3)
        );
    }

    #[test]
    fn test_resolve_with_library_saves_created_entities() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");

        let resolution = resolve_with_library(Some(&path), true, |resolver| {
            resolver.resolve("Frank Herbert", Some("Dune Chronicles"), &[])
        })
        .unwrap()
        .unwrap();
        assert_eq!(resolution.created.len(), 2);

        let backend = load_library(&path).unwrap();
        assert!(backend.lookup(EntityKind::Author, "Frank Herbert").is_some());
        assert!(
            backend
                .lookup(EntityKind::Series, "Dune Chronicles")
                .is_some()
        );
    }
}
