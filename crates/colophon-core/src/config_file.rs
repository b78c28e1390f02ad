use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// On-disk TOML configuration structure.
/// All fields are optional so partial configs work (merge with defaults).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    pub defaults: Option<DefaultsConfig>,
    pub analyzer: Option<AnalyzerFileConfig>,
    pub display: Option<DisplayConfig>,
}

/// Fallback values used when input is silent about a field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub language: Option<String>,
    pub format: Option<String>,
    pub audience: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyzerFileConfig {
    /// Extra genre-chip tokens to treat as UI chrome rather than genres.
    pub genre_noise: Option<Vec<String>>,
    pub max_genres: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub color: Option<bool>,
}

/// Platform config directory path: `<config_dir>/colophon/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("colophon").join("config.toml"))
}

/// Load config by cascading CWD `.colophon.toml` over platform config.
/// CWD values override platform values.
pub fn load_config() -> ConfigFile {
    let platform = config_path().and_then(|p| load_from_path(&p));
    let cwd = load_from_path(&PathBuf::from(".colophon.toml"));

    match (platform, cwd) {
        (None, None) => ConfigFile::default(),
        (Some(p), None) => p,
        (None, Some(c)) => c,
        (Some(p), Some(c)) => merge(p, c),
    }
}

/// Load a config from a specific path. Returns `None` if the file doesn't
/// exist or can't be parsed.
pub fn load_from_path(path: &PathBuf) -> Option<ConfigFile> {
    let content = std::fs::read_to_string(path).ok()?;
    match toml::from_str(&content) {
        Ok(config) => Some(config),
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "ignoring unparseable config file");
            None
        }
    }
}

/// Merge two configs: `overlay` values take precedence over `base`.
pub fn merge(base: ConfigFile, overlay: ConfigFile) -> ConfigFile {
    ConfigFile {
        defaults: Some(DefaultsConfig {
            language: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.language.clone())
                .or_else(|| base.defaults.as_ref().and_then(|d| d.language.clone())),
            format: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.format.clone())
                .or_else(|| base.defaults.as_ref().and_then(|d| d.format.clone())),
            audience: overlay
                .defaults
                .as_ref()
                .and_then(|d| d.audience.clone())
                .or_else(|| base.defaults.as_ref().and_then(|d| d.audience.clone())),
        }),
        analyzer: Some(AnalyzerFileConfig {
            genre_noise: overlay
                .analyzer
                .as_ref()
                .and_then(|a| a.genre_noise.clone())
                .or_else(|| base.analyzer.as_ref().and_then(|a| a.genre_noise.clone())),
            max_genres: overlay
                .analyzer
                .as_ref()
                .and_then(|a| a.max_genres)
                .or_else(|| base.analyzer.as_ref().and_then(|a| a.max_genres)),
        }),
        display: Some(DisplayConfig {
            color: overlay
                .display
                .as_ref()
                .and_then(|d| d.color)
                .or_else(|| base.display.as_ref().and_then(|d| d.color)),
        }),
    }
}

/// Save the current config to the platform config directory.
pub fn save_config(config: &ConfigFile) -> Result<PathBuf, String> {
    let path = config_path().ok_or_else(|| "Could not determine config directory".to_string())?;
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }
    let content =
        toml::to_string_pretty(config).map_err(|e| format!("Failed to serialize config: {}", e))?;
    std::fs::write(&path, content).map_err(|e| format!("Failed to write config: {}", e))?;
    Ok(path)
}
