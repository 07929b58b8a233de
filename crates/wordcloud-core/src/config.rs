//! Configuration loading and discovery.
//!
//! This module provides configuration file discovery by:
//! 1. Walking up from the current directory to find project config
//! 2. Loading user config from XDG config directory
//! 3. Merging with sensible defaults
//!
//! # Supported formats
//!
//! The following configuration file formats are supported:
//! - TOML (`.toml`)
//! - YAML (`.yaml`, `.yml`)
//! - JSON (`.json`)
//!
//! # Config file locations (in order of precedence, highest first):
//! - `wordcloud.<ext>` in current directory or any parent
//! - `.wordcloud.<ext>` in current directory or any parent
//! - `~/.config/wordcloud/config.<ext>` (user config)
//!
//! Where `<ext>` is one of: `toml`, `yaml`, `yml`, `json`
//!
//! When multiple files exist in the same directory, all are merged via figment.
//! Later extensions override earlier: toml < yaml < yml < json.
//!
//! Environment variables prefixed with `WORDCLOUD_` override every file.
//! Nested keys use a double underscore: `WORDCLOUD_LAYOUT__SEED=42`.
//!
//! # Example
//! ```no_run
//! use camino::Utf8PathBuf;
//! use wordcloud_core::config::{Config, ConfigLoader};
//!
//! let cwd = std::env::current_dir().unwrap();
//! let cwd = Utf8PathBuf::try_from(cwd).expect("current directory is not valid UTF-8");
//! let (config, _sources) = ConfigLoader::new()
//!     .with_project_search(&cwd)
//!     .load()
//!     .unwrap();
//! println!("canvas: {}x{}", config.layout.canvas_width, config.layout.canvas_height);
//! ```

use camino::{Utf8Path, Utf8PathBuf};
use figment::Figment;
use figment::providers::{Env, Format, Json, Serialized, Toml, Yaml};
use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult, LayoutError, LayoutResult};
use crate::selection::SelectionOptions;

/// Whether placed words may be rotated 90°.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum RotationPolicy {
    /// Every word is horizontal.
    #[default]
    Never,
    /// Every word is rotated.
    Always,
    /// Each word is rotated with probability one half.
    Random,
}

impl RotationPolicy {
    /// Returns the policy as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Never => "never",
            Self::Always => "always",
            Self::Random => "random",
        }
    }
}

impl std::fmt::Display for RotationPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What to do with a word that cannot fit the canvas at the minimum font size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OversizePolicy {
    /// Skip the word and keep going.
    #[default]
    Abandon,
    /// Abort the whole layout with an error.
    Fail,
}

impl OversizePolicy {
    /// Returns the policy as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Abandon => "abandon",
            Self::Fail => "fail",
        }
    }
}

/// Word selection and placement settings for one layout session.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct LayoutConfig {
    /// Canvas width in pixels.
    pub canvas_width: u32,
    /// Canvas height in pixels.
    pub canvas_height: u32,
    /// Maximum number of candidate words taken from the ranking.
    pub max_words: usize,
    /// Number of most frequent candidates to drop before normalizing.
    pub discard_top: usize,
    /// Font size scale for the most important word.
    pub max_font_size: f32,
    /// Smallest font size a word is ever placed at.
    pub min_font_size: f32,
    /// Horizontal padding added on each side of a word's box.
    pub padding_x: u32,
    /// Vertical padding added on each side of a word's box.
    pub padding_y: u32,
    /// Failed attempts between backoff checks.
    pub attempts_per_check: u64,
    /// Failed attempts at one font size before shrinking.
    pub max_attempts_before_shrink: u64,
    /// Factor applied to the font size on each shrink, in `(0, 1)`.
    pub shrink_factor: f32,
    /// Random seed; unset draws one from the OS.
    pub seed: Option<u64>,
    /// Rotation policy.
    pub rotation: RotationPolicy,
    /// Handling of words too large for the canvas.
    pub oversize: OversizePolicy,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas_width: 1024,
            canvas_height: 768,
            max_words: 100,
            discard_top: 10,
            max_font_size: 64.0,
            min_font_size: 8.0,
            padding_x: 5,
            padding_y: 5,
            attempts_per_check: 100_000,
            max_attempts_before_shrink: 500_000,
            shrink_factor: 0.9,
            seed: None,
            rotation: RotationPolicy::Never,
            oversize: OversizePolicy::Abandon,
        }
    }
}

impl LayoutConfig {
    /// Selection parameters derived from this config.
    pub const fn selection(&self) -> SelectionOptions {
        SelectionOptions {
            limit: self.max_words,
            discard_top: self.discard_top,
        }
    }

    /// Check every parameter the placement engine depends on.
    pub fn validate(&self) -> LayoutResult<()> {
        if self.canvas_width == 0 || self.canvas_height == 0 {
            return Err(LayoutError::InvalidCanvas {
                width: self.canvas_width,
                height: self.canvas_height,
            });
        }
        if !(self.min_font_size.is_finite() && self.min_font_size > 0.0) {
            return Err(invalid("min_font_size", "must be a positive number"));
        }
        if !(self.max_font_size.is_finite() && self.max_font_size >= self.min_font_size) {
            return Err(invalid("max_font_size", "must be at least min_font_size"));
        }
        if !(self.shrink_factor > 0.0 && self.shrink_factor < 1.0) {
            return Err(invalid("shrink_factor", "must be between 0 and 1"));
        }
        if self.attempts_per_check == 0 {
            return Err(invalid("attempts_per_check", "must be positive"));
        }
        if self.max_attempts_before_shrink == 0 {
            return Err(invalid("max_attempts_before_shrink", "must be positive"));
        }
        Ok(())
    }
}

fn invalid(name: &'static str, reason: &str) -> LayoutError {
    LayoutError::InvalidParameter {
        name,
        reason: reason.to_string(),
    }
}

/// The configuration for wordcloud.
///
/// Deserialized from config files found during discovery (TOML, YAML, or JSON).
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Log level for the application (e.g., "debug", "info", "warn", "error").
    pub log_level: LogLevel,
    /// Directory for log files (file logging is off when unset).
    pub log_dir: Option<Utf8PathBuf>,
    /// Maximum input size in bytes (default: 5 MiB).
    ///
    /// Omit to use the default. Use `disable_input_limit` to remove the
    /// limit entirely.
    pub max_input_bytes: Option<usize>,
    /// Disable the input size limit entirely.
    ///
    /// When `true`, `max_input_bytes` is ignored and no size check is performed.
    /// Default: `false`.
    #[serde(default)]
    pub disable_input_limit: bool,
    /// Extra stop words, added to the built-in English list.
    pub stop_words: Option<Vec<String>>,
    /// Selection and placement settings.
    pub layout: LayoutConfig,
}

/// Log level configuration.
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Verbose output for debugging and development.
    Debug,
    /// Standard operational information (default).
    #[default]
    Info,
    /// Warnings about potential issues.
    Warn,
    /// Errors that indicate failures.
    Error,
}

impl LogLevel {
    /// Returns the log level as a lowercase string slice.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }
}

/// Metadata about which configuration sources were loaded.
///
/// Returned alongside [`Config`] from [`ConfigLoader::load()`] so commands
/// can report the actual config files without re-discovering them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ConfigSources {
    /// Project config files found by walking up, ordered low→high precedence.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub project_files: Vec<Utf8PathBuf>,
    /// User config file from XDG config directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_file: Option<Utf8PathBuf>,
    /// Explicit config files loaded (e.g., from `--config` flag).
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigSources {
    /// Returns the highest-precedence config file that was loaded.
    ///
    /// Precedence: explicit files > project files > user file.
    pub fn primary_file(&self) -> Option<&Utf8Path> {
        self.explicit_files
            .last()
            .map(Utf8PathBuf::as_path)
            .or_else(|| self.project_files.last().map(Utf8PathBuf::as_path))
            .or(self.user_file.as_deref())
    }
}

/// Supported configuration file extensions (in order of preference).
const CONFIG_EXTENSIONS: &[&str] = &["toml", "yaml", "yml", "json"];

/// Application name for XDG directory lookup and config file names.
const APP_NAME: &str = "wordcloud";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "WORDCLOUD_";

/// Builder for loading configuration from multiple sources.
#[derive(Debug, Default)]
pub struct ConfigLoader {
    /// Starting directory for project config search.
    project_search_root: Option<Utf8PathBuf>,
    /// Whether to include user config from XDG directory.
    include_user_config: bool,
    /// Stop searching when we hit a directory containing this file/dir.
    boundary_marker: Option<String>,
    /// Explicit config files to load (for testing or programmatic use).
    explicit_files: Vec<Utf8PathBuf>,
}

impl ConfigLoader {
    /// Create a new config loader with default settings.
    pub fn new() -> Self {
        Self {
            project_search_root: None,
            include_user_config: true,
            boundary_marker: Some(".git".to_string()),
            explicit_files: Vec::new(),
        }
    }

    /// Set the starting directory for project config search.
    ///
    /// The loader will walk up from this directory looking for config files.
    pub fn with_project_search<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.project_search_root = Some(path.as_ref().to_path_buf());
        self
    }

    /// Set whether to include user config from `~/.config/wordcloud/`.
    pub const fn with_user_config(mut self, include: bool) -> Self {
        self.include_user_config = include;
        self
    }

    /// Set a boundary marker to stop directory traversal.
    ///
    /// When walking up directories, stop if we find a directory containing
    /// this file or directory name. Default is `.git`.
    pub fn with_boundary_marker<S: Into<String>>(mut self, marker: S) -> Self {
        self.boundary_marker = Some(marker.into());
        self
    }

    /// Disable boundary marker (search all the way to filesystem root).
    pub fn without_boundary_marker(mut self) -> Self {
        self.boundary_marker = None;
        self
    }

    /// Add an explicit config file to load.
    ///
    /// Files are loaded in order, with later files taking precedence.
    /// Explicit files are loaded after discovered files.
    pub fn with_file<P: AsRef<Utf8Path>>(mut self, path: P) -> Self {
        self.explicit_files.push(path.as_ref().to_path_buf());
        self
    }

    /// Load configuration, merging all discovered sources.
    ///
    /// Precedence (highest to lowest):
    /// 1. Environment variables (`WORDCLOUD_*`)
    /// 2. Explicit files (in order added via `with_file`)
    /// 3. Project config (closest to search root)
    /// 4. User config (`~/.config/wordcloud/config.<ext>`)
    /// 5. Default values
    #[tracing::instrument(skip(self), fields(search_root = ?self.project_search_root))]
    pub fn load(self) -> ConfigResult<(Config, ConfigSources)> {
        tracing::debug!("loading configuration");
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));
        let mut sources = ConfigSources::default();

        // Start with user config (lowest precedence of file sources)
        if self.include_user_config
            && let Some(user_config) = self.find_user_config()
        {
            figment = Self::merge_file(figment, &user_config);
            sources.user_file = Some(user_config);
        }

        // Add project configs (ordered low→high precedence)
        if let Some(ref root) = self.project_search_root {
            let project_configs = self.find_project_configs(root);
            for pc in &project_configs {
                figment = Self::merge_file(figment, pc);
            }
            sources.project_files = project_configs;
        }

        for file in &self.explicit_files {
            figment = Self::merge_file(figment, file);
        }
        sources.explicit_files = self.explicit_files;

        // WORDCLOUD_LOG_LEVEL=debug, WORDCLOUD_LAYOUT__CANVAS_WIDTH=800, etc.
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__").lowercase(true));

        let config: Config = figment
            .extract()
            .map_err(|e| ConfigError::Deserialize(Box::new(e)))?;
        tracing::info!(
            log_level = config.log_level.as_str(),
            canvas_width = config.layout.canvas_width,
            canvas_height = config.layout.canvas_height,
            "configuration loaded"
        );
        Ok((config, sources))
    }

    /// Load configuration, returning an error if no config file is found.
    pub fn load_or_error(self) -> ConfigResult<(Config, ConfigSources)> {
        let has_user = self.include_user_config && self.find_user_config().is_some();
        let has_project = self
            .project_search_root
            .as_ref()
            .is_some_and(|root| !self.find_project_configs(root).is_empty());
        let has_explicit = !self.explicit_files.is_empty();

        if !has_user && !has_project && !has_explicit {
            return Err(ConfigError::NotFound);
        }

        self.load()
    }

    /// Find project config files by walking up from the given directory.
    ///
    /// Returns all matching config files from the closest directory that has
    /// any match, dotfiles before regular files (low to high precedence).
    fn find_project_configs(&self, start: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut current = Some(start.to_path_buf());

        while let Some(dir) = current {
            let mut found = Vec::new();

            for ext in CONFIG_EXTENSIONS {
                let dotfile = dir.join(format!(".{APP_NAME}.{ext}"));
                if dotfile.is_file() {
                    found.push(dotfile);
                }
            }
            for ext in CONFIG_EXTENSIONS {
                let regular = dir.join(format!("{APP_NAME}.{ext}"));
                if regular.is_file() {
                    found.push(regular);
                }
            }

            if !found.is_empty() {
                return found;
            }

            // Check for boundary marker AFTER checking config files,
            // so a config in the same directory as the marker is found.
            if let Some(ref marker) = self.boundary_marker
                && dir.join(marker).exists()
                && dir != start
            {
                break;
            }

            current = dir.parent().map(Utf8Path::to_path_buf);
        }

        Vec::new()
    }

    /// Find user config in XDG config directory.
    fn find_user_config(&self) -> Option<Utf8PathBuf> {
        let config_dir = user_config_dir()?;
        CONFIG_EXTENSIONS
            .iter()
            .map(|ext| config_dir.join(format!("config.{ext}")))
            .find(|path| path.is_file())
    }

    /// Merge a config file into the figment, detecting format from extension.
    fn merge_file(figment: Figment, path: &Utf8Path) -> Figment {
        match path.extension() {
            Some("toml") => figment.merge(Toml::file_exact(path.as_str())),
            Some("yaml" | "yml") => figment.merge(Yaml::file_exact(path.as_str())),
            Some("json") => figment.merge(Json::file_exact(path.as_str())),
            _ => figment.merge(Toml::file_exact(path.as_str())),
        }
    }
}

/// Get the project directories for XDG-compliant path resolution.
///
/// Returns `None` if the home directory cannot be determined.
fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("", "", APP_NAME)
}

/// Get the user config directory path.
///
/// Returns `~/.config/wordcloud/` on Linux, `~/Library/Application Support/wordcloud/`
/// on macOS, and equivalent on other platforms.
pub fn user_config_dir() -> Option<Utf8PathBuf> {
    let proj_dirs = project_dirs()?;
    Utf8PathBuf::from_path_buf(proj_dirs.config_dir().to_path_buf()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Serializes tests that mutate environment variables via `set_var`/`remove_var`.
    static TEST_ENV_MUTEX: Mutex<()> = Mutex::new(());

    fn load_file(name: &str, contents: &str) -> Config {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join(name);
        fs::write(&config_path, contents).unwrap();
        let config_path = Utf8PathBuf::try_from(config_path).unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&config_path)
            .load()
            .unwrap();
        config
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(config.log_dir.is_none());
        assert!(config.stop_words.is_none());
        assert_eq!(config.layout, LayoutConfig::default());
    }

    #[test]
    fn test_default_layout_values() {
        let layout = LayoutConfig::default();
        assert_eq!((layout.canvas_width, layout.canvas_height), (1024, 768));
        assert_eq!(layout.max_words, 100);
        assert_eq!(layout.discard_top, 10);
        assert_eq!(layout.max_font_size, 64.0);
        assert_eq!(layout.min_font_size, 8.0);
        assert_eq!((layout.padding_x, layout.padding_y), (5, 5));
        assert_eq!(layout.attempts_per_check, 100_000);
        assert_eq!(layout.max_attempts_before_shrink, 500_000);
        assert_eq!(layout.shrink_factor, 0.9);
        assert!(layout.seed.is_none());
        assert_eq!(layout.rotation, RotationPolicy::Never);
        assert_eq!(layout.oversize, OversizePolicy::Abandon);
        assert!(layout.validate().is_ok());
    }

    #[test]
    fn test_loader_builds_with_defaults() {
        let loader = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker();

        // Should succeed with defaults even if no files found
        let (config, sources) = loader.load().unwrap();
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.primary_file().is_none());
    }

    #[test]
    fn test_single_file_overrides_default() {
        let config = load_file(
            "config.toml",
            r#"log_level = "debug"
log_dir = "/tmp/wordcloud"

[layout]
canvas_width = 640
seed = 42
rotation = "random"
"#,
        );

        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(
            config.log_dir.as_ref().map(|dir| dir.as_str()),
            Some("/tmp/wordcloud")
        );
        assert_eq!(config.layout.canvas_width, 640);
        assert_eq!(config.layout.canvas_height, 768);
        assert_eq!(config.layout.seed, Some(42));
        assert_eq!(config.layout.rotation, RotationPolicy::Random);
    }

    #[test]
    fn test_yaml_and_json_formats() {
        let yaml = load_file(
            "config.yaml",
            "layout:\n  discard_top: 0\n  oversize: fail\nstop_words: [reddit, comments]\n",
        );
        assert_eq!(yaml.layout.discard_top, 0);
        assert_eq!(yaml.layout.oversize, OversizePolicy::Fail);
        assert_eq!(
            yaml.stop_words,
            Some(vec!["reddit".to_string(), "comments".to_string()])
        );

        let json = load_file("config.json", r#"{"layout": {"max_words": 25}}"#);
        assert_eq!(json.layout.max_words, 25);
    }

    #[test]
    fn test_later_file_overrides_earlier() {
        let tmp = TempDir::new().unwrap();

        let base_config = tmp.path().join("base.toml");
        fs::write(&base_config, "[layout]\nmax_words = 50\n").unwrap();

        let override_config = tmp.path().join("override.toml");
        fs::write(&override_config, "[layout]\nmax_words = 20\n").unwrap();

        let base_config = Utf8PathBuf::try_from(base_config).unwrap();
        let override_config = Utf8PathBuf::try_from(override_config).unwrap();

        let (config, _sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&base_config)
            .with_file(&override_config)
            .load()
            .unwrap();

        // Later file wins
        assert_eq!(config.layout.max_words, 20);
    }

    #[test]
    fn test_project_config_discovery() {
        let tmp = TempDir::new().unwrap();
        let project_dir = tmp.path().join("project");
        let sub_dir = project_dir.join("src").join("deep");
        fs::create_dir_all(&sub_dir).unwrap();

        let config_path = project_dir.join(".wordcloud.toml");
        fs::write(&config_path, r#"log_level = "debug""#).unwrap();

        let sub_dir = Utf8PathBuf::try_from(sub_dir).unwrap();

        // Search from deep subdirectory
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&sub_dir)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Debug);
        assert!(!sources.project_files.is_empty());
    }

    #[test]
    fn test_regular_file_overrides_dotfile() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".wordcloud.toml"), r#"log_level = "debug""#).unwrap();
        fs::write(tmp.path().join("wordcloud.toml"), r#"log_level = "warn""#).unwrap();

        let tmp_path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&tmp_path)
            .load()
            .unwrap();

        assert_eq!(config.log_level, LogLevel::Warn);
        assert_eq!(sources.project_files.len(), 2);
        assert!(sources.primary_file().unwrap().as_str().ends_with("/wordcloud.toml"));
    }

    #[test]
    fn test_boundary_marker_stops_search() {
        let tmp = TempDir::new().unwrap();

        // Create structure: /parent/config.toml, /parent/child/.git/, /parent/child/work/
        let parent = tmp.path().join("parent");
        let child = parent.join("child");
        let work = child.join("work");
        fs::create_dir_all(&work).unwrap();

        // Config in parent (should NOT be found due to .git boundary)
        fs::write(parent.join(".wordcloud.toml"), r#"log_level = "warn""#).unwrap();

        fs::create_dir(child.join(".git")).unwrap();

        let work = Utf8PathBuf::try_from(work).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .with_boundary_marker(".git")
            .with_project_search(&work)
            .load()
            .unwrap();

        // Should get default since config is beyond boundary
        assert_eq!(config.log_level, LogLevel::Info);
        assert!(sources.project_files.is_empty());
    }

    #[test]
    fn test_explicit_file_overrides_project_config() {
        let tmp = TempDir::new().unwrap();

        let project_config = tmp.path().join(".wordcloud.toml");
        fs::write(&project_config, r#"log_level = "warn""#).unwrap();

        let override_config = tmp.path().join("override.toml");
        fs::write(&override_config, r#"log_level = "error""#).unwrap();

        let tmp_path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let override_config = Utf8PathBuf::try_from(override_config).unwrap();

        let (config, sources) = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .with_project_search(&tmp_path)
            .with_file(&override_config)
            .load()
            .unwrap();

        // Explicit file wins over project config
        assert_eq!(config.log_level, LogLevel::Error);
        assert!(!sources.project_files.is_empty());
        assert_eq!(sources.explicit_files.len(), 1);
    }

    #[test]
    fn test_load_or_error_fails_when_no_config() {
        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load_or_error();

        assert!(matches!(result, Err(ConfigError::NotFound)));
    }

    #[test]
    fn test_invalid_value_is_a_deserialize_error() {
        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[layout]\nrotation = \"sideways\"\n").unwrap();
        let config_path = Utf8PathBuf::try_from(config_path).unwrap();

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&config_path)
            .load();
        assert!(matches!(result, Err(ConfigError::Deserialize(_))));
    }

    #[test]
    fn test_user_config_dir() {
        // Should return Some on most systems
        if let Some(path) = user_config_dir() {
            assert!(path.as_str().contains("wordcloud"));
        }
    }

    #[test]
    fn disable_input_limit_overrides_max_bytes() {
        let config = load_file(
            "config.toml",
            "max_input_bytes = 1024\ndisable_input_limit = true\n",
        );

        // disable_input_limit should be true, signalling callers to ignore max_input_bytes
        assert!(config.disable_input_limit);
        assert_eq!(config.max_input_bytes, Some(1024));
    }

    // Env tests only touch keys that no unlocked test asserts on.

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_nested_layout_key() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        let tmp = TempDir::new().unwrap();
        let config_path = tmp.path().join("config.toml");
        fs::write(&config_path, "[layout]\npadding_y = 1\n").unwrap();
        let config_path = Utf8PathBuf::try_from(config_path).unwrap();

        // SAFETY: Test environment — mutex serializes env access across tests.
        unsafe {
            std::env::set_var("WORDCLOUD_LAYOUT__PADDING_Y", "9");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .with_file(&config_path)
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("WORDCLOUD_LAYOUT__PADDING_Y");
        }

        let (config, _sources) = result.unwrap();
        assert_eq!(config.layout.padding_y, 9);
    }

    #[test]
    #[allow(unsafe_code)]
    fn test_env_var_overrides_top_level_key() {
        let _lock = TEST_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());

        // SAFETY: Test environment — mutex serializes env access across tests.
        unsafe {
            std::env::set_var("WORDCLOUD_DISABLE_INPUT_LIMIT", "true");
        }

        let result = ConfigLoader::new()
            .with_user_config(false)
            .without_boundary_marker()
            .load();

        // SAFETY: Cleanup after test.
        unsafe {
            std::env::remove_var("WORDCLOUD_DISABLE_INPUT_LIMIT");
        }

        assert!(result.unwrap().0.disable_input_limit);
    }

    #[test]
    fn layout_deserializes_from_yaml() {
        let yaml = "layout:\n  canvas_width: 300\n  canvas_height: 200\n  padding_x: 2\n";
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.layout.canvas_width, 300);
        assert_eq!(config.layout.padding_x, 2);
        assert_eq!(config.layout.padding_y, 5);
    }

    #[test]
    fn validate_rejects_bad_parameters() {
        let bad = [
            LayoutConfig {
                canvas_height: 0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                min_font_size: 0.0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                max_font_size: 4.0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                shrink_factor: 1.0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                attempts_per_check: 0,
                ..LayoutConfig::default()
            },
            LayoutConfig {
                max_attempts_before_shrink: 0,
                ..LayoutConfig::default()
            },
        ];
        for config in bad {
            assert!(config.validate().is_err(), "accepted {config:?}");
        }
    }

    #[test]
    fn selection_mirrors_layout_limits() {
        let layout = LayoutConfig {
            max_words: 12,
            discard_top: 3,
            ..LayoutConfig::default()
        };
        assert_eq!(
            layout.selection(),
            SelectionOptions {
                limit: 12,
                discard_top: 3
            }
        );
    }

    #[test]
    fn policies_render_as_lowercase() {
        assert_eq!(RotationPolicy::Random.to_string(), "random");
        assert_eq!(OversizePolicy::Fail.as_str(), "fail");
    }
}
