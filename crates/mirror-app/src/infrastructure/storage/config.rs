//! TOML-based configuration for MirrorBox.
//!
//! Reads and writes `AppConfig` to the platform-appropriate config file:
//! - Windows:  `%APPDATA%\MirrorBox\config.toml`
//! - Linux:    `~/.config/mirrorbox/config.toml`
//! - macOS:    `~/Library/Application Support/MirrorBox/config.toml`
//!
//! Example:
//!
//! ```toml
//! [session]
//! source = ["Notepad"]
//! targets = ["Untitled - Notepad", "Scratch"]
//!
//! [timing]
//! foreground_poll_ms = 50
//! target_refresh_ms = 250
//!
//! [logging]
//! level = "info"
//! ```
//!
//! Every field has a `#[serde(default = "...")]` fallback so the app works
//! on first run and with partial files.  Command-line flags override whatever
//! is loaded here.

use std::path::{Path, PathBuf};
use std::time::Duration;

use mirror_core::{QueryError, TitleQuery};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::application::mirror_session::SessionConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The platform config directory could not be determined.
    #[error("could not determine platform config directory")]
    NoPlatformConfigDir,

    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A title pattern is unusable.
    #[error("invalid title query: {0}")]
    Query(#[from] QueryError),

    /// A polling interval is zero.
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub session: SessionSection,
    #[serde(default)]
    pub timing: TimingSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

/// Which windows to mirror from and to.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionSection {
    /// Title substrings identifying the source window.
    #[serde(default)]
    pub source: Vec<String>,
    /// Title substrings identifying target windows.
    #[serde(default)]
    pub targets: Vec<String>,
}

/// Polling intervals, in milliseconds.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TimingSection {
    /// How often the foreground window is sampled.
    #[serde(default = "default_foreground_poll_ms")]
    pub foreground_poll_ms: u64,
    /// How long a resolved target set may be reused.
    #[serde(default = "default_target_refresh_ms")]
    pub target_refresh_ms: u64,
}

/// `tracing` settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoggingSection {
    /// `"error"`, `"warn"`, `"info"`, `"debug"` or `"trace"`; `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_foreground_poll_ms() -> u64 {
    50
}
fn default_target_refresh_ms() -> u64 {
    250
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TimingSection {
    fn default() -> Self {
        Self {
            foreground_poll_ms: default_foreground_poll_ms(),
            target_refresh_ms: default_target_refresh_ms(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl AppConfig {
    /// Builds the immutable session configuration.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Query`] for blank patterns, [`ConfigError::ZeroInterval`]
    /// for a zero polling interval.
    pub fn to_session_config(&self) -> Result<SessionConfig, ConfigError> {
        if self.timing.foreground_poll_ms == 0 {
            return Err(ConfigError::ZeroInterval("foreground_poll_ms"));
        }
        if self.timing.target_refresh_ms == 0 {
            return Err(ConfigError::ZeroInterval("target_refresh_ms"));
        }
        Ok(SessionConfig {
            source: TitleQuery::new(&self.session.source)?,
            targets: TitleQuery::new(&self.session.targets)?,
            foreground_poll: Duration::from_millis(self.timing.foreground_poll_ms),
            target_refresh: Duration::from_millis(self.timing.target_refresh_ms),
        })
    }
}

// ── Config repository ─────────────────────────────────────────────────────────

/// Determines the platform-appropriate directory for the config file.
///
/// # Errors
///
/// Returns [`ConfigError::NoPlatformConfigDir`] when the platform config base
/// directory cannot be determined from the environment.
pub fn config_dir() -> Result<PathBuf, ConfigError> {
    platform_config_dir().ok_or(ConfigError::NoPlatformConfigDir)
}

/// Resolves the full path to the default config file.
pub fn config_file_path() -> Result<PathBuf, ConfigError> {
    Ok(config_dir()?.join("config.toml"))
}

/// Loads `AppConfig` from `path`, or from the platform default location when
/// `path` is `None`.  A missing file yields `AppConfig::default()`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system errors other than "not found",
/// and [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let path = match path {
        Some(p) => p.to_path_buf(),
        None => match config_file_path() {
            Ok(p) => p,
            // No home directory at all: nothing to load.
            Err(ConfigError::NoPlatformConfigDir) => return Ok(AppConfig::default()),
            Err(e) => return Err(e),
        },
    };

    match std::fs::read_to_string(&path) {
        Ok(content) => Ok(toml::from_str(&content)?),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(ConfigError::Io { path, source: e }),
    }
}

/// Writes `config` to `path`, creating parent directories as needed.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] for file-system failures or
/// [`ConfigError::Serialize`] if serialization fails.
pub fn save_config(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
            path: dir.to_path_buf(),
            source,
        })?;
    }

    let content = toml::to_string_pretty(config)?;
    std::fs::write(path, content).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Resolves the platform config base directory including the `MirrorBox` subdirectory.
fn platform_config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("APPDATA").map(|p| PathBuf::from(p).join("MirrorBox"))
    }

    #[cfg(target_os = "linux")]
    {
        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|h| PathBuf::from(h).join(".config")))?;
        Some(base.join("mirrorbox"))
    }

    #[cfg(target_os = "macos")]
    {
        std::env::var_os("HOME").map(|h| {
            PathBuf::from(h)
                .join("Library")
                .join("Application Support")
                .join("MirrorBox")
        })
    }

    #[cfg(not(any(target_os = "windows", target_os = "linux", target_os = "macos")))]
    {
        None
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("mirrorbox_{name}_{}", std::process::id()))
    }

    // ── AppConfig defaults ────────────────────────────────────────────────────

    #[test]
    fn test_app_config_default_has_expected_timing() {
        // Arrange / Act
        let cfg = AppConfig::default();

        // Assert
        assert_eq!(cfg.timing.foreground_poll_ms, 50);
        assert_eq!(cfg.timing.target_refresh_ms, 250);
        assert_eq!(cfg.logging.level, "info");
        assert!(cfg.session.source.is_empty());
    }

    #[test]
    fn test_deserialize_empty_toml_uses_defaults() {
        let cfg: AppConfig = toml::from_str("").expect("deserialize empty");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_deserialize_partial_timing_overrides_defaults() {
        // Arrange
        let toml_str = r#"
[session]
source = ["Notepad"]
targets = ["Untitled - Notepad"]

[timing]
foreground_poll_ms = 10
"#;

        // Act
        let cfg: AppConfig = toml::from_str(toml_str).expect("deserialize partial");

        // Assert
        assert_eq!(cfg.session.source, vec!["Notepad"]);
        assert_eq!(cfg.timing.foreground_poll_ms, 10);
        // Unspecified fields keep their defaults
        assert_eq!(cfg.timing.target_refresh_ms, 250);
    }

    #[test]
    fn test_deserialize_invalid_toml_returns_parse_error() {
        let result: Result<AppConfig, toml::de::Error> = toml::from_str("[[[ not valid toml");
        assert!(result.is_err());
    }

    // ── SessionConfig conversion ──────────────────────────────────────────────

    #[test]
    fn test_to_session_config_builds_queries_and_durations() {
        // Arrange
        let mut cfg = AppConfig::default();
        cfg.session.source = vec!["Notepad".to_string()];
        cfg.session.targets = vec!["Scratch".to_string(), "scratch".to_string()];

        // Act
        let session = cfg.to_session_config().expect("valid config");

        // Assert
        assert!(session.source.matches("Notepad"));
        assert_eq!(session.targets.len(), 1, "duplicates collapse");
        assert_eq!(session.foreground_poll, Duration::from_millis(50));
        assert_eq!(session.target_refresh, Duration::from_millis(250));
    }

    #[test]
    fn test_to_session_config_rejects_blank_pattern() {
        let mut cfg = AppConfig::default();
        cfg.session.targets = vec!["ok".to_string(), "  ".to_string()];
        assert!(matches!(
            cfg.to_session_config(),
            Err(ConfigError::Query(QueryError::EmptyPattern(1)))
        ));
    }

    #[test]
    fn test_to_session_config_rejects_zero_interval() {
        let mut cfg = AppConfig::default();
        cfg.timing.foreground_poll_ms = 0;
        assert!(matches!(
            cfg.to_session_config(),
            Err(ConfigError::ZeroInterval("foreground_poll_ms"))
        ));
    }

    // ── load_config / save_config ─────────────────────────────────────────────

    #[test]
    fn test_load_config_returns_default_when_file_absent() {
        let path = PathBuf::from("/nonexistent/path/that/cannot/exist/config.toml");
        let cfg = load_config(Some(&path)).expect("missing file is not an error");
        assert_eq!(cfg, AppConfig::default());
    }

    #[test]
    fn test_save_and_load_config_round_trip_via_temp_dir() {
        // Arrange
        let dir = temp_dir("roundtrip");
        let path = dir.join("nested").join("config.toml");
        let mut cfg = AppConfig::default();
        cfg.session.source = vec!["Notepad".to_string()];
        cfg.session.targets = vec!["Untitled - Notepad".to_string()];
        cfg.logging.level = "debug".to_string();

        // Act
        save_config(&cfg, &path).expect("save");
        let loaded = load_config(Some(&path)).expect("load");

        // Assert
        assert_eq!(loaded, cfg);

        // Cleanup
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_load_config_reports_parse_error_for_bad_file() {
        // Arrange
        let dir = temp_dir("badfile");
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("config.toml");
        std::fs::write(&path, "[timing]\nforeground_poll_ms = \"fast\"\n").expect("write");

        // Act
        let result = load_config(Some(&path));

        // Assert
        assert!(matches!(result, Err(ConfigError::Parse(_))));

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_config_file_path_ends_with_config_toml() {
        if let Ok(path) = config_file_path() {
            assert!(
                path.ends_with("config.toml"),
                "config file must be named config.toml, got {path:?}"
            );
        }
        // NoPlatformConfigDir in a stripped environment is also acceptable.
    }
}
