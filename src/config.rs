//! Kiosk configuration.
//!
//! Read from `~/.config/label-viewer/kiosk.toml` (or `$XDG_CONFIG_HOME`) unless
//! a path is given on the command line. Every field has a default, so an empty
//! or partial file is valid, and a missing default file just means defaults.
//!
//! ```toml
//! idle_timeout_secs = 300
//!
//! [assets]
//! root = "/srv/exhibit/images"
//!
//! [graph]
//! home = "main"
//!
//! [[graph.panel]]
//! id = "main"
//! background = "shelf/background.png"
//!
//! [[graph.panel.hotspot]]
//! id = "glass"
//! rect = { x = 936.0, y = 290.0, width = 120.0, height = 100.0 }
//! target = "glass"
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use tracing::{debug, info};

use crate::graph::GraphSpec;
use crate::navigator::{MAX_IDLE_TIMEOUT, MIN_IDLE_TIMEOUT};
use crate::shelf;

const APP_NAME: &str = "label-viewer";
const CONFIG_FILE: &str = "kiosk.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error(
        "idle_timeout_secs = {secs} is out of range ({}..={} seconds)",
        MIN_IDLE_TIMEOUT.as_secs(),
        MAX_IDLE_TIMEOUT.as_secs()
    )]
    InvalidIdleTimeout { secs: u64 },
}

// ---------------------------------------------------------------------------
// KioskConfig
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct KioskConfig {
    pub idle_timeout_secs: u64,
    pub canvas: CanvasConfig,
    pub assets: AssetConfig,
    pub window: WindowConfig,
    pub logging: LoggingConfig,
    /// Custom panel graph. `None` selects the built-in shelf exhibit.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub graph: Option<GraphSpec>,
}

/// Native pixel size of the panel images. Hotspot rects live in this space.
#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct AssetConfig {
    pub root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct WindowConfig {
    pub windowed: bool,
    pub hide_cursor: bool,
}

/// Log output for a deployed kiosk. `RUST_LOG` still wins over `filter`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `EnvFilter` directives, e.g. `"warn,navigator=debug"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    /// Also write a daily-rotated log file (`LABEL_VIEWER_LOG=1` forces this).
    pub file: bool,
    /// Directory for the log file. Defaults to the XDG state directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: 600,
            canvas: CanvasConfig::default(),
            assets: AssetConfig::default(),
            window: WindowConfig::default(),
            logging: LoggingConfig::default(),
            graph: None,
        }
    }
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width: 1920.0,
            height: 1080.0,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./images"),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            windowed: false,
            hide_cursor: true,
        }
    }
}

impl KioskConfig {
    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }

    /// The configured graph, or the built-in exhibit.
    pub fn graph_spec(&self) -> GraphSpec {
        self.graph.clone().unwrap_or_else(shelf::exhibit)
    }

    pub fn from_toml(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject values the navigator cannot run with. A zero timeout would send
    /// every tap straight back home; a huge one overflows `Instant`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let secs = self.idle_timeout_secs;
        if !(MIN_IDLE_TIMEOUT.as_secs()..=MAX_IDLE_TIMEOUT.as_secs()).contains(&secs) {
            return Err(ConfigError::InvalidIdleTimeout { secs });
        }
        Ok(())
    }

    /// Load from an explicit path. The file must exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(target: "config", path = %path.display(), "Loaded kiosk config");
        Ok(config)
    }

    /// Load from `path` if given, otherwise from the default location,
    /// falling back to defaults when that file does not exist.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::load(path);
        }
        let default_path = config_path();
        if default_path.exists() {
            Self::load(&default_path)
        } else {
            debug!(target: "config", path = %default_path.display(), "No config file, using defaults");
            Ok(Self::default())
        }
    }
}

// ---------------------------------------------------------------------------
// Path helpers
// ---------------------------------------------------------------------------

/// `$XDG_CONFIG_HOME/label-viewer/`, else `$HOME/.config/label-viewer/`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    home_dir().join(".config").join(APP_NAME)
}

pub fn config_path() -> PathBuf {
    config_dir().join(CONFIG_FILE)
}

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::PanelGraph;

    #[test]
    fn defaults() {
        let c = KioskConfig::default();
        assert_eq!(c.idle_timeout(), Duration::from_secs(600));
        assert!((c.canvas.width - 1920.0).abs() < f64::EPSILON);
        assert!((c.canvas.height - 1080.0).abs() < f64::EPSILON);
        assert_eq!(c.assets.root, PathBuf::from("./images"));
        assert!(!c.window.windowed);
        assert!(c.window.hide_cursor);
        assert!(c.graph.is_none());
        assert_eq!(c.graph_spec().home.as_str(), shelf::HOME);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let partial = r#"
idle_timeout_secs = 30

[window]
windowed = true
"#;
        let c = KioskConfig::from_toml(partial).expect("partial parse failed");
        assert_eq!(c.idle_timeout_secs, 30);
        assert!(c.window.windowed);
        assert!(c.window.hide_cursor);
        assert!((c.canvas.width - 1920.0).abs() < f64::EPSILON);
    }

    #[test]
    fn invalid_toml() {
        assert!(KioskConfig::from_toml("this is not [[ valid toml").is_err());
        assert!(KioskConfig::from_toml("idle_timeout_secs = \"soon\"").is_err());
    }

    #[test]
    fn custom_graph_from_toml() {
        let text = r#"
[graph]
home = "home"

[[graph.panel]]
id = "home"
background = "home.png"

[[graph.panel.hotspot]]
id = "open"
rect = { x = 0.0, y = 0.0, width = 100.0, height = 100.0 }
target = "detail"
icon = "buttons/open.png"

[[graph.panel]]
id = "detail"
background = "detail.png"

[[graph.panel.hotspot]]
id = "back"
rect = { x = 0.0, y = 0.0, width = 100.0, height = 100.0 }
target = "home"
"#;
        let c = KioskConfig::from_toml(text).expect("graph parse failed");
        let graph = PanelGraph::build(c.graph_spec()).expect("graph valid");
        assert_eq!(graph.len(), 2);
        let open = &graph.home_panel().hotspots[0];
        assert_eq!(open.target.as_str(), "detail");
        assert_eq!(open.icon.as_ref().map(|i| i.as_str()), Some("buttons/open.png"));
    }

    #[test]
    fn toml_roundtrip_with_builtin_graph() {
        let c = KioskConfig {
            graph: Some(shelf::exhibit()),
            ..KioskConfig::default()
        };
        let text = c.to_toml().expect("config serializes");
        let parsed = KioskConfig::from_toml(&text).expect("roundtrip parse failed");
        assert_eq!(parsed, c);
    }

    #[test]
    fn idle_timeout_bounds() {
        let with = |secs| KioskConfig {
            idle_timeout_secs: secs,
            ..KioskConfig::default()
        };
        assert!(with(MIN_IDLE_TIMEOUT.as_secs()).validate().is_ok());
        assert!(with(MAX_IDLE_TIMEOUT.as_secs()).validate().is_ok());
        assert!(matches!(
            with(0).validate(),
            Err(ConfigError::InvalidIdleTimeout { secs: 0 })
        ));
        assert!(matches!(
            with(MAX_IDLE_TIMEOUT.as_secs() + 1).validate(),
            Err(ConfigError::InvalidIdleTimeout { .. })
        ));
        assert!(with(u64::MAX).validate().is_err());
    }

    #[test]
    fn load_rejects_out_of_range_idle_timeout() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        for text in ["idle_timeout_secs = 0\n", "idle_timeout_secs = 9223372036854775807\n"] {
            std::fs::write(&path, text).unwrap();
            let err = KioskConfig::load(&path).unwrap_err();
            assert!(matches!(err, ConfigError::InvalidIdleTimeout { .. }), "{text}");
        }
    }

    #[test]
    fn logging_section() {
        let c = KioskConfig::from_toml(
            r#"
[logging]
filter = "warn,navigator=debug"
file = true
"#,
        )
        .expect("logging parse failed");
        assert_eq!(c.logging.filter.as_deref(), Some("warn,navigator=debug"));
        assert!(c.logging.file);
        assert!(c.logging.dir.is_none());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        std::fs::write(&path, "idle_timeout_secs = 5\n").unwrap();
        let c = KioskConfig::load(&path).unwrap();
        assert_eq!(c.idle_timeout(), Duration::from_secs(5));
        assert_eq!(KioskConfig::load_or_default(Some(&path)).unwrap(), c);
    }

    #[test]
    fn load_missing_explicit_path_fails() {
        let dir = tempfile::tempdir().unwrap();
        let err = KioskConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn load_bad_file_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("kiosk.toml");
        std::fs::write(&path, "[canvas\nwidth = 3").unwrap();
        let err = KioskConfig::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
        assert!(err.to_string().contains("kiosk.toml"));
    }
}
