//! Logging initialisation for the kiosk binary.
//!
//! stderr always gets the formatted output. A daily-rotated file under the
//! state directory is added when `[logging] file = true` is configured or
//! `LABEL_VIEWER_LOG=1` is set, so unattended kiosks keep a record of panel
//! changes.
//!
//! Filter precedence: `RUST_LOG`, then `[logging] filter`, then
//! [`DEFAULT_FILTER`], which keeps dependencies at `warn` but shows the
//! navigator's panel changes and startup summaries.

use std::path::PathBuf;

use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::LoggingConfig;

const LOG_ENV: &str = "LABEL_VIEWER_LOG";
const LOG_FILE: &str = "label-viewer.log";
const APP_NAME: &str = "label-viewer";

/// Everything from this crate at `info`, wgpu/winit chatter at `warn`.
pub const DEFAULT_FILTER: &str =
    "warn,label_viewer=info,navigator=info,graph=info,config=info,assets=info,host=info";

/// Keeps the non-blocking file writer alive. Hold it until `main` returns.
pub struct LogGuard {
    _file_guard: Option<tracing_appender::non_blocking::WorkerGuard>,
    pub file_dir: Option<PathBuf>,
}

pub fn init(config: &LoggingConfig) -> LogGuard {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| configured_filter(config));
    let force_file = std::env::var(LOG_ENV).as_deref() == Ok("1");

    let file_dir = file_dir(config, force_file);
    let (file_layer, file_guard) = match &file_dir {
        Some(dir) => {
            let _ = std::fs::create_dir_all(dir);
            let (writer, guard) = tracing_appender::non_blocking(tracing_appender::rolling::daily(dir, LOG_FILE));
            (Some(fmt::layer().with_writer(writer).with_ansi(false)), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(file_layer)
        .init();

    LogGuard {
        _file_guard: file_guard,
        file_dir,
    }
}

/// The configured directives, or the default when unset or unparsable.
pub fn configured_filter(config: &LoggingConfig) -> EnvFilter {
    config
        .filter
        .as_deref()
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

/// Where the log file goes, or `None` when file logging is off.
pub fn file_dir(config: &LoggingConfig, force: bool) -> Option<PathBuf> {
    if !(config.file || force) {
        return None;
    }
    Some(
        config
            .dir
            .clone()
            .or_else(state_dir)
            .unwrap_or_else(|| std::env::temp_dir().join(APP_NAME)),
    )
}

/// `$XDG_STATE_HOME/label-viewer`, else `~/.local/state/label-viewer`
/// (`~/Library/Logs/label-viewer` on macOS).
fn state_dir() -> Option<PathBuf> {
    if let Ok(xdg) = std::env::var("XDG_STATE_HOME") {
        return Some(PathBuf::from(xdg).join(APP_NAME));
    }
    let mut p = PathBuf::from(std::env::var("HOME").ok()?);
    #[cfg(target_os = "macos")]
    {
        p.push("Library");
        p.push("Logs");
    }
    #[cfg(not(target_os = "macos"))]
    {
        p.push(".local");
        p.push("state");
    }
    p.push(APP_NAME);
    Some(p)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_filter_parses_and_shows_navigator() {
        let filter = EnvFilter::try_new(DEFAULT_FILTER).expect("default directives parse");
        let shown = filter.to_string();
        assert!(shown.contains("navigator=info"), "{shown}");
        assert!(shown.contains("label_viewer=info"), "{shown}");
    }

    #[test]
    fn configured_filter_wins_over_default() {
        let config = LoggingConfig {
            filter: Some("error,navigator=debug".into()),
            ..LoggingConfig::default()
        };
        let shown = configured_filter(&config).to_string();
        assert!(shown.contains("navigator=debug"), "{shown}");
        assert!(!shown.contains("assets=info"), "{shown}");
    }

    #[test]
    fn unset_filter_uses_default() {
        let shown = configured_filter(&LoggingConfig::default()).to_string();
        assert!(shown.contains("navigator=info"), "{shown}");
    }

    #[test]
    fn file_logging_off_by_default() {
        assert_eq!(file_dir(&LoggingConfig::default(), false), None);
    }

    #[test]
    fn file_dir_prefers_configured_dir() {
        let config = LoggingConfig {
            file: true,
            dir: Some(PathBuf::from("/var/log/kiosk")),
            ..LoggingConfig::default()
        };
        assert_eq!(file_dir(&config, false), Some(PathBuf::from("/var/log/kiosk")));
    }

    #[test]
    fn env_switch_forces_file_logging() {
        let dir = file_dir(&LoggingConfig::default(), true).expect("forced on");
        assert!(dir.ends_with(APP_NAME), "{}", dir.display());
    }
}
