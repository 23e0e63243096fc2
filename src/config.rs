//! User configuration, read once at startup from
//! `<config dir>/playdeck/config.toml`.
//!
//! ```toml
//! asset = "sound"
//! tick_interval_ms = 10
//! seek_step_secs = 5.0
//! theme = "Nord"
//! log_level = "debug"
//! log_dir = "/tmp/playdeck-logs"
//! ```

use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

const APP_DIR: &str = "playdeck";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    pub asset: String,
    pub tick_interval_ms: u64,
    pub seek_step_secs: f64,
    pub theme: String,
    pub log_level: String,
    pub log_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            asset: "sound".to_string(),
            tick_interval_ms: 10,
            seek_step_secs: 5.0,
            theme: crate::themes::DEFAULT_THEME.to_string(),
            log_level: "info".to_string(),
            log_dir: None,
        }
    }
}

/// Where a config file came from, reported once logging is up.
#[derive(Debug, PartialEq)]
pub enum ConfigSource {
    File(PathBuf),
    Defaults,
    /// The file exists but could not be read or parsed.
    Invalid { path: PathBuf, reason: String },
}

impl Config {
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
    }

    /// Loads the config at `path`, falling back to defaults when it is missing
    /// or broken. Never fails: a bad config must not keep the player from starting.
    pub fn load(path: Option<&Path>) -> (Self, ConfigSource) {
        let Some(path) = path else {
            return (Self::default(), ConfigSource::Defaults);
        };
        if !path.exists() {
            return (Self::default(), ConfigSource::Defaults);
        }
        let parsed = fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|s| toml::from_str::<Config>(&s).map_err(|e| e.to_string()));
        match parsed {
            Ok(config) => (config.sanitized(), ConfigSource::File(path.to_path_buf())),
            Err(reason) => (
                Self::default(),
                ConfigSource::Invalid {
                    path: path.to_path_buf(),
                    reason,
                },
            ),
        }
    }

    // toml happily parses `nan` and `inf` for floats
    fn sanitized(mut self) -> Self {
        if !self.seek_step_secs.is_finite() || self.seek_step_secs <= 0.0 {
            self.seek_step_secs = Self::default().seek_step_secs;
        }
        self
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    pub fn log_dir(&self) -> PathBuf {
        self.log_dir.clone().unwrap_or_else(|| {
            dirs::cache_dir()
                .map(|dir| dir.join(APP_DIR).join("logs"))
                .unwrap_or_else(|| PathBuf::from("logs"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let (config, source) = Config::load(Some(&dir.path().join("config.toml")));
        assert_eq!(config, Config::default());
        assert_eq!(source, ConfigSource::Defaults);
        assert_eq!(config.tick_interval(), Duration::from_millis(10));
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let file = write_config("seek_step_secs = 2.5\ntheme = \"Nord\"\n");
        let (config, source) = Config::load(Some(file.path()));
        assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
        assert_eq!(config.seek_step_secs, 2.5);
        assert_eq!(config.theme, "Nord");
        assert_eq!(config.asset, "sound");
    }

    #[test]
    fn broken_file_falls_back_to_defaults() {
        let file = write_config("tick_interval_ms = \"fast\"");
        let (config, source) = Config::load(Some(file.path()));
        assert_eq!(config, Config::default());
        assert!(matches!(source, ConfigSource::Invalid { .. }));
    }

    #[test]
    fn non_finite_seek_step_falls_back_to_default() {
        for raw in ["nan", "inf", "-inf", "-2.0", "0.0"] {
            let file = write_config(&format!("seek_step_secs = {raw}\ntheme = \"Nord\"\n"));
            let (config, source) = Config::load(Some(file.path()));
            assert_eq!(source, ConfigSource::File(file.path().to_path_buf()));
            assert_eq!(config.seek_step_secs, 5.0, "{raw}");
            assert_eq!(config.theme, "Nord");
        }
    }

    #[test]
    fn zero_interval_is_clamped() {
        let config = Config {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }

    #[test]
    fn explicit_log_dir_wins() {
        let config = Config {
            log_dir: Some(PathBuf::from("/tmp/x")),
            ..Default::default()
        };
        assert_eq!(config.log_dir(), PathBuf::from("/tmp/x"));
    }
}
