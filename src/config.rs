//! Presentation settings.
//!
//! Gameplay constants live in `entities` and are fixed at build time.  The
//! values here only affect how the playfield is shown and paced in a
//! terminal; they are read once from an optional TOML file named by the
//! `KITTENS_CONFIG` environment variable.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{GameError, Result};

pub const CONFIG_ENV: &str = "KITTENS_CONFIG";

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    /// Directory holding `enemy.png`, `grass.png` and `decode.png`.
    pub asset_dir: PathBuf,
    /// Target time between frames in milliseconds.
    pub frame_ms: u64,
    /// Playfield pixels per terminal column.
    pub px_per_col: f64,
    /// Playfield pixels per terminal row.
    pub px_per_row: f64,
    /// Log destination; logs go to stderr when unset.
    pub log_file: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            asset_dir: PathBuf::from("images"),
            frame_ms: 16, // ≈60 FPS
            px_per_col: 7.5,
            px_per_row: 20.0,
            log_file: None,
        }
    }
}

impl Settings {
    /// Defaults, overridden by the file named in `KITTENS_CONFIG` if set.
    pub fn load() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::from_file(Path::new(&path)),
            None => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| GameError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Settings = toml::from_str(&text).map_err(|source| GameError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<()> {
        if self.frame_ms == 0 {
            return Err(GameError::ConfigValue {
                key: "frame_ms",
                reason: "must be at least 1".to_string(),
            });
        }
        for (key, value) in [("px_per_col", self.px_per_col), ("px_per_row", self.px_per_row)] {
            if !(value.is_finite() && value > 0.0) {
                return Err(GameError::ConfigValue {
                    key,
                    reason: format!("must be a positive number, got {}", value),
                });
            }
        }
        Ok(())
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_millis(self.frame_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let s: Settings = toml::from_str("frame_ms = 33").unwrap();
        assert_eq!(s.frame_ms, 33);
        assert_eq!(s.asset_dir, PathBuf::from("images"));
        assert_eq!(s.px_per_row, 20.0);
        assert!(s.log_file.is_none());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(toml::from_str::<Settings>("speed = 3").is_err());
    }

    #[test]
    fn zero_scale_fails_validation() {
        let s = Settings {
            px_per_col: 0.0,
            ..Settings::default()
        };
        assert!(matches!(
            s.validate(),
            Err(GameError::ConfigValue { key: "px_per_col", .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Settings::from_file(Path::new("/nonexistent/kittens.toml")).unwrap_err();
        assert!(matches!(err, GameError::ConfigRead { .. }));
    }
}
