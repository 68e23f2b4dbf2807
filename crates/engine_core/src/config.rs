// crates/engine_core/src/config.rs
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::{EngineError, EngineResult};

/// Engine settings read from a TOML file. Every field has a default, so an
/// empty file (or none at all) is a valid configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub window: WindowConfig,
    /// RGBA, each channel in 0..=1.
    pub clear_color: [f32; 4],
    pub assets: AssetConfig,
    pub log: LogConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub vsync: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AssetConfig {
    /// Directory loose resources are resolved against.
    pub root: PathBuf,
    /// Packed store produced by the bundler. Loaded instead of loose files when set.
    pub pack: Option<PathBuf>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `tracing-subscriber` filter directive, e.g. `info,engine_ecs=debug`.
    pub filter: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            clear_color: [0.1, 0.2, 0.3, 1.0],
            assets: AssetConfig::default(),
            log: LogConfig::default(),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Rust Engine".to_string(),
            width: 1280,
            height: 720,
            vsync: true,
        }
    }
}

impl Default for AssetConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("res"),
            pack: None,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl EngineConfig {
    /// Reads `path`. A missing file yields the defaults; anything else that
    /// goes wrong is an error.
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).map_err(|source| EngineError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(EngineError::Io {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let [r, g, b, a] = self.clear_color.map(f64::from);
        wgpu::Color { r, g, b, a }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_other_defaults() {
        let cfg = EngineConfig::parse(
            r#"
            clear_color = [0.0, 0.0, 0.0, 1.0]

            [window]
            title = "tiles"
            vsync = false

            [assets]
            pack = "assets.pak"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.window.title, "tiles");
        assert!(!cfg.window.vsync);
        assert_eq!(cfg.window.width, 1280);
        assert_eq!(cfg.assets.root, PathBuf::from("res"));
        assert_eq!(cfg.assets.pack, Some(PathBuf::from("assets.pak")));
        assert_eq!(cfg.log.filter, "info");
        assert_eq!(cfg.clear_color().a, 1.0);
    }

    #[test]
    fn missing_file_is_default_and_bad_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = EngineConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, EngineConfig::default());

        let bad = dir.path().join("bad.toml");
        fs::write(&bad, "window = 3").unwrap();
        assert!(matches!(
            EngineConfig::load(&bad),
            Err(EngineError::Config { .. })
        ));
    }
}
