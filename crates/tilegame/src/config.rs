// crates/tilegame/src/config.rs
use std::fs;
use std::io;
use std::path::Path;

use anyhow::Context;
use engine_core::EngineConfig;
use serde::Deserialize;

/// `tilegame.toml`: the engine sections plus a `[world]` table.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    #[serde(flatten)]
    pub engine: EngineConfig,
    pub world: WorldConfig,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    pub seed: u64,
    /// Size of the generated area, in tiles.
    pub width: u32,
    pub height: u32,
    pub chunk_size: u16,
    /// World units per tile.
    pub tile_size: f32,
    pub frequency: f64,
    pub octaves: u32,
    pub camera_scale: f32,
    /// World units per second.
    pub camera_speed: f32,
    /// Terrain bands, lowest first.
    pub bands: Vec<BandConfig>,
    /// Image drawn at the camera center.
    pub marker: Option<String>,
    pub marker_pixels_per_unit: f32,
    /// Compiled script library to attach to the world entity.
    pub scripts: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BandConfig {
    pub max: f64,
    pub image: String,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            width: 128,
            height: 128,
            chunk_size: 16,
            tile_size: 0.1,
            frequency: 0.05,
            octaves: 4,
            camera_scale: 1.0,
            camera_speed: 2.0,
            bands: vec![
                BandConfig {
                    max: -0.2,
                    image: "tiles/water.png".to_string(),
                },
                BandConfig {
                    max: 0.0,
                    image: "tiles/sand.png".to_string(),
                },
                BandConfig {
                    max: 0.45,
                    image: "tiles/grass.png".to_string(),
                },
                BandConfig {
                    max: 1.0,
                    image: "tiles/rock.png".to_string(),
                },
            ],
            marker: None,
            marker_pixels_per_unit: 160.0,
            scripts: None,
        }
    }
}

impl GameConfig {
    /// Missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text)
                .with_context(|| format!("invalid config in {}", path.display())),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(err).with_context(|| format!("failed to read {}", path.display())),
        }
    }

    pub fn aspect_ratio(&self) -> f32 {
        self.engine.window.width as f32 / self.engine.window.height.max(1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn engine_and_world_tables_share_one_file() {
        let cfg: GameConfig = toml::from_str(
            r#"
            [window]
            title = "tiles"
            width = 800
            height = 400

            [world]
            seed = 7
            scripts = "scripts/libdemo_scripts.so"
            bands = [{ max = 1.0, image = "tiles/grass.png" }]
            "#,
        )
        .unwrap();

        assert_eq!(cfg.engine.window.title, "tiles");
        assert_eq!(cfg.aspect_ratio(), 2.0);
        assert_eq!(cfg.world.seed, 7);
        assert_eq!(cfg.world.chunk_size, 16);
        assert_eq!(cfg.world.bands.len(), 1);
        assert_eq!(cfg.world.scripts.as_deref(), Some("scripts/libdemo_scripts.so"));
    }

    #[test]
    fn missing_file_is_default() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = GameConfig::load(dir.path().join("tilegame.toml")).unwrap();
        assert_eq!(cfg, GameConfig::default());
    }
}
