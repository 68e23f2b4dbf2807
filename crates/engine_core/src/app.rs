// crates/engine_core/src/app.rs

use engine_assets::Assets;
use engine_ecs::Game;
use engine_shared::Logger;
use tracing::info;

use crate::config::{AssetConfig, EngineConfig};
use crate::error::EngineResult;
use crate::platform_runner::PlatformRunner;

/// A configured game ready to be handed to the platform loop.
pub struct App {
    pub(crate) config: EngineConfig,
    pub(crate) game: Game,
    pub(crate) assets: Assets,
    pub(crate) logger: Logger,
}

impl App {
    pub fn new(config: EngineConfig, game: Game, assets: Assets) -> Self {
        Self {
            logger: Logger::new(config.window.title.clone()),
            config,
            game,
            assets,
        }
    }

    /// Replaces the logger handed to components.
    pub fn with_logger(mut self, logger: Logger) -> Self {
        self.logger = logger;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn game_mut(&mut self) -> &mut Game {
        &mut self.game
    }

    pub fn assets_mut(&mut self) -> &mut Assets {
        &mut self.assets
    }

    /// Opens the window and runs until it is closed or a hook fails.
    pub fn run(self) -> EngineResult<()> {
        PlatformRunner::new(self).start()
    }
}

/// The configured pack when there is one, otherwise an empty store over the
/// loose resource root.
pub fn load_assets(config: &AssetConfig) -> EngineResult<Assets> {
    match &config.pack {
        Some(pack) => {
            info!(pack = %pack.display(), "loading packed assets");
            Ok(Assets::from_pack_file(&config.root, pack)?)
        }
        None => Ok(Assets::new(&config.root)),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;
    use std::path::PathBuf;

    use super::*;
    use crate::error::EngineError;

    #[test]
    fn loose_root_or_pack() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AssetConfig {
            root: dir.path().to_path_buf(),
            pack: None,
        };
        let loose = load_assets(&config).unwrap();
        assert!(loose.is_empty());
        assert_eq!(loose.root(), dir.path());

        fs::write(dir.path().join("hello.txt"), "hi").unwrap();
        let mut source = Assets::new(dir.path());
        source.load_generic("hello.txt").unwrap();
        let pack = dir.path().join("assets.pak");
        fs::write(&pack, source.serialize().unwrap()).unwrap();

        config.pack = Some(pack);
        let packed = load_assets(&config).unwrap();
        assert_eq!(packed.index_of("hello.txt"), Some(0));

        config.pack = Some(PathBuf::from("does/not/exist.pak"));
        assert!(matches!(load_assets(&config), Err(EngineError::Asset(_))));
    }
}
