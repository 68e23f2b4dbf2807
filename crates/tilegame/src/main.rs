// crates/tilegame/src/main.rs
use anyhow::Context;
use engine_core::{logging, App};
use engine_ecs::Game;
use engine_script::NativeScriptRuntime;
use tilegame::scene;
use tilegame::GameConfig;
use tracing::info;

const CONFIG_PATH: &str = "tilegame.toml";

fn main() -> anyhow::Result<()> {
    let config = GameConfig::load(CONFIG_PATH)?;
    logging::init(&config.engine.log.filter)?;
    info!(title = %config.engine.window.title, "starting");

    let mut assets = engine_core::load_assets(&config.engine.assets)
        .context("failed to open the asset store")?;

    let scripts = match &config.world.scripts {
        Some(resource) => {
            let library = NativeScriptRuntime::default()
                .load_from_assets(&mut assets, resource)
                .with_context(|| format!("failed to load script library '{resource}'"))?;
            let components = library.load_components()?;
            info!(resource = %resource, scripts = components.len(), "scripts loaded");
            components.into_values().collect()
        }
        None => Vec::new(),
    };

    let mut game = Game::new();
    scene::setup_default_world(&mut game, &config.world, config.aspect_ratio(), scripts)
        .context("failed to build the world")?;

    App::new(config.engine, game, assets).run()?;
    Ok(())
}
