// crates/tilegame/src/scene.rs
use engine_ecs::{EcsResult, Entity, EntityId, Game};
use engine_script::ScriptComponent;

use crate::camera::CameraComponent;
use crate::config::WorldConfig;
use crate::controller::CameraControllerComponent;
use crate::noise::{ValueNoise, WorldSeed};
use crate::sprite::DrawSpriteComponent;
use crate::tilemap::TilemapComponent;
use crate::transform::TransformComponent;
use crate::world::{GeneratedWorldComponent, TileSource};

/// Builds the single world entity: a movable camera centered on the generated
/// area, the tilemap it looks at and the generator that fills it.
///
/// Component order is dispatch order, so the camera uploads its view before
/// the tilemap and the marker draw.
pub fn setup_default_world(
    game: &mut Game,
    config: &WorldConfig,
    aspect_ratio: f32,
    scripts: Vec<ScriptComponent>,
) -> EcsResult<EntityId> {
    let mut entity: Entity = game.create_entity();
    let id = entity.id();

    let center_x = config.width as f32 * config.tile_size / 2.0;
    let center_y = config.height as f32 * config.tile_size / 2.0;

    let noise = ValueNoise::new(WorldSeed::new(config.seed)).with_octaves(config.octaves, 0.5, 2.0);
    let world = config.bands.iter().fold(
        GeneratedWorldComponent::new(config.width, config.height, noise)
            .with_frequency(config.frequency),
        |world, band| world.with_band(band.max, TileSource::Image(band.image.clone())),
    );

    entity.add_component(TransformComponent::new(center_x, center_y))?;
    entity.add_component(CameraComponent::new(aspect_ratio, config.camera_scale))?;
    entity.add_component(CameraControllerComponent::new(config.camera_speed))?;
    entity.add_component(TilemapComponent::new(config.chunk_size, config.tile_size, id)?)?;
    entity.add_component(world)?;
    if let Some(marker) = &config.marker {
        entity.add_component(DrawSpriteComponent::from_image(
            marker.clone(),
            config.marker_pixels_per_unit,
        ))?;
    }
    for script in scripts {
        entity.add_component(script)?;
    }

    game.add_entity(entity)
}
