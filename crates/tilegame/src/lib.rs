// crates/tilegame/src/lib.rs
//! Example game on top of the engine: a camera flying over a generated,
//! chunked tile world.

pub mod camera;
pub mod config;
pub mod controller;
pub mod error;
pub mod noise;
pub mod scene;
pub mod sprite;
pub mod tilemap;
pub mod transform;
pub mod world;

pub use camera::{CameraComponent, CameraView};
pub use config::{GameConfig, WorldConfig};
pub use controller::CameraControllerComponent;
pub use error::{TilemapError, TilemapResult};
pub use noise::{NoiseField, ValueNoise, WorldSeed};
pub use sprite::{DrawSpriteComponent, Sprite};
pub use tilemap::{Chunk, ChunkPos, Tile, TileTable, TilemapComponent};
pub use transform::TransformComponent;
pub use world::{GeneratedWorldComponent, TileSource};
