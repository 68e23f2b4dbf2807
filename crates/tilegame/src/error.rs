// crates/tilegame/src/error.rs
use engine_ecs::EcsError;
use engine_shared::TextureRef;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TilemapError {
    #[error("duplicate tile type {0:?} in tilemap")]
    DuplicateTileType(TextureRef),

    #[error("reached maximum amount of tile types for this tilemap ({max})")]
    Capacity { max: u16 },

    #[error("tile {0:?} was never registered with this tilemap")]
    UnknownTile(TextureRef),

    #[error("chunk size must be at least 1, got {0}")]
    InvalidChunkSize(u16),
}

impl From<TilemapError> for EcsError {
    fn from(err: TilemapError) -> Self {
        EcsError::component(err)
    }
}

pub type TilemapResult<T> = Result<T, TilemapError>;
