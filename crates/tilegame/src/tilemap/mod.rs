// crates/tilegame/src/tilemap/mod.rs
//! Sparse chunked tile grid with camera culling.

mod chunk;
mod table;

use std::collections::HashMap;

use engine_ecs::{Component, EcsResult, EntityId, Interface};
use tracing::trace;

use crate::camera::CameraView;
use crate::error::{TilemapError, TilemapResult};

pub use chunk::{Chunk, ChunkPos};
pub use table::{Tile, TileTable};

/// A world of `chunk_size`² chunks created on first write.
///
/// The camera is looked up by entity id through the game on every frame, so
/// the tilemap and the camera may live on the same entity or on different
/// ones.
#[derive(Debug)]
pub struct TilemapComponent {
    chunk_size: u16,
    render_tile_size: f32,
    camera_id: EntityId,
    table: TileTable,
    chunks: HashMap<u64, Chunk>,
}

impl TilemapComponent {
    pub fn new(chunk_size: u16, render_tile_size: f32, camera_id: EntityId) -> TilemapResult<Self> {
        if chunk_size == 0 {
            return Err(TilemapError::InvalidChunkSize(chunk_size));
        }
        Ok(Self {
            chunk_size,
            render_tile_size,
            camera_id,
            table: TileTable::new(),
            chunks: HashMap::new(),
        })
    }

    pub fn chunk_size(&self) -> u16 {
        self.chunk_size
    }

    pub fn render_tile_size(&self) -> f32 {
        self.render_tile_size
    }

    pub fn camera_id(&self) -> EntityId {
        self.camera_id
    }

    pub fn tiles(&self) -> &TileTable {
        &self.table
    }

    pub fn add_tile_type(&mut self, tile: Tile) -> TilemapResult<u16> {
        self.table.add(tile)
    }

    pub fn tile_type(&self, id: u16) -> Option<&Tile> {
        self.table.get(id)
    }

    pub fn chunk_pos_of(&self, x: u32, y: u32) -> ChunkPos {
        let cs = u32::from(self.chunk_size);
        ChunkPos::new(x / cs, y / cs)
    }

    pub fn set_tile(&mut self, x: u32, y: u32, tile: &Tile) -> TilemapResult<()> {
        let id = self.table.id_of(tile)?;
        self.set_tile_id(x, y, id);
        Ok(())
    }

    /// Writes `0` or an id already known to the table.
    pub(crate) fn set_tile_id(&mut self, x: u32, y: u32, id: u16) {
        let pos = self.chunk_pos_of(x, y);
        let cs = u32::from(self.chunk_size);
        let chunk_size = self.chunk_size;
        let chunk = self
            .chunks
            .entry(pos.packed())
            .or_insert_with(|| Chunk::new(pos, chunk_size));
        chunk.set((x % cs) as u16, (y % cs) as u16, id);
    }

    /// Tile id at world cell `(x, y)`; `None` when its chunk was never written.
    pub fn get_tile(&self, x: u32, y: u32) -> Option<u16> {
        let cs = u32::from(self.chunk_size);
        self.chunk(self.chunk_pos_of(x, y))?
            .get((x % cs) as u16, (y % cs) as u16)
    }

    pub fn chunk(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos.packed())
    }

    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    pub fn chunk_positions(&self) -> Vec<ChunkPos> {
        let mut positions: Vec<ChunkPos> = self.chunks.values().map(Chunk::pos).collect();
        positions.sort();
        positions
    }

    /// World-space box covered by the chunk at `pos`.
    pub fn chunk_bounds(&self, pos: ChunkPos) -> ((f32, f32), (f32, f32)) {
        let span = self.render_tile_size * f32::from(self.chunk_size);
        (
            (span * pos.x as f32, span * pos.y as f32),
            (span * (pos.x as f32 + 1.0), span * (pos.y as f32 + 1.0)),
        )
    }

    pub fn should_chunk_render(&self, pos: ChunkPos, view: &CameraView) -> bool {
        let (min, max) = self.chunk_bounds(pos);
        view.overlaps(min, max)
    }

    fn camera_view(&self, iface: &Interface<'_>) -> EcsResult<CameraView> {
        CameraView::of(iface.game()?.find_entity(self.camera_id)?)
    }
}

impl Component for TilemapComponent {
    fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        self.camera_view(iface)?;
        Ok(())
    }

    fn update(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        let view = self.camera_view(iface)?;
        let renderer = iface.renderer()?;
        let mut drawn = 0usize;
        for chunk in self.chunks.values() {
            if self.should_chunk_render(chunk.pos(), &view) {
                chunk.render(&self.table, renderer, self.render_tile_size);
                drawn += 1;
            }
        }
        trace!(drawn, total = self.chunks.len(), "tilemap chunks drawn");
        Ok(())
    }

    fn is_unique(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use engine_shared::{TextureHandle, TextureRef};

    use super::*;
    use crate::camera::CameraComponent;

    fn tilemap() -> TilemapComponent {
        TilemapComponent::new(16, 0.1, EntityId::from_raw(0)).unwrap()
    }

    #[test]
    fn zero_chunk_size_is_rejected() {
        assert!(matches!(
            TilemapComponent::new(0, 1.0, EntityId::from_raw(0)),
            Err(TilemapError::InvalidChunkSize(0))
        ));
    }

    #[test]
    fn unknown_tile_is_rejected_and_creates_nothing() {
        let mut map = tilemap();
        let tile = Tile::new(TextureRef::whole(TextureHandle(1)));
        assert_eq!(
            map.set_tile(3, 3, &tile),
            Err(TilemapError::UnknownTile(tile.texture))
        );
        assert_eq!(map.chunk_count(), 0);
        assert_eq!(map.get_tile(3, 3), None);
    }

    #[test]
    fn culling_covers_chunks_the_camera_touches() {
        let map = tilemap();
        // chunk span is 1.6 units
        let view = CameraView::new(0.0, 0.0, &CameraComponent::new(1.0, 1.0));
        assert!(map.should_chunk_render(ChunkPos::new(0, 0), &view));
        assert!(!map.should_chunk_render(ChunkPos::new(1, 0), &view));

        // A chunk bigger than the view on every side still renders.
        let big = TilemapComponent::new(16, 10.0, EntityId::from_raw(0)).unwrap();
        let inside = CameraView::new(80.0, 80.0, &CameraComponent::new(1.0, 1.0));
        assert!(big.should_chunk_render(ChunkPos::new(0, 0), &inside));

        let far = CameraView::new(0.0, 100.0, &CameraComponent::new(1.0, 1.0));
        assert!(!map.should_chunk_render(ChunkPos::new(0, 0), &far));
    }
}
