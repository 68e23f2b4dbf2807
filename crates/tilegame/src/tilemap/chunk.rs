// crates/tilegame/src/tilemap/chunk.rs
use engine_shared::{Renderer, Transform3D};

use super::table::TileTable;

/// Chunk coordinates. Packs to `(x << 32) | y`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChunkPos {
    pub x: u32,
    pub y: u32,
}

impl ChunkPos {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }

    pub const fn packed(self) -> u64 {
        ((self.x as u64) << 32) | self.y as u64
    }

    pub const fn from_packed(packed: u64) -> Self {
        Self {
            x: (packed >> 32) as u32,
            y: packed as u32,
        }
    }
}

/// A `size` x `size` block of tile ids, row-major.
#[derive(Debug, Clone)]
pub struct Chunk {
    pos: ChunkPos,
    size: u16,
    tiles: Vec<u16>,
}

impl Chunk {
    pub fn new(pos: ChunkPos, size: u16) -> Self {
        let cells = usize::from(size) * usize::from(size);
        Self {
            pos,
            size,
            tiles: vec![0; cells],
        }
    }

    pub fn pos(&self) -> ChunkPos {
        self.pos
    }

    pub fn size(&self) -> u16 {
        self.size
    }

    fn index(&self, x: u16, y: u16) -> usize {
        usize::from(y) * usize::from(self.size) + usize::from(x)
    }

    /// Local coordinates; both must be below the chunk size.
    pub fn set(&mut self, x: u16, y: u16, tile: u16) {
        let index = self.index(x, y);
        self.tiles[index] = tile;
    }

    pub fn get(&self, x: u16, y: u16) -> Option<u16> {
        if x >= self.size || y >= self.size {
            return None;
        }
        Some(self.tiles[self.index(x, y)])
    }

    pub fn tiles(&self) -> &[u16] {
        &self.tiles
    }

    pub fn filled(&self) -> usize {
        self.tiles.iter().filter(|&&t| t != 0).count()
    }

    /// Draws every non-empty cell as one batch of quads of `tile_size` units.
    pub fn render(&self, table: &TileTable, renderer: &mut dyn Renderer, tile_size: f32) {
        let size = u32::from(self.size);
        renderer.batch_begin();
        for (i, &id) in self.tiles.iter().enumerate() {
            if id == 0 {
                continue;
            }
            let Some(tile) = table.get(id) else {
                continue;
            };
            let i = i as u32;
            let x = self.pos.x * size + i % size;
            let y = self.pos.y * size + i / size;
            renderer.batch_upload_transform(
                &Transform3D::new()
                    .translate(tile_size * (x as f32 + 0.5), tile_size * (y as f32 + 0.5), 0.0)
                    .scale(tile_size, tile_size, tile_size),
            );
            renderer.batch_bind_texture(tile.texture);
            renderer.batch_draw_quad();
        }
        renderer.batch_end();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn packing_is_lossless_at_the_edges() {
        for (x, y) in [(0, 0), (1, 0), (0, 1), (u32::MAX, 0), (0, u32::MAX), (u32::MAX, u32::MAX)] {
            let pos = ChunkPos::new(x, y);
            assert_eq!(ChunkPos::from_packed(pos.packed()), pos);
        }
        assert_eq!(ChunkPos::new(1, 2).packed(), (1 << 32) | 2);
    }

    #[test]
    fn cells_are_row_major() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), 4);
        chunk.set(1, 2, 9);
        assert_eq!(chunk.tiles()[2 * 4 + 1], 9);
        assert_eq!(chunk.get(1, 2), Some(9));
        assert_eq!(chunk.get(4, 0), None);
        assert_eq!(chunk.filled(), 1);
    }
}
