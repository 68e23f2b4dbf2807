// crates/tilegame/src/tilemap/table.rs
use std::collections::HashMap;

use engine_shared::TextureRef;

use crate::error::{TilemapError, TilemapResult};

/// One tile appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub texture: TextureRef,
}

impl Tile {
    pub fn new(texture: TextureRef) -> Self {
        Self { texture }
    }
}

/// Interns tile appearances as small ids. Id 0 is the empty cell.
#[derive(Debug, Default)]
pub struct TileTable {
    tiles: Vec<Tile>,
    ids: HashMap<Tile, u16>,
}

impl TileTable {
    pub const MAX_ID: u16 = u16::MAX;

    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `tile` under the next id.
    pub fn add(&mut self, tile: Tile) -> TilemapResult<u16> {
        if self.tiles.iter().any(|t| *t == tile) {
            return Err(TilemapError::DuplicateTileType(tile.texture));
        }
        let id = u16::try_from(self.tiles.len() + 1).map_err(|_| TilemapError::Capacity {
            max: Self::MAX_ID,
        })?;
        self.tiles.push(tile);
        self.ids.insert(tile, id);
        Ok(id)
    }

    pub fn id_of(&self, tile: &Tile) -> TilemapResult<u16> {
        self.ids
            .get(tile)
            .copied()
            .ok_or(TilemapError::UnknownTile(tile.texture))
    }

    pub fn get(&self, id: u16) -> Option<&Tile> {
        let index = usize::from(id).checked_sub(1)?;
        self.tiles.get(index)
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        self.ids.contains_key(tile)
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use engine_shared::TextureHandle;

    use super::*;

    fn tile(n: u32) -> Tile {
        Tile::new(TextureRef::whole(TextureHandle(n)))
    }

    #[test]
    fn ids_start_at_one_and_resolve_both_ways() {
        let mut table = TileTable::new();
        assert_eq!(table.add(tile(7)).unwrap(), 1);
        assert_eq!(table.add(tile(3)).unwrap(), 2);
        assert_eq!(table.id_of(&tile(3)).unwrap(), 2);
        assert_eq!(table.get(1), Some(&tile(7)));
        assert_eq!(table.get(0), None);
        assert_eq!(table.get(3), None);
    }

    #[test]
    fn region_is_part_of_the_identity() {
        let mut table = TileTable::new();
        let whole = Tile::new(TextureRef::whole(TextureHandle(1)));
        let region = Tile::new(TextureRef::region(TextureHandle(1), (0, 0), (8, 8)));
        table.add(whole).unwrap();
        table.add(region).unwrap();
        assert_eq!(
            table.add(whole),
            Err(TilemapError::DuplicateTileType(whole.texture))
        );
        assert_eq!(
            table.id_of(&tile(99)),
            Err(TilemapError::UnknownTile(tile(99).texture))
        );
    }
}
