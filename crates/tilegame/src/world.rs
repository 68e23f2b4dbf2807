// crates/tilegame/src/world.rs
use engine_ecs::{Component, EcsError, EcsResult, Interface};
use engine_shared::TextureRef;
use tracing::info;

use crate::noise::NoiseField;
use crate::tilemap::{Tile, TilemapComponent};

/// Where a band's tile graphic comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum TileSource {
    Texture(TextureRef),
    /// Image resource uploaded on init.
    Image(String),
}

/// Cells whose noise value is at most `max` (and above the previous band)
/// get this band's tile.
#[derive(Debug, Clone, PartialEq)]
pub struct Band {
    pub max: f64,
    pub source: TileSource,
}

/// Fills the sibling tilemap from a noise field when the game starts.
pub struct GeneratedWorldComponent {
    width: u32,
    height: u32,
    frequency: f64,
    bands: Vec<Band>,
    field: Box<dyn NoiseField>,
    generated: bool,
}

impl GeneratedWorldComponent {
    pub fn new(width: u32, height: u32, field: impl NoiseField + 'static) -> Self {
        Self {
            width,
            height,
            frequency: 0.05,
            bands: Vec::new(),
            field: Box::new(field),
            generated: false,
        }
    }

    /// Noise samples per tile. Smaller is smoother.
    pub fn with_frequency(mut self, frequency: f64) -> Self {
        self.frequency = frequency;
        self
    }

    pub fn with_band(mut self, max: f64, source: TileSource) -> Self {
        self.bands.push(Band { max, source });
        self.bands.sort_by(|a, b| a.max.total_cmp(&b.max));
        self
    }

    pub fn bands(&self) -> &[Band] {
        &self.bands
    }

    pub fn is_generated(&self) -> bool {
        self.generated
    }

    /// Index of the band `value` falls in, if any.
    pub fn band_for(&self, value: f64) -> Option<usize> {
        self.bands.iter().position(|b| value <= b.max)
    }

    fn resolve_tiles(&self, iface: &mut Interface<'_>) -> EcsResult<Vec<Tile>> {
        let mut tiles = Vec::with_capacity(self.bands.len());
        for band in &self.bands {
            let texture = match &band.source {
                TileSource::Texture(texture) => *texture,
                TileSource::Image(resource) => {
                    let image = iface
                        .assets()?
                        .load_image(resource)
                        .map_err(EcsError::component)?
                        .clone();
                    let handle = iface.renderer()?.create_texture(image.texture_data(), false);
                    TextureRef::whole(handle)
                }
            };
            tiles.push(Tile::new(texture));
        }
        Ok(tiles)
    }

    /// Writes every cell of `tilemap`, registering band tiles it doesn't know yet.
    pub fn generate_into(&self, tilemap: &mut TilemapComponent, tiles: &[Tile]) -> EcsResult<usize> {
        let mut ids = Vec::with_capacity(tiles.len());
        for tile in tiles {
            let id = match tilemap.tiles().id_of(tile) {
                Ok(id) => id,
                Err(_) => tilemap.add_tile_type(*tile)?,
            };
            ids.push(id);
        }

        let mut written = 0;
        for y in 0..self.height {
            for x in 0..self.width {
                let value = self
                    .field
                    .sample(f64::from(x) * self.frequency, f64::from(y) * self.frequency);
                if let Some(band) = self.band_for(value) {
                    tilemap.set_tile_id(x, y, ids[band]);
                    written += 1;
                }
            }
        }
        Ok(written)
    }
}

impl Component for GeneratedWorldComponent {
    fn init(&mut self, iface: &mut Interface<'_>) -> EcsResult<()> {
        if self.generated {
            return Ok(());
        }
        let tiles = self.resolve_tiles(iface)?;
        let tilemap = iface
            .owner_mut()?
            .get_single_component_mut::<TilemapComponent>()?;
        let written = self.generate_into(tilemap, &tiles)?;
        info!(
            width = self.width,
            height = self.height,
            written,
            chunks = tilemap.chunk_count(),
            "world generated"
        );
        self.generated = true;
        Ok(())
    }

    fn is_unique(&self) -> bool {
        true
    }
}
