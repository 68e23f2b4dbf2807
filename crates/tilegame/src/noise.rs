// crates/tilegame/src/noise.rs
//! Deterministic 2D value noise for world generation.

/// A scalar field sampled at world coordinates, in `[-1, 1]`.
pub trait NoiseField {
    fn sample(&self, x: f64, y: f64) -> f64;
}

/// Seed for a noise field. The same seed gives the same world everywhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WorldSeed(u64);

impl WorldSeed {
    pub const fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub const fn value(self) -> u64 {
        self.0
    }
}

impl Default for WorldSeed {
    fn default() -> Self {
        Self(0xDEAD_BEEF_CAFE_BABE)
    }
}

/// Lattice value noise with smoothstep interpolation and optional octaves.
pub struct ValueNoise {
    perm: [u8; 512],
    values: [f64; 256],
    octaves: u32,
    persistence: f64,
    lacunarity: f64,
}

impl ValueNoise {
    pub fn new(seed: WorldSeed) -> Self {
        let mut state = seed.value() | 1;
        let mut next = move || {
            // xorshift64
            state ^= state << 13;
            state ^= state >> 7;
            state ^= state << 17;
            state
        };

        let mut perm = [0u8; 512];
        for (i, p) in perm.iter_mut().take(256).enumerate() {
            *p = i as u8;
        }
        for i in (1..256).rev() {
            let j = (next() as usize) % (i + 1);
            perm.swap(i, j);
        }
        for i in 0..256 {
            perm[256 + i] = perm[i];
        }

        let mut values = [0.0; 256];
        for v in &mut values {
            *v = (next() >> 11) as f64 / (1u64 << 53) as f64 * 2.0 - 1.0;
        }

        Self {
            perm,
            values,
            octaves: 1,
            persistence: 0.5,
            lacunarity: 2.0,
        }
    }

    /// Sums `octaves` layers, each `lacunarity` times finer and `persistence`
    /// times weaker than the last. The result is renormalized to `[-1, 1]`.
    pub fn with_octaves(mut self, octaves: u32, persistence: f64, lacunarity: f64) -> Self {
        self.octaves = octaves.max(1);
        self.persistence = persistence;
        self.lacunarity = lacunarity;
        self
    }

    fn lattice(&self, x: i64, y: i64) -> f64 {
        let xi = (x & 255) as usize;
        let yi = (y & 255) as usize;
        let hash = self.perm[xi + self.perm[yi] as usize];
        self.values[hash as usize]
    }

    fn single(&self, x: f64, y: f64) -> f64 {
        let x0 = x.floor();
        let y0 = y.floor();
        let (ix, iy) = (x0 as i64, y0 as i64);
        let tx = smoothstep(x - x0);
        let ty = smoothstep(y - y0);

        let top = lerp(self.lattice(ix, iy), self.lattice(ix + 1, iy), tx);
        let bottom = lerp(self.lattice(ix, iy + 1), self.lattice(ix + 1, iy + 1), tx);
        lerp(top, bottom, ty)
    }
}

impl NoiseField for ValueNoise {
    fn sample(&self, x: f64, y: f64) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max = 0.0;
        for _ in 0..self.octaves {
            total += self.single(x * frequency, y * frequency) * amplitude;
            max += amplitude;
            amplitude *= self.persistence;
            frequency *= self.lacunarity;
        }
        if max > 0.0 {
            total / max
        } else {
            0.0
        }
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_field() {
        let a = ValueNoise::new(WorldSeed::new(42)).with_octaves(4, 0.5, 2.0);
        let b = ValueNoise::new(WorldSeed::new(42)).with_octaves(4, 0.5, 2.0);
        let c = ValueNoise::new(WorldSeed::new(43)).with_octaves(4, 0.5, 2.0);
        let points = [(0.3, 0.7), (12.5, -3.25), (100.0, 100.0)];
        for (x, y) in points {
            assert_eq!(a.sample(x, y), b.sample(x, y));
        }
        assert!(points.iter().any(|&(x, y)| a.sample(x, y) != c.sample(x, y)));
    }

    #[test]
    fn stays_in_range_and_hits_lattice_values() {
        let noise = ValueNoise::new(WorldSeed::default()).with_octaves(3, 0.5, 2.0);
        for i in 0..500 {
            let v = noise.sample(i as f64 * 0.173, i as f64 * -0.291);
            assert!((-1.0..=1.0).contains(&v), "{v} out of range");
        }

        let single = ValueNoise::new(WorldSeed::new(7));
        assert_eq!(single.sample(3.0, 5.0), single.lattice(3, 5));
    }
}
