//! Seeded 2D gradient noise with fractal (fBm) composition.
//!
//! The permutation table is shuffled from a `WorldRng` once at construction;
//! afterwards every query is a pure function of its coordinates.

use noise::NoiseFn;

use crate::rng::WorldRng;

/// Hash-selected gradient directions.
const GRADIENTS: [(f64, f64); 8] = [
    (1.0, 1.0),
    (-1.0, 1.0),
    (1.0, -1.0),
    (-1.0, -1.0),
    (1.0, 0.0),
    (-1.0, 0.0),
    (0.0, 1.0),
    (0.0, -1.0),
];

/// Offset between the two warp samples so they decorrelate.
const WARP_OFFSET: f64 = 100.0;

/// Frequency of the warp samples relative to the input coordinates.
const WARP_FREQUENCY: f64 = 0.5;

/// Gradient noise field backed by a 512-entry permutation table.
#[derive(Clone)]
pub struct NoiseField {
    perm: [u8; 512],
}

impl NoiseField {
    /// Build the permutation table from the stream.
    ///
    /// Consumes exactly 255 draws (Fisher–Yates over `0..=255`).
    pub fn new(rng: &mut WorldRng) -> Self {
        let mut table = [0u8; 256];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        for i in (1..256).rev() {
            let j = (rng.next_f64() * (i + 1) as f64) as usize;
            table.swap(i, j);
        }

        // Duplicated so lattice lookups never need a wrap check
        let mut perm = [0u8; 512];
        for (i, slot) in perm.iter_mut().enumerate() {
            *slot = table[i & 255];
        }
        Self { perm }
    }

    /// Single-octave gradient noise, roughly in `[-1, 1]`.
    ///
    /// Zero at every integer lattice point.
    pub fn noise(&self, x: f64, y: f64) -> f64 {
        let x_floor = x.floor();
        let y_floor = y.floor();
        let xi = (x_floor as i64 & 255) as usize;
        let yi = (y_floor as i64 & 255) as usize;
        let xf = x - x_floor;
        let yf = y - y_floor;

        let u = fade(xf);
        let v = fade(yf);

        let p = &self.perm;
        let a = p[xi] as usize + yi;
        let b = p[xi + 1] as usize + yi;

        let bottom = lerp(gradient(p[a], xf, yf), gradient(p[b], xf - 1.0, yf), u);
        let top = lerp(
            gradient(p[a + 1], xf, yf - 1.0),
            gradient(p[b + 1], xf - 1.0, yf - 1.0),
            u,
        );
        lerp(bottom, top, v)
    }

    /// Fractional Brownian Motion - layers multiple octaves of noise for self-similar detail.
    ///
    /// With `warp > 0` the input is first displaced by noise sampled at half
    /// frequency. The sum is divided by the total amplitude, so the output
    /// stays roughly in `[-1, 1]` for any octave count. Zero octaves yield 0.
    pub fn fbm(
        &self,
        x: f64,
        y: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
        warp: f64,
    ) -> f64 {
        if octaves == 0 {
            return 0.0;
        }

        let (x, y) = if warp > 0.0 {
            self.domain_warp(x, y, warp)
        } else {
            (x, y)
        };

        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_value = 0.0;

        for _ in 0..octaves {
            total += self.noise(x * frequency, y * frequency) * amplitude;
            max_value += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }

        total / max_value
    }

    /// Domain warping - distorts coordinates using noise for organic shapes.
    fn domain_warp(&self, x: f64, y: f64, strength: f64) -> (f64, f64) {
        let wx = x * WARP_FREQUENCY;
        let wy = y * WARP_FREQUENCY;
        let warp_x = self.noise(wx, wy);
        let warp_y = self.noise(wx + WARP_OFFSET, wy + WARP_OFFSET);

        (x + warp_x * strength, y + warp_y * strength)
    }
}

impl NoiseFn<f64, 2> for NoiseField {
    fn get(&self, point: [f64; 2]) -> f64 {
        self.noise(point[0], point[1])
    }
}

/// Quintic fade curve `t³(t(6t − 15) + 10)`.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + t * (b - a)
}

fn gradient(hash: u8, x: f64, y: f64) -> f64 {
    let (gx, gy) = GRADIENTS[(hash & 7) as usize];
    gx * x + gy * y
}
