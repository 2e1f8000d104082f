use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::config::MAX_HOTSPOTS;
use crate::error::{Result, WorldGenError};
use crate::noise_field::NoiseField;
use crate::plates::{BoundaryKind, BoundaryMap, Plate, PlateId};
use crate::rng::WorldRng;
use crate::tilemap::{wrapped_distance_sq, Tilemap};

// =============================================================================
// TECTONIC FORCING RANGES
// =============================================================================

// Convergent uplift
const UPLIFT_CONTINENTAL_COLLISION: (f64, f64) = (0.5, 0.85);
const UPLIFT_SUBDUCTION: (f64, f64) = (0.3, 0.6);
const UPLIFT_ISLAND_ARC: (f64, f64) = (0.15, 0.35);

// Divergent
const UPLIFT_OCEAN_RIDGE: (f64, f64) = (0.08, 0.18);
const SUBSIDENCE_RIFT: (f64, f64) = (-0.15, -0.05);

// Transform faults jitter slightly, biased upward
const TRANSFORM_JITTER: (f64, f64) = (-0.05, 0.08);

// =============================================================================
// MOUNTAIN DIFFUSION
// =============================================================================

/// Convergent tiles above this elevation feed the mountain skirt.
const MOUNTAIN_SOURCE_MIN: f64 = 0.3;
/// Fraction of a source tile's elevation pushed to each lower neighbor.
const MOUNTAIN_PUSH: f64 = 0.18;
/// Decay applied when spread hops one more tile.
const HOP_DECAY: f64 = 0.85;
/// Decay applied to the spread buffer between passes.
const PASS_DECAY: f64 = 0.7;

// =============================================================================
// HOTSPOTS, DETAIL, SEA LEVEL
// =============================================================================

const HOTSPOT_STRENGTH: (f64, f64) = (0.15, 0.35);

/// Detail noise is sampled far from the origin so it decorrelates from
/// the other layers that share the noise field.
const DETAIL_OFFSET: f64 = 5000.0;
const DETAIL_PERSISTENCE: f64 = 0.5;
const DETAIL_LACUNARITY: f64 = 2.0;

/// Vertical stretch applied after shifting sea level to zero.
const SEA_LEVEL_STRETCH: f64 = 1.2;

/// A mantle plume: fixed elevation source independent of plate boundaries.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Hotspot {
    pub x: f64,
    pub y: f64,
    pub strength: f64,
}

/// Place `count` hotspots. Each draws x, y, strength in that order.
pub fn generate_hotspots(
    rng: &mut WorldRng,
    count: usize,
    width: usize,
    height: usize,
) -> Result<Vec<Hotspot>> {
    if count > MAX_HOTSPOTS {
        return Err(WorldGenError::config(
            "hotspot_count",
            format!("must be at most {} (got {})", MAX_HOTSPOTS, count),
        ));
    }

    let hotspots = (0..count)
        .map(|_| {
            let x = rng.next_f64() * width as f64;
            let y = rng.next_f64() * height as f64;
            let strength = rng.range(HOTSPOT_STRENGTH.0, HOTSPOT_STRENGTH.1);
            Hotspot { x, y, strength }
        })
        .collect();

    Ok(hotspots)
}

/// Pass 1: every tile starts at its plate's elevation bias.
pub fn base_elevation(plate_map: &Tilemap<PlateId>, plates: &[Plate]) -> Tilemap<f64> {
    Tilemap::from_fn_par(plate_map.width, plate_map.height, 0.0, |x, y| {
        plates[plate_map.get(x, y).index()].base_elevation
    })
}

/// Uplift range for a boundary tile, keyed by its kind and the two plate types.
fn forcing_range(kind: BoundaryKind, own: &Plate, other: &Plate) -> Option<(f64, f64)> {
    let continental = own.is_continental() as u8 + other.is_continental() as u8;
    match kind {
        BoundaryKind::Interior => None,
        BoundaryKind::Convergent => Some(match continental {
            2 => UPLIFT_CONTINENTAL_COLLISION,
            1 => UPLIFT_SUBDUCTION,
            _ => UPLIFT_ISLAND_ARC,
        }),
        BoundaryKind::Divergent => Some(if continental == 0 {
            UPLIFT_OCEAN_RIDGE
        } else {
            SUBSIDENCE_RIFT
        }),
        BoundaryKind::Transform => Some(TRANSFORM_JITTER),
    }
}

/// Pass 2: add one random delta to each boundary tile.
///
/// Tiles are visited in row-major order and each boundary tile consumes
/// exactly one draw, so this pass is sequential.
pub fn apply_tectonic_forcing(
    elevation: &mut Tilemap<f64>,
    plate_map: &Tilemap<PlateId>,
    boundaries: &BoundaryMap,
    plates: &[Plate],
    rng: &mut WorldRng,
) {
    for y in 0..elevation.height {
        for x in 0..elevation.width {
            let own = &plates[plate_map.get(x, y).index()];
            let other = &plates[boundaries.neighbor_at(x, y).index()];
            if let Some((min, max)) = forcing_range(boundaries.kind_at(x, y), own, other) {
                let idx = elevation.index(x, y);
                elevation.as_mut_slice()[idx] += rng.range(min, max);
            }
        }
    }
}

/// Pass 3: grow mountain skirts around convergent uplift.
///
/// Each pass gathers pushes from the elevation snapshot and the spread
/// buffer left by the previous pass. Only non-boundary tiles receive; a
/// receiver keeps the strongest push among its higher neighbors, so the
/// result does not depend on visiting order. The pushes accumulate into the
/// spread buffer, the whole buffer is added to elevation, and the buffer
/// carries into the next pass decayed.
pub fn diffuse_mountains(elevation: &mut Tilemap<f64>, boundaries: &BoundaryMap, passes: u32) {
    let width = elevation.width;
    let height = elevation.height;
    let mut spread = Tilemap::new_with(width, height, 0.0f64);

    for _ in 0..passes {
        let snapshot = &*elevation;
        let pushes = Tilemap::from_fn_par(width, height, 0.0f64, |x, y| {
            if boundaries.is_boundary(x, y) {
                return 0.0;
            }
            let here = *snapshot.get(x, y);
            snapshot
                .neighbors(x, y)
                .filter(|&(nx, ny)| *snapshot.get(nx, ny) > here)
                .map(|(nx, ny)| {
                    let source = *snapshot.get(nx, ny);
                    if boundaries.kind_at(nx, ny) == BoundaryKind::Convergent
                        && source > MOUNTAIN_SOURCE_MIN
                    {
                        source * MOUNTAIN_PUSH
                    } else {
                        *spread.get(nx, ny) * HOP_DECAY
                    }
                })
                .fold(0.0, f64::max)
        });

        spread
            .as_mut_slice()
            .par_iter_mut()
            .zip(pushes.as_slice().par_iter())
            .for_each(|(s, p)| *s += p);

        elevation
            .as_mut_slice()
            .par_iter_mut()
            .zip(spread.as_slice().par_iter())
            .for_each(|(e, s)| *e += s);

        spread.as_mut_slice().par_iter_mut().for_each(|s| *s *= PASS_DECAY);
    }
}

/// Pass 4: volcanic uplift with squared falloff inside `radius` (wrapped X).
pub fn apply_hotspots(elevation: &mut Tilemap<f64>, hotspots: &[Hotspot], radius: f64) {
    let width = elevation.width;
    elevation.par_rows_mut().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            for hotspot in hotspots {
                let d = wrapped_distance_sq(hotspot.x, hotspot.y, x as f64, y as f64, width).sqrt();
                if d < radius {
                    let lift = (1.0 - d / radius) * hotspot.strength;
                    *cell += lift * lift;
                }
            }
        }
    });
}

/// Pass 5: low-amplitude fBm texture.
pub fn apply_detail_noise(
    elevation: &mut Tilemap<f64>,
    noise: &NoiseField,
    amplitude: f64,
    frequency: f64,
    octaves: u32,
) {
    elevation.par_rows_mut().for_each(|(y, row)| {
        for (x, cell) in row.iter_mut().enumerate() {
            let n = noise.fbm(
                x as f64 * frequency + DETAIL_OFFSET,
                y as f64 * frequency + DETAIL_OFFSET,
                octaves,
                DETAIL_PERSISTENCE,
                DETAIL_LACUNARITY,
                0.0,
            );
            *cell += amplitude * n;
        }
    });
}

/// Pass 6: shift the `percentile` value to zero and stretch.
///
/// Returns the pre-shift sea level. Fails on an empty field or a NaN,
/// either of which means an earlier pass is broken.
pub fn normalize_sea_level(elevation: &mut Tilemap<f64>, percentile: f64) -> Result<f64> {
    if elevation.is_empty() {
        return Err(WorldGenError::InternalInvariant(
            "sea level requested for an empty elevation field".into(),
        ));
    }
    if elevation.as_slice().par_iter().any(|v| v.is_nan()) {
        return Err(WorldGenError::InternalInvariant(
            "elevation field contains NaN before sea level normalization".into(),
        ));
    }

    let mut sorted = elevation.as_slice().to_vec();
    sorted.par_sort_unstable_by(f64::total_cmp);
    let n = sorted.len();
    let idx = ((n as f64 * percentile) as usize).min(n - 1);
    let sea_level = sorted[idx];

    elevation
        .as_mut_slice()
        .par_iter_mut()
        .for_each(|v| *v = (*v - sea_level) * SEA_LEVEL_STRETCH);

    Ok(sea_level)
}

/// Fraction of tiles strictly above sea level.
pub fn land_fraction(elevation: &Tilemap<f64>) -> f64 {
    if elevation.is_empty() {
        return 0.0;
    }
    let land = elevation.as_slice().par_iter().filter(|&&v| v > 0.0).count();
    land as f64 / elevation.len() as f64
}

/// (min, max, mean) of a field.
pub fn field_stats(field: &Tilemap<f64>) -> (f64, f64, f64) {
    let slice = field.as_slice();
    if slice.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let min = slice.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = slice.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let mean = slice.iter().sum::<f64>() / slice.len() as f64;
    (min, max, mean)
}
