use std::f64::consts::TAU;

use rayon::prelude::*;

use crate::config::MAX_PLATES;
use crate::error::{Result, WorldGenError};
use crate::rng::WorldRng;
use crate::tilemap::{wrapped_distance_sq, Tilemap};

use super::types::{Plate, PlateId, PlateType, Vec2};

/// Latitude band (as a fraction of the half-height) where continents form easily.
const TEMPERATE_BAND: f64 = 0.6;

/// Type-roll threshold above which a plate inside the band is continental.
const CONTINENTAL_ROLL_TEMPERATE: f64 = 0.4;

/// Type-roll threshold above which a polar plate is continental.
const CONTINENTAL_ROLL_POLAR: f64 = 0.8;

/// Plate speed range in grid units.
const MIN_SPEED: f64 = 0.3;
const MAX_SPEED: f64 = 1.2;

/// Normalized latitude in `[-1, 1)`: -1 at the top row, 0 at the equator.
pub fn latitude(y: f64, height: usize) -> f64 {
    (y / height as f64 - 0.5) * 2.0
}

/// Place `count` plates on a `width × height` grid.
///
/// Each plate draws, in order: x, y, type roll, heading, speed. Continents
/// favor the temperate band; polar plates are mostly oceanic.
pub fn generate_plates(
    rng: &mut WorldRng,
    count: usize,
    width: usize,
    height: usize,
) -> Result<Vec<Plate>> {
    if count == 0 || count > MAX_PLATES {
        return Err(WorldGenError::config(
            "plate_count",
            format!("must be in 1..={} (got {})", MAX_PLATES, count),
        ));
    }

    let plates = (0..count)
        .map(|i| {
            let x = rng.next_f64() * width as f64;
            let y = rng.next_f64() * height as f64;
            let roll = rng.next_f64();

            let lat = latitude(y, height);
            let threshold = if lat.abs() < TEMPERATE_BAND {
                CONTINENTAL_ROLL_TEMPERATE
            } else {
                CONTINENTAL_ROLL_POLAR
            };
            let plate_type = if roll > threshold {
                PlateType::Continental
            } else {
                PlateType::Oceanic
            };

            let angle = rng.next_f64() * TAU;
            let speed = rng.range(MIN_SPEED, MAX_SPEED);

            Plate::new(PlateId(i as u8), Vec2::new(x, y), plate_type, Vec2::from_polar(angle, speed))
        })
        .collect();

    Ok(plates)
}

/// Assign every tile to the plate whose center is nearest (wrapped X).
///
/// Distances are measured from the tile's integer coordinates. Ties go to
/// the lowest plate id.
pub fn assign_plates_to_tiles(plates: &[Plate], width: usize, height: usize) -> Tilemap<PlateId> {
    Tilemap::from_fn_par(width, height, PlateId::default(), |x, y| {
        nearest_plate(plates, x as f64, y as f64, width)
    })
}

fn nearest_plate(plates: &[Plate], x: f64, y: f64, width: usize) -> PlateId {
    let mut best = PlateId::default();
    let mut best_dist = f64::INFINITY;
    for plate in plates {
        let d = wrapped_distance_sq(plate.center.x, plate.center.y, x, y, width);
        // Strict comparison keeps the earliest (lowest id) plate on ties
        if d < best_dist {
            best_dist = d;
            best = plate.id;
        }
    }
    best
}

/// Number of tiles owned by each plate, indexed by plate id.
pub fn plate_areas(plate_map: &Tilemap<PlateId>, plate_count: usize) -> Vec<usize> {
    plate_map
        .as_slice()
        .par_chunks(plate_map.width.max(1))
        .map(|row| {
            let mut counts = vec![0usize; plate_count];
            for id in row {
                if let Some(c) = counts.get_mut(id.index()) {
                    *c += 1;
                }
            }
            counts
        })
        .reduce(
            || vec![0usize; plate_count],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x += y;
                }
                a
            },
        )
}
