//! World data container module
//!
//! Runs the generation pipeline and bundles every output into one immutable
//! `WorldData`. All randomness comes from a single `WorldRng` seeded once, so
//! the draw order below is part of the output contract:
//! noise permutation, plates, hotspots, then tectonic forcing.

use rayon::prelude::*;
use tracing::{debug, info};

use crate::biomes::{self, Biome};
use crate::climate;
use crate::config::WorldConfig;
use crate::error::{Result, WorldGenError};
use crate::heightmap::{self, Hotspot};
use crate::noise_field::NoiseField;
use crate::plates::{self, BoundaryKind, BoundaryMap, Plate, PlateId};
use crate::rng::WorldRng;
use crate::tilemap::Tilemap;

/// Receives `(fraction, message)` events at pass boundaries.
///
/// Fractions never decrease and the last event is always `(1.0, "complete")`.
/// Reporting has no effect on the generated world.
pub trait Progress {
    fn report(&mut self, fraction: f64, message: &str);
}

impl<F: FnMut(f64, &str)> Progress for F {
    fn report(&mut self, fraction: f64, message: &str) {
        self(fraction, message)
    }
}

/// Discards every progress event.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _fraction: f64, _message: &str) {}
}

/// Everything known about one tile.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TileInfo {
    pub x: usize,
    pub y: usize,
    pub elevation: f64,
    pub temperature: f64,
    pub moisture: f64,
    pub biome: Biome,
    pub plate_id: PlateId,
    pub boundary: BoundaryKind,
}

/// All generated world data bundled together.
///
/// Created once per seed and never modified afterwards.
#[derive(Clone, Debug)]
pub struct WorldData {
    seed: u32,
    config: WorldConfig,
    plates: Vec<Plate>,
    hotspots: Vec<Hotspot>,
    plate_map: Tilemap<PlateId>,
    boundaries: BoundaryMap,
    elevation: Tilemap<f64>,
    temperature: Tilemap<f64>,
    moisture: Tilemap<f64>,
    /// Elevation that became zero, before the sea-level shift
    sea_level: f64,
}

impl WorldData {
    pub fn seed(&self) -> u32 {
        self.seed
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn width(&self) -> usize {
        self.elevation.width
    }

    pub fn height(&self) -> usize {
        self.elevation.height
    }

    pub fn plates(&self) -> &[Plate] {
        &self.plates
    }

    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    pub fn plate_map(&self) -> &Tilemap<PlateId> {
        &self.plate_map
    }

    pub fn boundaries(&self) -> &BoundaryMap {
        &self.boundaries
    }

    pub fn elevation_map(&self) -> &Tilemap<f64> {
        &self.elevation
    }

    pub fn temperature_map(&self) -> &Tilemap<f64> {
        &self.temperature
    }

    pub fn moisture_map(&self) -> &Tilemap<f64> {
        &self.moisture
    }

    pub fn sea_level(&self) -> f64 {
        self.sea_level
    }

    pub fn elevation(&self, x: usize, y: usize) -> f64 {
        *self.elevation.get(x, y)
    }

    pub fn temperature(&self, x: usize, y: usize) -> f64 {
        *self.temperature.get(x, y)
    }

    pub fn moisture(&self, x: usize, y: usize) -> f64 {
        *self.moisture.get(x, y)
    }

    pub fn elevation_at_index(&self, idx: usize) -> f64 {
        *self.elevation.get_index(idx)
    }

    pub fn temperature_at_index(&self, idx: usize) -> f64 {
        *self.temperature.get_index(idx)
    }

    pub fn moisture_at_index(&self, idx: usize) -> f64 {
        *self.moisture.get_index(idx)
    }

    pub fn plate_at(&self, x: usize, y: usize) -> &Plate {
        &self.plates[self.plate_map.get(x, y).index()]
    }

    pub fn biome_at(&self, x: usize, y: usize) -> Biome {
        Biome::classify(self.elevation(x, y), self.temperature(x, y), self.moisture(x, y))
    }

    pub fn biome_map(&self) -> Tilemap<Biome> {
        biomes::generate_biome_map(&self.elevation, &self.temperature, &self.moisture)
    }

    /// Get tile info at coordinates
    pub fn tile_info(&self, x: usize, y: usize) -> TileInfo {
        TileInfo {
            x,
            y,
            elevation: self.elevation(x, y),
            temperature: self.temperature(x, y),
            moisture: self.moisture(x, y),
            biome: self.biome_at(x, y),
            plate_id: *self.plate_map.get(x, y),
            boundary: self.boundaries.kind_at(x, y),
        }
    }

    /// Fraction of tiles above sea level.
    pub fn land_fraction(&self) -> f64 {
        heightmap::land_fraction(&self.elevation)
    }
}

/// Generate the default 2048 × 1024 world for `seed`.
pub fn generate_world(seed: u32) -> Result<WorldData> {
    generate_world_with_config(seed, &WorldConfig::default(), &mut NoProgress)
}

/// Generate a world with explicit parameters, reporting progress.
pub fn generate_world_with_config<P>(
    seed: u32,
    config: &WorldConfig,
    progress: &mut P,
) -> Result<WorldData>
where
    P: Progress + ?Sized,
{
    config.validate()?;
    let width = config.width;
    let height = config.height;

    info!(
        seed,
        width,
        height,
        plates = config.plate_count,
        hotspots = config.hotspot_count,
        "generating world"
    );

    let mut rng = WorldRng::new(seed);

    progress.report(0.0, "seeding noise field");
    let noise = NoiseField::new(&mut rng);

    progress.report(0.05, "placing tectonic plates");
    let plates = plates::generate_plates(&mut rng, config.plate_count, width, height)?;
    let hotspots = heightmap::generate_hotspots(&mut rng, config.hotspot_count, width, height)?;
    let continental = plates.iter().filter(|p| p.is_continental()).count();
    debug!(continental, oceanic = plates.len() - continental, "plates placed");

    progress.report(0.1, "assigning tiles to plates");
    let plate_map = plates::assign_plates_to_tiles(&plates, width, height);

    progress.report(0.2, "classifying plate boundaries");
    let boundaries = plates::detect_plate_boundaries(&plate_map, &plates);
    let (convergent, divergent, transform) = boundaries.counts();
    debug!(convergent, divergent, transform, "boundaries classified");

    progress.report(0.3, "applying tectonic forcing");
    let mut elevation = heightmap::base_elevation(&plate_map, &plates);
    heightmap::apply_tectonic_forcing(&mut elevation, &plate_map, &boundaries, &plates, &mut rng);

    progress.report(0.4, "diffusing mountain ranges");
    heightmap::diffuse_mountains(&mut elevation, &boundaries, config.diffusion_passes);

    progress.report(0.6, "raising hotspots");
    heightmap::apply_hotspots(&mut elevation, &hotspots, config.hotspot_radius);

    progress.report(0.65, "adding terrain detail");
    heightmap::apply_detail_noise(
        &mut elevation,
        &noise,
        config.detail_amplitude,
        config.detail_frequency,
        config.detail_octaves,
    );

    progress.report(0.7, "normalizing sea level");
    let sea_level = heightmap::normalize_sea_level(&mut elevation, config.sea_level_percentile)?;
    let land = heightmap::land_fraction(&elevation);
    debug!(sea_level, land_fraction = land, "sea level set");

    progress.report(0.8, "computing temperature");
    let temperature = climate::generate_temperature(&elevation, &noise);

    progress.report(0.9, "computing moisture");
    let moisture = climate::generate_moisture(&elevation, &noise, config.moisture_warp);

    for (name, field) in [
        ("elevation", &elevation),
        ("temperature", &temperature),
        ("moisture", &moisture),
    ] {
        if field.as_slice().par_iter().any(|v| v.is_nan()) {
            return Err(WorldGenError::InternalInvariant(format!(
                "{} field contains NaN",
                name
            )));
        }
    }

    progress.report(1.0, "complete");
    info!(seed, land_fraction = land, "world generated");

    Ok(WorldData {
        seed,
        config: config.clone(),
        plates,
        hotspots,
        plate_map,
        boundaries,
        elevation,
        temperature,
        moisture,
        sea_level,
    })
}
