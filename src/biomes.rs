//! Biome classification for rendering.
//!
//! A pure cascade over (elevation, temperature, moisture); the first rule
//! that matches wins, so every input maps to exactly one biome.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::tilemap::Tilemap;

/// Surface biome of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Biome {
    Ocean,
    Coast,
    Mountain,
    Snow,
    Tundra,
    Desert,
    Grassland,
    Forest,
}

impl Biome {
    pub const ALL: [Biome; 8] = [
        Biome::Ocean,
        Biome::Coast,
        Biome::Mountain,
        Biome::Snow,
        Biome::Tundra,
        Biome::Desert,
        Biome::Grassland,
        Biome::Forest,
    ];

    /// Classify a tile. Total over all finite inputs.
    pub fn classify(elevation: f64, temperature: f64, moisture: f64) -> Self {
        if elevation < -0.05 {
            Biome::Ocean
        } else if elevation < 0.0 {
            Biome::Coast
        } else if elevation > 0.6 {
            Biome::Mountain
        } else if temperature < 0.2 {
            Biome::Snow
        } else if temperature < 0.4 {
            Biome::Tundra
        } else if moisture < 0.4 {
            Biome::Desert
        } else if moisture < 0.55 {
            Biome::Grassland
        } else {
            Biome::Forest
        }
    }

    pub fn color(&self) -> (u8, u8, u8) {
        match self {
            Biome::Ocean => (20, 40, 80),
            Biome::Coast => (70, 90, 110),
            Biome::Mountain => (100, 100, 100),
            Biome::Snow => (240, 240, 250),
            Biome::Tundra => (120, 120, 100),
            Biome::Desert => (210, 180, 100),
            Biome::Grassland => (100, 140, 80),
            Biome::Forest => (40, 80, 40),
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Biome::Ocean => "Ocean",
            Biome::Coast => "Coast",
            Biome::Mountain => "Mountain",
            Biome::Snow => "Snow",
            Biome::Tundra => "Tundra",
            Biome::Desert => "Desert",
            Biome::Grassland => "Grassland",
            Biome::Forest => "Forest",
        }
    }

    pub fn is_water(&self) -> bool {
        matches!(self, Biome::Ocean | Biome::Coast)
    }
}

/// Classify every tile of three parallel fields.
pub fn generate_biome_map(
    elevation: &Tilemap<f64>,
    temperature: &Tilemap<f64>,
    moisture: &Tilemap<f64>,
) -> Tilemap<Biome> {
    Tilemap::from_fn_par(elevation.width, elevation.height, Biome::Ocean, |x, y| {
        Biome::classify(*elevation.get(x, y), *temperature.get(x, y), *moisture.get(x, y))
    })
}

/// Tile count per biome, in `Biome::ALL` order.
pub fn biome_histogram(biomes: &Tilemap<Biome>) -> Vec<(Biome, usize)> {
    Biome::ALL
        .iter()
        .map(|&b| (b, biomes.as_slice().par_iter().filter(|&&t| t == b).count()))
        .collect()
}
