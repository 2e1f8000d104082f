//! Tectonic planet generation library
//!
//! Generates a deterministic planetary surface (elevation, temperature and
//! moisture) from a `u32` seed using a simplified plate tectonics model.

pub mod biomes;
pub mod climate;
pub mod config;
pub mod error;
pub mod export;
pub mod heightmap;
pub mod noise_field;
pub mod plates;
pub mod rng;
pub mod tilemap;
pub mod world;

pub use config::WorldConfig;
pub use error::{Result, WorldGenError};
pub use world::{generate_world, generate_world_with_config, NoProgress, Progress, WorldData};
