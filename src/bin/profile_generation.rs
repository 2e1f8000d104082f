//! Profiling tool to identify performance bottlenecks

use std::time::{Duration, Instant};

use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tectonic_planet::heightmap::{self, land_fraction};
use tectonic_planet::noise_field::NoiseField;
use tectonic_planet::rng::WorldRng;
use tectonic_planet::{climate, plates, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "profile_generation")]
#[command(about = "Time each stage of planet generation")]
struct Args {
    /// Width of the tilemap in tiles
    #[arg(short = 'W', long, default_value = "2048")]
    width: usize,

    /// Height of the tilemap in tiles
    #[arg(short = 'H', long, default_value = "1024")]
    height: usize,

    /// Random seed
    #[arg(short, long, default_value = "1337")]
    seed: u32,
}

fn timed<T>(label: &str, total: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    *total += elapsed;
    info!("{:<24} {:?}", label, elapsed);
    out
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let Args { width, height, seed } = Args::parse();

    let config = WorldConfig::with_size(width, height);
    config.validate()?;

    info!("=== Performance Profiling (seed {}) ===", seed);
    info!("Map size: {}x{} ({} cells), {} rayon threads", width, height, width * height, rayon::current_num_threads());

    let mut total = Duration::ZERO;
    let mut rng = WorldRng::new(seed);

    let noise = timed("Noise field", &mut total, || NoiseField::new(&mut rng));
    let plate_list = timed("Plate placement", &mut total, || {
        plates::generate_plates(&mut rng, config.plate_count, width, height)
    })?;
    let hotspots = heightmap::generate_hotspots(&mut rng, config.hotspot_count, width, height)?;
    let plate_map = timed("Plate assignment", &mut total, || {
        plates::assign_plates_to_tiles(&plate_list, width, height)
    });
    let boundaries = timed("Boundary detection", &mut total, || {
        plates::detect_plate_boundaries(&plate_map, &plate_list)
    });

    let mut elevation = timed("Base + forcing", &mut total, || {
        let mut e = heightmap::base_elevation(&plate_map, &plate_list);
        heightmap::apply_tectonic_forcing(&mut e, &plate_map, &boundaries, &plate_list, &mut rng);
        e
    });
    timed("Mountain diffusion", &mut total, || {
        heightmap::diffuse_mountains(&mut elevation, &boundaries, config.diffusion_passes)
    });
    timed("Hotspots", &mut total, || {
        heightmap::apply_hotspots(&mut elevation, &hotspots, config.hotspot_radius)
    });
    timed("Detail noise", &mut total, || {
        heightmap::apply_detail_noise(
            &mut elevation,
            &noise,
            config.detail_amplitude,
            config.detail_frequency,
            config.detail_octaves,
        )
    });
    let sea = timed("Sea level", &mut total, || {
        heightmap::normalize_sea_level(&mut elevation, config.sea_level_percentile)
    })?;
    timed("Temperature", &mut total, || climate::generate_temperature(&elevation, &noise));
    timed("Moisture", &mut total, || {
        climate::generate_moisture(&elevation, &noise, config.moisture_warp)
    });

    info!("Total: {:?}", total);
    info!("Sea level {:.4}, land {:.1}%", sea, land_fraction(&elevation) * 100.0);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args_defaults() {
        let args = Args::try_parse_from(["profile_generation"]).unwrap();
        assert_eq!((args.width, args.height, args.seed), (2048, 1024, 1337));
    }

    #[test]
    fn test_args_overrides_and_rejects_garbage() {
        let args = Args::try_parse_from(["profile_generation", "-W", "512", "--height", "256", "-s", "7"]).unwrap();
        assert_eq!((args.width, args.height, args.seed), (512, 256, 7));
        assert!(Args::try_parse_from(["profile_generation", "--width", "wide"]).is_err());
    }
}
