use std::fs;
use std::path::PathBuf;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use tectonic_planet::biomes::biome_histogram;
use tectonic_planet::export;
use tectonic_planet::heightmap::field_stats;
use tectonic_planet::plates::plate_areas;
use tectonic_planet::{generate_world_with_config, WorldConfig};

#[derive(Parser, Debug)]
#[command(name = "tectonic_planet")]
#[command(about = "Generate deterministic planet surfaces from tectonic plates")]
struct Args {
    /// Random seed (uses random seed if not specified)
    #[arg(short, long)]
    seed: Option<u32>,

    /// Width of the tilemap in tiles
    #[arg(short = 'W', long)]
    width: Option<usize>,

    /// Height of the tilemap in tiles
    #[arg(short = 'H', long)]
    height: Option<usize>,

    /// Number of tectonic plates
    #[arg(short = 'p', long)]
    plates: Option<usize>,

    /// Number of volcanic hotspots
    #[arg(long)]
    hotspots: Option<usize>,

    /// JSON file with generation parameters; flags override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory for the PNG exports
    #[arg(short, long, default_value = "output")]
    output: PathBuf,

    /// Also write summary.json with statistics
    #[arg(long)]
    summary: bool,
}

impl Args {
    fn world_config(&self) -> Result<WorldConfig, Box<dyn std::error::Error>> {
        let mut config = match &self.config {
            Some(path) => serde_json::from_str(&fs::read_to_string(path)?)?,
            None => WorldConfig::default(),
        };
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(plates) = self.plates {
            config.plate_count = plates;
        }
        if let Some(hotspots) = self.hotspots {
            config.hotspot_count = hotspots;
        }
        Ok(config)
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = args.world_config()?;
    let seed = args.seed.unwrap_or_else(rand::random);

    info!("Generating planet with seed: {}", seed);
    info!("Map size: {}x{}", config.width, config.height);

    let mut last_step = -1i32;
    let mut report = |fraction: f64, message: &str| {
        // Log each tenth once so long runs stay quiet
        let step = (fraction * 10.0) as i32;
        if step != last_step {
            last_step = step;
            info!("[{:>3.0}%] {}", fraction * 100.0, message);
        }
    };
    let world = generate_world_with_config(seed, &config, &mut report)?;

    let plates = world.plates();
    let continental = plates.iter().filter(|p| p.is_continental()).count();
    info!(
        "Created {} plates ({} continental, {} oceanic)",
        plates.len(),
        continental,
        plates.len() - continental
    );

    let areas = plate_areas(world.plate_map(), plates.len());
    if let Some((id, &area)) = areas.iter().enumerate().max_by_key(|&(_, a)| *a) {
        info!(
            "Largest plate: #{} ({:.1}% of surface)",
            id,
            100.0 * area as f64 / world.plate_map().len() as f64
        );
    }

    let (convergent, divergent, transform) = world.boundaries().counts();
    info!(
        "Boundary tiles: {} convergent, {} divergent, {} transform",
        convergent, divergent, transform
    );

    let (min_e, max_e, _) = field_stats(world.elevation_map());
    info!(
        "Elevation range: {:.3} to {:.3} ({:.1}% land, sea level {:.4})",
        min_e,
        max_e,
        world.land_fraction() * 100.0,
        world.sea_level()
    );
    let (min_t, max_t, mean_t) = field_stats(world.temperature_map());
    info!("Temperature: {:.2} to {:.2} (mean {:.2})", min_t, max_t, mean_t);
    let (min_m, max_m, mean_m) = field_stats(world.moisture_map());
    info!("Moisture: {:.2} to {:.2} (mean {:.2})", min_m, max_m, mean_m);

    let biomes = world.biome_map();
    for (biome, count) in biome_histogram(&biomes) {
        if count > 0 {
            info!(
                "  {:<10} {:>5.1}%",
                biome.display_name(),
                100.0 * count as f64 / biomes.len() as f64
            );
        }
    }

    let written = export::export_world(&world, &args.output, args.summary)?;
    if written.is_empty() {
        warn!("no files were written");
    }
    info!("Done! Wrote {} files to {}", written.len(), args.output.display());

    Ok(())
}
