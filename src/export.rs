use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageBuffer, Rgb, RgbImage};
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::biomes::{biome_histogram, Biome};
use crate::config::WorldConfig;
use crate::heightmap::{field_stats, Hotspot};
use crate::plates::{BoundaryMap, Plate, PlateId};
use crate::tilemap::Tilemap;
use crate::world::WorldData;

/// Errors raised while writing world artifacts.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{width}x{height} grid does not fit in an image")]
    Dimensions { width: usize, height: usize },
}

/// Render an elevation field using a spectral colormap.
/// Values are mapped from `[-range, range]` onto the colormap.
pub fn render_elevation(elevation: &Tilemap<f64>, range: f64) -> Result<RgbImage, ExportError> {
    render_with(elevation.width, elevation.height, |x, y| {
        let t = (*elevation.get(x, y) / range + 1.0) * 0.5;
        spectral_colormap(t.clamp(0.0, 1.0))
    })
}

/// Spectral colormap (matplotlib style): dark blue -> cyan -> green -> yellow -> orange -> red
fn spectral_colormap(t: f64) -> [u8; 3] {
    let colors: [[f64; 3]; 11] = [
        [0.37, 0.31, 0.64], // Dark blue/purple (low)
        [0.20, 0.53, 0.74], // Blue
        [0.40, 0.76, 0.65], // Teal
        [0.67, 0.87, 0.64], // Light green
        [0.90, 0.96, 0.60], // Yellow-green
        [1.00, 1.00, 0.75], // Light yellow / white
        [1.00, 0.88, 0.55], // Yellow
        [0.99, 0.68, 0.38], // Light orange
        [0.96, 0.43, 0.26], // Orange
        [0.84, 0.24, 0.31], // Red
        [0.62, 0.00, 0.26], // Dark red (high)
    ];

    let t_scaled = t * 10.0;
    let idx = (t_scaled as usize).min(9);
    let frac = t_scaled - idx as f64;

    let c1 = colors[idx];
    let c2 = colors[idx + 1];

    [
        ((c1[0] + (c2[0] - c1[0]) * frac) * 255.0) as u8,
        ((c1[1] + (c2[1] - c1[1]) * frac) * 255.0) as u8,
        ((c1[2] + (c2[2] - c1[2]) * frac) * 255.0) as u8,
    ]
}

/// Render per-tile biome colors.
pub fn render_biome_map(biomes: &Tilemap<Biome>) -> Result<RgbImage, ExportError> {
    render_with(biomes.width, biomes.height, |x, y| {
        let (r, g, b) = biomes.get(x, y).color();
        [r, g, b]
    })
}

/// Render each tile in its plate's color.
pub fn render_plate_map(plate_map: &Tilemap<PlateId>, plates: &[Plate]) -> Result<RgbImage, ExportError> {
    render_with(plate_map.width, plate_map.height, |x, y| {
        plates
            .get(plate_map.get(x, y).index())
            .map(|p| p.color)
            .unwrap_or([0, 0, 0])
    })
}

/// Render boundary kinematics: red convergent, blue divergent, yellow transform.
pub fn render_boundaries(boundaries: &BoundaryMap) -> Result<RgbImage, ExportError> {
    render_with(boundaries.kind.width, boundaries.kind.height, |x, y| {
        boundaries.kind_at(x, y).color()
    })
}

fn render_with<F>(width: usize, height: usize, color: F) -> Result<RgbImage, ExportError>
where
    F: Fn(usize, usize) -> [u8; 3],
{
    let (w, h) = image_dimensions(width, height)?;
    Ok(ImageBuffer::from_fn(w, h, |x, y| Rgb(color(x as usize, y as usize))))
}

/// Grid size as image dimensions; images are limited to `u32` per side.
fn image_dimensions(width: usize, height: usize) -> Result<(u32, u32), ExportError> {
    match (u32::try_from(width), u32::try_from(height)) {
        (Ok(w), Ok(h)) => Ok((w, h)),
        _ => Err(ExportError::Dimensions { width, height }),
    }
}

/// Aggregate statistics written next to the images.
#[derive(Debug, Serialize)]
pub struct WorldSummary<'a> {
    pub seed: u32,
    pub config: &'a WorldConfig,
    pub sea_level: f64,
    pub land_fraction: f64,
    pub elevation: FieldSummary,
    pub temperature: FieldSummary,
    pub moisture: FieldSummary,
    pub plates: &'a [Plate],
    pub hotspots: &'a [Hotspot],
    pub biomes: Vec<BiomeShare>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct FieldSummary {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl FieldSummary {
    fn of(field: &Tilemap<f64>) -> Self {
        let (min, max, mean) = field_stats(field);
        Self { min, max, mean }
    }
}

#[derive(Debug, Serialize)]
pub struct BiomeShare {
    pub biome: Biome,
    pub tiles: usize,
    pub fraction: f64,
}

impl<'a> WorldSummary<'a> {
    pub fn new(world: &'a WorldData, biomes: &Tilemap<Biome>) -> Self {
        let total = biomes.len().max(1) as f64;
        let biomes = biome_histogram(biomes)
            .into_iter()
            .map(|(biome, tiles)| BiomeShare {
                biome,
                tiles,
                fraction: tiles as f64 / total,
            })
            .collect();

        Self {
            seed: world.seed(),
            config: world.config(),
            sea_level: world.sea_level(),
            land_fraction: world.land_fraction(),
            elevation: FieldSummary::of(world.elevation_map()),
            temperature: FieldSummary::of(world.temperature_map()),
            moisture: FieldSummary::of(world.moisture_map()),
            plates: world.plates(),
            hotspots: world.hotspots(),
            biomes,
        }
    }
}

/// Write every artifact for `world` into `dir`, returning the written paths.
pub fn export_world(world: &WorldData, dir: &Path, with_summary: bool) -> Result<Vec<PathBuf>, ExportError> {
    fs::create_dir_all(dir)?;
    let biomes = world.biome_map();
    let mut written = Vec::new();

    let mut save = |name: &str, img: RgbImage| -> Result<(), ExportError> {
        let path = dir.join(name);
        img.save(&path)?;
        info!(path = %path.display(), "wrote image");
        written.push(path);
        Ok(())
    };

    save("biomes.png", render_biome_map(&biomes)?)?;
    save("elevation.png", render_elevation(world.elevation_map(), 1.2)?)?;
    save("plates.png", render_plate_map(world.plate_map(), world.plates())?)?;
    save("boundaries.png", render_boundaries(world.boundaries())?)?;

    if with_summary {
        let path = dir.join("summary.json");
        let summary = WorldSummary::new(world, &biomes);
        fs::write(&path, serde_json::to_string_pretty(&summary)?)?;
        info!(path = %path.display(), "wrote summary");
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::{BoundaryKind, PlateType, Vec2};

    #[test]
    fn test_spectral_endpoints() {
        assert_eq!(spectral_colormap(0.0), [94, 79, 163]);
        assert_eq!(spectral_colormap(1.0), [158, 0, 66]);
    }

    #[test]
    fn test_render_elevation_dimensions() {
        let field = Tilemap::new_with(6, 3, 0.0);
        let img = render_elevation(&field, 1.2).unwrap();
        assert_eq!(img.dimensions(), (6, 3));
        // Sea level sits in the middle of the colormap
        assert_eq!(img.get_pixel(0, 0).0, spectral_colormap(0.5));
    }

    #[test]
    fn test_render_biome_colors() {
        let mut biomes = Tilemap::new_with(2, 1, Biome::Forest);
        biomes.set(0, 0, Biome::Ocean);
        let img = render_biome_map(&biomes).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [20, 40, 80]);
        assert_eq!(img.get_pixel(1, 0).0, [40, 80, 40]);
    }

    #[test]
    fn test_render_plates_and_boundaries() {
        let plates = vec![
            Plate::new(PlateId(0), Vec2::ZERO, PlateType::Oceanic, Vec2::ZERO),
            Plate::new(PlateId(1), Vec2::ZERO, PlateType::Continental, Vec2::ZERO),
        ];
        let mut map = Tilemap::new_with(3, 1, PlateId(0));
        map.set(2, 0, PlateId(1));
        let img = render_plate_map(&map, &plates).unwrap();
        assert_eq!(img.get_pixel(2, 0).0, plates[1].color);

        let mut kind = Tilemap::new_with(3, 1, BoundaryKind::Interior);
        kind.set(1, 0, BoundaryKind::Convergent);
        let boundaries = BoundaryMap { kind, neighbor: map };
        let img = render_boundaries(&boundaries).unwrap();
        assert_eq!(img.get_pixel(0, 0).0, [0, 0, 0]);
        assert_eq!(img.get_pixel(1, 0).0, BoundaryKind::Convergent.color());
    }

    #[test]
    fn test_image_dimensions_checked() {
        assert_eq!(image_dimensions(2048, 1024).unwrap(), (2048, 1024));
        assert_eq!(image_dimensions(u32::MAX as usize, 1).unwrap(), (u32::MAX, 1));
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn test_image_dimensions_reject_oversized_grid() {
        let too_wide = u32::MAX as usize + 1;
        let err = image_dimensions(too_wide, 4).unwrap_err();
        assert!(matches!(err, ExportError::Dimensions { width, height: 4 } if width == too_wide));
        assert!(image_dimensions(4, too_wide).is_err());
        // Would wrap to a 1-pixel-wide image if truncated
        assert!(render_with(too_wide + 1, 0, |_, _| [0, 0, 0]).is_err());
    }

    #[test]
    fn test_export_error_wraps_io() {
        let err: ExportError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(err.to_string().contains("disk full"));
    }
}
