//! Configuration for world generation.

use serde::{Deserialize, Serialize};

use crate::error::{Result, WorldGenError};

/// Largest plate count representable by `PlateId`'s id space.
pub const MAX_PLATES: usize = 64;

/// Largest supported number of hotspots.
pub const MAX_HOTSPOTS: usize = 32;

/// Parameters for one generation run.
///
/// The defaults reproduce the reference planet: a 2048 × 1024 grid with
/// 12 plates, 6 hotspots and ~42% land.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Grid width in tiles (X wraps).
    pub width: usize,

    /// Grid height in tiles (Y clamps at the poles).
    pub height: usize,

    /// Number of tectonic plates (1..=64).
    pub plate_count: usize,

    /// Number of volcanic hotspots (0..=32).
    pub hotspot_count: usize,

    /// Hotspot influence radius in tiles.
    pub hotspot_radius: f64,

    /// Mountain diffusion relaxation passes.
    pub diffusion_passes: u32,

    /// Amplitude of the final detail noise layer.
    pub detail_amplitude: f64,

    /// Octaves of the detail noise layer.
    pub detail_octaves: u32,

    /// Sampling frequency of the detail noise layer (per tile).
    pub detail_frequency: f64,

    /// Domain warp strength applied to the moisture noise (0 disables).
    pub moisture_warp: f64,

    /// Fraction of tiles that end up at or below sea level.
    pub sea_level_percentile: f64,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            width: 2048,
            height: 1024,
            plate_count: 12,
            hotspot_count: 6,
            hotspot_radius: 40.0,
            diffusion_passes: 12,
            detail_amplitude: 0.04,
            detail_octaves: 4,
            detail_frequency: 0.02,
            moisture_warp: 0.0,
            sea_level_percentile: 0.58,
        }
    }
}

impl WorldConfig {
    /// Default parameters on a smaller grid.
    pub fn with_size(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Self::default()
        }
    }

    /// Total number of tiles.
    pub fn tile_count(&self) -> usize {
        self.width * self.height
    }

    /// Check every parameter against its supported range.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(WorldGenError::config(
                "width/height",
                format!("grid must be non-empty (got {}x{})", self.width, self.height),
            ));
        }
        if self.width.checked_mul(self.height).is_none() {
            return Err(WorldGenError::config("width/height", "grid size overflows"));
        }
        if self.plate_count == 0 || self.plate_count > MAX_PLATES {
            return Err(WorldGenError::config(
                "plate_count",
                format!("must be in 1..={} (got {})", MAX_PLATES, self.plate_count),
            ));
        }
        if self.hotspot_count > MAX_HOTSPOTS {
            return Err(WorldGenError::config(
                "hotspot_count",
                format!("must be at most {} (got {})", MAX_HOTSPOTS, self.hotspot_count),
            ));
        }
        if !(self.hotspot_radius > 0.0 && self.hotspot_radius.is_finite()) {
            return Err(WorldGenError::config(
                "hotspot_radius",
                format!("must be positive (got {})", self.hotspot_radius),
            ));
        }
        if self.detail_octaves == 0 {
            return Err(WorldGenError::config("detail_octaves", "must be at least 1"));
        }
        if !self.detail_amplitude.is_finite() || !self.detail_frequency.is_finite() {
            return Err(WorldGenError::config("detail_amplitude/detail_frequency", "must be finite"));
        }
        if !(self.moisture_warp >= 0.0 && self.moisture_warp.is_finite()) {
            return Err(WorldGenError::config(
                "moisture_warp",
                format!("must be non-negative (got {})", self.moisture_warp),
            ));
        }
        if !(self.sea_level_percentile >= 0.0 && self.sea_level_percentile < 1.0) {
            return Err(WorldGenError::config(
                "sea_level_percentile",
                format!("must be in [0, 1) (got {})", self.sea_level_percentile),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = WorldConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.tile_count(), 2048 * 1024);
    }

    #[test]
    fn test_rejects_zero_plates() {
        let config = WorldConfig {
            plate_count: 0,
            ..WorldConfig::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("plate_count"));
    }

    #[test]
    fn test_rejects_too_many_plates() {
        let config = WorldConfig {
            plate_count: MAX_PLATES + 1,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_empty_grid() {
        assert!(WorldConfig::with_size(0, 10).validate().is_err());
        assert!(WorldConfig::with_size(10, 0).validate().is_err());
    }

    #[test]
    fn test_rejects_bad_radius_and_percentile() {
        let config = WorldConfig {
            hotspot_radius: 0.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());

        let config = WorldConfig {
            sea_level_percentile: 1.0,
            ..WorldConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_partial_override() {
        let config: WorldConfig =
            serde_json::from_str(r#"{ "width": 256, "plate_count": 5 }"#).unwrap();
        assert_eq!(config.width, 256);
        assert_eq!(config.plate_count, 5);
        assert_eq!(config.height, 1024);
        assert_eq!(config.hotspot_count, 6);
    }

    #[test]
    fn test_json_round_trip() {
        let config = WorldConfig::with_size(128, 64);
        let text = serde_json::to_string(&config).unwrap();
        let back: WorldConfig = serde_json::from_str(&text).unwrap();
        assert_eq!(config, back);
    }
}
