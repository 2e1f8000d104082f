//! Temperature and moisture fields.
//!
//! Both are unitless: temperature in `[-1, 1]` (1 = hot equator), moisture
//! in `[0, 1.2]`. Each is a single per-tile pass over settled elevation.

use crate::noise_field::NoiseField;
use crate::plates::latitude;
use crate::tilemap::Tilemap;

// Temperature
const POLAR_COOLING: f64 = 1.3;
const LAPSE_RATE: f64 = 0.45;
const OCEAN_WARMTH: f64 = 0.12;
const TEMPERATURE_JITTER: f64 = 0.1;
const TEMPERATURE_NOISE_FREQ: f64 = 0.01;

// Moisture
const MOISTURE_OFFSET: f64 = 1000.0;
const MOISTURE_FREQ: f64 = 0.003;
const MOISTURE_OCTAVES: u32 = 4;
const POLAR_DRYING: f64 = 0.6;
const COAST_BAND: f64 = 0.15;
const COAST_BONUS: f64 = 0.25;
const HIGHLAND_ELEVATION: f64 = 0.5;
const OCEAN_MOISTURE: f64 = 0.6;
const MOISTURE_MAX: f64 = 1.2;

/// Temperature from latitude, elevation and a light noise jitter.
pub fn generate_temperature(elevation: &Tilemap<f64>, noise: &NoiseField) -> Tilemap<f64> {
    let height = elevation.height;
    Tilemap::from_fn_par(elevation.width, height, 0.0, |x, y| {
        let lat = latitude(y as f64, height);
        let e = *elevation.get(x, y);

        let mut t = 1.0 - lat.abs() * POLAR_COOLING;
        if e > 0.0 {
            t -= e * LAPSE_RATE;
        } else {
            // Oceans moderate toward warmth
            t += OCEAN_WARMTH;
        }
        t += TEMPERATURE_JITTER
            * noise.noise(x as f64 * TEMPERATURE_NOISE_FREQ, y as f64 * TEMPERATURE_NOISE_FREQ);

        t.clamp(-1.0, 1.0)
    })
}

/// Moisture from warped fBm, drier toward the poles, wetter on coasts.
pub fn generate_moisture(elevation: &Tilemap<f64>, noise: &NoiseField, warp: f64) -> Tilemap<f64> {
    let height = elevation.height;
    Tilemap::from_fn_par(elevation.width, height, 0.0, |x, y| {
        let e = *elevation.get(x, y);
        if e <= 0.0 {
            return OCEAN_MOISTURE;
        }

        let n = noise.fbm(
            (x as f64 + MOISTURE_OFFSET) * MOISTURE_FREQ,
            (y as f64 + MOISTURE_OFFSET) * MOISTURE_FREQ,
            MOISTURE_OCTAVES,
            0.5,
            2.0,
            warp,
        );
        let mut m = ((n + 1.0) * 0.5).clamp(0.0, 1.0);

        let lat = latitude(y as f64, height);
        m *= 1.0 - POLAR_DRYING * lat * lat;

        if e < COAST_BAND {
            m += COAST_BONUS;
        }
        if e > HIGHLAND_ELEVATION {
            // Rain shadow
            m *= 0.5;
        }

        m.clamp(0.0, MOISTURE_MAX)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::WorldRng;

    fn noise() -> NoiseField {
        NoiseField::new(&mut WorldRng::new(42))
    }

    #[test]
    fn test_temperature_range_and_gradient() {
        let elevation = Tilemap::new_with(64, 64, 0.1);
        let temp = generate_temperature(&elevation, &noise());
        for v in temp.as_slice() {
            assert!((-1.0..=1.0).contains(v));
        }
        // Equator warmer than poles
        assert!(*temp.get(10, 32) > *temp.get(10, 0));
        assert!(*temp.get(10, 32) > *temp.get(10, 63));
    }

    #[test]
    fn test_temperature_lapse_and_ocean() {
        let n = noise();
        let mut elevation = Tilemap::new_with(8, 8, 0.0);
        elevation.set(3, 4, 1.0);
        elevation.set(4, 4, -0.5);
        let temp = generate_temperature(&elevation, &n);

        let jitter = |x: f64, y: f64| 0.1 * n.noise(x * 0.01, y * 0.01);
        // Row 4 of 8 is the equator
        let high = (1.0 - 0.45 + jitter(3.0, 4.0)).clamp(-1.0, 1.0);
        let sea = (1.0 + 0.12 + jitter(4.0, 4.0)).clamp(-1.0, 1.0);
        assert!((temp.get(3, 4) - high).abs() < 1e-12);
        assert!((temp.get(4, 4) - sea).abs() < 1e-12);
    }

    #[test]
    fn test_moisture_range() {
        let mut elevation = Tilemap::new_with(64, 32, 0.0);
        for (i, v) in elevation.as_mut_slice().iter_mut().enumerate() {
            *v = ((i % 17) as f64 - 6.0) / 8.0;
        }
        let moisture = generate_moisture(&elevation, &noise(), 0.0);
        for v in moisture.as_slice() {
            assert!((0.0..=1.2).contains(v));
        }
    }

    #[test]
    fn test_ocean_moisture_is_fixed() {
        let elevation = Tilemap::new_with(16, 16, -0.3);
        let moisture = generate_moisture(&elevation, &noise(), 0.0);
        assert!(moisture.as_slice().iter().all(|&m| m == 0.6));
    }

    #[test]
    fn test_coast_wetter_than_inland() {
        let n = noise();
        let coast = Tilemap::new_with(16, 16, 0.05);
        let inland = Tilemap::new_with(16, 16, 0.3);
        let wet = generate_moisture(&coast, &n, 0.0);
        let dry = generate_moisture(&inland, &n, 0.0);
        for (w, d) in wet.as_slice().iter().zip(dry.as_slice()) {
            assert!(w >= d);
        }
    }

    #[test]
    fn test_highlands_are_halved() {
        let n = noise();
        let mid = Tilemap::new_with(16, 16, 0.3);
        let high = Tilemap::new_with(16, 16, 0.7);
        let a = generate_moisture(&mid, &n, 0.0);
        let b = generate_moisture(&high, &n, 0.0);
        for (m, h) in a.as_slice().iter().zip(b.as_slice()) {
            assert!((m * 0.5 - h).abs() < 1e-12);
        }
    }
}
