use serde::{Deserialize, Serialize};

/// Unique identifier for a tectonic plate (index into the plate list).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PlateId(pub u8);

impl PlateId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Type of tectonic plate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlateType {
    /// Oceanic plates are denser and sit lower.
    Oceanic,
    /// Continental plates are less dense and sit higher.
    Continental,
}

impl PlateType {
    /// Elevation bias every tile of the plate starts from.
    pub fn base_elevation(self) -> f64 {
        match self {
            PlateType::Continental => 0.15,
            PlateType::Oceanic => -0.05,
        }
    }

    pub fn is_continental(self) -> bool {
        self == PlateType::Continental
    }
}

/// A 2D vector in grid units.
#[derive(Clone, Copy, Debug, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    pub x: f64,
    pub y: f64,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2 { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians scaled by `magnitude`.
    pub fn from_polar(angle: f64, magnitude: f64) -> Self {
        Self::new(angle.cos() * magnitude, angle.sin() * magnitude)
    }

    pub fn dot(&self, other: &Vec2) -> f64 {
        self.x * other.x + self.y * other.y
    }

    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction; the zero vector stays zero.
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self {
                x: self.x / len,
                y: self.y / len,
            }
        } else {
            Self::ZERO
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Vec2;

    fn sub(self, other: Vec2) -> Vec2 {
        Vec2::new(self.x - other.x, self.y - other.y)
    }
}

/// A tectonic plate with its properties.
///
/// Plates are rigid and static: nothing moves during generation, the
/// velocity only drives boundary classification.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Plate {
    pub id: PlateId,
    /// Seed point in grid coordinates.
    pub center: Vec2,
    pub plate_type: PlateType,
    pub velocity: Vec2,
    pub base_elevation: f64,
    /// Visualization color, derived from id and type.
    pub color: [u8; 3],
}

impl Plate {
    pub fn new(id: PlateId, center: Vec2, plate_type: PlateType, velocity: Vec2) -> Self {
        Self {
            id,
            center,
            plate_type,
            velocity,
            base_elevation: plate_type.base_elevation(),
            color: plate_color(id, plate_type),
        }
    }

    pub fn is_continental(&self) -> bool {
        self.plate_type.is_continental()
    }
}

/// Deterministic per-plate color: blues for oceanic, greens/browns for continental.
fn plate_color(id: PlateId, plate_type: PlateType) -> [u8; 3] {
    // Spread consecutive ids apart with a multiplicative hash
    let h = (id.0 as u32).wrapping_mul(2_654_435_761) >> 24;
    let jitter = |base: u32, span: u32, shift: u32| (base + ((h >> shift) ^ h) % span) as u8;
    match plate_type {
        PlateType::Oceanic => [jitter(30, 50, 1), jitter(60, 60, 2), jitter(150, 70, 3)],
        PlateType::Continental => [jitter(100, 80, 1), jitter(140, 60, 2), jitter(80, 60, 3)],
    }
}
