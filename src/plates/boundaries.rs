use serde::{Deserialize, Serialize};

use crate::tilemap::{wrapped_dx, Tilemap};

use super::types::{Plate, PlateId, Vec2};

/// Relative-motion dot product above which a boundary pulls apart.
const DIVERGENT_THRESHOLD: f64 = 0.3;

/// Relative-motion dot product below which a boundary closes.
const CONVERGENT_THRESHOLD: f64 = -0.3;

/// Kinematic class of a tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoundaryKind {
    /// Not on a plate boundary.
    #[default]
    Interior,
    /// Plates moving toward each other.
    Convergent,
    /// Plates moving apart.
    Divergent,
    /// Plates sliding past each other.
    Transform,
}

impl BoundaryKind {
    pub fn is_boundary(self) -> bool {
        self != BoundaryKind::Interior
    }

    /// Classify from the dot of relative velocity and boundary direction.
    pub fn from_dot(dot: f64) -> Self {
        if dot > DIVERGENT_THRESHOLD {
            BoundaryKind::Divergent
        } else if dot < CONVERGENT_THRESHOLD {
            BoundaryKind::Convergent
        } else {
            BoundaryKind::Transform
        }
    }

    /// Color used when rendering boundary maps.
    pub fn color(self) -> [u8; 3] {
        match self {
            BoundaryKind::Interior => [0, 0, 0],
            BoundaryKind::Convergent => [220, 60, 40],
            BoundaryKind::Divergent => [60, 140, 230],
            BoundaryKind::Transform => [230, 200, 60],
        }
    }
}

/// Per-tile boundary classification.
///
/// `neighbor` holds the plate the class was computed against; interior
/// tiles store their own plate.
#[derive(Clone, Debug)]
pub struct BoundaryMap {
    pub kind: Tilemap<BoundaryKind>,
    pub neighbor: Tilemap<PlateId>,
}

impl BoundaryMap {
    pub fn kind_at(&self, x: usize, y: usize) -> BoundaryKind {
        *self.kind.get(x, y)
    }

    pub fn neighbor_at(&self, x: usize, y: usize) -> PlateId {
        *self.neighbor.get(x, y)
    }

    pub fn is_boundary(&self, x: usize, y: usize) -> bool {
        self.kind_at(x, y).is_boundary()
    }

    /// Number of tiles of each class: (convergent, divergent, transform).
    pub fn counts(&self) -> (usize, usize, usize) {
        let mut counts = (0, 0, 0);
        for kind in self.kind.as_slice() {
            match kind {
                BoundaryKind::Convergent => counts.0 += 1,
                BoundaryKind::Divergent => counts.1 += 1,
                BoundaryKind::Transform => counts.2 += 1,
                BoundaryKind::Interior => {}
            }
        }
        counts
    }
}

/// Flag and classify plate boundary tiles.
///
/// A tile is a boundary when any 4-neighbor (wrapped X, clamped Y) belongs
/// to another plate. Only the first such neighbor, in left, right, up, down
/// order, decides the class; the rest are ignored.
pub fn detect_plate_boundaries(plate_map: &Tilemap<PlateId>, plates: &[Plate]) -> BoundaryMap {
    let width = plate_map.width;
    let height = plate_map.height;

    let mut kind = Tilemap::new_with(width, height, BoundaryKind::Interior);
    let mut neighbor = plate_map.clone();

    for y in 0..height {
        for x in 0..width {
            let own = *plate_map.get(x, y);
            let other = plate_map
                .neighbors(x, y)
                .map(|(nx, ny)| *plate_map.get(nx, ny))
                .find(|&id| id != own);

            if let Some(other) = other {
                let class = classify(&plates[own.index()], &plates[other.index()], x, y, width);
                kind.set(x, y, class);
                neighbor.set(x, y, other);
            }
        }
    }

    BoundaryMap { kind, neighbor }
}

/// Apply the dot rule to a boundary tile of `own` facing `other`.
fn classify(own: &Plate, other: &Plate, x: usize, y: usize, width: usize) -> BoundaryKind {
    let relative = other.velocity - own.velocity;
    let toward_tile = Vec2::new(wrapped_dx(own.center.x, x as f64, width), y as f64 - own.center.y);
    // A tile on its own plate center has no direction: dot is 0, so transform
    let dir = toward_tile.normalize();
    BoundaryKind::from_dot(relative.dot(&dir))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plates::generation::{assign_plates_to_tiles, generate_plates};
    use crate::plates::types::PlateType;
    use crate::rng::WorldRng;

    /// Two plates on a 4×4 grid: a stationary continent on the left and an
    /// ocean plate moving left into it.
    fn two_plate_grid() -> (Tilemap<PlateId>, Vec<Plate>) {
        let plates = vec![
            Plate::new(PlateId(0), Vec2::new(0.5, 1.5), PlateType::Continental, Vec2::ZERO),
            Plate::new(PlateId(1), Vec2::new(2.5, 1.5), PlateType::Oceanic, Vec2::new(-1.0, 0.0)),
        ];
        let map = assign_plates_to_tiles(&plates, 4, 4);
        (map, plates)
    }

    #[test]
    fn test_from_dot_thresholds() {
        assert_eq!(BoundaryKind::from_dot(0.31), BoundaryKind::Divergent);
        assert_eq!(BoundaryKind::from_dot(0.3), BoundaryKind::Transform);
        assert_eq!(BoundaryKind::from_dot(-0.3), BoundaryKind::Transform);
        assert_eq!(BoundaryKind::from_dot(-0.31), BoundaryKind::Convergent);
        assert_eq!(BoundaryKind::from_dot(0.0), BoundaryKind::Transform);
    }

    #[test]
    fn test_synthetic_grid_assignment() {
        let (map, _) = two_plate_grid();
        for y in 0..4 {
            assert_eq!(*map.get(0, y), PlateId(0));
            assert_eq!(*map.get(1, y), PlateId(0));
            assert_eq!(*map.get(2, y), PlateId(1));
            assert_eq!(*map.get(3, y), PlateId(1));
        }
    }

    #[test]
    fn test_synthetic_grid_classification() {
        let (map, plates) = two_plate_grid();
        let boundaries = detect_plate_boundaries(&map, &plates);

        for y in 0..4 {
            // Every column touches the other plate, directly or across the seam
            for x in 0..4 {
                assert!(boundaries.is_boundary(x, y));
            }
            // Shared edge in the middle closes
            assert_eq!(boundaries.kind_at(1, y), BoundaryKind::Convergent);
            assert_eq!(boundaries.kind_at(2, y), BoundaryKind::Convergent);
            // Seam edge pulls apart
            assert_eq!(boundaries.kind_at(0, y), BoundaryKind::Divergent);
            assert_eq!(boundaries.kind_at(3, y), BoundaryKind::Divergent);

            assert_eq!(boundaries.neighbor_at(1, y), PlateId(1));
            assert_eq!(boundaries.neighbor_at(2, y), PlateId(0));
        }
    }

    #[test]
    fn test_tile_on_plate_center_is_transform() {
        let plates = vec![
            Plate::new(PlateId(0), Vec2::new(1.0, 0.0), PlateType::Oceanic, Vec2::ZERO),
            Plate::new(PlateId(1), Vec2::new(2.0, 0.0), PlateType::Oceanic, Vec2::new(5.0, 0.0)),
        ];
        let map = assign_plates_to_tiles(&plates, 3, 1);
        let boundaries = detect_plate_boundaries(&map, &plates);
        assert_eq!(*map.get(1, 0), PlateId(0));
        assert_eq!(boundaries.kind_at(1, 0), BoundaryKind::Transform);
    }

    #[test]
    fn test_single_plate_has_no_boundaries() {
        let plates = vec![Plate::new(PlateId(0), Vec2::new(3.0, 3.0), PlateType::Oceanic, Vec2::ZERO)];
        let map = assign_plates_to_tiles(&plates, 8, 8);
        let boundaries = detect_plate_boundaries(&map, &plates);
        assert_eq!(boundaries.counts(), (0, 0, 0));
    }

    #[test]
    fn test_boundary_flags_are_symmetric() {
        let mut rng = WorldRng::new(31);
        let plates = generate_plates(&mut rng, 10, 80, 40).unwrap();
        let map = assign_plates_to_tiles(&plates, 80, 40);
        let boundaries = detect_plate_boundaries(&map, &plates);

        for y in 0..40 {
            for x in 0..80 {
                let own = *map.get(x, y);
                for (nx, ny) in map.neighbors(x, y) {
                    if *map.get(nx, ny) != own {
                        assert!(boundaries.is_boundary(x, y));
                        assert!(boundaries.is_boundary(nx, ny));
                    }
                }
            }
        }
    }

    #[test]
    fn test_neighbor_is_first_differing_in_order() {
        let mut rng = WorldRng::new(8);
        let plates = generate_plates(&mut rng, 7, 50, 30).unwrap();
        let map = assign_plates_to_tiles(&plates, 50, 30);
        let boundaries = detect_plate_boundaries(&map, &plates);

        for y in 0..30 {
            for x in 0..50 {
                let own = *map.get(x, y);
                let first = map
                    .neighbors(x, y)
                    .map(|(nx, ny)| *map.get(nx, ny))
                    .find(|&id| id != own);
                match first {
                    Some(id) => assert_eq!(boundaries.neighbor_at(x, y), id),
                    None => {
                        assert_eq!(boundaries.kind_at(x, y), BoundaryKind::Interior);
                        assert_eq!(boundaries.neighbor_at(x, y), own);
                    }
                }
            }
        }
    }
}
