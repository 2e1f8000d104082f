pub mod boundaries;
pub mod generation;
pub mod types;

pub use boundaries::{detect_plate_boundaries, BoundaryKind, BoundaryMap};
pub use generation::{assign_plates_to_tiles, generate_plates, latitude, plate_areas};
pub use types::{Plate, PlateId, PlateType, Vec2};
