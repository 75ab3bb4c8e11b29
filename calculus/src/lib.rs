//! Finite-difference calculus over coordinate-labelled gridded data: interval
//! coordinates, first derivatives along an axis, and the curl of a vector
//! field in plane or spherical geometry.

pub mod aux_factory;
pub mod comparison;
pub mod config;
pub mod coord_systems;
pub mod coords;
pub mod cube;
pub mod curl;
pub mod delta;
pub mod differential;
pub mod errors;
pub mod lazy;
pub mod maths;
pub mod regrid;
pub mod runtime;
pub mod telemetry;
#[cfg(test)]
mod testing;
pub mod transform;
pub mod units;
pub mod utils;
pub mod vector;

pub use config::CalculusConfig;
pub use coord_systems::{CoordSystem, Datum, GeometryKind};
pub use coords::{AxisRole, Coord, CoordKind};
pub use cube::Cube;
pub use curl::CurlComponents;
pub use delta::{construct_delta_coord, construct_midpoint_coord};
pub use differential::{cube_delta, differentiate, CoordRef};
pub use errors::CalculusError;
pub use regrid::{LinearRegridder, Regridder};
pub use runtime::{curl, Calculus, CubeCalculus};
pub use units::Unit;
pub use vector::spatial_vectors_with_phenom_name;
