//! Three-dimensional curl of a vector field given as component cubes.

mod cartesian;
pub mod optional;
mod spherical;

use crate::comparison::coord_comparison;
use crate::config::CalculusConfig;
use crate::coord_systems::GeometryKind;
use crate::coords::Coord;
use crate::cube::Cube;
use crate::errors::{CalculusError, Result};
use crate::regrid::Regridder;
use crate::telemetry;
use crate::transform::change_z;
use crate::vector::spatial_vectors_with_phenom_name;

use self::optional::{differentiate_optional, regrid_optional};

/// Curl components in input order. For spherical input this is
/// `(phi, theta, radial)`. A component with nothing to compute is `None`.
#[derive(Debug, Clone, Default)]
pub struct CurlComponents {
    pub i: Option<Cube>,
    pub j: Option<Cube>,
    pub k: Option<Cube>,
}

impl CurlComponents {
    pub fn into_array(self) -> [Option<Cube>; 3] {
        [self.i, self.j, self.k]
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut Option<Cube>> {
        [&mut self.i, &mut self.j, &mut self.k].into_iter()
    }
}

/// Settings shared by every derivative of one curl evaluation.
pub(crate) struct CurlContext<'a> {
    pub cfg: &'a CalculusConfig,
    pub regridder: &'a dyn Regridder,
}

impl CurlContext<'_> {
    fn derivative(&self, cube: Option<&Cube>, coord: Option<&Coord>) -> Result<Option<Cube>> {
        differentiate_optional(cube, coord, self.cfg.update_history)
    }

    fn regrid(&self, cube: Option<Cube>, prototype: Option<&Cube>) -> Result<Option<Cube>> {
        regrid_optional(cube, prototype, self.regridder)
    }

    /// Derivative aligned onto the prototype's horizontal grid.
    fn aligned(
        &self,
        cube: Option<&Cube>,
        coord: Option<&Coord>,
        prototype: Option<&Cube>,
    ) -> Result<Option<Cube>> {
        self.regrid(self.derivative(cube, coord)?, prototype)
    }

    /// Regridding never resamples vertically; pad a vertical derivative
    /// that is still a level short of the prototype.
    fn pad_vertical(
        &self,
        cube: Option<Cube>,
        z: Option<&Coord>,
        prototype: Option<&Cube>,
    ) -> Result<Option<Cube>> {
        match (cube, z, prototype) {
            (Some(cube), Some(z), Some(prototype)) if cube.shape() != prototype.shape() => {
                change_z(&cube, z, prototype).map(Some)
            }
            (cube, _, _) => Ok(cube),
        }
    }
}

/// Curl of the vector `(i, j, k)` in the geometry of `i`'s horizontal
/// coordinate system.
///
/// `ignore` is deprecated and has no effect: coordinates that only differ
/// as scalars are always ignored and recorded in the history.
pub(crate) fn curl_with(
    i: &Cube,
    j: &Cube,
    k: Option<&Cube>,
    ignore: Option<&[&str]>,
    cfg: &CalculusConfig,
    regridder: &dyn Regridder,
) -> Result<CurlComponents> {
    if let Some(ignore) = ignore {
        tracing::warn!(
            target: "calculus",
            ?ignore,
            "the ignore argument to curl is deprecated, ignoring is now done automatically"
        );
    }

    let cs = i
        .horizontal_coord_system()
        .ok_or_else(|| CalculusError::MissingCoordSystem(i.name().to_string()))?;
    let cubes: Vec<&Cube> = [Some(i), Some(j), k].into_iter().flatten().collect();
    for cube in &cubes {
        if let Some(other) = cube.horizontal_coord_system() {
            if let GeometryKind::Other(_) = other.kind {
                return Err(CalculusError::UnsupportedGeometry(format!(
                    "horizontal coord system of '{}' is neither cartesian nor spherical: {}",
                    cube.name(),
                    other.describe()
                )));
            }
        }
    }

    let (directions, phenomenon) = spatial_vectors_with_phenom_name(i, j, k)?;

    let comparison = coord_comparison(&cubes, cfg.comparison_tolerance);
    if !comparison.ungroupable_and_dimensioned.is_empty() {
        return Err(CalculusError::GeometryMismatch(
            comparison.ungroupable_and_dimensioned.join(", "),
        ));
    }
    if !comparison.resamplable.is_empty() {
        return Err(CalculusError::ResamplableMismatch(comparison.resamplable.join(", ")));
    }
    let ignore_note = if comparison.ignorable.is_empty() {
        String::new()
    } else {
        format!(" (ignoring {})", comparison.ignorable.join(", "))
    };

    tracing::debug!(
        target: "calculus",
        geometry = ?cs.kind,
        i = i.name(),
        j = j.name(),
        k = k.map(Cube::name),
        "computing curl"
    );
    telemetry::record_curl(&cs.kind, i);

    let ctx = CurlContext { cfg, regridder };
    let mut result = match &cs.kind {
        GeometryKind::Cartesian => cartesian::curl(&ctx, i, j, k)?,
        GeometryKind::Spherical => spherical::curl(&ctx, cs, i, j, k)?,
        GeometryKind::Other(_) => {
            return Err(CalculusError::UnsupportedGeometry(cs.describe()));
        }
    };

    let inputs = match k {
        Some(k) => format!("{}, {} and {}", i.name(), j.name(), k.name()),
        None => format!("{} and {}", i.name(), j.name()),
    };
    for (direction, component) in directions.iter().zip(result.iter_mut()) {
        let Some(cube) = component else { continue };
        cube.rename(format!("{direction} curl of {phenomenon}"));
        if cfg.update_history {
            cube.add_history(format!("{direction} cmpt of the curl of {inputs}{ignore_note}"));
        }
    }
    Ok(result)
}
