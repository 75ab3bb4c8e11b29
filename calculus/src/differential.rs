//! Finite differences and first derivatives of cubes along one coordinate.

use crate::coords::Coord;
use crate::cube::Cube;
use crate::delta::{construct_delta_coord, construct_midpoint_coord};
use crate::errors::{CalculusError, Result};
use crate::maths;
use crate::telemetry;
use crate::utils::{delta, Wrap};

/// A coordinate given directly or by the name of one attached to the cube.
///
/// A coordinate given directly need not be attached to the cube; it is
/// matched to a cube dimension by name.
#[derive(Debug, Clone, Copy)]
pub enum CoordRef<'a> {
    Name(&'a str),
    Coord(&'a Coord),
}

impl<'a> CoordRef<'a> {
    pub(crate) fn resolve(self, cube: &Cube) -> Result<Coord> {
        match self {
            CoordRef::Name(name) => cube.coord(name).cloned(),
            CoordRef::Coord(coord) => Ok(coord.clone()),
        }
    }
}

impl<'a> From<&'a str> for CoordRef<'a> {
    fn from(name: &'a str) -> Self {
        CoordRef::Name(name)
    }
}

impl<'a> From<&'a String> for CoordRef<'a> {
    fn from(name: &'a String) -> Self {
        CoordRef::Name(name)
    }
}

impl<'a> From<&'a Coord> for CoordRef<'a> {
    fn from(coord: &'a Coord) -> Self {
        CoordRef::Coord(coord)
    }
}

/// Dimension of `cube` that `coord` varies along, after the degeneracy checks.
fn delta_dim(cube: &Cube, coord: &Coord) -> Result<usize> {
    if coord.ndim() != 1 {
        return Err(CalculusError::multi_dim(coord.name()));
    }
    let dims = cube.coord_dims(coord);
    let Some(&dim) = dims.first() else {
        return Err(CalculusError::degenerate(
            coord.name(),
            format!("it does not describe a dimension of '{}'", cube.name()),
        ));
    };
    if cube.shape()[dim] == 0 {
        return Err(CalculusError::degenerate(coord.name(), "it has length of 0"));
    }
    if cube.shape()[dim] == 1 && !coord.is_circular() {
        return Err(CalculusError::degenerate(coord.name(), "it has length of 1"));
    }
    Ok(dim)
}

/// Difference between successive values of `cube` along `coord`.
///
/// Non-circular axes lose their last index; circular axes keep their
/// extent. Every coordinate on the differenced dimension is replaced by its
/// midpoints. The result is named `change_in_<cube>_wrt_<coord>`.
pub fn cube_delta<'a>(
    cube: &Cube,
    coord: impl Into<CoordRef<'a>>,
    update_history: bool,
) -> Result<Cube> {
    let coord = coord.into().resolve(cube)?;
    delta_cube(cube, &coord, update_history)
}

pub(crate) fn delta_cube(cube: &Cube, coord: &Coord, update_history: bool) -> Result<Cube> {
    let dim = delta_dim(cube, coord)?;
    let circular = coord.is_circular();
    let wrap = if circular { Wrap::Cyclic } else { Wrap::None };
    let data = delta(cube.data(), dim, wrap);

    let mut result = if circular {
        cube.copy_with_data(data)?
    } else {
        let extent = cube.shape()[dim];
        cube.slice_axis(dim, 0..extent - 1)?.copy_with_data(data)?
    };
    for cube_coord in cube.coords_on_dim(dim) {
        result.replace_coord(construct_midpoint_coord(cube_coord, Some(circular))?)?;
    }

    if update_history {
        result.add_history(format!("Delta of {} wrt {}", cube.name(), coord.name()));
    }
    result.rename(format!("change_in_{}_wrt_{}", cube.name(), coord.name()));
    Ok(result)
}

/// First derivative of `cube` with respect to `coord`:
/// `d_i = (v_{i+1} - v_i) / (c_{i+1} - c_i)`.
///
/// Shapes shrink by one along the differentiated dimension unless the
/// coordinate is circular. No spherical correction is applied here.
pub fn differentiate<'a>(cube: &Cube, coord: impl Into<CoordRef<'a>>) -> Result<Cube> {
    let coord = coord.into().resolve(cube)?;
    derivative(cube, &coord, true)
}

pub(crate) fn derivative(cube: &Cube, coord: &Coord, update_history: bool) -> Result<Cube> {
    let delta = delta_cube(cube, coord, false)?;
    let delta_coord = construct_delta_coord(coord)?;
    let dim = delta_dim(cube, coord)?;

    let mut result = maths::divide_by_coord(&delta, &delta_coord, dim)?;
    if update_history {
        result.add_history(format!("differential of {} wrt to {}", cube.name(), coord.name()));
    }
    result.rename(format!("derivative_of_{}_wrt_{}", cube.name(), coord.name()));
    telemetry::record_derivative(coord.name());
    Ok(result)
}
