//! Rebuilding cubes around new data with transformed coordinates.

use std::collections::HashMap;

use ndarray::{concatenate, ArrayD, Axis, Slice};

use crate::coords::Coord;
use crate::cube::Cube;
use crate::errors::{CalculusError, Result};
use crate::telemetry;

/// New cube carrying `src`'s metadata and `data`, with every coordinate
/// passed through `coord_func` and attached to its original dimensions.
///
/// Auxiliary factories are carried over with their dependencies remapped to
/// the transformed coordinate names.
pub fn copy_cube_transformed<F>(src: &Cube, data: ArrayD<f64>, mut coord_func: F) -> Result<Cube>
where
    F: FnMut(&Coord) -> Result<Coord>,
{
    if data.ndim() != src.ndim() {
        return Err(CalculusError::shape(format!(
            "cube '{}' has {} dimensions but the new data has {}",
            src.name(),
            src.ndim(),
            data.ndim()
        )));
    }
    let mut cube = src.empty_like(data);
    let mut renamed: HashMap<String, String> = HashMap::new();

    for (coord, dim) in src.dim_coords() {
        let new_coord = coord_func(coord)?;
        renamed.insert(coord.name().to_string(), new_coord.name().to_string());
        if new_coord.is_dim_coord() {
            cube.add_dim_coord(new_coord, dim)?;
        } else {
            cube.add_aux_coord(new_coord, &[dim])?;
        }
    }
    for (coord, dims) in src.aux_coords() {
        let new_coord = coord_func(coord)?;
        renamed.insert(coord.name().to_string(), new_coord.name().to_string());
        cube.add_aux_coord(new_coord, dims)?;
    }
    for factory in src.aux_factories() {
        cube.add_aux_factory(factory.updated(&renamed));
    }
    Ok(cube)
}

/// Extend `src` by one level along `z_coord`'s dimension, repeating the last
/// level, and take the vertical coordinates from `prototype`.
pub fn change_z(src: &Cube, z_coord: &Coord, prototype: &Cube) -> Result<Cube> {
    let z_dim = *src
        .coord_dims(z_coord)
        .first()
        .ok_or_else(|| CalculusError::CoordNotFound(z_coord.name().to_string()))?;
    let extent = src.shape()[z_dim];
    if extent == 0 {
        return Err(CalculusError::shape(format!(
            "cannot repeat the last '{}' level of an empty cube",
            z_coord.name()
        )));
    }
    let last = src
        .data()
        .slice_axis(Axis(z_dim), Slice::from(extent - 1..extent));
    let data = concatenate(Axis(z_dim), &[src.data().view(), last])
        .map_err(|err| CalculusError::shape(err.to_string()))?;

    let new_z = prototype.coord(z_coord.name())?.clone();
    tracing::debug!(
        target: "calculus",
        cube = src.name(),
        coord = z_coord.name(),
        levels = extent + 1,
        "padding vertical levels"
    );
    telemetry::record_vertical_pad();

    copy_cube_transformed(src, data, |coord| {
        if coord.name() == z_coord.name() {
            return Ok(new_z.clone());
        }
        if !src.coord_dims(coord).contains(&z_dim) {
            return Ok(coord.clone());
        }
        prototype.find_coord(coord.name()).cloned().ok_or_else(|| {
            CalculusError::shape(format!(
                "'{}' spans the padded dimension but has no counterpart on '{}'",
                coord.name(),
                prototype.name()
            ))
        })
    })
}
