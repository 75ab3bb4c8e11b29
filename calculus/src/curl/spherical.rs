//! Curl on a sphere of radius `r`, with `i` eastward (phi), `j` northward
//! (theta) and `k` radial:
//!
//! ```text
//! r_cmpt     = 1/(r cos θ) (d(i cos θ)/dθ - dj/dφ)
//! phi_cmpt   = 1/r (d(r j)/dr - dk/dθ)
//! theta_cmpt = 1/r (1/cos θ dk/dφ - d(r i)/dr)
//! ```
//!
//! Every derivative is aligned onto the grid of `d(i cos θ)/dθ`.

use crate::config::CalculusConfig;
use crate::coord_systems::CoordSystem;
use crate::coords::{AxisRole, Coord};
use crate::cube::Cube;
use crate::errors::{CalculusError, Result};
use crate::maths;
use crate::units::Unit;

use super::optional::subtract_optional;
use super::{CurlComponents, CurlContext};

/// Sphere radius and its unit, from a spherical datum or the configured default.
fn radius(cs: &CoordSystem, cfg: &CalculusConfig) -> Result<(f64, Unit)> {
    match &cs.datum {
        Some(datum) if datum.is_spherical() => {
            Ok((datum.semi_major_axis, Unit::parse(datum.unit_symbol())?))
        }
        Some(_) => Err(CalculusError::UnsupportedGeometry(format!(
            "cannot take the curl over a non-spherical datum: {}",
            cs.describe()
        ))),
        None => Ok((cfg.default_radius, Unit::parse(&cfg.default_radius_unit)?)),
    }
}

/// Divide by `cos` of the cube's own, already aligned, latitude.
fn divide_by_cos_latitude(cube: &Cube) -> Result<Cube> {
    let latitude = cube.coord("latitude")?;
    let lat_dim = *cube
        .coord_dims(latitude)
        .first()
        .ok_or_else(|| CalculusError::CoordNotFound("latitude".to_string()))?;
    maths::divide_by_coord(cube, &latitude.cos()?, lat_dim)
}

fn over_radius(cube: Cube, r: f64, r_unit: &Unit) -> Result<Cube> {
    let mut scaled = maths::scale(&cube, 1.0 / r)?;
    scaled.set_unit(scaled.unit() / r_unit);
    Ok(scaled)
}

/// Multiply by `r` before differentiating along the vertical.
fn radial_derivative(
    ctx: &CurlContext<'_>,
    cube: &Cube,
    z: Option<&Coord>,
    r: f64,
    r_unit: &Unit,
    prototype: Option<&Cube>,
) -> Result<Option<Cube>> {
    let scaled = maths::scale(cube, r)?;
    let derivative = ctx.derivative(Some(&scaled), z)?.map(|mut d| {
        d.set_unit(d.unit() * r_unit);
        d
    });
    let aligned = ctx.regrid(derivative, prototype)?;
    ctx.pad_vertical(aligned, z, prototype)
}

pub(super) fn curl(
    ctx: &CurlContext<'_>,
    cs: &CoordSystem,
    i: &Cube,
    j: &Cube,
    k: Option<&Cube>,
) -> Result<CurlComponents> {
    let (r, r_unit) = radius(cs, ctx.cfg)?;

    let x = i.coord_by_axis(AxisRole::X);
    let y = i.coord_by_axis(AxisRole::Y);
    let z = i.coord_by_axis(AxisRole::Z);
    let (Some(x), Some(y)) = (x, y) else {
        return Err(CalculusError::naming(
            "expecting latitude as the y coord and longitude as the x coord for spherical curl",
        ));
    };
    if y.name() != "latitude" || x.name() != "longitude" {
        return Err(CalculusError::naming(format!(
            "expecting latitude as the y coord and longitude as the x coord for spherical curl, got '{}' and '{}'",
            y.name(),
            x.name()
        )));
    }
    let y_dim = *i
        .coord_dims(y)
        .first()
        .ok_or_else(|| CalculusError::CoordNotFound(y.name().to_string()))?;

    let lat = y.unit_converted(&Unit::radians())?;
    let lon = x.unit_converted(&Unit::radians())?;
    let cos_lat = lat.cos()?;

    let i_cos = maths::multiply_by_coord(i, &cos_lat, y_dim)?;
    let dicos_dtheta = ctx.derivative(Some(&i_cos), Some(&lat))?;
    let prototype = dicos_dtheta.as_ref();

    let dj_dphi = ctx.aligned(Some(j), Some(&lon), prototype)?;
    let r_cmpt = subtract_optional(dicos_dtheta.clone(), dj_dphi)?
        .map(|c| divide_by_cos_latitude(&c).and_then(|c| over_radius(c, r, &r_unit)))
        .transpose()?;

    let drj_dr = radial_derivative(ctx, j, z, r, &r_unit, prototype)?;
    let dk_dtheta = ctx.aligned(k, Some(&lat), prototype)?;
    let phi_cmpt = subtract_optional(drj_dr, dk_dtheta)?
        .map(|c| over_radius(c, r, &r_unit))
        .transpose()?;

    let dk_dphi = ctx
        .aligned(k, Some(&lon), prototype)?
        .map(|c| divide_by_cos_latitude(&c))
        .transpose()?;
    let dri_dr = radial_derivative(ctx, i, z, r, &r_unit, prototype)?;
    let theta_cmpt = subtract_optional(dk_dphi, dri_dr)?
        .map(|c| over_radius(c, r, &r_unit))
        .transpose()?;

    Ok(CurlComponents {
        i: phi_cmpt,
        j: theta_cmpt,
        k: r_cmpt,
    })
}
