use crate::coords::AxisRole;
use crate::cube::Cube;
use crate::errors::Result;

use super::optional::subtract_optional;
use super::{CurlComponents, CurlContext};

/// Plane curl:
/// `(dk/dy - dj/dz, di/dz - dk/dx, dj/dx - di/dy)`.
///
/// Every derivative is aligned onto the grid of `dj/dx`.
pub(super) fn curl(
    ctx: &CurlContext<'_>,
    i: &Cube,
    j: &Cube,
    k: Option<&Cube>,
) -> Result<CurlComponents> {
    let x = i.coord_by_axis(AxisRole::X);
    let y = i.coord_by_axis(AxisRole::Y);
    let z = i.coord_by_axis(AxisRole::Z);

    let dj_dx = ctx.derivative(Some(j), x)?;
    let prototype = dj_dx.as_ref();

    let dk_dy = ctx.aligned(k, y, prototype)?;
    let dj_dz = ctx.pad_vertical(ctx.aligned(Some(j), z, prototype)?, z, prototype)?;
    let i_cmpt = subtract_optional(dk_dy, dj_dz)?;

    let di_dz = ctx.pad_vertical(ctx.aligned(Some(i), z, prototype)?, z, prototype)?;
    let dk_dx = ctx.aligned(k, x, prototype)?;
    let j_cmpt = subtract_optional(di_dz, dk_dx)?;

    let di_dy = ctx.aligned(Some(i), y, prototype)?;
    let k_cmpt = subtract_optional(dj_dx.clone(), di_dy)?;

    Ok(CurlComponents {
        i: i_cmpt,
        j: j_cmpt,
        k: k_cmpt,
    })
}
