use crate::coords::AxisRole;
use crate::cube::Cube;
use crate::errors::Result;
use crate::utils::{interpolate_axis, interpolate_axis_periodic};

/// Resamples a cube onto a prototype cube's horizontal grid.
pub trait Regridder: Send + Sync {
    fn regrid(&self, cube: &Cube, prototype: &Cube) -> Result<Cube>;
}

/// Separable linear interpolation along X then Y, extrapolating linearly
/// past the source edges of open axes and wrapping circular ones through
/// their unit's period. The vertical axis is never touched.
#[derive(Debug, Clone, Copy)]
pub struct LinearRegridder {
    /// Points closer than this are treated as already on the prototype grid.
    pub tolerance: f64,
}

impl Default for LinearRegridder {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl Regridder for LinearRegridder {
    fn regrid(&self, cube: &Cube, prototype: &Cube) -> Result<Cube> {
        let mut current = cube.clone();
        for role in [AxisRole::X, AxisRole::Y] {
            let src = current.coord_by_axis(role);
            let target = prototype.coord_by_axis(role);
            let (Some(src), Some(target)) = (src, target) else {
                continue;
            };
            let (src_dims, target_dims) = (current.coord_dims(src), prototype.coord_dims(target));
            let ([dim], [target_dim]) = (src_dims.as_slice(), target_dims.as_slice()) else {
                continue;
            };
            if src.shape() == target.shape() && src.approx_eq(target, self.tolerance) {
                continue;
            }
            let factor = target.unit().conversion_factor(src.unit())?;
            let source_points: Vec<f64> = src.points_1d()?.to_vec();
            let target_points: Vec<f64> = target.points_1d()?.iter().map(|p| p * factor).collect();
            tracing::debug!(
                target: "calculus",
                cube = current.name(),
                coord = src.name(),
                from = source_points.len(),
                to = target_points.len(),
                "regridding axis"
            );
            let data = match src.unit().modulus() {
                Some(modulus) if src.is_circular() => interpolate_axis_periodic(
                    current.data(),
                    *dim,
                    &source_points,
                    &target_points,
                    modulus,
                ),
                _ => interpolate_axis(current.data(), *dim, &source_points, &target_points),
            };
            let replacements = prototype
                .coords_on_dim(*target_dim)
                .into_iter()
                .cloned()
                .collect();
            current = current.rebuild_along(*dim, data, replacements)?;
        }
        Ok(current)
    }
}
