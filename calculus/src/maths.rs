//! Elementwise cube arithmetic with unit propagation.

use ndarray::{ArrayD, IxDyn};

use crate::coords::Coord;
use crate::cube::Cube;
use crate::errors::{CalculusError, Result};

fn check_same_shape(a: &Cube, b: &Cube) -> Result<()> {
    if a.shape() != b.shape() {
        return Err(CalculusError::shape(format!(
            "cannot combine '{}' {:?} with '{}' {:?}",
            a.name(),
            a.shape(),
            b.name(),
            b.shape()
        )));
    }
    Ok(())
}

/// `a + b`, with `b` converted into `a`'s unit.
pub fn add(a: &Cube, b: &Cube) -> Result<Cube> {
    check_same_shape(a, b)?;
    let factor = b.unit().conversion_factor(a.unit())?;
    a.copy_with_data(a.data() + &(b.data() * factor))
}

/// `a - b`, with `b` converted into `a`'s unit.
pub fn subtract(a: &Cube, b: &Cube) -> Result<Cube> {
    check_same_shape(a, b)?;
    let factor = b.unit().conversion_factor(a.unit())?;
    a.copy_with_data(a.data() - &(b.data() * factor))
}

pub fn negate(cube: &Cube) -> Result<Cube> {
    cube.copy_with_data(cube.data().mapv(|v| 0.0 - v))
}

/// Multiply by a dimensionless scalar.
pub fn scale(cube: &Cube, factor: f64) -> Result<Cube> {
    cube.copy_with_data(cube.data() * factor)
}

/// Values of a 1-D coordinate shaped to broadcast along `dim` of `cube`.
fn coord_along(cube: &Cube, coord: &Coord, dim: usize) -> Result<ArrayD<f64>> {
    let points = coord.points_1d()?;
    let extent = cube.shape().get(dim).copied().ok_or_else(|| {
        CalculusError::shape(format!("cube '{}' has no dimension {dim}", cube.name()))
    })?;
    if points.len() != extent {
        return Err(CalculusError::shape(format!(
            "coordinate '{}' of length {} cannot broadcast along dimension {dim} of '{}' (extent {extent})",
            coord.name(),
            points.len(),
            cube.name()
        )));
    }
    let mut shape = vec![1; cube.ndim()];
    shape[dim] = extent;
    points
        .to_owned()
        .into_shape(IxDyn(&shape))
        .map_err(|err| CalculusError::shape(err.to_string()))
}

/// Multiply by a coordinate's values broadcast along `dim`; units multiply.
pub fn multiply_by_coord(cube: &Cube, coord: &Coord, dim: usize) -> Result<Cube> {
    let along = coord_along(cube, coord, dim)?;
    let mut out = cube.copy_with_data(cube.data() * &along)?;
    out.set_unit(cube.unit() * coord.unit());
    Ok(out)
}

/// Divide by a coordinate's values broadcast along `dim`; units divide.
pub fn divide_by_coord(cube: &Cube, coord: &Coord, dim: usize) -> Result<Cube> {
    let along = coord_along(cube, coord, dim)?;
    let mut out = cube.copy_with_data(cube.data() / &along)?;
    out.set_unit(cube.unit() / coord.unit());
    Ok(out)
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, Array2};

    use super::*;
    use crate::units::Unit;

    fn cube(values: Array2<f64>, unit: &str) -> Cube {
        Cube::new(values.into_dyn(), "field", Unit::parse(unit).unwrap())
    }

    #[test]
    fn subtract_converts_units() {
        let a = cube(Array2::from_elem((2, 2), 1.0), "km");
        let b = cube(Array2::from_elem((2, 2), 500.0), "m");
        let c = subtract(&a, &b).unwrap();
        assert!(c.data().iter().all(|v| (v - 0.5).abs() < 1e-12));
        assert_eq!(c.unit(), &Unit::parse("km").unwrap());
        let d = add(&a, &b).unwrap();
        assert!(d.data().iter().all(|v| (v - 1.5).abs() < 1e-12));
    }

    #[test]
    fn shape_mismatch_is_reported() {
        let a = cube(Array2::zeros((2, 2)), "m");
        let b = cube(Array2::zeros((2, 3)), "m");
        assert!(matches!(subtract(&a, &b), Err(CalculusError::ShapeMismatch(_))));
    }

    #[test]
    fn divide_broadcasts_along_dim() {
        let a = cube(Array2::from_elem((2, 3), 6.0), "m");
        let dx = Coord::new("dx", arr1(&[1.0, 2.0, 3.0]), Unit::parse("s").unwrap());
        let q = divide_by_coord(&a, &dx, 1).unwrap();
        assert_eq!(q.data()[[1, 2]], 2.0);
        assert_eq!(q.unit().to_string(), "m s-1");
        assert!(divide_by_coord(&a, &dx, 0).is_err());
        let p = multiply_by_coord(&a, &dx, 1).unwrap();
        assert_eq!(p.data()[[0, 1]], 12.0);
    }

    #[test]
    fn negate_and_scale() {
        let a = cube(Array2::from_elem((1, 2), 3.0), "m");
        assert_eq!(negate(&a).unwrap().data()[[0, 0]], -3.0);
        assert_eq!(scale(&a, 2.0).unwrap().data()[[0, 1]], 6.0);
    }
}
