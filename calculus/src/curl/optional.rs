//! Curl arithmetic over components that may be absent.
//!
//! A missing vector component, or a derivative along an axis with no
//! variation, is carried as `None` instead of failing the whole curl.

use crate::coords::Coord;
use crate::cube::Cube;
use crate::differential::derivative;
use crate::errors::{CalculusError, Result};
use crate::maths;
use crate::regrid::Regridder;
use crate::telemetry;

/// `a - b`, where a missing operand counts as zero and two missing operands
/// stay missing.
pub fn subtract_optional(a: Option<Cube>, b: Option<Cube>) -> Result<Option<Cube>> {
    match (a, b) {
        (None, None) => Ok(None),
        (None, Some(b)) => maths::negate(&b).map(Some),
        (Some(a), None) => Ok(Some(a)),
        (Some(a), Some(b)) => maths::subtract(&a, &b).map(Some),
    }
}

/// Derivative of `cube` along `coord`, or `None` when either is missing or
/// the coordinate has no interval to difference over.
pub fn differentiate_optional(
    cube: Option<&Cube>,
    coord: Option<&Coord>,
    update_history: bool,
) -> Result<Option<Cube>> {
    let (Some(cube), Some(coord)) = (cube, coord) else {
        return Ok(None);
    };
    if coord.ndim() != 1 {
        return Err(CalculusError::multi_dim(coord.name()));
    }
    if coord.len() <= 1 || cube.coord_dims(coord).is_empty() {
        tracing::debug!(
            target: "calculus",
            cube = cube.name(),
            coord = coord.name(),
            "no variation to differentiate over"
        );
        return Ok(None);
    }
    derivative(cube, coord, update_history).map(Some)
}

/// `cube` resampled onto `prototype`'s horizontal grid. Without a prototype
/// the cube is returned as is.
pub fn regrid_optional(
    cube: Option<Cube>,
    prototype: Option<&Cube>,
    regridder: &dyn Regridder,
) -> Result<Option<Cube>> {
    match (cube, prototype) {
        (None, _) => Ok(None),
        (Some(cube), None) => Ok(Some(cube)),
        (Some(cube), Some(prototype)) => {
            let regridded = regridder.regrid(&cube, prototype)?;
            telemetry::record_regrid(&regridded);
            Ok(Some(regridded))
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, Array2};

    use super::*;
    use crate::regrid::LinearRegridder;
    use crate::units::Unit;

    fn ramp(values: [f64; 3]) -> Cube {
        let data = Array2::from_shape_fn((2, 3), |(_, i)| values[i]);
        let mut cube = Cube::new(data.into_dyn(), "u wind", Unit::parse("m s-1").unwrap());
        let m = Unit::parse("m").unwrap();
        cube.add_dim_coord(Coord::dim("y", arr1(&[0.0, 1.0]), m.clone()).unwrap(), 0).unwrap();
        cube.add_dim_coord(Coord::dim("x", arr1(&[0.0, 1.0, 2.0]), m).unwrap(), 1).unwrap();
        cube
    }

    #[test]
    fn subtract_treats_missing_as_zero() {
        let a = ramp([1.0, 2.0, 3.0]);
        let b = ramp([1.0, 1.0, 1.0]);
        assert!(subtract_optional(None, None).unwrap().is_none());
        let neg = subtract_optional(None, Some(a.clone())).unwrap().unwrap();
        assert_eq!(neg.data()[[0, 2]], -3.0);
        let same = subtract_optional(Some(a.clone()), None).unwrap().unwrap();
        assert_eq!(same.data(), a.data());
        let diff = subtract_optional(Some(a), Some(b)).unwrap().unwrap();
        assert_eq!(diff.data()[[1, 1]], 1.0);
    }

    #[test]
    fn differentiate_skips_missing_and_flat_axes() {
        let cube = ramp([0.0, 2.0, 4.0]);
        let x = cube.coord("x").unwrap().clone();
        assert!(differentiate_optional(None, Some(&x), true).unwrap().is_none());
        assert!(differentiate_optional(Some(&cube), None, true).unwrap().is_none());

        let single = Coord::new("x", arr1(&[3.0]), Unit::parse("m").unwrap());
        assert!(differentiate_optional(Some(&cube), Some(&single), true).unwrap().is_none());

        let elsewhere = Coord::new("z", arr1(&[0.0, 1.0]), Unit::parse("m").unwrap());
        assert!(differentiate_optional(Some(&cube), Some(&elsewhere), true).unwrap().is_none());

        let surface = Coord::new("x", Array2::<f64>::zeros((2, 3)), Unit::parse("m").unwrap());
        assert!(matches!(
            differentiate_optional(Some(&cube), Some(&surface), true),
            Err(CalculusError::Dimensionality { .. })
        ));

        let d = differentiate_optional(Some(&cube), Some(&x), false).unwrap().unwrap();
        assert!(d.data().iter().all(|v| (v - 2.0).abs() < 1e-12));
        assert!(d.history().is_empty());
    }

    #[test]
    fn regrid_passes_through_without_prototype() {
        let regridder = LinearRegridder::default();
        let cube = ramp([0.0, 1.0, 2.0]);
        assert!(regrid_optional(None, Some(&cube), &regridder).unwrap().is_none());
        let kept = regrid_optional(Some(cube.clone()), None, &regridder).unwrap().unwrap();
        assert_eq!(kept.data(), cube.data());

        let d = differentiate_optional(Some(&cube), cube.find_coord("x"), false)
            .unwrap()
            .unwrap();
        let onto = regrid_optional(Some(cube.clone()), Some(&d), &regridder).unwrap().unwrap();
        assert_eq!(onto.shape(), d.shape());
        assert!((onto.data()[[0, 0]] - 0.5).abs() < 1e-12);
    }
}
