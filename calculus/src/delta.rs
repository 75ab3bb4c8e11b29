//! Interval coordinates: successive differences and midpoints of an axis.

use ndarray::{ArrayD, Axis, Slice};

use crate::coords::Coord;
use crate::errors::{CalculusError, Result};
use crate::utils::{delta, Wrap};

fn wrap_for(coord: &Coord, circular: bool) -> Wrap {
    match (circular, coord.unit().modulus()) {
        (false, _) => Wrap::None,
        (true, Some(modulus)) => Wrap::Modulus(modulus),
        (true, None) => Wrap::Cyclic,
    }
}

fn check_differencable(coord: &Coord, circular: bool, what: &str) -> Result<()> {
    if coord.ndim() != 1 {
        return Err(CalculusError::multi_dim(coord.name()));
    }
    if coord.is_empty() {
        return Err(CalculusError::degenerate(
            coord.name(),
            format!("cannot take {what} of an empty coordinate"),
        ));
    }
    if coord.len() == 1 && !circular {
        return Err(CalculusError::degenerate(
            coord.name(),
            format!("cannot take {what} of a single valued coordinate"),
        ));
    }
    Ok(())
}

/// Coordinate of the differences between consecutive points (and bounds).
///
/// A circular coordinate of length `n` gives `n` deltas, the last wrapping
/// through the unit's modulus; otherwise `n - 1`. The result is always an
/// auxiliary coordinate named `change_in_<name>`.
pub fn construct_delta_coord(coord: &Coord) -> Result<Coord> {
    delta_coord_with(coord, coord.is_circular())
}

fn delta_coord_with(coord: &Coord, circular: bool) -> Result<Coord> {
    check_differencable(coord, circular, "interval differences")?;
    let wrap = wrap_for(coord, circular);

    let points = delta(coord.points(), 0, wrap);
    let bounds = coord.bounds().map(|b| delta(b, 0, wrap));
    let delta_coord = coord.to_aux().copy_with(points, bounds)?;
    Ok(delta_coord.renamed(format!("change_in_{}", coord.name())))
}

/// Coordinate of the midpoints of each interval of `coord`.
///
/// `circular` overrides the coordinate's own flag; a disagreement is
/// reported but the explicit value wins. The coordinate kind is kept when
/// the midpoints still satisfy it.
pub fn construct_midpoint_coord(coord: &Coord, circular: Option<bool>) -> Result<Coord> {
    if circular == Some(true) && !coord.supports_circular() {
        return Err(CalculusError::InvalidCoord(format!(
            "cannot produce circular midpoints from '{}', which has no circular attribute",
            coord.name()
        )));
    }
    let circular = match circular {
        None => coord.is_circular(),
        Some(flag) => {
            if flag != coord.is_circular() {
                tracing::warn!(
                    target: "calculus",
                    coord = coord.name(),
                    requested = flag,
                    attribute = coord.is_circular(),
                    "circular flag and coordinate circular attribute do not match"
                );
            }
            flag
        }
    };
    check_differencable(coord, circular, "the midpoints")?;

    let deltas = delta_coord_with(coord, circular)?;
    let n = coord.len();
    let keep = if circular { n } else { n - 1 };

    let midpoints = |values: &ArrayD<f64>, steps: &ArrayD<f64>| -> ArrayD<f64> {
        let head = values.slice_axis(Axis(0), Slice::from(..keep));
        let steps = steps.slice_axis(Axis(0), Slice::from(..keep));
        &steps * 0.5 + &head
    };
    let points = midpoints(coord.points(), deltas.points());
    let bounds = match (coord.bounds(), deltas.bounds()) {
        (Some(b), Some(db)) => Some(midpoints(b, db)),
        _ => None,
    };

    let mid = coord.copy_like(points, bounds)?;
    Ok(mid.renamed(coord.name()))
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array1};

    use super::*;
    use crate::coords::CoordKind;
    use crate::testing::capture_warnings;
    use crate::units::Unit;

    fn lon(points: &[f64], circular: bool) -> Coord {
        Coord::dim("longitude", arr1(points), Unit::degrees())
            .unwrap()
            .with_circular(circular)
    }

    #[test]
    fn open_delta_has_n_minus_one() {
        for n in 2..7 {
            let points: Vec<f64> = (0..n).map(|i| (i * i) as f64).collect();
            let coord = Coord::dim("x", arr1(&points), Unit::parse("m").unwrap()).unwrap();
            let d = construct_delta_coord(&coord).unwrap();
            assert_eq!(d.len(), n - 1);
            assert_eq!(d.name(), "change_in_x");
            assert_eq!(d.kind(), CoordKind::Aux);
            assert_eq!(d.unit(), coord.unit());
        }
    }

    #[test]
    fn circular_delta_wraps_through_modulus() {
        let coord = lon(&[0.0, 90.0, 180.0, 270.0], true);
        let d = construct_delta_coord(&coord).unwrap();
        assert_eq!(d.len(), 4);
        assert_eq!(d.points()[3], (0.0 - 270.0) + 360.0);
        assert!(!d.is_circular());
    }

    #[test]
    fn delta_differences_bounds() {
        let coord = Coord::dim("x", arr1(&[1.0, 2.0, 4.0]), Unit::one())
            .unwrap()
            .with_bounds(arr2(&[[0.5, 1.5], [1.5, 3.0], [3.0, 5.0]]));
        let d = construct_delta_coord(&coord).unwrap();
        assert_eq!(d.bounds().unwrap(), &arr2(&[[1.0, 1.5], [1.5, 2.0]]).into_dyn());
    }

    #[test]
    fn degenerate_and_multidim_rejected() {
        let single = Coord::dim("x", arr1(&[3.0]), Unit::one()).unwrap();
        assert!(matches!(
            construct_delta_coord(&single),
            Err(CalculusError::DegenerateAxis { .. })
        ));
        assert!(construct_delta_coord(&single.clone().with_circular(true)).is_ok());
        let empty = Coord::dim("x", Array1::<f64>::zeros(0), Unit::one()).unwrap();
        for circular in [None, Some(false), Some(true)] {
            assert!(matches!(
                construct_midpoint_coord(&empty, circular),
                Err(CalculusError::DegenerateAxis { .. })
            ));
        }
        assert!(matches!(
            construct_delta_coord(&empty.with_circular(true)),
            Err(CalculusError::DegenerateAxis { .. })
        ));
        let surface = Coord::new("surface", arr2(&[[1.0, 2.0], [3.0, 4.0]]), Unit::one());
        assert!(matches!(
            construct_midpoint_coord(&surface, None),
            Err(CalculusError::Dimensionality { .. })
        ));
    }

    #[test]
    fn midpoints_of_counting_numbers() {
        for n in 2..8 {
            let points = Array1::from_iter((1..=n).map(|i| i as f64));
            let coord = Coord::dim("x", points, Unit::one()).unwrap();
            let mid = construct_midpoint_coord(&coord, None).unwrap();
            assert_eq!(mid.name(), "x");
            assert_eq!(mid.kind(), CoordKind::Dim);
            let expected: Vec<f64> = (1..n).map(|i| i as f64 + 0.5).collect();
            assert_eq!(mid.points().as_slice().unwrap(), expected.as_slice());
        }
    }

    #[test]
    fn circular_midpoints_keep_length() {
        let coord = lon(&[0.0, 90.0, 180.0, 270.0], true);
        let mid = construct_midpoint_coord(&coord, None).unwrap();
        assert_eq!(mid.points().as_slice().unwrap(), &[45.0, 135.0, 225.0, 315.0]);
        assert!(mid.is_circular());
    }

    #[test]
    fn explicit_flag_wins_over_attribute() {
        let coord = lon(&[0.0, 90.0, 180.0, 270.0], true);
        let (mid, logs) = capture_warnings(|| construct_midpoint_coord(&coord, Some(false)));
        assert_eq!(mid.unwrap().len(), 3);
        assert!(logs.contains("WARN"));
        assert!(logs.contains("circular flag and coordinate circular attribute do not match"));

        let (_, quiet) = capture_warnings(|| construct_midpoint_coord(&coord, Some(true)));
        assert!(quiet.is_empty());
        let aux = Coord::new("x", arr1(&[0.0, 1.0]), Unit::one());
        assert!(matches!(
            construct_midpoint_coord(&aux, Some(true)),
            Err(CalculusError::InvalidCoord(_))
        ));
    }

    #[test]
    fn midpoint_bounds_use_half_deltas() {
        let coord = Coord::dim("x", arr1(&[1.0, 3.0]), Unit::one())
            .unwrap()
            .with_bounds(arr2(&[[0.0, 2.0], [2.0, 4.0]]));
        let mid = construct_midpoint_coord(&coord, None).unwrap();
        assert_eq!(mid.points()[0], 2.0);
        assert_eq!(mid.bounds().unwrap(), &arr2(&[[1.0, 3.0]]).into_dyn());
    }
}
