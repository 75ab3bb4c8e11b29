use crate::coords::Coord;
use crate::cube::Cube;

/// Coordinate groups across several cubes, binned by how they disagree.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordComparison {
    /// Missing from some cube, or mapped to different dimensions, while spanning data.
    pub ungroupable_and_dimensioned: Vec<String>,
    /// Present and dimensioned everywhere, but with differing values.
    pub resamplable: Vec<String>,
    /// Scalar coordinates that are missing or differ.
    pub ignorable: Vec<String>,
}

impl CoordComparison {
    pub fn is_clean(&self) -> bool {
        self.ungroupable_and_dimensioned.is_empty()
            && self.resamplable.is_empty()
            && self.ignorable.is_empty()
    }
}

/// Group every coordinate name seen on `cubes` and classify the group.
pub fn coord_comparison(cubes: &[&Cube], tol: f64) -> CoordComparison {
    let mut names: Vec<&str> = Vec::new();
    for cube in cubes {
        for (coord, _) in cube.coords() {
            if !names.contains(&coord.name()) {
                names.push(coord.name());
            }
        }
    }

    let mut result = CoordComparison::default();
    for name in names {
        let members: Vec<(&Coord, Vec<usize>)> = cubes
            .iter()
            .filter_map(|cube| cube.find_coord(name).map(|c| (c, cube.coord_dims(c))))
            .collect();
        let dimensioned = members.iter().any(|(_, dims)| !dims.is_empty());
        let everywhere = members.len() == cubes.len();
        let (first, first_dims) = &members[0];
        let same_dims = members.iter().all(|(_, dims)| dims == first_dims);
        let same_values = members.iter().all(|(c, _)| first.approx_eq(c, tol));

        let bin = match (everywhere && same_dims, dimensioned, same_values) {
            (true, _, true) => continue,
            (false, true, _) => &mut result.ungroupable_and_dimensioned,
            (true, true, false) => &mut result.resamplable,
            (_, false, _) => &mut result.ignorable,
        };
        bin.push(name.to_string());
    }
    result
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, Array2};

    use super::*;
    use crate::units::Unit;

    fn cube_on(x: &[f64], extra: Option<(&str, f64)>) -> Cube {
        let mut cube = Cube::new(Array2::zeros((2, x.len())).into_dyn(), "u wind", Unit::one());
        cube.add_dim_coord(Coord::dim("y", arr1(&[0.0, 1.0]), Unit::one()).unwrap(), 0).unwrap();
        cube.add_dim_coord(Coord::dim("x", arr1(x), Unit::one()).unwrap(), 1).unwrap();
        if let Some((name, value)) = extra {
            cube.add_aux_coord(Coord::new(name, arr1(&[value]), Unit::one()), &[]).unwrap();
        }
        cube
    }

    #[test]
    fn identical_grids_are_clean() {
        let a = cube_on(&[0.0, 1.0, 2.0], None);
        let b = cube_on(&[0.0, 1.0, 2.0], None);
        assert!(coord_comparison(&[&a, &b], 1e-9).is_clean());
    }

    #[test]
    fn differing_points_are_resamplable() {
        let a = cube_on(&[0.0, 1.0, 2.0], None);
        let b = cube_on(&[0.0, 1.5, 2.0], None);
        let cmp = coord_comparison(&[&a, &b], 1e-9);
        assert_eq!(cmp.resamplable, vec!["x".to_string()]);
        assert!(cmp.ungroupable_and_dimensioned.is_empty());
    }

    #[test]
    fn missing_dimensioned_coord_is_ungroupable() {
        let a = cube_on(&[0.0, 1.0, 2.0], None);
        let mut b = cube_on(&[0.0, 1.0, 2.0], None);
        b.add_aux_coord(Coord::new("extra", arr1(&[1.0, 2.0]), Unit::one()), &[0]).unwrap();
        let cmp = coord_comparison(&[&a, &b], 1e-9);
        assert_eq!(cmp.ungroupable_and_dimensioned, vec!["extra".to_string()]);
    }

    #[test]
    fn scalar_differences_are_ignorable() {
        let a = cube_on(&[0.0, 1.0], Some(("forecast_period", 1.0)));
        let b = cube_on(&[0.0, 1.0], Some(("forecast_period", 2.0)));
        let c = cube_on(&[0.0, 1.0], None);
        let cmp = coord_comparison(&[&a, &b], 1e-9);
        assert_eq!(cmp.ignorable, vec!["forecast_period".to_string()]);
        let cmp = coord_comparison(&[&a, &c], 1e-9);
        assert_eq!(cmp.ignorable, vec!["forecast_period".to_string()]);
    }
}
