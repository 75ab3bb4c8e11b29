use std::collections::HashMap;

use ndarray::{ArrayD, IxDyn};

use crate::coords::Coord;
use crate::cube::Cube;
use crate::errors::{CalculusError, Result};

/// Derives `altitude = delta + sigma * orography` from coordinates on a cube.
///
/// Dependencies are held by name, so a cube whose coordinates have been
/// replaced derives against its new coordinate set.
#[derive(Debug, Clone, PartialEq)]
pub struct HybridHeightFactory {
    pub delta: Option<String>,
    pub sigma: Option<String>,
    pub orography: Option<String>,
}

impl HybridHeightFactory {
    pub fn new(delta: Option<&str>, sigma: Option<&str>, orography: Option<&str>) -> Self {
        Self {
            delta: delta.map(str::to_string),
            sigma: sigma.map(str::to_string),
            orography: orography.map(str::to_string),
        }
    }

    pub fn name(&self) -> &'static str {
        "altitude"
    }

    /// Copy with dependency names remapped through `mapping`.
    pub fn updated(&self, mapping: &HashMap<String, String>) -> Self {
        let remap = |dep: &Option<String>| {
            dep.as_ref()
                .map(|name| mapping.get(name).cloned().unwrap_or_else(|| name.clone()))
        };
        Self {
            delta: remap(&self.delta),
            sigma: remap(&self.sigma),
            orography: remap(&self.orography),
        }
    }

    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        [&self.delta, &self.sigma, &self.orography]
            .into_iter()
            .filter_map(|dep| dep.as_deref())
    }

    /// Compute the derived coordinate and the cube dimensions it spans.
    pub fn derive(&self, cube: &Cube) -> Result<(Coord, Vec<usize>)> {
        let mut dims: Vec<usize> = Vec::new();
        for dep in self.dependencies() {
            let coord = cube.coord(dep)?;
            dims.extend(cube.coord_dims(coord));
        }
        dims.sort_unstable();
        dims.dedup();
        let shape: Vec<usize> = dims.iter().map(|&d| cube.shape()[d]).collect();

        let term = |name: &Option<String>, fill: f64| -> Result<ArrayD<f64>> {
            match name {
                None => Ok(ArrayD::from_elem(IxDyn(&shape), fill)),
                Some(name) => {
                    let coord = cube.coord(name)?;
                    broadcast(coord, &cube.coord_dims(coord), &dims, &shape)
                }
            }
        };
        let altitude =
            term(&self.delta, 0.0)? + term(&self.sigma, 1.0)? * term(&self.orography, 0.0)?;

        let unit = match (&self.delta, &self.orography) {
            (Some(name), _) | (None, Some(name)) => cube.coord(name)?.unit().clone(),
            (None, None) => crate::units::Unit::one(),
        };
        Ok((Coord::new(self.name(), altitude, unit), dims))
    }
}

fn broadcast(
    coord: &Coord,
    coord_dims: &[usize],
    dims: &[usize],
    shape: &[usize],
) -> Result<ArrayD<f64>> {
    let reshaped: Vec<usize> = dims
        .iter()
        .zip(shape)
        .map(|(d, &n)| if coord_dims.contains(d) { n } else { 1 })
        .collect();
    let points = coord
        .points()
        .clone()
        .into_shape(IxDyn(&reshaped))
        .map_err(|err| {
            CalculusError::shape(format!("cannot broadcast '{}': {err}", coord.name()))
        })?;
    points
        .broadcast(IxDyn(shape))
        .map(|view| view.to_owned())
        .ok_or_else(|| {
            CalculusError::shape(format!("cannot broadcast '{}' to {shape:?}", coord.name()))
        })
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array3};

    use super::*;
    use crate::units::Unit;

    fn hybrid_cube() -> Cube {
        let m = Unit::parse("m").unwrap();
        let data = Array3::<f64>::zeros((2, 2, 3)).into_dyn();
        let mut cube = Cube::new(data, "air_temperature", Unit::parse("K").unwrap());
        let levels = Coord::dim("model_level_number", arr1(&[1.0, 2.0]), Unit::one()).unwrap();
        cube.add_dim_coord(levels, 0).unwrap();
        cube.add_aux_coord(Coord::new("level_height", arr1(&[10.0, 20.0]), m.clone()), &[0])
            .unwrap();
        cube.add_aux_coord(Coord::new("sigma", arr1(&[0.9, 0.5]), Unit::one()), &[0]).unwrap();
        cube.add_aux_coord(
            Coord::new("surface_altitude", arr2(&[[0.0, 100.0, 200.0], [50.0, 150.0, 250.0]]), m),
            &[1, 2],
        )
        .unwrap();
        cube.add_aux_factory(HybridHeightFactory::new(
            Some("level_height"),
            Some("sigma"),
            Some("surface_altitude"),
        ));
        cube
    }

    #[test]
    fn derives_altitude() {
        let cube = hybrid_cube();
        let derived = cube.derived_coords().unwrap();
        let (altitude, dims) = &derived[0];
        assert_eq!(dims, &vec![0, 1, 2]);
        assert_eq!(altitude.shape(), &[2, 2, 3]);
        assert!((altitude.points()[[1, 0, 1]] - (20.0 + 0.5 * 100.0)).abs() < 1e-12);
        assert_eq!(altitude.unit(), &Unit::parse("m").unwrap());
    }

    #[test]
    fn updated_renames_dependencies() {
        let factory = HybridHeightFactory::new(Some("a"), None, Some("b"));
        let mapping = HashMap::from([("a".to_string(), "c".to_string())]);
        let updated = factory.updated(&mapping);
        assert_eq!(updated.dependencies().collect::<Vec<_>>(), vec!["c", "b"]);
    }
}
