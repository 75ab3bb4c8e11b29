//! Gridded data bundled with its coordinates, name, unit and provenance.

use std::ops::Range;

use ndarray::{ArrayD, Axis as NdAxis, Slice};

use crate::aux_factory::HybridHeightFactory;
use crate::coord_systems::CoordSystem;
use crate::coords::{AxisRole, Coord, CoordKind};
use crate::errors::{CalculusError, Result};
use crate::units::Unit;

/// N-dimensional array plus the coordinates describing its dimensions.
///
/// Attaching a coordinate stores an independent copy; nothing a caller does
/// to its own coordinate afterwards is visible through the cube.
#[derive(Debug, Clone)]
pub struct Cube {
    data: ArrayD<f64>,
    name: String,
    unit: Unit,
    history: Vec<String>,
    dim_coords: Vec<(Coord, usize)>,
    aux_coords: Vec<(Coord, Vec<usize>)>,
    aux_factories: Vec<HybridHeightFactory>,
}

impl Cube {
    pub fn new(data: ArrayD<f64>, name: impl Into<String>, unit: Unit) -> Self {
        Self {
            data,
            name: name.into(),
            unit,
            history: Vec::new(),
            dim_coords: Vec::new(),
            aux_coords: Vec::new(),
            aux_factories: Vec::new(),
        }
    }

    pub fn data(&self) -> &ArrayD<f64> {
        &self.data
    }

    pub fn into_data(self) -> ArrayD<f64> {
        self.data
    }

    pub fn shape(&self) -> &[usize] {
        self.data.shape()
    }

    pub fn ndim(&self) -> usize {
        self.data.ndim()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn set_unit(&mut self, unit: Unit) {
        self.unit = unit;
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    pub fn add_history(&mut self, entry: impl Into<String>) {
        self.history.push(entry.into());
    }

    pub fn add_dim_coord(&mut self, coord: Coord, dim: usize) -> Result<()> {
        if coord.kind() != CoordKind::Dim {
            return Err(CalculusError::InvalidCoord(format!(
                "'{}' is not a dimension coordinate",
                coord.name()
            )));
        }
        self.check_unique(&coord)?;
        self.check_extents(&coord, &[dim])?;
        if self.dim_coords.iter().any(|(_, d)| *d == dim) {
            return Err(CalculusError::InvalidCoord(format!(
                "dimension {dim} already has a dimension coordinate"
            )));
        }
        self.dim_coords.push((coord, dim));
        Ok(())
    }

    /// Attach a general coordinate. An empty `dims` attaches a scalar coordinate.
    pub fn add_aux_coord(&mut self, coord: Coord, dims: &[usize]) -> Result<()> {
        self.check_unique(&coord)?;
        self.check_extents(&coord, dims)?;
        self.aux_coords.push((coord, dims.to_vec()));
        Ok(())
    }

    fn check_unique(&self, coord: &Coord) -> Result<()> {
        if self.find_coord(coord.name()).is_some() {
            return Err(CalculusError::InvalidCoord(format!(
                "cube '{}' already has a coordinate named '{}'",
                self.name,
                coord.name()
            )));
        }
        Ok(())
    }

    fn check_extents(&self, coord: &Coord, dims: &[usize]) -> Result<()> {
        if dims.is_empty() {
            return if coord.shape().iter().product::<usize>() == 1 {
                Ok(())
            } else {
                Err(CalculusError::shape(format!(
                    "scalar coordinate '{}' has shape {:?}",
                    coord.name(),
                    coord.shape()
                )))
            };
        }
        if coord.ndim() != dims.len() {
            return Err(CalculusError::shape(format!(
                "coordinate '{}' has {} dimensions but is mapped to {dims:?}",
                coord.name(),
                coord.ndim()
            )));
        }
        for (axis, &dim) in dims.iter().enumerate() {
            let extent = self.shape().get(dim).copied().ok_or_else(|| {
                CalculusError::shape(format!("cube '{}' has no dimension {dim}", self.name))
            })?;
            if coord.shape()[axis] != extent {
                return Err(CalculusError::shape(format!(
                    "coordinate '{}' has length {} but dimension {dim} has extent {extent}",
                    coord.name(),
                    coord.shape()[axis]
                )));
            }
        }
        Ok(())
    }

    pub fn find_coord(&self, name: &str) -> Option<&Coord> {
        self.dim_coords
            .iter()
            .map(|(c, _)| c)
            .chain(self.aux_coords.iter().map(|(c, _)| c))
            .find(|c| c.name() == name)
    }

    pub fn coord(&self, name: &str) -> Result<&Coord> {
        self.find_coord(name)
            .ok_or_else(|| CalculusError::CoordNotFound(name.to_string()))
    }

    /// Coordinate playing `role`, preferring dimension coordinates.
    pub fn coord_by_axis(&self, role: AxisRole) -> Option<&Coord> {
        self.dim_coords
            .iter()
            .map(|(c, _)| c)
            .find(|c| c.axis() == Some(role))
            .or_else(|| {
                self.aux_coords
                    .iter()
                    .filter(|(_, dims)| dims.len() == 1)
                    .map(|(c, _)| c)
                    .find(|c| c.axis() == Some(role))
            })
    }

    /// Dimensions spanned by the cube's coordinate named like `coord`.
    pub fn coord_dims(&self, coord: &Coord) -> Vec<usize> {
        if let Some((_, dim)) = self.dim_coords.iter().find(|(c, _)| c.name() == coord.name()) {
            return vec![*dim];
        }
        self.aux_coords
            .iter()
            .find(|(c, _)| c.name() == coord.name())
            .map(|(_, dims)| dims.clone())
            .unwrap_or_default()
    }

    /// Coordinates mapped to exactly `dim`.
    pub fn coords_on_dim(&self, dim: usize) -> Vec<&Coord> {
        self.coords()
            .into_iter()
            .filter(|(_, dims)| dims.as_slice() == [dim])
            .map(|(c, _)| c)
            .collect()
    }

    pub fn dim_coords(&self) -> impl Iterator<Item = (&Coord, usize)> {
        self.dim_coords.iter().map(|(c, d)| (c, *d))
    }

    pub fn aux_coords(&self) -> impl Iterator<Item = (&Coord, &[usize])> {
        self.aux_coords.iter().map(|(c, d)| (c, d.as_slice()))
    }

    /// Every attached coordinate with its dimensions, dimension coordinates first.
    pub fn coords(&self) -> Vec<(&Coord, Vec<usize>)> {
        self.dim_coords()
            .map(|(c, d)| (c, vec![d]))
            .chain(self.aux_coords().map(|(c, d)| (c, d.to_vec())))
            .collect()
    }

    /// Swap in `coord` for the coordinate of the same name, keeping its dimensions.
    pub fn replace_coord(&mut self, coord: Coord) -> Result<()> {
        if let Some(pos) = self.dim_coords.iter().position(|(c, _)| c.name() == coord.name()) {
            let dim = self.dim_coords[pos].1;
            self.check_extents(&coord, &[dim])?;
            if coord.kind() == CoordKind::Dim {
                self.dim_coords[pos].0 = coord;
            } else {
                self.dim_coords.remove(pos);
                self.aux_coords.push((coord, vec![dim]));
            }
            return Ok(());
        }
        let pos = self
            .aux_coords
            .iter()
            .position(|(c, _)| c.name() == coord.name())
            .ok_or_else(|| CalculusError::CoordNotFound(coord.name().to_string()))?;
        let dims = self.aux_coords[pos].1.clone();
        self.check_extents(&coord, &dims)?;
        self.aux_coords[pos].0 = coord;
        Ok(())
    }

    /// Same metadata and coordinates with new data of identical shape.
    pub fn copy_with_data(&self, data: ArrayD<f64>) -> Result<Cube> {
        if data.shape() != self.shape() {
            return Err(CalculusError::shape(format!(
                "replacement data {:?} does not match cube '{}' {:?}",
                data.shape(),
                self.name,
                self.shape()
            )));
        }
        Ok(Cube {
            data,
            ..self.clone()
        })
    }

    /// Metadata-only copy with no coordinates attached.
    pub(crate) fn empty_like(&self, data: ArrayD<f64>) -> Cube {
        Cube {
            data,
            name: self.name.clone(),
            unit: self.unit.clone(),
            history: self.history.clone(),
            dim_coords: Vec::new(),
            aux_coords: Vec::new(),
            aux_factories: Vec::new(),
        }
    }

    /// Restrict `dim` to `range`, slicing every coordinate spanning it.
    pub fn slice_axis(&self, dim: usize, range: Range<usize>) -> Result<Cube> {
        let extent = self.shape().get(dim).copied().ok_or_else(|| {
            CalculusError::shape(format!("cube '{}' has no dimension {dim}", self.name))
        })?;
        if range.start > range.end || range.end > extent {
            return Err(CalculusError::shape(format!(
                "range {range:?} out of bounds for dimension {dim} of extent {extent}"
            )));
        }
        let data = self
            .data
            .slice_axis(NdAxis(dim), Slice::from(range.clone()))
            .to_owned();
        let mut sliced = self.empty_like(data);
        sliced.aux_factories = self.aux_factories.clone();
        for (coord, d) in &self.dim_coords {
            let coord = if *d == dim {
                coord.slice(0, range.clone())?
            } else {
                coord.clone()
            };
            sliced.dim_coords.push((coord, *d));
        }
        for (coord, dims) in &self.aux_coords {
            let coord = match dims.iter().position(|d| *d == dim) {
                Some(axis) => coord.slice(axis, range.clone())?,
                None => coord.clone(),
            };
            sliced.aux_coords.push((coord, dims.clone()));
        }
        Ok(sliced)
    }

    /// New cube with `data` whose extent along `dim` changed, carrying
    /// `dim_coords_for` as the coordinates of that dimension. Coordinates
    /// spanning `dim` together with other dimensions are dropped.
    pub(crate) fn rebuild_along(
        &self,
        dim: usize,
        data: ArrayD<f64>,
        dim_coords_for: Vec<Coord>,
    ) -> Result<Cube> {
        let mut rebuilt = self.empty_like(data);
        rebuilt.aux_factories = self.aux_factories.clone();
        for (coord, d) in &self.dim_coords {
            if *d != dim {
                rebuilt.add_dim_coord(coord.clone(), *d)?;
            }
        }
        for (coord, dims) in &self.aux_coords {
            if !dims.contains(&dim) {
                rebuilt.add_aux_coord(coord.clone(), dims)?;
            }
        }
        for coord in dim_coords_for {
            let dim_taken = rebuilt.dim_coords.iter().any(|(_, d)| *d == dim);
            if coord.kind() == CoordKind::Dim && !dim_taken {
                rebuilt.add_dim_coord(coord, dim)?;
            } else {
                rebuilt.add_aux_coord(coord.to_aux(), &[dim])?;
            }
        }
        Ok(rebuilt)
    }

    /// Coordinate system of the horizontal (X/Y) coordinates, else of any coordinate.
    pub fn horizontal_coord_system(&self) -> Option<&CoordSystem> {
        [AxisRole::X, AxisRole::Y]
            .into_iter()
            .filter_map(|role| self.coord_by_axis(role))
            .find_map(Coord::coord_system)
            .or_else(|| {
                self.coords()
                    .into_iter()
                    .find_map(|(c, _)| c.coord_system())
            })
    }

    pub fn aux_factories(&self) -> &[HybridHeightFactory] {
        &self.aux_factories
    }

    pub fn add_aux_factory(&mut self, factory: HybridHeightFactory) {
        self.aux_factories.push(factory);
    }

    /// Coordinates computed by the attached factories from the current coordinate set.
    pub fn derived_coords(&self) -> Result<Vec<(Coord, Vec<usize>)>> {
        self.aux_factories.iter().map(|f| f.derive(self)).collect()
    }
}
