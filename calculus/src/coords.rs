//! Labelled axes of sample points with optional cell bounds.
//!
//! A [`Coord`] is either a dimension coordinate ([`CoordKind::Dim`]: 1-D,
//! strictly monotonic, may be circular) or a general auxiliary coordinate
//! ([`CoordKind::Aux`]). Building the strict kind is fallible; see
//! [`Coord::into_dim`] and [`Coord::copy_like`].

use std::ops::Range;

use ndarray::{ArrayD, ArrayView1, Axis as NdAxis, Ix1, Slice};

use crate::coord_systems::CoordSystem;
use crate::errors::{CalculusError, Result};
use crate::lazy::LazyArray;
use crate::units::Unit;

/// Spatial or temporal role of a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisRole {
    X,
    Y,
    Z,
    T,
}

impl AxisRole {
    /// Guess the role from a coordinate name.
    pub fn guess(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "longitude" | "grid_longitude" | "projection_x_coordinate" | "x" => Some(Self::X),
            "latitude" | "grid_latitude" | "projection_y_coordinate" | "y" => Some(Self::Y),
            "height" | "altitude" | "depth" | "pressure" | "air_pressure" | "level_height"
            | "model_level_number" | "atmosphere_hybrid_height_coordinate" | "z" => Some(Self::Z),
            "time" | "forecast_period" | "forecast_reference_time" | "t" => Some(Self::T),
            _ => None,
        }
    }
}

/// Capability of a coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordKind {
    /// Monotonic, uniquely-dimensioned; usable as a dimension's primary coordinate.
    Dim,
    /// General coordinate usable anywhere.
    Aux,
}

#[derive(Debug, Clone)]
pub struct Coord {
    name: String,
    points: LazyArray,
    bounds: Option<LazyArray>,
    unit: Unit,
    coord_system: Option<CoordSystem>,
    circular: bool,
    axis: Option<AxisRole>,
    kind: CoordKind,
}

impl Coord {
    /// Build an auxiliary coordinate. Chain `with_*` and finish with
    /// [`Coord::into_dim`] for a dimension coordinate.
    pub fn new(name: impl Into<String>, points: impl Into<LazyArray>, unit: Unit) -> Self {
        Self {
            name: name.into(),
            points: points.into(),
            bounds: None,
            unit,
            coord_system: None,
            circular: false,
            axis: None,
            kind: CoordKind::Aux,
        }
    }

    /// Build and validate a dimension coordinate.
    pub fn dim(name: impl Into<String>, points: impl Into<LazyArray>, unit: Unit) -> Result<Self> {
        Self::new(name, points, unit).into_dim()
    }

    pub fn with_bounds(mut self, bounds: impl Into<LazyArray>) -> Self {
        self.bounds = Some(bounds.into());
        self
    }

    pub fn with_coord_system(mut self, coord_system: CoordSystem) -> Self {
        self.coord_system = Some(coord_system);
        self
    }

    pub fn with_circular(mut self, circular: bool) -> Self {
        self.circular = circular;
        self
    }

    pub fn with_axis(mut self, axis: AxisRole) -> Self {
        self.axis = Some(axis);
        self
    }

    /// Promote to a dimension coordinate, enforcing its constraints.
    pub fn into_dim(mut self) -> Result<Self> {
        if self.points.ndim() != 1 {
            return Err(CalculusError::InvalidCoord(format!(
                "dimension coordinate '{}' must be 1-D, got shape {:?}",
                self.name,
                self.points.shape()
            )));
        }
        let points = self.points.force();
        if points.iter().any(|p| !p.is_finite()) {
            return Err(CalculusError::InvalidCoord(format!(
                "dimension coordinate '{}' has non-finite points",
                self.name
            )));
        }
        let points: Vec<f64> = points.iter().copied().collect();
        let direction = monotonic_direction(&points).ok_or_else(|| {
            CalculusError::InvalidCoord(format!(
                "dimension coordinate '{}' is not strictly monotonic",
                self.name
            ))
        })?;
        if let Some(bounds) = &self.bounds {
            if bounds.shape() != [points.len(), 2] {
                return Err(CalculusError::InvalidCoord(format!(
                    "bounds of '{}' have shape {:?}, expected [{}, 2]",
                    self.name,
                    bounds.shape(),
                    points.len()
                )));
            }
            let bounds = bounds.force();
            for column in bounds.axis_iter(NdAxis(1)) {
                let column: Vec<f64> = column.iter().copied().collect();
                if column.len() > 1 && monotonic_direction(&column) != Some(direction) {
                    return Err(CalculusError::InvalidCoord(format!(
                        "bounds of '{}' are not monotonic with its points",
                        self.name
                    )));
                }
            }
        }
        self.kind = CoordKind::Dim;
        Ok(self)
    }

    /// General-kind copy. Auxiliary coordinates carry no circularity.
    pub fn to_aux(&self) -> Self {
        Self {
            kind: CoordKind::Aux,
            circular: false,
            ..self.clone()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn renamed(mut self, name: impl Into<String>) -> Self {
        self.rename(name);
        self
    }

    pub fn kind(&self) -> CoordKind {
        self.kind
    }

    pub fn is_dim_coord(&self) -> bool {
        self.kind == CoordKind::Dim
    }

    pub fn unit(&self) -> &Unit {
        &self.unit
    }

    pub fn coord_system(&self) -> Option<&CoordSystem> {
        self.coord_system.as_ref()
    }

    pub fn is_circular(&self) -> bool {
        self.circular
    }

    /// Whether circularity is meaningful for this coordinate.
    pub fn supports_circular(&self) -> bool {
        self.kind == CoordKind::Dim
    }

    pub fn axis(&self) -> Option<AxisRole> {
        self.axis.or_else(|| AxisRole::guess(&self.name))
    }

    pub fn ndim(&self) -> usize {
        self.points.ndim()
    }

    pub fn shape(&self) -> &[usize] {
        self.points.shape()
    }

    /// Length along the first axis.
    pub fn len(&self) -> usize {
        self.shape().first().copied().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn lazy_points(&self) -> &LazyArray {
        &self.points
    }

    pub fn lazy_bounds(&self) -> Option<&LazyArray> {
        self.bounds.as_ref()
    }

    pub fn has_bounds(&self) -> bool {
        self.bounds.is_some()
    }

    pub fn points(&self) -> &ArrayD<f64> {
        self.points.force()
    }

    /// Points as a 1-D view; fails for multi-dimensional coordinates.
    pub fn points_1d(&self) -> Result<ArrayView1<'_, f64>> {
        self.points()
            .view()
            .into_dimensionality::<Ix1>()
            .map_err(|_| CalculusError::multi_dim(self.name.clone()))
    }

    pub fn bounds(&self) -> Option<&ArrayD<f64>> {
        self.bounds.as_ref().map(LazyArray::force)
    }

    /// Same metadata and kind with new values. Dimension coordinates are revalidated.
    pub fn copy_with(&self, points: ArrayD<f64>, bounds: Option<ArrayD<f64>>) -> Result<Self> {
        let mut expected = points.shape().to_vec();
        expected.push(2);
        if let Some(b) = &bounds {
            if b.shape() != expected.as_slice() {
                return Err(CalculusError::InvalidCoord(format!(
                    "bounds of '{}' have shape {:?}, expected {:?}",
                    self.name,
                    b.shape(),
                    expected
                )));
            }
        }
        let copy = Self {
            points: points.into(),
            bounds: bounds.map(LazyArray::from),
            ..self.clone()
        };
        match self.kind {
            CoordKind::Dim => copy.to_aux().with_circular(self.circular).into_dim(),
            CoordKind::Aux => Ok(copy),
        }
    }

    /// Like [`Coord::copy_with`], falling back to the general kind when the
    /// new values break the dimension-coordinate constraints.
    pub fn copy_like(&self, points: ArrayD<f64>, bounds: Option<ArrayD<f64>>) -> Result<Self> {
        match self.copy_with(points.clone(), bounds.clone()) {
            Ok(coord) => Ok(coord),
            Err(CalculusError::InvalidCoord(reason)) if self.kind == CoordKind::Dim => {
                tracing::debug!(
                    target: "calculus",
                    coord = %self.name,
                    %reason,
                    "falling back to auxiliary coordinate"
                );
                self.to_aux().copy_with(points, bounds)
            }
            Err(err) => Err(err),
        }
    }

    /// Slice along `axis`. A whole-axis range shares the lazy arrays; any
    /// genuine subset forces them.
    pub fn slice(&self, axis: usize, range: Range<usize>) -> Result<Self> {
        let extent = self.shape().get(axis).copied().ok_or_else(|| {
            CalculusError::shape(format!("coordinate '{}' has no axis {axis}", self.name))
        })?;
        if range.start > range.end || range.end > extent {
            return Err(CalculusError::shape(format!(
                "range {range:?} out of bounds for '{}' axis {axis} of length {extent}",
                self.name
            )));
        }
        if range.start == 0 && range.end == extent {
            return Ok(self.clone());
        }
        let slice = Slice::from(range);
        let points = self
            .points()
            .slice_axis(NdAxis(axis), slice)
            .to_owned();
        let bounds = self
            .bounds()
            .map(|b| b.slice_axis(NdAxis(axis), slice).to_owned());
        Ok(Self {
            points: points.into(),
            bounds: bounds.map(LazyArray::from),
            ..self.clone()
        })
    }

    /// Single-index slice along the first axis; always forces evaluation.
    pub fn index(&self, i: usize) -> Result<Self> {
        self.slice(0, i..i + 1)
    }

    /// Copy with values expressed in `unit`. Laziness is preserved.
    pub fn unit_converted(&self, unit: &Unit) -> Result<Self> {
        let factor = self.unit.conversion_factor(unit)?;
        Ok(Self {
            points: map_lazy(&self.points, move |v| v * factor),
            bounds: self.bounds.as_ref().map(|b| map_lazy(b, move |v| v * factor)),
            unit: unit.clone(),
            ..self.clone()
        })
    }

    /// `cos` of an angular coordinate, named `cos(<name>)` with unit `1`.
    pub fn cos(&self) -> Result<Self> {
        self.trig("cos", f64::cos)
    }

    /// `sin` of an angular coordinate, named `sin(<name>)` with unit `1`.
    pub fn sin(&self) -> Result<Self> {
        self.trig("sin", f64::sin)
    }

    fn trig(&self, label: &str, func: fn(f64) -> f64) -> Result<Self> {
        if !self.unit.is_angle() {
            return Err(CalculusError::UnitConversion(format!(
                "cannot take {label} of '{}' in '{}'",
                self.name, self.unit
            )));
        }
        let radians = self.unit_converted(&Unit::radians())?;
        Ok(Self {
            name: format!("{label}({})", self.name),
            points: map_lazy(&radians.points, func),
            bounds: radians.bounds.as_ref().map(|b| map_lazy(b, func)),
            unit: Unit::one(),
            kind: CoordKind::Aux,
            circular: false,
            ..self.clone()
        })
    }

    /// Value comparison within an absolute tolerance, ignoring kind and
    /// coordinate system.
    pub fn approx_eq(&self, other: &Coord, tol: f64) -> bool {
        if self.name != other.name || self.shape() != other.shape() {
            return false;
        }
        let Ok(factor) = other.unit.conversion_factor(&self.unit) else {
            return false;
        };
        let close = |a: &ArrayD<f64>, b: &ArrayD<f64>| {
            a.iter().zip(b.iter()).all(|(x, y)| (x - y * factor).abs() <= tol)
        };
        if !close(self.points(), other.points()) {
            return false;
        }
        match (self.bounds(), other.bounds()) {
            (None, None) => true,
            (Some(a), Some(b)) => a.shape() == b.shape() && close(a, b),
            _ => false,
        }
    }
}

impl PartialEq for Coord {
    fn eq(&self, other: &Self) -> bool {
        let circular_matches = match (self.kind, other.kind) {
            (CoordKind::Dim, CoordKind::Dim) => self.circular == other.circular,
            _ => true,
        };
        circular_matches
            && self.name == other.name
            && self.unit == other.unit
            && self.coord_system == other.coord_system
            && self.points() == other.points()
            && self.bounds() == other.bounds()
    }
}

fn map_lazy<F>(source: &LazyArray, func: F) -> LazyArray
where
    F: Fn(f64) -> f64 + Send + Sync + 'static,
{
    let source = source.clone();
    LazyArray::deferred(source.shape().to_vec(), move || source.force().mapv(&func))
}

/// `Some(true)` for strictly increasing, `Some(false)` for strictly
/// decreasing, `None` otherwise. A single value counts as increasing.
fn monotonic_direction(values: &[f64]) -> Option<bool> {
    if values.len() < 2 {
        return Some(true);
    }
    let increasing = values[1] > values[0];
    values
        .windows(2)
        .all(|w| if increasing { w[1] > w[0] } else { w[1] < w[0] })
        .then_some(increasing)
}

#[cfg(test)]
mod tests {
    use ndarray::{arr1, arr2, Array2};

    use super::*;

    fn degrees() -> Unit {
        Unit::degrees()
    }

    #[test]
    fn dim_coord_restrictions() {
        assert!(Coord::dim("x", Array2::<f64>::zeros((2, 3)), Unit::one()).is_err());
        assert!(Coord::dim("x", arr1(&[1.0, 2.0, 99.0, 4.0, 5.0]), Unit::one()).is_err());
        let bad_bounds = Coord::new("x", arr1(&[1.0, 2.0, 3.0]), Unit::one())
            .with_bounds(arr2(&[[1.0, 12.0], [2.0, 9.0], [3.0, 6.0]]))
            .into_dim();
        assert!(matches!(bad_bounds, Err(CalculusError::InvalidCoord(_))));
        assert!(Coord::dim("x", arr1(&[5.0, 3.0, 1.0]), Unit::one()).is_ok());
    }

    #[test]
    fn copy_like_falls_back_to_aux() {
        let coord = Coord::dim("x", arr1(&[1.0, 2.0, 3.0]), Unit::one()).unwrap();
        let same = coord.copy_like(arr1(&[1.0, 4.0]).into_dyn(), None).unwrap();
        assert_eq!(same.kind(), CoordKind::Dim);
        let fallback = coord
            .copy_like(arr1(&[1.0, 1.0, 0.0]).into_dyn(), None)
            .unwrap();
        assert_eq!(fallback.kind(), CoordKind::Aux);
        assert_eq!(fallback.name(), "x");
    }

    #[test]
    fn whole_slice_stays_lazy() {
        let points = LazyArray::deferred(vec![4], || arr1(&[0.0, 1.0, 2.0, 3.0]).into_dyn());
        let coord = Coord::new("level", points, Unit::one());
        assert_eq!(coord.shape(), &[4]);
        let all = coord.slice(0, 0..4).unwrap();
        assert!(!coord.lazy_points().is_realised());
        assert!(all.lazy_points().shares_cache(coord.lazy_points()));
    }

    #[test]
    fn single_index_forces_evaluation() {
        let points = LazyArray::deferred(vec![3, 4], || {
            ArrayD::from_shape_fn(vec![3, 4], |idx| (idx[0] * 4 + idx[1]) as f64)
        });
        let coord = Coord::new("surface", points, Unit::one());
        let first = coord.index(0).unwrap();
        assert!(coord.lazy_points().is_realised());
        assert!(!first.lazy_points().shares_cache(coord.lazy_points()));
        assert_eq!(first.shape(), &[1, 4]);
        assert_eq!(first.points()[[0, 3]], 3.0);
    }

    #[test]
    fn cos_of_degrees_matches_radians() {
        let step = 2.3_f64;
        let points: Vec<f64> = (0..20).map(|i| i as f64 * step).collect();
        let bounds = Array2::from_shape_fn((20, 2), |(i, j)| points[i] + (j as f64 - 0.5) * step);
        let lat = Coord::new("latitude", arr1(&points), degrees()).with_bounds(bounds.clone());
        let rlat = Coord::new(
            "latitude",
            arr1(&points).mapv(f64::to_radians),
            Unit::radians(),
        )
        .with_bounds(bounds.mapv(f64::to_radians));
        let a = lat.cos().unwrap();
        let b = rlat.cos().unwrap();
        assert_eq!(a.name(), "cos(latitude)");
        assert_eq!(a.unit().to_string(), "1");
        for (x, y) in a.points().iter().zip(b.points().iter()) {
            assert!((x - y).abs() < 1e-12);
        }
        for (x, y) in a.bounds().unwrap().iter().zip(b.bounds().unwrap().iter()) {
            assert!((x - y).abs() < 1e-12);
        }
        assert!(Coord::new("x", arr1(&[1.0]), Unit::parse("m").unwrap()).sin().is_err());
    }

    #[test]
    fn unit_conversion_is_lazy() {
        let points = LazyArray::deferred(vec![2], || arr1(&[90.0, 180.0]).into_dyn());
        let lon = Coord::new("longitude", points, degrees());
        let rad = lon.unit_converted(&Unit::radians()).unwrap();
        assert!(!lon.lazy_points().is_realised());
        assert!((rad.points()[1] - std::f64::consts::PI).abs() < 1e-12);
    }

    #[test]
    fn circular_matters_only_between_dim_coords() {
        let b = Coord::dim("x", arr1(&[1.0, 2.0]), Unit::one()).unwrap();
        let d = b.clone().with_circular(true);
        assert_ne!(b, d);
        assert_eq!(d, d.to_aux());
    }

    #[test]
    fn axis_guessing() {
        let lon = Coord::new("longitude", arr1(&[0.0]), degrees());
        assert_eq!(lon.axis(), Some(AxisRole::X));
        let custom = Coord::new("eta", arr1(&[0.0]), Unit::one()).with_axis(AxisRole::Z);
        assert_eq!(custom.axis(), Some(AxisRole::Z));
    }
}
