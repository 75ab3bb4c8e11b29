use serde::{Deserialize, Serialize};

/// Reference body of a horizontal coordinate system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datum {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    /// Unit of both axes, e.g. `"m"`.
    pub units: String,
}

impl Datum {
    /// Sphere matching the default Earth radius.
    pub const SPHERICAL_EARTH: Datum = Datum {
        semi_major_axis: crate::config::DEFAULT_SPHERICAL_EARTH_RADIUS,
        semi_minor_axis: crate::config::DEFAULT_SPHERICAL_EARTH_RADIUS,
        units: String::new(),
    };

    pub fn sphere(radius: f64, units: impl Into<String>) -> Self {
        Self {
            semi_major_axis: radius,
            semi_minor_axis: radius,
            units: units.into(),
        }
    }

    pub fn ellipsoid(semi_major_axis: f64, semi_minor_axis: f64, units: impl Into<String>) -> Self {
        Self {
            semi_major_axis,
            semi_minor_axis,
            units: units.into(),
        }
    }

    pub fn is_spherical(&self) -> bool {
        (self.semi_major_axis - self.semi_minor_axis).abs()
            <= 1e-9 * self.semi_major_axis.abs().max(1.0)
    }

    /// Unit of the axes, falling back to metres when unset.
    pub fn unit_symbol(&self) -> &str {
        if self.units.is_empty() {
            crate::config::DEFAULT_SPHERICAL_EARTH_RADIUS_UNIT
        } else {
            &self.units
        }
    }
}

/// Geometry family of a horizontal coordinate system.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GeometryKind {
    Cartesian,
    Spherical,
    Other(String),
}

/// Horizontal coordinate system attached to coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoordSystem {
    pub kind: GeometryKind,
    #[serde(default)]
    pub datum: Option<Datum>,
}

impl CoordSystem {
    pub fn cartesian() -> Self {
        Self {
            kind: GeometryKind::Cartesian,
            datum: None,
        }
    }

    pub fn spherical(datum: Datum) -> Self {
        Self {
            kind: GeometryKind::Spherical,
            datum: Some(datum),
        }
    }

    pub fn other(kind: impl Into<String>) -> Self {
        Self {
            kind: GeometryKind::Other(kind.into()),
            datum: None,
        }
    }

    pub fn describe(&self) -> String {
        match (&self.kind, &self.datum) {
            (kind, Some(datum)) => format!(
                "{kind:?} ({} x {} {})",
                datum.semi_major_axis,
                datum.semi_minor_axis,
                datum.unit_symbol()
            ),
            (kind, None) => format!("{kind:?}"),
        }
    }
}
