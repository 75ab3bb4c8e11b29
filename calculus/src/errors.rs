use thiserror::Error;

/// Unified error type for the calculus crate.
#[derive(Debug, Error)]
pub enum CalculusError {
    /// A coordinate with more than one dimension was used where a 1-D axis is required.
    #[error("coordinate '{coord}' is multi-dimensional")]
    Dimensionality { coord: String },
    /// A non-circular axis of length one, or a coordinate spanning no cube dimension.
    #[error("cannot take a variation over '{coord}': {reason}")]
    DegenerateAxis { coord: String, reason: String },
    /// Vector components disagree on a shared, dimensioned coordinate.
    #[error("coordinates found in one cube that describe a data dimension which weren't in the other cube ({0}), try removing this coordinate")]
    GeometryMismatch(String),
    /// Vector components differ on coordinate values; resampling is never implicit.
    #[error("some coordinates are different ({0}), consider resampling")]
    ResamplableMismatch(String),
    /// No horizontal coordinate system could be resolved.
    #[error("could not get the horizontal coordinate system of cube '{0}'")]
    MissingCoordSystem(String),
    /// The coordinate system or its datum is not handled.
    #[error("unsupported geometry: {0}")]
    UnsupportedGeometry(String),
    /// Standard names could not be interpreted as vector components.
    #[error("naming error: {0}")]
    Naming(String),
    /// Lookup of a coordinate by name or axis failed.
    #[error("coordinate '{0}' not found")]
    CoordNotFound(String),
    /// Array extents do not line up.
    #[error("shape mismatch: {0}")]
    ShapeMismatch(String),
    /// A coordinate could not be built with the requested constraints.
    #[error("invalid coordinate: {0}")]
    InvalidCoord(String),
    /// Units are dimensionally incompatible or unparseable.
    #[error("unit error: {0}")]
    UnitConversion(String),
    /// Wrapper around I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    /// YAML parsing error.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    /// TOML parsing error.
    #[error("toml error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl CalculusError {
    pub fn naming<T: Into<String>>(msg: T) -> Self {
        Self::Naming(msg.into())
    }

    pub fn shape<T: Into<String>>(msg: T) -> Self {
        Self::ShapeMismatch(msg.into())
    }

    pub fn degenerate<C: Into<String>, R: Into<String>>(coord: C, reason: R) -> Self {
        Self::DegenerateAxis {
            coord: coord.into(),
            reason: reason.into(),
        }
    }

    pub fn multi_dim<C: Into<String>>(coord: C) -> Self {
        Self::Dimensionality {
            coord: coord.into(),
        }
    }
}

pub type Result<T, E = CalculusError> = std::result::Result<T, E>;
