use metrics::{counter, gauge};

use crate::coord_systems::GeometryKind;
use crate::cube::Cube;

pub fn record_derivative(coord: &str) {
    counter!("calculus.derivatives", 1, "coord" => coord.to_string());
}

pub fn record_regrid(cube: &Cube) {
    counter!("calculus.curl.regrids", 1);
    gauge!("calculus.curl.regrid_cells", cube.data().len() as f64);
}

pub fn record_vertical_pad() {
    counter!("calculus.curl.vertical_pads", 1);
}

pub fn record_curl(geometry: &GeometryKind, input: &Cube) {
    counter!("calculus.curl.calls", 1, "geometry" => format!("{geometry:?}"));
    gauge!("calculus.curl.input_cells", input.data().len() as f64);
}
