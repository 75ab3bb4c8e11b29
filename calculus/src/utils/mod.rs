pub mod interp;
pub mod stencil;

pub use interp::{interpolate_axis, interpolate_axis_periodic, linear_weights};
pub use stencil::{delta, Wrap};
