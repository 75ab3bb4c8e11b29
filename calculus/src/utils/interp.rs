use ndarray::{concatenate, ArrayD, Axis, Slice};

/// Bracketing indices and weight of `target` within monotonic `source`,
/// such that `value = (1 - w) * f[i0] + w * f[i1]`. Targets outside the
/// source range are linearly extrapolated from the end intervals.
pub fn linear_weights(source: &[f64], target: f64) -> (usize, usize, f64) {
    let n = source.len();
    if n < 2 {
        return (0, 0, 0.0);
    }
    let increasing = source[n - 1] >= source[0];
    let ahead = |v: f64| if increasing { v > target } else { v < target };
    let upper = source
        .iter()
        .position(|&v| ahead(v))
        .unwrap_or(n - 1)
        .clamp(1, n - 1);
    let lower = upper - 1;
    let span = source[upper] - source[lower];
    let w = if span == 0.0 {
        0.0
    } else {
        (target - source[lower]) / span
    };
    (lower, upper, w)
}

/// Resample `data` along `axis` from `source` positions to `target` positions.
pub fn interpolate_axis(
    data: &ArrayD<f64>,
    axis: usize,
    source: &[f64],
    target: &[f64],
) -> ArrayD<f64> {
    let ax = Axis(axis);
    let mut shape = data.shape().to_vec();
    shape[axis] = target.len();
    let mut out = ArrayD::zeros(shape);
    for (t, &position) in target.iter().enumerate() {
        let (i0, i1, w) = linear_weights(source, position);
        let lo = data.index_axis(ax, i0);
        let hi = data.index_axis(ax, i1);
        let lane = &lo * (1.0 - w) + &hi * w;
        out.index_axis_mut(ax, t).assign(&lane);
    }
    out
}

/// Like [`interpolate_axis`] on an axis that repeats every `modulus`.
///
/// The first source lane is repeated one period on, and targets are folded
/// into the period starting at the first source point, so nothing is
/// extrapolated across the seam.
pub fn interpolate_axis_periodic(
    data: &ArrayD<f64>,
    axis: usize,
    source: &[f64],
    target: &[f64],
    modulus: f64,
) -> ArrayD<f64> {
    let (Some(&first), Some(&last)) = (source.first(), source.last()) else {
        return interpolate_axis(data, axis, source, target);
    };
    let period = if last >= first { modulus } else { -modulus };

    let mut extended = source.to_vec();
    extended.push(first + period);
    let seam = data.slice_axis(Axis(axis), Slice::from(0..1));
    let Ok(wrapped) = concatenate(Axis(axis), &[data.view(), seam]) else {
        return interpolate_axis(data, axis, source, target);
    };

    let folded: Vec<f64> = target
        .iter()
        .map(|&t| first + period.signum() * (period.signum() * (t - first)).rem_euclid(modulus))
        .collect();
    interpolate_axis(&wrapped, axis, &extended, &folded)
}
