use ndarray::{ArrayD, Axis, Slice};

/// Treatment of the closing interval of an axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Wrap {
    /// Open axis: `n` samples give `n - 1` differences.
    None,
    /// Periodic axis: the last difference is `first - last`.
    Cyclic,
    /// Periodic axis whose values repeat every `modulus`; the closing
    /// difference gains one period wherever `last >= first`.
    Modulus(f64),
}

impl Wrap {
    pub fn is_periodic(self) -> bool {
        !matches!(self, Wrap::None)
    }
}

/// Forward differences `a[i+1] - a[i]` along `axis`.
///
/// Periodic axes keep their extent by appending the wrapped closing
/// difference; open axes shrink by one. Callers guarantee at least two
/// samples on open axes and one on periodic axes.
pub fn delta(array: &ArrayD<f64>, axis: usize, wrap: Wrap) -> ArrayD<f64> {
    let ax = Axis(axis);
    let n = array.len_of(ax);
    if n == 0 || (n == 1 && !wrap.is_periodic()) {
        let mut shape = array.shape().to_vec();
        shape[axis] = 0;
        return ArrayD::zeros(shape);
    }
    let forward =
        &array.slice_axis(ax, Slice::from(1..)) - &array.slice_axis(ax, Slice::from(..n - 1));
    if !wrap.is_periodic() {
        return forward;
    }

    let first = array.index_axis(ax, 0);
    let last = array.index_axis(ax, n - 1);
    let mut closing = &first - &last;
    if let Wrap::Modulus(modulus) = wrap {
        ndarray::Zip::from(&mut closing)
            .and(&first)
            .and(&last)
            .for_each(|c, &f, &l| {
                if l >= f {
                    *c += modulus;
                }
            });
    }

    let mut out = ArrayD::zeros(array.raw_dim());
    out.slice_axis_mut(ax, Slice::from(..n - 1)).assign(&forward);
    out.index_axis_mut(ax, n - 1).assign(&closing);
    out
}
