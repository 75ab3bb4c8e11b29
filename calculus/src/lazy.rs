use std::fmt;
use std::sync::{Arc, OnceLock};

use ndarray::ArrayD;

type Producer = Arc<dyn Fn() -> ArrayD<f64> + Send + Sync>;

/// Compute-once handle over an n-dimensional array.
///
/// The shape is known up front so metadata queries never force the
/// producer. Clones share the same cache: forcing one forces all.
#[derive(Clone)]
pub struct LazyArray {
    shape: Vec<usize>,
    cell: Arc<OnceLock<ArrayD<f64>>>,
    producer: Option<Producer>,
}

impl LazyArray {
    /// Defer `producer` until first access. It must yield an array of `shape`.
    pub fn deferred<F>(shape: Vec<usize>, producer: F) -> Self
    where
        F: Fn() -> ArrayD<f64> + Send + Sync + 'static,
    {
        Self {
            shape,
            cell: Arc::new(OnceLock::new()),
            producer: Some(Arc::new(producer)),
        }
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn is_realised(&self) -> bool {
        self.cell.get().is_some()
    }

    /// Whether two handles share one cache.
    pub fn shares_cache(&self, other: &LazyArray) -> bool {
        Arc::ptr_eq(&self.cell, &other.cell)
    }

    pub fn force(&self) -> &ArrayD<f64> {
        self.cell.get_or_init(|| match &self.producer {
            Some(producer) => {
                let array = producer();
                debug_assert_eq!(array.shape(), self.shape.as_slice(), "lazy producer shape");
                array
            }
            None => ArrayD::zeros(self.shape.clone()),
        })
    }
}

impl From<ArrayD<f64>> for LazyArray {
    fn from(array: ArrayD<f64>) -> Self {
        Self {
            shape: array.shape().to_vec(),
            cell: Arc::new(OnceLock::from(array)),
            producer: None,
        }
    }
}

impl From<ndarray::Array1<f64>> for LazyArray {
    fn from(array: ndarray::Array1<f64>) -> Self {
        array.into_dyn().into()
    }
}

impl From<ndarray::Array2<f64>> for LazyArray {
    fn from(array: ndarray::Array2<f64>) -> Self {
        array.into_dyn().into()
    }
}

impl From<Vec<f64>> for LazyArray {
    fn from(values: Vec<f64>) -> Self {
        ndarray::Array1::from(values).into()
    }
}

impl fmt::Debug for LazyArray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.cell.get() {
            Some(array) => write!(f, "LazyArray({array})"),
            None => write!(f, "LazyArray(<deferred {:?}>)", self.shape),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn forces_once_and_shares_cache() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let lazy = LazyArray::deferred(vec![3, 4], move || {
            counter.fetch_add(1, Ordering::SeqCst);
            ArrayD::from_shape_fn(vec![3, 4], |idx| (idx[0] * 4 + idx[1]) as f64)
        });
        let twin = lazy.clone();
        assert_eq!(lazy.shape(), &[3, 4]);
        assert!(!lazy.is_realised());
        assert_eq!(twin.force()[[1, 2]], 6.0);
        assert!(lazy.is_realised());
        lazy.force();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concrete_arrays_are_realised() {
        let lazy = LazyArray::from(vec![1.0, 2.0]);
        assert!(lazy.is_realised());
        assert_eq!(lazy.ndim(), 1);
    }
}
