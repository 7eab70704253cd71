//! Centroid aggregation: one representative vector per cluster.

use crate::error::{Error, Result};
use ndarray::{Array2, Axis};

/// Elementwise arithmetic mean of `vectors`.
///
/// All vectors must share one length. A single vector is its own mean.
/// Sums are taken in `f64`, so large finite components do not overflow.
pub fn centroid(vectors: &[&[f32]]) -> Result<Vec<f32>> {
    let first = vectors.first().ok_or(Error::EmptyInput)?;
    let (n, d) = (vectors.len(), first.len());

    let mut flat: Vec<f64> = Vec::with_capacity(n * d);
    for (i, v) in vectors.iter().enumerate() {
        if v.len() != d {
            return Err(Error::DimensionMismatch {
                entity: format!("#{i}"),
                expected: d,
                found: v.len(),
            });
        }
        flat.extend(v.iter().map(|&x| f64::from(x)));
    }

    let data = Array2::from_shape_vec((n, d), flat).map_err(|e| Error::InvalidParameter {
        name: "vectors",
        message: e.to_string(),
    })?;

    data.mean_axis(Axis(0))
        .map(|mean| mean.iter().map(|&x| x as f32).collect())
        .ok_or(Error::EmptyInput)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mean_is_elementwise() {
        let a = [1.0f32, 2.0, 3.0];
        let b = [3.0f32, 2.0, -3.0];
        let mean = centroid(&[&a[..], &b[..]]).unwrap();
        let expected = [2.0f32, 2.0, 0.0];
        for (m, e) in mean.iter().zip(expected.iter()) {
            assert!((m - e).abs() < 1e-6);
        }
    }

    #[test]
    fn single_vector_is_its_own_mean() {
        let a = [0.25f32, -4.0];
        assert_eq!(centroid(&[&a[..]]).unwrap(), vec![0.25, -4.0]);
    }

    #[test]
    fn large_components_do_not_overflow() {
        let a = [3.0e38f32, 1.0];
        let b = [3.0e38f32, 1.1];
        let mean = centroid(&[&a[..], &b[..]]).unwrap();
        assert!(mean.iter().all(|x| x.is_finite()));
        assert!((mean[0] / 3.0e38 - 1.0).abs() < 1e-6);
        assert!((mean[1] - 1.05).abs() < 1e-6);
    }

    #[test]
    fn rejects_empty_and_ragged() {
        assert!(matches!(centroid(&[]), Err(Error::EmptyInput)));

        let a = [1.0f32, 2.0];
        let b = [1.0f32];
        assert!(matches!(
            centroid(&[&a[..], &b[..]]),
            Err(Error::DimensionMismatch { .. })
        ));
    }
}
