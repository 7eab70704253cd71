//! Pairwise cosine dissimilarity.
//!
//! ```text
//! d(u, v) = 1 - (u · v) / (‖u‖ ‖v‖)
//! ```
//!
//! Ranges over `[0, 2]`: 0 for parallel vectors, 1 for orthogonal, 2 for
//! opposite. Magnitude is ignored, which suits term-frequency and encoder
//! embeddings where direction carries the meaning.

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Cosine distance between two vectors of equal length.
///
/// Accumulates in `f64`. A zero-norm vector is at distance 0 from another
/// zero-norm vector and 1 from anything else.
#[inline]
pub fn cosine_distance(a: &[f32], b: &[f32]) -> f64 {
    let (mut dot, mut na, mut nb) = (0.0f64, 0.0f64, 0.0f64);
    for (x, y) in a.iter().zip(b.iter()) {
        let (x, y) = (*x as f64, *y as f64);
        dot += x * y;
        na += x * x;
        nb += y * y;
    }

    match (na == 0.0, nb == 0.0) {
        (true, true) => 0.0,
        (true, false) | (false, true) => 1.0,
        (false, false) => (1.0 - dot / (na.sqrt() * nb.sqrt())).clamp(0.0, 2.0),
    }
}

/// Condensed dissimilarity matrix: upper triangle, row-major, length
/// N-choose-2. Entry for `(row, col)` with `row < col` follows all pairs of
/// earlier rows.
pub fn condensed_cosine(data: &[&[f32]]) -> Vec<f64> {
    let n = data.len();
    if n < 2 {
        return Vec::new();
    }

    #[cfg(feature = "parallel")]
    let condensed: Vec<f64> = (0..(n - 1))
        .into_par_iter()
        .flat_map_iter(|row| ((row + 1)..n).map(move |col| cosine_distance(data[row], data[col])))
        .collect();

    #[cfg(not(feature = "parallel"))]
    let condensed = {
        let mut condensed = Vec::with_capacity((n * (n - 1)) / 2);
        for row in 0..(n - 1) {
            for col in (row + 1)..n {
                condensed.push(cosine_distance(data[row], data[col]));
            }
        }
        condensed
    };

    condensed
}
