//! Per-level clustering primitives.
//!
//! One level of the hierarchy runs four steps, each in its own module:
//!
//! | Step | Module | Output |
//! |------|--------|--------|
//! | Pairwise cosine distance + linkage | [`hierarchical`] | [`Dendrogram`](crate::hierarchy::Dendrogram) |
//! | Flat cut (`maxclust`) | [`Dendrogram::cut_max_clusters`](crate::hierarchy::Dendrogram::cut_max_clusters) | one label per item |
//! | Exact-size enforcement | [`enforce`] | clusters of size `s` (plus a possible tail) |
//! | Aggregation | [`aggregate`] | one centroid per cluster |
//!
//! ## Why average linkage over cosine distance
//!
//! Embeddings from term weighting or text encoders carry meaning in their
//! direction, so cosine distance compares them. Average linkage sits between
//! single linkage (chaining, one giant cluster) and complete linkage (tight
//! but brittle), which keeps flat clusters reasonably even before the size
//! constraint is applied.
//!
//! ## Usage
//!
//! ```rust
//! use equitier::cluster::{group_by_label, HierarchicalClustering, SizeEnforcer};
//!
//! let points = vec![
//!     vec![1.0, 0.0],
//!     vec![0.9, 0.1],
//!     vec![0.0, 1.0],
//!     vec![0.1, 0.9],
//! ];
//! let data: Vec<&[f32]> = points.iter().map(Vec::as_slice).collect();
//!
//! let labels = HierarchicalClustering::new().fit_predict(&data, 2).unwrap();
//! let clusters = SizeEnforcer::new(2).unwrap().enforce(group_by_label(&labels));
//! assert_eq!(clusters, vec![vec![0, 1], vec![2, 3]]);
//! ```

pub mod aggregate;
pub mod distance;
pub mod enforce;
pub mod hierarchical;

pub use aggregate::centroid;
pub use distance::{condensed_cosine, cosine_distance};
pub use enforce::{group_by_label, SizeEnforcer, Split};
pub use hierarchical::{HierarchicalClustering, Linkage};
