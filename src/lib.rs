//! # equitier
//!
//! Equal-size hierarchical clustering: group keyed feature vectors into
//! clusters of a fixed size, then group those clusters (via their
//! centroids) into clusters of the next size, and so on.
//!
//! ```rust
//! use equitier::{build_hierarchy, EntitySet};
//!
//! let entities = EntitySet::from_pairs((0..10).map(|i| {
//!     let a = i as f32 * 0.3;
//!     (format!("p{i}"), vec![a.cos(), a.sin()])
//! }))
//! .unwrap();
//!
//! let hierarchy = build_hierarchy(entities, &[5, 2]).unwrap();
//! assert_eq!(hierarchy.level(1).unwrap().clusters.len(), 2);
//! assert_eq!(hierarchy.level(2).unwrap().clusters.len(), 1);
//! ```
//!
//! **Default build** enables the `parallel` feature (pairwise distances via
//! rayon) and the `cli` feature (the `equitier` binary).

pub mod cluster;
pub mod entity;
/// Error types used across `equitier`.
pub mod error;
pub mod hierarchy;
pub mod source;


pub use crate::cluster::{HierarchicalClustering, Linkage, SizeEnforcer};
pub use crate::entity::{Entity, EntitySet, Key};
pub use crate::hierarchy::{
    build_hierarchy, Cluster, Dendrogram, Hierarchy, HierarchyBuilder, HierarchyConfig, Level,
};
pub use crate::source::{EmbeddingDocument, EmbeddingMode, SourceConfig};

pub use error::{Error, Result};
