//! Equal-size hierarchies.
//!
//! # The Assignment Problem
//!
//! Similarity clustering answers "which items belong together?" but many
//! assignments also fix *how many* belong together:
//!
//! ```text
//! Task                    │ Level sizes
//! ────────────────────────┼─────────────────────────────
//! Project teams           │ 5 people per team
//! Teams into tracks       │ 3 teams per track
//! Tracks into cohorts     │ 2 tracks per cohort
//! ```
//!
//! The hierarchy here is built greedily in two phases per level:
//! similarity first (average-linkage [`Dendrogram`] cut to
//! `floor(n / size)` groups), exactness second (the size enforcer splits
//! and pools members until clusters have the requested size). The next
//! level then clusters the centroids of the clusters just formed.
//!
//! This is a heuristic, not a balanced-partition solver: members near a
//! chunk boundary may land with less similar neighbours so that the size
//! constraint holds.
//!
//! # Module Overview
//!
//! - [`Dendrogram`]: merge history and flat cuts (`maxclust`)
//! - [`HierarchyBuilder`] / [`HierarchyConfig`]: the per-level loop
//! - [`Hierarchy`], [`Level`], [`Cluster`]: the serializable result

mod builder;
mod dendrogram;
mod levels;

pub use builder::{build_hierarchy, HierarchyBuilder, HierarchyConfig};
pub use dendrogram::{Dendrogram, Merge};
pub use levels::{Cluster, Hierarchy, Level};
