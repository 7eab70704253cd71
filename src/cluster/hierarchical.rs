//! Hierarchical (agglomerative) clustering over cosine distance.
//!
//! Bottom-up clustering that builds a **dendrogram** by iteratively
//! merging the closest clusters. The dendrogram is later cut to a target
//! cluster count (see [`Dendrogram::cut_max_clusters`]).
//!
//! # Linkage Methods
//!
//! | Linkage | Formula | Effect |
//! |---------|---------|--------|
//! | Single | min(d(a,b)) for a∈A, b∈B | Chaining; elongated clusters |
//! | Complete | max(d(a,b)) | Compact clusters |
//! | Average | mean(d(a,b)) | Balanced compromise |
//!
//! Average linkage is the default and is what the hierarchy builder uses.
//! Ward is not offered: its variance criterion assumes Euclidean input.

use super::distance::condensed_cosine;
use crate::error::{Error, Result};
use crate::hierarchy::Dendrogram;
use kodama::{linkage as kodama_linkage, Method as KodamaMethod};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Linkage method for hierarchical clustering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Linkage {
    /// Single linkage: minimum distance between clusters.
    Single,
    /// Complete linkage: maximum distance between clusters.
    Complete,
    /// Average linkage: mean distance between clusters.
    #[default]
    Average,
}

impl FromStr for Linkage {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(Linkage::Single),
            "complete" => Ok(Linkage::Complete),
            "average" => Ok(Linkage::Average),
            other => Err(Error::InvalidParameter {
                name: "linkage",
                message: format!("unknown linkage '{other}' (expected single, complete or average)"),
            }),
        }
    }
}

/// Hierarchical (agglomerative) clustering.
#[derive(Debug, Clone, Default)]
pub struct HierarchicalClustering {
    /// Linkage method.
    linkage: Linkage,
}

impl HierarchicalClustering {
    /// Create a new average-linkage clusterer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Linkage in use.
    pub fn linkage(&self) -> Linkage {
        self.linkage
    }

    /// Fit and return the full dendrogram.
    ///
    /// Needs at least two points of equal length.
    pub fn fit_dendrogram(&self, data: &[&[f32]]) -> Result<Dendrogram> {
        let n = data.len();
        if n < 2 {
            return Err(Error::InsufficientData { available: n });
        }

        let d = data[0].len();
        if let Some((i, p)) = data.iter().enumerate().find(|(_, p)| p.len() != d) {
            return Err(Error::DimensionMismatch {
                entity: format!("#{i}"),
                expected: d,
                found: p.len(),
            });
        }

        let mut condensed = condensed_cosine(data);

        let method = match self.linkage {
            Linkage::Single => KodamaMethod::Single,
            Linkage::Complete => KodamaMethod::Complete,
            Linkage::Average => KodamaMethod::Average,
        };

        // kodama's dendrogram uses SciPy/MATLAB-style cluster labels:
        // - leaves: 0..n-1
        // - each merge i creates cluster id n+i
        let dend = kodama_linkage(&mut condensed, n, method);

        let mut dendro = Dendrogram::new(n);
        for step in dend.steps() {
            dendro.add_merge(step.cluster1, step.cluster2, step.dissimilarity, step.size);
        }

        Ok(dendro)
    }

    /// Fit, then cut to at most `max_clusters` flat clusters.
    pub fn fit_predict(&self, data: &[&[f32]], max_clusters: usize) -> Result<Vec<usize>> {
        let dendro = self.fit_dendrogram(data)?;
        Ok(dendro.cut_max_clusters(max_clusters))
    }
}
