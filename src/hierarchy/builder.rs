//! Multi-level equal-size clustering.
//!
//! Each requested size adds one level. A level clusters the current
//! entities, records the clusters, then replaces every cluster by its
//! centroid to form the (smaller) entity set for the next level:
//!
//! ```text
//! sizes = [5, 3]
//!
//! Level 2:           [ T1  T2  T3 ]  [ T4  T5  T6 ]
//!                      │                   │
//! Level 1:  T1 = [p1 p2 p3 p4 p5]  …  T6 = [p26 … p30]
//!                  │
//! Input:    p1 … p30
//! ```
//!
//! Levels are strictly sequential: level `k + 1` consumes level `k`'s
//! centroids. Within a level the steps are dendrogram → flat cut →
//! size enforcement → aggregation.

use crate::cluster::{centroid, group_by_label, HierarchicalClustering, Linkage, SizeEnforcer};
use crate::entity::{Entity, EntitySet, Key};
use crate::error::{Error, Result};
use crate::hierarchy::levels::{Cluster, Hierarchy, Level};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::hash::Hash;
use std::str::FromStr;
use tracing::{debug, info, info_span};

/// Configuration for building an equal-size hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyConfig {
    /// Exact cluster size per level, finest level first.
    pub cluster_sizes: Vec<usize>,
    /// Linkage used for every level.
    #[serde(default)]
    pub linkage: Linkage,
}

impl HierarchyConfig {
    /// Create a configuration with one level per size.
    pub fn new(cluster_sizes: impl Into<Vec<usize>>) -> Self {
        Self {
            cluster_sizes: cluster_sizes.into(),
            linkage: Linkage::Average,
        }
    }

    /// Build from signed sizes, rejecting zero or negative entries.
    pub fn try_from_sizes<I>(sizes: I) -> Result<Self>
    where
        I: IntoIterator<Item = i64>,
    {
        let cluster_sizes = sizes
            .into_iter()
            .enumerate()
            .map(|(i, size)| match usize::try_from(size) {
                Ok(s) if s > 0 => Ok(s),
                _ => Err(Error::InvalidClusterSize { level: i + 1, size }),
            })
            .collect::<Result<Vec<_>>>()?;
        let config = Self::new(cluster_sizes);
        config.validate()?;
        Ok(config)
    }

    /// Replace the per-level sizes.
    pub fn with_cluster_sizes(mut self, cluster_sizes: impl Into<Vec<usize>>) -> Self {
        self.cluster_sizes = cluster_sizes.into();
        self
    }

    /// Set linkage method.
    pub fn with_linkage(mut self, linkage: Linkage) -> Self {
        self.linkage = linkage;
        self
    }

    /// Number of levels requested.
    pub fn depth(&self) -> usize {
        self.cluster_sizes.len()
    }

    /// Check that at least one level is requested and every size is positive.
    pub fn validate(&self) -> Result<()> {
        if self.cluster_sizes.is_empty() {
            return Err(Error::InvalidParameter {
                name: "cluster_sizes",
                message: "at least one level is required".into(),
            });
        }
        if let Some(i) = self.cluster_sizes.iter().position(|&s| s == 0) {
            return Err(Error::InvalidClusterSize {
                level: i + 1,
                size: 0,
            });
        }
        Ok(())
    }
}

impl FromStr for HierarchyConfig {
    type Err = Error;

    /// Parse comma-separated sizes such as `"5,3,2"`.
    fn from_str(s: &str) -> Result<Self> {
        let sizes = s
            .split(',')
            .map(|part| {
                let part = part.trim();
                part.parse::<i64>().map_err(|_| Error::InvalidParameter {
                    name: "cluster_sizes",
                    message: format!("'{part}' is not an integer"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::try_from_sizes(sizes)
    }
}

/// Builds an equal-size hierarchy level by level.
#[derive(Debug, Clone)]
pub struct HierarchyBuilder {
    config: HierarchyConfig,
    clusterer: HierarchicalClustering,
}

impl HierarchyBuilder {
    /// Create a builder from a configuration.
    pub fn new(config: HierarchyConfig) -> Self {
        let clusterer = HierarchicalClustering::new().with_linkage(config.linkage);
        Self { config, clusterer }
    }

    /// The configuration in use.
    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Run every level over `entities`.
    ///
    /// Fails without partial output if the configuration is invalid or any
    /// level has fewer than two entities to cluster; errors raised inside a
    /// level carry its 1-based number.
    pub fn build<K>(&self, entities: EntitySet<K>) -> Result<Hierarchy<K>>
    where
        K: Clone + Eq + Hash + Display,
    {
        self.config.validate()?;

        let mut current = entities;
        let mut levels = Vec::with_capacity(self.config.depth());

        for (i, &size) in self.config.cluster_sizes.iter().enumerate() {
            let level = i + 1;
            let (record, next) = self
                .build_level(level, size, &current)
                .map_err(|e| e.at_level(level))?;
            levels.push(record);
            current = next;
        }

        Ok(Hierarchy::new(levels, current.into_entities()))
    }

    /// Cluster one level and aggregate its clusters for the next.
    fn build_level<K>(
        &self,
        level: usize,
        size: usize,
        current: &EntitySet<K>,
    ) -> Result<(Level<K>, EntitySet<K>)>
    where
        K: Clone + Eq + Hash + Display,
    {
        let _span = info_span!("level", level, cluster_size = size).entered();
        let n = current.len();
        if n < 2 {
            return Err(Error::InsufficientData { available: n });
        }

        let groups = self.flat_clusters(current, size)?;
        let clusters = SizeEnforcer::new(size)?.enforce(groups);
        info!(
            entities = n,
            clusters = clusters.len(),
            tail = clusters.last().map_or(0, |c| if c.len() < size { c.len() } else { 0 }),
            "clustered level"
        );

        let entities = current.entities();
        let mut records = Vec::with_capacity(clusters.len());
        let mut next = Vec::with_capacity(clusters.len());

        for (idx, members) in clusters.iter().enumerate() {
            let keys: Vec<Key<K>> = members.iter().map(|&m| entities[m].key.clone()).collect();
            let vectors: Vec<&[f32]> = members
                .iter()
                .map(|&m| entities[m].vector.as_slice())
                .collect();

            next.push(Entity::new(Key::Group(keys.clone()), centroid(&vectors)?));
            records.push(Cluster {
                id: idx + 1,
                members: keys,
            });
        }

        let record = Level {
            level,
            cluster_size: size,
            clusters: records,
        };
        Ok((record, EntitySet::from_entities(next)?))
    }

    /// Dendrogram + `maxclust` cut to `floor(n / size)` groups.
    fn flat_clusters<K>(&self, current: &EntitySet<K>, size: usize) -> Result<Vec<Vec<usize>>> {
        let vectors = current.vectors();
        let target = current.len() / size;
        let dendro = self.clusterer.fit_dendrogram(&vectors)?;
        let labels = dendro.cut_max_clusters(target);
        let groups = group_by_label(&labels);
        debug!(target, flat = groups.len(), "flat cut");
        Ok(groups)
    }
}

/// Build a hierarchy with average linkage and the given per-level sizes.
pub fn build_hierarchy<K>(entities: EntitySet<K>, cluster_sizes: &[usize]) -> Result<Hierarchy<K>>
where
    K: Clone + Eq + Hash + Display,
{
    HierarchyBuilder::new(HierarchyConfig::new(cluster_sizes)).build(entities)
}
