//! The finished hierarchy: levels of numbered clusters.

use crate::entity::{Entity, Key};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// A group of entity keys assigned together at one level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cluster<K> {
    /// 1-based id, unique within its level.
    pub id: usize,
    /// Member keys in discovery order.
    pub members: Vec<Key<K>>,
}

impl<K> Cluster<K> {
    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// True if the cluster has no members (never produced by the builder).
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Original leaf keys under this cluster, in order.
    pub fn leaves(&self) -> Vec<&K> {
        self.members.iter().flat_map(Key::leaves).collect()
    }
}

/// The clusters produced at one depth of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Level<K> {
    /// 1-based depth.
    pub level: usize,
    /// Requested cluster size at this depth.
    pub cluster_size: usize,
    /// Clusters in emission order.
    pub clusters: Vec<Cluster<K>>,
}

impl<K> Level<K> {
    /// Number of entities clustered at this level.
    pub fn entity_count(&self) -> usize {
        self.clusters.iter().map(Cluster::len).sum()
    }

    /// Number of original leaves covered by this level.
    pub fn leaf_count(&self) -> usize {
        self.clusters.iter().map(|c| c.leaves().len()).sum()
    }

    /// The overflow tail, if the level ended with a short cluster.
    pub fn undersized(&self) -> Option<&Cluster<K>> {
        self.clusters
            .last()
            .filter(|c| c.len() < self.cluster_size)
    }
}

/// Ordered levels, finest first.
///
/// Member keys nest: level 1 members are input keys, level `k > 1`
/// members are [`Key::Group`]s holding the members of one level `k - 1`
/// cluster. In JSON a group is an array, so the nesting depth of a member
/// equals its level minus one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Hierarchy<K> {
    levels: Vec<Level<K>>,
    /// Centroids of the last level's clusters.
    #[serde(skip, default = "Vec::new")]
    top: Vec<Entity<K>>,
}

impl<K> Hierarchy<K> {
    pub(crate) fn new(levels: Vec<Level<K>>, top: Vec<Entity<K>>) -> Self {
        Self { levels, top }
    }

    /// All levels, finest first.
    pub fn levels(&self) -> &[Level<K>] {
        &self.levels
    }

    /// Level by 1-based depth.
    pub fn level(&self, level: usize) -> Option<&Level<K>> {
        level.checked_sub(1).and_then(|i| self.levels.get(i))
    }

    /// Number of levels.
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Aggregated entities of the last level, ready to be clustered further.
    pub fn top_entities(&self) -> &[Entity<K>] {
        &self.top
    }

    /// Consume into the levels.
    pub fn into_levels(self) -> Vec<Level<K>> {
        self.levels
    }
}

impl<K: Serialize> Hierarchy<K> {
    /// Pretty-printed JSON, preserving level and cluster order.
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
