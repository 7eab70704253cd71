//! Keyed feature vectors: the unit clustered at every level.
//!
//! At the first level an entity is an input row. At every later level an
//! entity is the centroid of a cluster from the level below, keyed by the
//! ordered list of that cluster's member keys:
//!
//! ```text
//! level 1 member:  "ana"
//! level 2 member:  ["ana", "bo", "cy"]
//! level 3 member:  [["ana", "bo", "cy"], ["dee", "ed", "flo"]]
//! ```

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Primary key of an entity.
///
/// Serializes untagged: a leaf as the key itself, a group as an array.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key<K> {
    /// An original input key.
    Leaf(K),
    /// The member keys of one cluster from the level below.
    Group(Vec<Key<K>>),
}

impl<K> Key<K> {
    /// Original leaf keys under this key, in order.
    pub fn leaves(&self) -> Vec<&K> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a K>) {
        match self {
            Key::Leaf(k) => out.push(k),
            Key::Group(members) => {
                for m in members {
                    m.collect_leaves(out);
                }
            }
        }
    }

    /// Nesting depth: 0 for a leaf.
    pub fn depth(&self) -> usize {
        match self {
            Key::Leaf(_) => 0,
            Key::Group(members) => 1 + members.iter().map(Key::depth).max().unwrap_or(0),
        }
    }

    /// The leaf key, if this is a leaf.
    pub fn as_leaf(&self) -> Option<&K> {
        match self {
            Key::Leaf(k) => Some(k),
            Key::Group(_) => None,
        }
    }
}

/// A leaf prints as itself, a group as `[a, b, ...]`.
impl<K: fmt::Display> fmt::Display for Key<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Leaf(k) => k.fmt(f),
            Key::Group(members) => {
                f.write_str("[")?;
                for (i, m) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    m.fmt(f)?;
                }
                f.write_str("]")
            }
        }
    }
}

impl<K> From<K> for Key<K> {
    fn from(k: K) -> Self {
        Key::Leaf(k)
    }
}

/// A keyed feature vector.
#[derive(Debug, Clone, PartialEq)]
pub struct Entity<K> {
    /// Primary key.
    pub key: Key<K>,
    /// Feature vector.
    pub vector: Vec<f32>,
}

impl<K> Entity<K> {
    /// Create an entity.
    pub fn new(key: Key<K>, vector: Vec<f32>) -> Self {
        Self { key, vector }
    }
}

/// An ordered, validated set of entities sharing one dimensionality.
///
/// Input order is significant: it drives flat-cut label numbering and the
/// order members are discovered in, so identical input order gives an
/// identical hierarchy.
#[derive(Debug, Clone, PartialEq)]
pub struct EntitySet<K> {
    entities: Vec<Entity<K>>,
    dim: usize,
}

impl<K> EntitySet<K>
where
    K: Clone + Eq + Hash + fmt::Display,
{
    /// Build from `(key, vector)` pairs, preserving iteration order.
    ///
    /// Rejects an empty mapping, duplicate keys, empty vectors, vectors of
    /// differing length and non-finite components.
    pub fn from_pairs<I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, Vec<f32>)>,
    {
        Self::from_entities(
            pairs
                .into_iter()
                .map(|(k, v)| Entity::new(Key::Leaf(k), v))
                .collect(),
        )
    }

    /// Build from already-keyed entities.
    pub fn from_entities(entities: Vec<Entity<K>>) -> Result<Self> {
        let first = entities.first().ok_or(Error::EmptyInput)?;
        let dim = first.vector.len();

        let mut seen = HashSet::with_capacity(entities.len());
        for e in &entities {
            if !seen.insert(&e.key) {
                return Err(Error::DuplicateKey {
                    key: e.key.to_string(),
                });
            }
            if e.vector.is_empty() {
                return Err(Error::EmptyVector {
                    entity: e.key.to_string(),
                });
            }
            if e.vector.len() != dim {
                return Err(Error::DimensionMismatch {
                    entity: e.key.to_string(),
                    expected: dim,
                    found: e.vector.len(),
                });
            }
            if let Some(index) = e.vector.iter().position(|x| !x.is_finite()) {
                return Err(Error::NonFiniteValue {
                    entity: e.key.to_string(),
                    index,
                });
            }
        }

        Ok(Self { entities, dim })
    }
}

impl<K> EntitySet<K> {
    /// Number of entities.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Always false for a validated set.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Shared vector dimensionality.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entities in input order.
    pub fn entities(&self) -> &[Entity<K>] {
        &self.entities
    }

    /// Iterate over keys in input order.
    pub fn keys(&self) -> impl Iterator<Item = &Key<K>> {
        self.entities.iter().map(|e| &e.key)
    }

    /// Feature vectors in input order.
    pub fn vectors(&self) -> Vec<&[f32]> {
        self.entities.iter().map(|e| e.vector.as_slice()).collect()
    }

    /// Consume into the underlying entities.
    pub fn into_entities(self) -> Vec<Entity<K>> {
        self.entities
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn preserves_input_order() {
        let set = EntitySet::from_pairs(vec![
            ("c", vec![1.0, 0.0]),
            ("a", vec![0.0, 1.0]),
            ("b", vec![1.0, 1.0]),
        ])
        .unwrap();
        let keys: Vec<_> = set.keys().filter_map(Key::as_leaf).copied().collect();
        assert_eq!(keys, vec!["c", "a", "b"]);
        assert_eq!(set.dim(), 2);
    }

    #[test]
    fn rejects_empty_mapping() {
        let err = EntitySet::<String>::from_pairs(Vec::new()).unwrap_err();
        assert!(matches!(err, Error::EmptyInput));
    }

    #[test]
    fn rejects_mismatched_dimensions() {
        let err = EntitySet::from_pairs(vec![("a", vec![1.0, 0.0]), ("b", vec![1.0])]).unwrap_err();
        match err {
            Error::DimensionMismatch {
                entity,
                expected,
                found,
            } => {
                assert!(entity.contains('b'));
                assert_eq!((expected, found), (2, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_duplicates_and_missing_values() {
        let err = EntitySet::from_pairs(vec![(1, vec![1.0]), (1, vec![2.0])]).unwrap_err();
        assert!(matches!(err, Error::DuplicateKey { .. }));

        let err = EntitySet::from_pairs(vec![(1, vec![1.0, f32::NAN])]).unwrap_err();
        assert!(matches!(err, Error::NonFiniteValue { index: 1, .. }));

        let err = EntitySet::from_pairs(vec![(1, Vec::new())]).unwrap_err();
        assert!(matches!(err, Error::EmptyVector { .. }));
    }

    #[test]
    fn nested_keys_flatten_to_leaves() {
        let key = Key::Group(vec![
            Key::Group(vec![Key::Leaf(1), Key::Leaf(2)]),
            Key::Group(vec![Key::Leaf(3)]),
        ]);
        assert_eq!(key.leaves(), vec![&1, &2, &3]);
        assert_eq!(key.depth(), 2);
        assert_eq!(serde_json::to_string(&key).unwrap(), "[[1,2],[3]]");
        assert_eq!(key.to_string(), "[[1, 2], [3]]");
    }

    #[test]
    fn errors_name_entities_by_key() {
        let err = EntitySet::from_pairs(vec![
            ("ana", vec![1.0, 0.0]),
            ("bo", vec![f32::INFINITY, 0.0]),
        ])
        .unwrap_err();
        assert_eq!(err.to_string(), "entity bo has a non-finite value at component 0");

        let group = Entity::new(Key::Group(vec![Key::Leaf("a"), Key::Leaf("b")]), Vec::new());
        let err = EntitySet::from_entities(vec![group]).unwrap_err();
        assert!(matches!(err, Error::EmptyVector { ref entity } if entity == "[a, b]"));
    }
}
