//! Exact-size enforcement over flat clusters.
//!
//! Similarity clustering rarely produces groups of the size a caller needs.
//! The enforcer rewrites flat clusters greedily, keeping as much of the
//! similarity structure as the size constraint allows:
//!
//! ```text
//! flat:      [a b c d e f g] [h i] [j k l]        s = 3
//!             └─┬─┘ └─┬─┘ │   └┬┘   └─┬─┘
//! exact:     [a b c] [d e f]  │    │   [j k l]
//! overflow:                   g    h i
//! overflow → [g h i]
//! ```
//!
//! Members keep their discovery order throughout, so the result is fully
//! determined by the order of the flat clusters and their members.
//!
//! Similarity quality is given up at chunk boundaries and in the overflow
//! pool to meet the hard size constraint.
//! A leftover overflow tail smaller than the target size is emitted as one
//! undersized cluster rather than merged elsewhere.

use crate::error::{Error, Result};

/// Group item indices by flat label, in label order.
///
/// Labels are expected to be dense (`0..k`); members keep item order.
pub fn group_by_label(labels: &[usize]) -> Vec<Vec<usize>> {
    let k = labels.iter().max().map_or(0, |m| m + 1);
    let mut groups = vec![Vec::new(); k];
    for (item, &label) in labels.iter().enumerate() {
        groups[label].push(item);
    }
    groups.retain(|g| !g.is_empty());
    groups
}

/// Exact clusters plus the overflow pool left after the first pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Split<T> {
    /// Clusters of exactly the target size, in emission order.
    pub exact: Vec<Vec<T>>,
    /// Members displaced from undersized clusters and oversized remainders.
    pub overflow: Vec<T>,
}

/// Rewrites flat clusters into clusters of an exact size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeEnforcer {
    size: usize,
}

impl SizeEnforcer {
    /// Enforcer for clusters of `size` members.
    ///
    /// Fails with [`Error::InvalidParameter`] when `size` is zero.
    pub fn new(size: usize) -> Result<Self> {
        if size == 0 {
            return Err(Error::InvalidParameter {
                name: "size",
                message: "cluster size must be positive".into(),
            });
        }
        Ok(Self { size })
    }

    /// Target cluster size.
    pub fn size(&self) -> usize {
        self.size
    }

    /// First pass: keep exact clusters, chunk oversized ones, pool the rest.
    pub fn split<T>(&self, groups: Vec<Vec<T>>) -> Split<T> {
        let s = self.size;
        let mut exact = Vec::new();
        let mut overflow = Vec::new();

        for group in groups {
            if group.len() == s {
                exact.push(group);
            } else if group.len() < s {
                overflow.extend(group);
            } else {
                let mut members = group.into_iter();
                loop {
                    let chunk: Vec<T> = members.by_ref().take(s).collect();
                    if chunk.len() == s {
                        exact.push(chunk);
                    } else {
                        overflow.extend(chunk);
                        break;
                    }
                }
            }
        }

        Split { exact, overflow }
    }

    /// Both passes: the final clusters for a level.
    ///
    /// Every cluster has exactly `size` members except possibly the last,
    /// which holds the overflow remainder.
    pub fn enforce<T>(&self, groups: Vec<Vec<T>>) -> Vec<Vec<T>> {
        let Split {
            mut exact,
            overflow,
        } = self.split(groups);

        let mut pool = overflow.into_iter().peekable();
        while pool.peek().is_some() {
            exact.push(pool.by_ref().take(self.size).collect());
        }
        exact
    }
}
