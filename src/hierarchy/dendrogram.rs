//! Dendrogram produced by agglomerative clustering, and its flat cuts.
//!
//! A dendrogram records the nested structure of clusters produced by
//! bottom-up merging. Leaves are `0..n`; merge `i` creates node `n + i`.
//!
//! ```text
//!         6 (height=1.0)
//!        / \
//!       4   5 (height=0.7)
//!      / \ / \
//!     0  1 2  3 (leaves)
//! ```
//!
//! Cutting at a height keeps every merge at or below it and drops the rest.

/// A dendrogram representing hierarchical cluster merges.
#[derive(Debug, Clone)]
pub struct Dendrogram {
    /// Merge history in the order the merges were made.
    merges: Vec<Merge>,
    /// Number of original items.
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (node id).
    pub cluster_a: usize,
    /// Second cluster being merged (node id).
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub distance: f64,
    /// Size of the resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create a new dendrogram for n items.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge operation.
    pub fn add_merge(&mut self, cluster_a: usize, cluster_b: usize, distance: f64, size: usize) {
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            distance,
            size,
        });
    }

    /// Flat labels after applying every merge with `distance <= threshold`.
    ///
    /// Labels are 0-based and numbered by first appearance over the items,
    /// so item 0 is always in cluster 0 and labels increase in discovery
    /// order.
    pub fn cut_at_distance(&self, threshold: f64) -> Vec<usize> {
        let n_nodes = self.n_items + self.merges.len();
        let mut parent: Vec<usize> = (0..n_nodes).collect();

        for (i, merge) in self.merges.iter().enumerate() {
            if merge.distance > threshold {
                continue;
            }
            let node = self.n_items + i;
            for child in [merge.cluster_a, merge.cluster_b] {
                if child < n_nodes {
                    parent[child] = node;
                }
            }
        }

        let mut root_label: Vec<Option<usize>> = vec![None; n_nodes];
        let mut next_label = 0;
        (0..self.n_items)
            .map(|item| {
                let root = find_root(&mut parent, item);
                *root_label[root].get_or_insert_with(|| {
                    next_label += 1;
                    next_label - 1
                })
            })
            .collect()
    }

    /// Flat labels for at most `max_clusters` clusters (`maxclust`).
    ///
    /// Picks the lowest merge height whose cut leaves at most `max_clusters`
    /// groups: the `(n - max_clusters)`-th smallest merge distance. Merges
    /// tied at that height are all applied, so ties can yield fewer groups.
    /// `max_clusters == 0` puts every item in one cluster.
    pub fn cut_max_clusters(&self, max_clusters: usize) -> Vec<usize> {
        if max_clusters >= self.n_items {
            return (0..self.n_items).collect();
        }
        if max_clusters <= 1 {
            return vec![0; self.n_items];
        }

        let required = self.n_items - max_clusters;
        let mut heights = self.distances();
        heights.sort_by(|a, b| a.total_cmp(b));

        let threshold = if required > heights.len() {
            f64::INFINITY
        } else {
            heights[required - 1]
        };

        self.cut_at_distance(threshold)
    }

    /// Number of distinct clusters in a label vector.
    pub fn count_clusters(labels: &[usize]) -> usize {
        labels.iter().max().map_or(0, |m| m + 1)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge distances in merge order.
    pub fn distances(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.distance).collect()
    }
}

fn find_root(parent: &mut [usize], mut node: usize) -> usize {
    let mut root = node;
    while parent[root] != root {
        root = parent[root];
    }
    // path compression
    while parent[node] != root {
        let next = parent[node];
        parent[node] = root;
        node = next;
    }
    root
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ```text
    ///         6 (1.0)
    ///        / \
    ///       4   5 (0.7)
    ///  (0.5)/ \ / \
    ///     0  1 2  3
    /// ```
    fn four_leaf() -> Dendrogram {
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(0, 1, 0.5, 2);
        dendro.add_merge(2, 3, 0.7, 2);
        dendro.add_merge(4, 5, 1.0, 4);
        dendro
    }

    #[test]
    fn test_dendrogram_creation() {
        let dendro = Dendrogram::new(5);
        assert_eq!(dendro.n_items(), 5);
        assert_eq!(dendro.n_merges(), 0);
    }

    #[test]
    fn cut_at_distance_applies_merges_up_to_threshold() {
        let dendro = four_leaf();
        assert_eq!(dendro.cut_at_distance(0.0), vec![0, 1, 2, 3]);
        assert_eq!(dendro.cut_at_distance(0.5), vec![0, 0, 1, 2]);
        assert_eq!(dendro.cut_at_distance(0.7), vec![0, 0, 1, 1]);
        assert_eq!(dendro.cut_at_distance(1.0), vec![0, 0, 0, 0]);
    }

    #[test]
    fn labels_follow_first_appearance() {
        // Items 1 and 3 merge first; item 0 must still get label 0.
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(1, 3, 0.1, 2);
        dendro.add_merge(0, 2, 0.2, 2);
        dendro.add_merge(4, 5, 0.9, 4);
        assert_eq!(dendro.cut_at_distance(0.15), vec![0, 1, 2, 1]);
        assert_eq!(dendro.cut_max_clusters(2), vec![0, 1, 0, 1]);
    }

    #[test]
    fn maxclust_hits_requested_count() {
        let dendro = four_leaf();
        for k in 1..=4 {
            let labels = dendro.cut_max_clusters(k);
            assert_eq!(Dendrogram::count_clusters(&labels), k);
        }
    }

    #[test]
    fn maxclust_zero_is_single_cluster() {
        assert_eq!(four_leaf().cut_max_clusters(0), vec![0, 0, 0, 0]);
    }

    #[test]
    fn maxclust_ties_give_fewer_clusters() {
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(0, 1, 0.5, 2);
        dendro.add_merge(2, 3, 0.5, 2);
        dendro.add_merge(4, 5, 1.0, 4);
        // Three groups would need a threshold splitting the tie at 0.5.
        let labels = dendro.cut_max_clusters(3);
        assert_eq!(labels, vec![0, 0, 1, 1]);
        assert_eq!(Dendrogram::count_clusters(&labels), 2);
    }
}
