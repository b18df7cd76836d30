// =====================================================================
// File: index/node.rs
//
// Description:
//   Defines the B-tree node structure (`BTreeNode`) used by the
//   in-memory customer index. Each node maintains:
//
//   - `kv_pairs`: Ordered key–value pairs stored within the node.
//   - `children`: Owned child nodes (empty if this node is a leaf).
//   - `is_leaf` : Boolean flag indicating whether the node is a leaf.
//
// Notes:
//   * Every child is owned by exactly one parent through a `Box`, so
//     no node is ever reachable from two places.
//   * Higher-level operations (insert, search, traversal) live in
//     `tree.rs`.
// =====================================================================
use std::borrow::Borrow;

/// Basic foundational B-tree node.
#[derive(Debug)]
pub struct BTreeNode<K, V> {
    /// Key–value pairs, strictly ascending by key.
    pub kv_pairs: Vec<(K, V)>,
    /// Box lets the node own its subtrees on the heap
    pub children: Vec<Box<BTreeNode<K, V>>>,
    pub is_leaf: bool,
}


impl<K: Ord, V> BTreeNode<K, V> {
    /// Creates a new empty B-tree node.
    ///
    /// # Example
    /// ```
    /// use churnstore::index::BTreeNode;
    /// let leaf: BTreeNode<String, u32> = BTreeNode::new(true);
    /// assert!(leaf.kv_pairs.is_empty());
    /// assert!(leaf.is_leaf);
    /// ```
    pub fn new(is_leaf: bool) -> Self {
        Self {
            kv_pairs: Vec::new(),
            children: Vec::new(),
            is_leaf,
        }
    }


    /// Binary search helper: returns the index of the first key that is
    /// `>= key`, or `kv_pairs.len()` when every stored key is smaller.
    ///
    /// # Example
    /// ```
    /// use churnstore::BTreeNode;
    ///
    /// let mut node = BTreeNode::new(true);
    /// node.kv_pairs.push(("cat".to_string(), 1));
    /// node.kv_pairs.push(("dog".to_string(), 2));
    ///
    /// assert_eq!(node.lower_bound("ant"), 0);
    /// assert_eq!(node.lower_bound("dog"), 1);
    /// assert_eq!(node.lower_bound("elephant"), 2);
    /// ```
    pub fn lower_bound<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.kv_pairs
            .binary_search_by(|(k, _)| <Q as Ord>::cmp(k.borrow(), key))
            .unwrap_or_else(|pos| pos)
    }


    /// Returns `true` when the node holds the maximum `2t - 1` keys.
    pub fn is_full(&self, t: usize) -> bool {
        self.kv_pairs.len() == 2 * t - 1
    }


    /// Walks this subtree in ascending key order, handing every entry to
    /// `visit`. Children are visited between the keys that separate them.
    pub fn walk<'a, F>(&'a self, visit: &mut F)
    where
        F: FnMut(&'a K, &'a V),
    {
        if self.is_leaf {
            for (k, v) in &self.kv_pairs {
                visit(k, v);
            }
            return;
        }

        for (i, (k, v)) in self.kv_pairs.iter().enumerate() {
            // Left subtree, then the separating key
            self.children[i].walk(visit);
            visit(k, v);
        }

        // Rightmost subtree
        self.children[self.kv_pairs.len()].walk(visit);
    }


    /// Number of entries stored in this subtree.
    pub fn subtree_len(&self) -> usize {
        self.kv_pairs.len()
            + self
                .children
                .iter()
                .map(|child| child.subtree_len())
                .sum::<usize>()
    }
}
