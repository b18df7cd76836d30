// =====================================================================
// File: index/tree.rs
//
// Description:
//   Implements the B-tree index (`BTreeIndex`) that manages insertion,
//   search, and in-order traversal over `BTreeNode` structures. This
//   index is the in-memory structure holding every customer record,
//   keyed by customer identifier.
//
// Features:
//   - `insert`  : Adds or overwrites key–value pairs (last write wins).
//   - `search`  : Standard B-tree search; returns the value for a key.
//   - `traverse`: Streams every entry to a callback in ascending order.
//   - `iter`    : Lazy in-order iterator over the same entries.
//   - `split_child`: The single rebalancing primitive. The tree only grows,
//     there is no delete and therefore no merge.
//
// Notes:
//   * The minimum degree `t` bounds every non-root node to between
//     `t - 1` and `2t - 1` keys.
// =====================================================================
use std::borrow::Borrow;

use super::BTreeNode;
use crate::error::IndexError;

/// B-tree index over any totally ordered key.
/// Contains the minimum degree (t), the root node and the entry count.
#[derive(Debug)]
pub struct BTreeIndex<K, V> {
    pub(crate) t: usize,
    pub(crate) root: Box<BTreeNode<K, V>>,
    len: usize,
}


// BTree Referencing:
// https://build-your-own.org/database/
// https://www.geeksforgeeks.org/dsa/introduction-of-b-tree-2/
impl<K: Ord, V> BTreeIndex<K, V> {
    /// Create a new empty B-tree with minimum degree `t`.
    ///
    /// # Errors
    /// Returns [`IndexError::InvalidConfiguration`] when `t < 2`.
    ///
    /// # Example
    /// ```
    /// use churnstore::BTreeIndex;
    /// let index: BTreeIndex<String, u32> = BTreeIndex::new(3).unwrap();
    /// assert!(index.is_empty());
    /// assert!(BTreeIndex::<String, u32>::new(1).is_err());
    /// ```
    pub fn new(t: usize) -> Result<Self, IndexError> {
        if t < 2 {
            return Err(IndexError::InvalidConfiguration { min_degree: t });
        }
        Ok(Self {
            t,
            root: Box::new(BTreeNode::new(true)),
            len: 0,
        })
    }

    /// Wraps an already built root node. The caller is responsible for the
    /// node satisfying the B-tree invariants for degree `t`.
    pub fn from_root(t: usize, root: BTreeNode<K, V>) -> Result<Self, IndexError> {
        let mut index = Self::new(t)?;
        index.len = root.subtree_len();
        index.root = Box::new(root);
        Ok(index)
    }

    /// The minimum degree this tree was built with.
    pub fn min_degree(&self) -> usize {
        self.t
    }

    /// Search for a key in the B-tree.
    ///
    /// Within each node the first key `>=` the search key is located by
    /// binary search; an exact match ends the search, otherwise the search
    /// descends into the child at that position until a leaf is exhausted.
    ///
    /// # Returns
    /// * `Some(&V)` if the key exists.
    /// * `None` if the key is not found in the tree.
    ///
    /// # Example
    /// ```
    /// use churnstore::BTreeIndex;
    /// let mut t = BTreeIndex::new(2).unwrap();
    /// t.insert("dog".to_string(), "bark");
    /// assert_eq!(t.search("dog"), Some(&"bark"));
    /// assert_eq!(t.search("cat"), None);
    /// ```
    pub fn search<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node: &BTreeNode<K, V> = &self.root;
        loop {
            let idx = node.lower_bound(key);

            // Found the key in the current node
            if let Some((k, v)) = node.kv_pairs.get(idx) {
                let found: &Q = k.borrow();
                if found == key {
                    return Some(v);
                }
            }

            // No key here and nowhere left to go
            if node.is_leaf {
                return None;
            }
            node = &node.children[idx];
        }
    }

    /// Mutable access to the value stored under `key`.
    ///
    /// Follows the same descent as [`search`](Self::search) and never
    /// reshapes the tree.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node: &mut BTreeNode<K, V> = &mut self.root;
        loop {
            let idx = node.lower_bound(key);
            let hit = match node.kv_pairs.get(idx) {
                Some((k, _)) => {
                    let found: &Q = k.borrow();
                    found == key
                }
                None => false,
            };

            if hit {
                return Some(&mut node.kv_pairs[idx].1);
            }
            if node.is_leaf {
                return None;
            }
            node = node.children[idx].as_mut();
        }
    }

    /// Returns `true` if `key` is stored in the tree.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.search(key).is_some()
    }

    /// Insert a key-value pair into the B-tree.
    ///
    /// - If the key already exists anywhere in the tree, its value is replaced
    ///   in place and the previous value is returned (last write wins). The
    ///   tree shape is left untouched.
    /// - Otherwise the pair is placed in a leaf at its sorted position and
    ///   `None` is returned.
    /// - If the root node is full when a new key arrives, the tree grows in
    ///   height by splitting the root. This is the only way the height increases.
    ///
    /// # Example
    /// ```
    /// use churnstore::BTreeIndex;
    ///
    /// let mut index = BTreeIndex::new(2).unwrap();
    /// assert_eq!(index.insert("dog".to_string(), "bark"), None);
    /// assert_eq!(index.insert("cat".to_string(), "meow"), None);
    ///
    /// // Overwrite existing key
    /// assert_eq!(index.insert("dog".to_string(), "woof"), Some("bark"));
    /// assert_eq!(index.search("dog"), Some(&"woof"));
    /// ```
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        // Overwrites happen before any split
        if let Some(slot) = self.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }

        let t = self.t;

        if self.root.is_full(t) {
            // Create a new root and hang the old root under it
            let mut new_root = Box::new(BTreeNode::new(false));
            new_root.children.push(std::mem::replace(
                &mut self.root,
                Box::new(BTreeNode::new(true)),
            ));

            // Split old root (now child 0 of new_root)
            Self::split_child(&mut new_root, t, 0);
            self.root = new_root;
        }

        Self::insert_non_full(&mut self.root, t, key, value);
        self.len += 1;
        None
    }

    /// Visits every entry exactly once in ascending key order.
    ///
    /// The callback receives shared references only, so it can filter,
    /// print or accumulate but never mutate the tree.
    ///
    /// # Example
    /// ```
    /// use churnstore::BTreeIndex;
    /// let mut index = BTreeIndex::new(2).unwrap();
    /// for k in ["c", "a", "b"] {
    ///     index.insert(k.to_string(), k.len());
    /// }
    /// let mut keys = Vec::new();
    /// index.traverse(|k, _| keys.push(k.clone()));
    /// assert_eq!(keys, vec!["a", "b", "c"]);
    /// ```
    pub fn traverse<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a K, &'a V),
    {
        self.root.walk(&mut visit);
    }

    /// Same as [`traverse`](Self::traverse) but hands over values only.
    pub fn traverse_values<'a, F>(&'a self, mut visit: F)
    where
        F: FnMut(&'a V),
    {
        self.root.walk(&mut |_, v| visit(v));
    }

    /// Materializes every value in ascending key order.
    pub fn collect_all(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.len());
        self.traverse_values(|v| out.push(v));
        out
    }

    /// Lazy in-order iterator. Each call starts a fresh pass.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter::new(&self.root)
    }

    /// Number of entries in the tree.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels, counting the root. An empty tree has height 1.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut node: &BTreeNode<K, V> = &self.root;
        while !node.is_leaf {
            node = &node.children[0];
            height += 1;
        }
        height
    }


    // =========================
    // Insertion helpers
    // =========================

    /// Inserts a key that is not yet in the tree into the subtree rooted at
    /// a node that is known not to be full.
    ///
    /// # Behavior
    /// - **Leaf node**: insert at the `lower_bound` position (everything
    ///   above shifts right by one).
    /// - **Internal node**: split a full child before descending, then pick
    ///   the left or right half depending on how the key compares to the
    ///   promoted median.
    fn insert_non_full(node: &mut BTreeNode<K, V>, t: usize, key: K, value: V) {
        let mut idx = node.lower_bound(&key);

        // Base case - leaf insert
        if node.is_leaf {
            node.kv_pairs.insert(idx, (key, value));
            return;
        }

        // Make room in the child before descending
        if node.children[idx].is_full(t) {
            Self::split_child(node, t, idx);

            // The promoted median now sits at idx
            if key > node.kv_pairs[idx].0 {
                idx += 1;
            }
        }
        Self::insert_non_full(&mut node.children[idx], t, key, value);
    }


    /// Split the full child at `node.children[i]`.
    ///
    /// # Behavior
    /// - The left child keeps the first `t - 1` entries.
    /// - A new right sibling receives the last `t - 1` entries.
    /// - The median entry (index `t - 1`) moves up into the parent at `i`,
    ///   and the sibling is linked in at `i + 1`.
    /// - For an internal child, children `t..` move to the sibling.
    pub(crate) fn split_child(node: &mut BTreeNode<K, V>, t: usize, i: usize) {
        let full_child = &mut node.children[i];
        debug_assert!(full_child.is_full(t), "split_child called on a non-full child");

        let mut right = Box::new(BTreeNode::new(full_child.is_leaf));

        // Right node gets the t-1 largest entries
        right.kv_pairs = full_child.kv_pairs.split_off(t);
        // Left keeps 0..t-1, leaving the median behind
        let middle = full_child.kv_pairs.split_off(t - 1);

        // If internal, split children too: left keeps [0..t), right takes [t..]
        if !full_child.is_leaf {
            right.children = full_child.children.split_off(t);
        }

        // Insert middle into parent and link new right child
        node.kv_pairs.splice(i..i, middle);
        node.children.insert(i + 1, right);
    }
}


/// In-order iterator over a [`BTreeIndex`], driven by an explicit stack of
/// `(node, next key position)` frames.
pub struct Iter<'a, K, V> {
    stack: Vec<(&'a BTreeNode<K, V>, usize)>,
}

impl<'a, K, V> Iter<'a, K, V> {
    fn new(root: &'a BTreeNode<K, V>) -> Self {
        let mut iter = Self { stack: Vec::new() };
        iter.descend_left(root);
        iter
    }

    fn descend_left(&mut self, mut node: &'a BTreeNode<K, V>) {
        loop {
            self.stack.push((node, 0));
            if node.is_leaf {
                break;
            }
            node = &node.children[0];
        }
    }
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (node, i) = {
                let top = self.stack.last_mut()?;
                let i = top.1;
                top.1 += 1;
                (top.0, i)
            };

            if i < node.kv_pairs.len() {
                // Everything right of this key comes next
                if !node.is_leaf {
                    self.descend_left(&node.children[i + 1]);
                }
                let (k, v) = &node.kv_pairs[i];
                return Some((k, v));
            }
            self.stack.pop();
        }
    }
}

impl<'a, K: Ord, V> IntoIterator for &'a BTreeIndex<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
