// =====================================================================
// File: index/mod.rs
//
//! The `index` module contains the B-tree implementation used
//! for in-memory indexing of customer records.
//!
//! Structure:
//! - `node.rs`  : Defines the [`BTreeNode`] structure and its helpers.
//! - `tree.rs`  : Defines the [`BTreeIndex`] and its algorithms
//!                (insert, search, split, in-order traversal).
//! - `tests.rs` : Unit tests for the B-tree (compiled only in test mode).
// =====================================================================

pub mod node;
pub mod tree;

pub use self::node::BTreeNode;
pub use self::tree::{BTreeIndex, Iter};
