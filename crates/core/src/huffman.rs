//! Huffman tree construction by greedy weight merging.
//!
//! # Tie-breaking
//!
//! Nodes are queued with a sequence number: leaves in ascending symbol
//! order first, then every merged node in creation order. The queue pops
//! by `(weight, sequence)`, so equal weights resolve to the node queued
//! earliest. The first node popped becomes the left child.
//!
//! The resulting tree is a pure function of the frequency table.

use crate::error::{Error, Result};
use crate::frequency::FrequencyTable;
use crate::symbol::Symbol;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A node of the prefix-code tree. Internal nodes own both children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HuffNode<S> {
    Leaf {
        weight: u64,
        symbol: S,
    },
    Internal {
        weight: u64,
        left: Box<HuffNode<S>>,
        right: Box<HuffNode<S>>,
    },
}

impl<S> HuffNode<S> {
    /// Sum of leaf frequencies beneath this node.
    pub fn weight(&self) -> u64 {
        match self {
            HuffNode::Leaf { weight, .. } | HuffNode::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, HuffNode::Leaf { .. })
    }

    fn merge(left: Self, right: Self) -> Self {
        HuffNode::Internal {
            weight: left.weight() + right.weight(),
            left: Box::new(left),
            right: Box::new(right),
        }
    }
}

/// Heap entry; `Ord` is reversed so `BinaryHeap` pops the minimum.
struct QueuedNode<S> {
    sequence: u64,
    node: HuffNode<S>,
}

impl<S> PartialEq for QueuedNode<S> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<S> Eq for QueuedNode<S> {}

impl<S> PartialOrd for QueuedNode<S> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<S> Ord for QueuedNode<S> {
    fn cmp(&self, other: &Self) -> Ordering {
        // Lighter first, then earlier-queued first
        (other.node.weight(), other.sequence).cmp(&(self.node.weight(), self.sequence))
    }
}

/// An optimal prefix-code tree for one frequency table.
///
/// Built per call and dropped once codes are extracted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HuffmanTree<S> {
    root: HuffNode<S>,
}

impl<S: Symbol> HuffmanTree<S> {
    /// Build the tree for `table`.
    ///
    /// # Errors
    /// `Error::EmptyInput` if the table has no symbols.
    pub fn build(table: &FrequencyTable<S>) -> Result<Self> {
        let mut heap: BinaryHeap<QueuedNode<S>> = table
            .iter()
            .zip(0u64..)
            .map(|((symbol, weight), sequence)| QueuedNode {
                sequence,
                node: HuffNode::Leaf { weight, symbol },
            })
            .collect();
        let mut next_sequence = heap.len() as u64;

        loop {
            let first = heap.pop().ok_or(Error::EmptyInput)?;
            let Some(second) = heap.pop() else {
                log::trace!("huffman tree built: {} symbols, weight {}", table.len(), first.node.weight());
                return Ok(Self { root: first.node });
            };

            heap.push(QueuedNode {
                sequence: next_sequence,
                node: HuffNode::merge(first.node, second.node),
            });
            next_sequence += 1;
        }
    }
}

impl<S> HuffmanTree<S> {
    pub fn root(&self) -> &HuffNode<S> {
        &self.root
    }

    /// Number of leaves (distinct symbols).
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![&self.root];
        while let Some(node) = stack.pop() {
            match node {
                HuffNode::Leaf { .. } => count += 1,
                HuffNode::Internal { left, right, .. } => {
                    stack.push(left);
                    stack.push(right);
                }
            }
        }
        count
    }
}
