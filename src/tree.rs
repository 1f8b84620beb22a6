//! Prefix-tree construction.
//!
//! Trees are built bottom-up by repeatedly merging the two lightest nodes.
//! Equal weights are ordered by a sequence number assigned when a node enters
//! the queue: leaves are numbered in ascending symbol order, internal nodes
//! continue the sequence in creation order. The first node taken from the
//! queue becomes the left child and the second the right child, so a given
//! frequency table always yields the same tree.

use crate::error::{HuffmanError, Result};
use crate::frequency::FrequencyTable;
use crate::node::{Node, ShapeRecord};
use log::trace;
use slotmap::{DefaultKey, SlotMap};
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A queued subtree waiting to be merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct QueueEntry {
    weight: u64,
    /// Tie-break key, unique per entry
    order: u64,
    key: DefaultKey,
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Lower weight first, then lower sequence number
        (self.weight, self.order).cmp(&(other.weight, other.order))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A prefix tree stored in an arena it exclusively owns.
#[derive(Debug, Clone)]
pub struct HuffmanTree {
    pub(crate) nodes: SlotMap<DefaultKey, Node>,
    pub(crate) root: DefaultKey,
}

impl HuffmanTree {
    /// Builds the tree for `freq`.
    ///
    /// Returns `None` when the table has no symbol with a non-zero count. A
    /// table with one symbol yields a lone leaf.
    pub fn build(freq: &FrequencyTable) -> Option<Self> {
        let mut nodes = SlotMap::new();
        let mut queue = BinaryHeap::with_capacity(freq.len());
        let mut order = 0u64;

        for (symbol, count) in freq.sorted() {
            if count == 0 {
                continue;
            }
            let key = nodes.insert(Node::leaf(symbol, count));
            queue.push(Reverse(QueueEntry {
                weight: count,
                order,
                key,
            }));
            order += 1;
        }

        while queue.len() > 1 {
            let Reverse(left) = queue.pop()?;
            let Reverse(right) = queue.pop()?;

            let weight = left.weight + right.weight;
            let key = nodes.insert(Node::Internal {
                weight,
                left: left.key,
                right: right.key,
            });
            trace!(
                "merged #{} (w={}) and #{} (w={}) into #{} (w={})",
                left.order,
                left.weight,
                right.order,
                right.weight,
                order,
                weight
            );
            queue.push(Reverse(QueueEntry { weight, order, key }));
            order += 1;
        }

        let Reverse(root) = queue.pop()?;
        Some(Self {
            nodes,
            root: root.key,
        })
    }

    /// Rebuilds a tree from its pre-order shape records.
    ///
    /// Weights are not part of the shape, so every node of the result has
    /// weight 0. Fails with [`HuffmanError::CorruptArtifact`] if the records do
    /// not describe exactly one full binary tree with distinct leaf symbols.
    pub(crate) fn from_shape(records: &[ShapeRecord]) -> Result<Option<Self>> {
        if records.is_empty() {
            return Ok(None);
        }

        let mut nodes = SlotMap::with_capacity(records.len());
        let mut seen = [false; 256];
        let mut stack: Vec<DefaultKey> = Vec::new();

        // Walking pre-order backwards, each internal node finds its left child
        // on top of the stack and its right child just below it.
        for record in records.iter().rev() {
            match *record {
                ShapeRecord::Leaf(symbol) => {
                    if std::mem::replace(&mut seen[symbol as usize], true) {
                        return Err(HuffmanError::corrupt(format!(
                            "leaf symbol {symbol:#04x} appears more than once"
                        )));
                    }
                    stack.push(nodes.insert(Node::leaf(symbol, 0)));
                }
                ShapeRecord::Internal => {
                    let (Some(left), Some(right)) = (stack.pop(), stack.pop()) else {
                        return Err(HuffmanError::corrupt(
                            "internal node record is missing a child",
                        ));
                    };
                    stack.push(nodes.insert(Node::Internal {
                        weight: 0,
                        left,
                        right,
                    }));
                }
            }
        }

        match stack.as_slice() {
            [root] => Ok(Some(Self { nodes, root: *root })),
            _ => Err(HuffmanError::corrupt(format!(
                "node records describe {} disjoint subtrees",
                stack.len()
            ))),
        }
    }

    /// Pre-order shape of the tree, root first, left before right.
    pub fn preorder(&self) -> Vec<ShapeRecord> {
        let mut records = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root];

        while let Some(key) = stack.pop() {
            match &self.nodes[key] {
                Node::Leaf { symbol, .. } => records.push(ShapeRecord::Leaf(*symbol)),
                Node::Internal { left, right, .. } => {
                    records.push(ShapeRecord::Internal);
                    stack.push(*right);
                    stack.push(*left);
                }
            }
        }

        records
    }

    /// Key of the root node.
    pub fn root(&self) -> DefaultKey {
        self.root
    }

    pub fn root_node(&self) -> &Node {
        &self.nodes[self.root]
    }

    /// Looks up a node by key.
    pub fn node(&self, key: DefaultKey) -> Option<&Node> {
        self.nodes.get(key)
    }

    /// Weight of the root, which equals the number of counted symbols for a
    /// freshly built tree.
    pub fn weight(&self) -> u64 {
        self.root_node().weight()
    }

    /// Total number of nodes, leaves and internal.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of leaves, one per distinct symbol.
    pub fn leaf_count(&self) -> usize {
        self.nodes.values().filter(|node| node.is_leaf()).count()
    }

    /// True for the degenerate tree made of a single leaf.
    pub fn is_single_leaf(&self) -> bool {
        self.root_node().is_leaf()
    }
}

impl PartialEq for HuffmanTree {
    /// Trees are equal when they have the same shape and leaf symbols.
    fn eq(&self, other: &Self) -> bool {
        self.preorder() == other.preorder()
    }
}

impl Eq for HuffmanTree {}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(input: &[u8]) -> Option<HuffmanTree> {
        HuffmanTree::build(&FrequencyTable::count(input))
    }

    /// Checks every internal weight against its children and returns the root weight.
    fn check_weights(tree: &HuffmanTree) -> u64 {
        for node in tree.nodes.values() {
            if let Node::Internal {
                weight, left, right, ..
            } = node
            {
                assert_eq!(*weight, tree.nodes[*left].weight() + tree.nodes[*right].weight());
            }
        }
        tree.weight()
    }

    #[test]
    fn test_empty_table_has_no_tree() {
        assert!(build(b"").is_none());
    }

    #[test]
    fn test_single_symbol_is_lone_leaf() {
        let tree = build(b"zzzz").expect("tree");
        assert!(tree.is_single_leaf());
        assert_eq!(tree.node_count(), 1);
        assert_eq!(
            *tree.root_node(),
            Node::Leaf {
                symbol: b'z',
                weight: 4
            }
        );
    }

    #[test]
    fn test_two_symbols_lighter_goes_left() {
        let tree = build(b"aaab").expect("tree");
        assert_eq!(tree.node_count(), 3);
        assert_eq!(
            tree.preorder(),
            vec![
                ShapeRecord::Internal,
                ShapeRecord::Leaf(b'b'),
                ShapeRecord::Leaf(b'a'),
            ]
        );
        assert_eq!(check_weights(&tree), 4);
    }

    #[test]
    fn test_equal_weights_break_ties_by_symbol() {
        // All weights equal: a and b merge first, then c and d, then the two pairs
        let tree = build(b"dcba").expect("tree");
        assert_eq!(
            tree.preorder(),
            vec![
                ShapeRecord::Internal,
                ShapeRecord::Internal,
                ShapeRecord::Leaf(b'a'),
                ShapeRecord::Leaf(b'b'),
                ShapeRecord::Internal,
                ShapeRecord::Leaf(b'c'),
                ShapeRecord::Leaf(b'd'),
            ]
        );
    }

    #[test]
    fn test_leaf_precedes_internal_of_equal_weight() {
        // a:1 b:1 merge into w=2; c:2 was queued first so it is taken first
        let tree = build(b"abcc").expect("tree");
        assert_eq!(
            tree.preorder(),
            vec![
                ShapeRecord::Internal,
                ShapeRecord::Leaf(b'c'),
                ShapeRecord::Internal,
                ShapeRecord::Leaf(b'a'),
                ShapeRecord::Leaf(b'b'),
            ]
        );
    }

    #[test]
    fn test_zero_counts_are_skipped() {
        let table: FrequencyTable = vec![(b'a', 0), (b'b', 5)].into_iter().collect();
        let tree = HuffmanTree::build(&table).expect("tree");
        assert!(tree.is_single_leaf());
        assert_eq!(tree.root_node().symbol(), Some(b'b'));
    }

    #[test]
    fn test_leaf_count_and_weights() {
        let input = b"the quick brown fox jumps over the lazy dog";
        let tree = build(input).expect("tree");
        let distinct = FrequencyTable::count(input).len();
        assert_eq!(tree.leaf_count(), distinct);
        assert_eq!(tree.node_count(), 2 * distinct - 1);
        assert_eq!(check_weights(&tree), input.len() as u64);
    }

    /// Node weights in the same pre-order as [`HuffmanTree::preorder`].
    fn preorder_weights(tree: &HuffmanTree) -> Vec<u64> {
        let mut weights = Vec::with_capacity(tree.node_count());
        let mut stack = vec![tree.root];

        while let Some(key) = stack.pop() {
            let node = &tree.nodes[key];
            weights.push(node.weight());
            if let Node::Internal { left, right, .. } = node {
                stack.push(*right);
                stack.push(*left);
            }
        }

        weights
    }

    #[test]
    fn test_deterministic_rebuild() {
        let input = b"abracadabra alakazam";
        let first = build(input).expect("tree");
        let second = build(input).expect("tree");

        assert_eq!(first, second);
        assert_eq!(preorder_weights(&first), preorder_weights(&second));
        assert_eq!(preorder_weights(&first)[0], input.len() as u64);
    }

    #[test]
    fn test_preorder_weights_for_abcc() {
        let tree = build(b"abcc").expect("tree");
        assert_eq!(preorder_weights(&tree), vec![4, 2, 2, 1, 1]);
    }

    #[test]
    fn test_shape_roundtrip() {
        let tree = build(b"hello, world").expect("tree");
        let rebuilt = HuffmanTree::from_shape(&tree.preorder())
            .expect("valid shape")
            .expect("non-empty");
        assert_eq!(rebuilt, tree);
        assert_eq!(rebuilt.weight(), 0);
    }

    #[test]
    fn test_from_shape_empty() {
        assert!(HuffmanTree::from_shape(&[]).expect("valid").is_none());
    }

    #[test]
    fn test_from_shape_rejects_missing_child() {
        let records = [ShapeRecord::Internal, ShapeRecord::Leaf(b'a')];
        assert!(matches!(
            HuffmanTree::from_shape(&records),
            Err(HuffmanError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_from_shape_rejects_extra_leaf() {
        let records = [
            ShapeRecord::Internal,
            ShapeRecord::Leaf(b'a'),
            ShapeRecord::Leaf(b'b'),
            ShapeRecord::Leaf(b'c'),
        ];
        assert!(matches!(
            HuffmanTree::from_shape(&records),
            Err(HuffmanError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_from_shape_rejects_duplicate_symbol() {
        let records = [
            ShapeRecord::Internal,
            ShapeRecord::Leaf(b'a'),
            ShapeRecord::Leaf(b'a'),
        ];
        assert!(matches!(
            HuffmanTree::from_shape(&records),
            Err(HuffmanError::CorruptArtifact(_))
        ));
    }

    #[test]
    fn test_skewed_tree_does_not_recurse() {
        // Fibonacci-like weights give a maximally deep tree
        let mut weights = Vec::new();
        let (mut a, mut b) = (1u64, 1u64);
        for symbol in 0..60u8 {
            weights.push((symbol, a));
            let next = a + b;
            a = b;
            b = next;
        }
        let table: FrequencyTable = weights.into_iter().collect();
        let tree = HuffmanTree::build(&table).expect("tree");
        assert_eq!(tree.leaf_count(), 60);
        let rebuilt = HuffmanTree::from_shape(&tree.preorder()).expect("valid");
        assert_eq!(rebuilt.as_ref(), Some(&tree));
    }
}
