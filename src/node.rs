use slotmap::DefaultKey;

/// A node of the prefix tree.
///
/// Children are keys into the arena owned by [`crate::HuffmanTree`], so the
/// tree is a strict single-owner binary tree without back references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    /// A terminal node bound to one distinct input symbol.
    Leaf { symbol: u8, weight: u64 },

    /// A merge node. `weight` is the sum of both children's weights.
    Internal {
        weight: u64,
        left: DefaultKey,
        right: DefaultKey,
    },
}

impl Node {
    pub(crate) fn leaf(symbol: u8, weight: u64) -> Self {
        Node::Leaf { symbol, weight }
    }

    pub fn weight(&self) -> u64 {
        match self {
            Node::Leaf { weight, .. } | Node::Internal { weight, .. } => *weight,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf { .. })
    }

    /// The symbol of a leaf; `None` for internal nodes.
    pub fn symbol(&self) -> Option<u8> {
        match self {
            Node::Leaf { symbol, .. } => Some(*symbol),
            Node::Internal { .. } => None,
        }
    }

    /// Follows one bit: `false` goes left, `true` goes right.
    pub(crate) fn child(&self, bit: bool) -> Option<DefaultKey> {
        match self {
            Node::Leaf { .. } => None,
            Node::Internal { left, right, .. } => Some(if bit { *right } else { *left }),
        }
    }
}

/// Pre-order record of the tree shape, as stored in the container.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeRecord {
    Internal,
    Leaf(u8),
}
