use core::{cmp::Ordering, fmt};

use crate::{
    Ironwood,
    allocator::NodeAllocator,
    compare::Comparator,
    node::{NIL, NodeIndex},
};

/// A broken red-black tree invariant, as found by [`Ironwood::validate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Violation {
    RedRoot,
    /// The node and its parent are both red.
    RedRedEdge(NodeIndex),
    /// The two subtrees of the node differ in black-height.
    BlackHeightMismatch(NodeIndex),
    /// The node's value does not sort strictly after its in-order predecessor.
    OutOfOrder(NodeIndex),
    /// The node is not its children's parent, or holds no value.
    BrokenLink(NodeIndex),
    CountMismatch { expected: usize, found: usize },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::RedRoot => f.write_str("root is red"),
            Violation::RedRedEdge(node) => write!(f, "red node {} has a red parent", node.0),
            Violation::BlackHeightMismatch(node) => {
                write!(f, "subtrees of node {} differ in black-height", node.0)
            }
            Violation::OutOfOrder(node) => write!(f, "node {} is out of order", node.0),
            Violation::BrokenLink(node) => write!(f, "node {} has inconsistent links", node.0),
            Violation::CountMismatch { expected, found } => {
                write!(f, "tree reports {expected} nodes but {found} are reachable")
            }
        }
    }
}

impl core::error::Error for Violation {}

impl<T, C, A: NodeAllocator> Ironwood<T, C, A> {
    /// Number of nodes on the longest path from the root to a leaf.
    #[must_use]
    pub fn height(&self) -> usize {
        self.subtree_height(self.root)
    }

    fn subtree_height(&self, node: NodeIndex) -> usize {
        if node == NIL {
            return 0;
        }

        let storage = self.node(node);
        1 + self
            .subtree_height(storage.left_child())
            .max(self.subtree_height(storage.right_child()))
    }

    /// Black-height of the subtree below `node`, counting `node` itself.
    fn check_subtree(&self, node: NodeIndex) -> Result<usize, Violation> {
        if node == NIL {
            return Ok(1);
        }

        let storage = self.node(node);
        if storage.value.is_none() {
            return Err(Violation::BrokenLink(node));
        }

        for child in [storage.left_child(), storage.right_child()] {
            if child == NIL {
                continue;
            }
            if self.node(child).parent != node {
                return Err(Violation::BrokenLink(child));
            }
            if storage.is_red() && self.is_red(child) {
                return Err(Violation::RedRedEdge(child));
            }
        }

        let left = self.check_subtree(storage.left_child())?;
        let right = self.check_subtree(storage.right_child())?;
        if left != right {
            return Err(Violation::BlackHeightMismatch(node));
        }

        Ok(left + usize::from(!storage.is_red()))
    }
}

impl<T, C: Comparator<T>, A: NodeAllocator> Ironwood<T, C, A> {
    /// Checks every red-black and search tree invariant.
    ///
    /// Returns the black-height of the root, not counting the root itself.
    pub fn validate(&self) -> Result<usize, Violation> {
        if self.root == NIL {
            return match self.len {
                0 => Ok(0),
                expected => Err(Violation::CountMismatch { expected, found: 0 }),
            };
        }

        if self.node(self.root).parent != NIL {
            return Err(Violation::BrokenLink(self.root));
        }
        if self.is_red(self.root) {
            return Err(Violation::RedRoot);
        }

        let black_height = self.check_subtree(self.root)?;

        let mut found = 0;
        let mut previous: Option<&T> = None;
        let mut iter = self.iter();
        while let Some((node, value)) = iter.next_node() {
            found += 1;
            if let Some(previous) = previous {
                if self.comparator.compare(value, previous) != Ordering::Greater {
                    return Err(Violation::OutOfOrder(node));
                }
            }
            previous = Some(value);
        }

        if found != self.len {
            return Err(Violation::CountMismatch {
                expected: self.len,
                found,
            });
        }

        Ok(black_height - 1)
    }
}
