use core::mem::size_of;

/*
every null link points at the sentinel cell in slot 0, which is always black and never holds a value.

vacant cells are kept in a linked list threaded through their parent field, head stored in the tree:
- a new node takes the head of the list if there is one, new head is storage[head].parent
- a released node gets storage[cell].parent = head, and then head = cell
*/

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum NodeColor {
    #[default]
    Red,
    Black,
}

/// Handle to a node slot of a tree.
///
/// A handle stays attached to its value for as long as the value is stored,
/// including across rebalancing and deletion of other nodes. Once the value is
/// deleted the slot may be reused by a later node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIndex(pub(crate) usize);

pub(crate) const NIL: NodeIndex = NodeIndex(0);

/// Bytes accounted for the structural part of a node, on top of its value.
pub(crate) const NODE_HEADER: usize = size_of::<Node<()>>();

#[derive(Debug)]
pub(crate) struct Node<T> {
    pub(crate) value: Option<T>,
    pub(crate) color: NodeColor,
    pub(crate) parent: NodeIndex,
    pub(crate) left: NodeIndex,
    pub(crate) right: NodeIndex,
    pub(crate) footprint: usize,
}

impl<T> Node<T> {
    pub(crate) fn sentinel() -> Self {
        Self {
            value: None,
            color: NodeColor::Black,
            parent: NIL,
            left: NIL,
            right: NIL,
            footprint: 0,
        }
    }

    pub(crate) fn new_isolated(value: T, footprint: usize) -> Self {
        Self {
            value: Some(value),
            color: NodeColor::default(),
            parent: NIL,
            left: NIL,
            right: NIL,
            footprint,
        }
    }

    #[inline]
    pub(crate) fn left_child(&self) -> NodeIndex {
        self.left
    }

    #[inline]
    pub(crate) fn right_child(&self) -> NodeIndex {
        self.right
    }

    #[inline]
    pub(crate) fn is_red(&self) -> bool {
        matches!(self.color, NodeColor::Red)
    }

    /// Fresh nodes hold a value, are red and have no links yet.
    pub(crate) fn is_clean(&self) -> bool {
        self.value.is_some()
            && self.is_red()
            && self.parent == NIL
            && self.left == NIL
            && self.right == NIL
    }

    /// Turns the cell into a vacant one, chained in front of `next_free`.
    pub(crate) fn vacate(&mut self, next_free: NodeIndex) {
        self.value = None;
        self.color = NodeColor::Red;
        self.parent = next_free;
        self.left = NIL;
        self.right = NIL;
        self.footprint = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn isolated_node_is_clean() {
        let node = Node::new_isolated(5u32, NODE_HEADER + 4);

        assert!(node.is_clean());
        assert!(!Node::<u32>::sentinel().is_clean());
        assert!(!Node::<u32>::sentinel().is_red());
    }

    #[test]
    pub fn linked_or_vacant_node_is_not_clean() {
        let mut node = Node::new_isolated(5u32, NODE_HEADER + 4);
        node.parent = NodeIndex(3);
        assert!(!node.is_clean());

        node.vacate(NIL);
        assert!(!node.is_clean());
        assert!(node.value.is_none());
    }
}
