use core::iter::FusedIterator;

use alloc::vec::Vec;

use crate::{
    Ironwood,
    allocator::NodeAllocator,
    node::{NIL, Node, NodeIndex},
};

/// Ascending iterator over the values of a tree.
pub struct Iter<'a, T> {
    pub(crate) storage: &'a [Node<T>],
    pub(crate) curr: NodeIndex,
    pub(crate) stack: Vec<NodeIndex>,
    pub(crate) remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn next_node(&mut self) -> Option<(NodeIndex, &'a T)> {
        let storage: &'a [Node<T>] = self.storage;

        while self.curr != NIL {
            self.stack.push(self.curr);
            self.curr = storage[self.curr.0].left_child();
        }

        let node = self.stack.pop()?;
        let node_storage = &storage[node.0];
        self.curr = node_storage.right_child();
        self.remaining = self.remaining.saturating_sub(1);

        node_storage.value.as_ref().map(|value| (node, value))
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_node().map(|(_, value)| value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T, C, A: NodeAllocator> Ironwood<T, C, A> {
    /// Iterates over the stored values in ascending order.
    #[must_use]
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            storage: &self.storage,
            curr: self.root,
            stack: Vec::new(),
            remaining: self.len,
        }
    }

    /// Calls `visit` once per stored node, in ascending order of values.
    ///
    /// The tree cannot be modified from inside `visit`.
    pub fn for_each<F>(&self, mut visit: F)
    where
        F: FnMut(NodeIndex, &T),
    {
        let mut iter = self.iter();
        while let Some((node, value)) = iter.next_node() {
            visit(node, value);
        }
    }
}

impl<'a, T, C, A: NodeAllocator> IntoIterator for &'a Ironwood<T, C, A> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
