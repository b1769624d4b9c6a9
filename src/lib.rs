//! Red-black tree storing values in an index-addressed arena.
//!
//! The tree is parameterized by a [`Comparator`] that orders the stored values,
//! a [`NodeAllocator`] consulted for every node, a sizer reporting how many
//! bytes a value occupies, and an optional destructor run exactly once on every
//! value before its node is released.
//!
//! ```
//! use ironwood::Ironwood;
//!
//! let mut tree = Ironwood::new();
//! for key in [10, 20, 5, 15, 25] {
//!     tree.insert(key).unwrap();
//! }
//!
//! tree.delete(&10).unwrap();
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [5, 15, 20, 25]);
//! ```

extern crate alloc;

mod allocator;
mod compare;
mod config;
mod delete;
mod error;
mod insert;
mod iter;
mod node;
mod validate;

use core::{
    cmp::Ordering,
    fmt,
    mem::{size_of, size_of_val},
};

use ::alloc::vec::Vec;
use log::debug;

pub use allocator::{AllocError, Budget, Global, NodeAllocator};
pub use compare::{Comparator, NaturalOrder};
pub use config::{Builder, Destructor};
pub use error::{InsertError, TreeError};
pub use iter::Iter;
pub use node::{NodeColor, NodeIndex};
pub use validate::Violation;

use node::{NIL, NODE_HEADER, Node};

/// Red-black tree owning its values, ordered by `C` and accounted through `A`.
///
/// Not synchronized; callers sharing a tree across threads serialize access.
pub struct Ironwood<T, C = NaturalOrder, A: NodeAllocator = Global> {
    storage: Vec<Node<T>>,
    root: NodeIndex,
    free: NodeIndex,
    len: usize,
    comparator: C,
    allocator: A,
    sizer: fn(&T) -> usize,
    destructor: Option<Destructor<T>>,
}

/// Result of a descent by comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Location {
    Found(NodeIndex),
    /// The key belongs below `parent`, on the side given by `ordering`.
    Vacant {
        parent: NodeIndex,
        ordering: Ordering,
    },
}

impl<T: Ord> Ironwood<T> {
    /// Creates an empty tree of naturally ordered values.
    #[must_use]
    pub fn new() -> Self {
        Self::with_parts(Vec::new(), NaturalOrder, Global, size_of_val::<T>, None)
    }
}

impl<T: Ord> Default for Ironwood<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C, A: NodeAllocator> Ironwood<T, C, A> {
    /// Bytes claimed from the allocator for the tree itself.
    const HANDLE_FOOTPRINT: usize = size_of::<Self>();

    pub(crate) fn with_parts(
        mut storage: Vec<Node<T>>,
        comparator: C,
        allocator: A,
        sizer: fn(&T) -> usize,
        destructor: Option<Destructor<T>>,
    ) -> Self {
        storage.push(Node::sentinel());

        Self {
            storage,
            root: NIL,
            free: NIL,
            len: 0,
            comparator,
            allocator,
            sizer,
            destructor,
        }
    }

    /// Number of values stored in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[must_use]
    pub fn root(&self) -> Option<NodeIndex> {
        (self.root != NIL).then_some(self.root)
    }

    /// Value held by a live node, linked or detached.
    #[must_use]
    pub fn get(&self, node: NodeIndex) -> Option<&T> {
        if node == NIL {
            return None;
        }

        self.storage.get(node.0).and_then(|n| n.value.as_ref())
    }

    /// Color of a live node.
    #[must_use]
    pub fn color(&self, node: NodeIndex) -> Option<NodeColor> {
        self.get(node)?;
        Some(self.node(node).color)
    }

    /// Smallest stored value.
    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.get(self.leftmost(self.root))
    }

    /// Largest stored value.
    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.get(self.rightmost(self.root))
    }

    /// Reserves arena room for at least `additional` more nodes.
    pub fn reserve(&mut self, additional: usize) -> Result<(), TreeError> {
        self.storage
            .try_reserve(additional)
            .map_err(|_| TreeError::OutOfMemory)
    }

    /// Returns whether `node` is a fresh node that can be passed to
    /// [`insert_node`](Self::insert_node).
    #[must_use]
    pub fn is_node_clean(&self, node: NodeIndex) -> bool {
        node != NIL && self.storage.get(node.0).is_some_and(Node::is_clean)
    }

    /// Creates a detached node holding `value`.
    ///
    /// The node is red and has no links. It is either linked later with
    /// [`insert_node`](Self::insert_node) or given back with
    /// [`free_node`](Self::free_node); detached nodes still alive when the tree
    /// is cleared are destroyed with it.
    pub fn new_node(&mut self, value: T) -> Result<NodeIndex, InsertError<T>> {
        let footprint = NODE_HEADER.saturating_add((self.sizer)(&value));

        if self.free == NIL && self.storage.try_reserve(1).is_err() {
            debug!("arena growth refused for a node of {footprint} bytes");
            return Err(InsertError::new(TreeError::OutOfMemory, value));
        }

        if self.allocator.allocate(footprint).is_err() {
            debug!("allocator refused a node of {footprint} bytes");
            return Err(InsertError::new(TreeError::OutOfMemory, value));
        }

        let node = Node::new_isolated(value, footprint);

        if self.free == NIL {
            self.storage.push(node);
            return Ok(NodeIndex(self.storage.len() - 1));
        }

        let idx = self.free;
        self.free = self.node(idx).parent;
        self.storage[idx.0] = node;

        Ok(idx)
    }

    /// Releases a detached node and hands its value back. The destructor is
    /// not run since the caller owns the value again.
    ///
    /// Returns `None` if `node` is not a fresh detached node.
    pub fn free_node(&mut self, node: NodeIndex) -> Option<T> {
        if !self.is_node_clean(node) {
            return None;
        }

        let slot = &mut self.storage[node.0];
        let value = slot.value.take()?;
        self.allocator.deallocate(slot.footprint);
        slot.vacate(self.free);
        self.free = node;

        Some(value)
    }

    /// Destroys every value, in ascending order, then any detached node, and
    /// leaves the tree empty.
    pub fn clear(&mut self) {
        let mut cursor = self.leftmost(self.root);
        while cursor != NIL {
            let next = self.successor(cursor);
            self.destroy_value(cursor);
            cursor = next;
        }

        for idx in 1..self.storage.len() {
            self.destroy_value(NodeIndex(idx));
        }

        self.storage.truncate(1);
        self.root = NIL;
        self.free = NIL;
        self.len = 0;
    }

    #[inline]
    pub(crate) fn node(&self, idx: NodeIndex) -> &Node<T> {
        &self.storage[idx.0]
    }

    #[inline]
    pub(crate) fn node_mut(&mut self, idx: NodeIndex) -> &mut Node<T> {
        &mut self.storage[idx.0]
    }

    #[inline]
    pub(crate) fn is_red(&self, idx: NodeIndex) -> bool {
        self.node(idx).is_red()
    }

    pub(crate) fn set_color(&mut self, idx: NodeIndex, color: NodeColor) {
        if idx != NIL {
            self.node_mut(idx).color = color;
        }
    }

    pub(crate) fn swap_colors(&mut self, first: NodeIndex, second: NodeIndex) {
        let first_color = self.node(first).color;
        let second_color = self.node(second).color;

        self.set_color(first, second_color);
        self.set_color(second, first_color);
    }

    pub(crate) fn leftmost(&self, mut idx: NodeIndex) -> NodeIndex {
        while self.node(idx).left_child() != NIL {
            idx = self.node(idx).left_child();
        }

        idx
    }

    pub(crate) fn rightmost(&self, mut idx: NodeIndex) -> NodeIndex {
        while self.node(idx).right_child() != NIL {
            idx = self.node(idx).right_child();
        }

        idx
    }

    /// In-order successor, found through parent links.
    pub(crate) fn successor(&self, idx: NodeIndex) -> NodeIndex {
        let right = self.node(idx).right_child();
        if right != NIL {
            return self.leftmost(right);
        }

        let mut child = idx;
        let mut parent = self.node(idx).parent;
        while parent != NIL && self.node(parent).right_child() == child {
            child = parent;
            parent = self.node(parent).parent;
        }

        parent
    }

    /// Points the link of `parent` that held `old` at `new`, or the root if
    /// `parent` is the sentinel.
    pub(crate) fn replace_child(&mut self, parent: NodeIndex, old: NodeIndex, new: NodeIndex) {
        if parent == NIL {
            self.root = new;
        } else if self.node(parent).left == old {
            self.node_mut(parent).left = new;
        } else {
            self.node_mut(parent).right = new;
        }
    }

    /// ```txt
    ///  center                pivot
    ///   / \                  /  \
    ///  a  pivot    ===>   center  c
    ///      / \             / \
    ///     b   c           a   b
    /// ```
    pub(crate) fn rotate_left(&mut self, center: NodeIndex) {
        let parent = self.node(center).parent;
        let pivot = self.node(center).right;
        let inner = self.node(pivot).left;

        self.node_mut(center).right = inner;
        if inner != NIL {
            self.node_mut(inner).parent = center;
        }

        self.node_mut(pivot).left = center;
        self.node_mut(center).parent = pivot;
        self.node_mut(pivot).parent = parent;

        self.replace_child(parent, center, pivot);
    }

    /// ```txt
    ///      center          pivot
    ///       / \            /  \
    ///    pivot  c   ===>  a  center
    ///     / \                 / \
    ///    a   b               b   c
    /// ```
    pub(crate) fn rotate_right(&mut self, center: NodeIndex) {
        let parent = self.node(center).parent;
        let pivot = self.node(center).left;
        let inner = self.node(pivot).right;

        self.node_mut(center).left = inner;
        if inner != NIL {
            self.node_mut(inner).parent = center;
        }

        self.node_mut(pivot).right = center;
        self.node_mut(center).parent = pivot;
        self.node_mut(pivot).parent = parent;

        self.replace_child(parent, center, pivot);
    }

    /// Runs the destructor on the value of `idx` and returns its memory to the
    /// allocator. Links are left untouched.
    fn destroy_value(&mut self, idx: NodeIndex) {
        let slot = &mut self.storage[idx.0];

        if let Some(mut value) = slot.value.take() {
            if let Some(destructor) = self.destructor.as_mut() {
                destructor(&mut value);
            }
            drop(value);

            self.allocator.deallocate(slot.footprint);
            slot.footprint = 0;
        }
    }

    /// Destroys the value of an unlinked node and puts its cell on the free list.
    pub(crate) fn release(&mut self, idx: NodeIndex) {
        self.destroy_value(idx);

        let next_free = self.free;
        self.node_mut(idx).vacate(next_free);
        self.free = idx;
    }
}

impl<T, C: Comparator<T>, A: NodeAllocator> Ironwood<T, C, A> {
    pub(crate) fn locate(&self, key: &T) -> Location {
        let mut current_node = self.root;
        let mut parent_node = NIL;
        let mut ordering = Ordering::Equal;

        while current_node != NIL {
            let curr_node_storage = self.node(current_node);
            let Some(stored) = curr_node_storage.value.as_ref() else {
                break;
            };

            ordering = self.comparator.compare(key, stored);
            match ordering {
                Ordering::Less => {
                    parent_node = current_node;
                    current_node = curr_node_storage.left;
                }
                Ordering::Equal => {
                    return Location::Found(current_node);
                }
                Ordering::Greater => {
                    parent_node = current_node;
                    current_node = curr_node_storage.right;
                }
            }
        }

        Location::Vacant {
            parent: parent_node,
            ordering,
        }
    }

    /// Node holding the value equal to `key`.
    #[must_use]
    pub fn find_node(&self, key: &T) -> Option<NodeIndex> {
        match self.locate(key) {
            Location::Found(idx) => Some(idx),
            Location::Vacant { .. } => None,
        }
    }

    /// Stored value equal to `key`.
    #[must_use]
    pub fn find(&self, key: &T) -> Option<&T> {
        self.find_node(key).and_then(|idx| self.get(idx))
    }

    #[must_use]
    pub fn contains(&self, key: &T) -> bool {
        self.find_node(key).is_some()
    }
}

impl<T, C, A: NodeAllocator> Drop for Ironwood<T, C, A> {
    fn drop(&mut self) {
        self.clear();
        self.allocator.deallocate(Self::HANDLE_FOOTPRINT);
    }
}

impl<T: fmt::Debug, C, A: NodeAllocator> fmt::Debug for Ironwood<T, C, A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
