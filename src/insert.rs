use core::cmp::Ordering;

use log::{debug, trace};

use crate::{
    InsertError, Ironwood, Location, TreeError,
    allocator::NodeAllocator,
    compare::Comparator,
    node::{NIL, NodeColor, NodeIndex},
};

impl<T, C: Comparator<T>, A: NodeAllocator> Ironwood<T, C, A> {
    /// Inserts `value` and returns the node now holding it.
    ///
    /// If an equal value is already stored, or the allocator refuses the node,
    /// the tree is left untouched and `value` is handed back in the error.
    pub fn insert(&mut self, value: T) -> Result<NodeIndex, InsertError<T>> {
        let (parent, ordering) = match self.locate(&value) {
            Location::Found(_) => {
                debug!("insertion rejected, value already present");
                return Err(InsertError::new(TreeError::AlreadyExists, value));
            }
            Location::Vacant { parent, ordering } => (parent, ordering),
        };

        let node = self.new_node(value)?;
        self.link(node, parent, ordering);

        Ok(node)
    }

    /// Links a node created with [`new_node`](Self::new_node) into the tree.
    ///
    /// Fails with [`TreeError::InvalidNode`] if `node` is not fresh, and with
    /// [`TreeError::AlreadyExists`] if an equal value is stored; the node then
    /// stays detached.
    pub fn insert_node(&mut self, node: NodeIndex) -> Result<(), TreeError> {
        if !self.is_node_clean(node) {
            return Err(TreeError::InvalidNode);
        }

        let Some(value) = self.get(node) else {
            return Err(TreeError::InvalidNode);
        };

        match self.locate(value) {
            Location::Found(_) => {
                debug!("insertion of node {node:?} rejected, value already present");
                Err(TreeError::AlreadyExists)
            }
            Location::Vacant { parent, ordering } => {
                self.link(node, parent, ordering);
                Ok(())
            }
        }
    }

    fn link(&mut self, node: NodeIndex, parent: NodeIndex, ordering: Ordering) {
        self.node_mut(node).parent = parent;

        if parent == NIL {
            self.root = node;
        } else if ordering == Ordering::Less {
            self.node_mut(parent).left = node;
        } else {
            self.node_mut(parent).right = node;
        }

        self.len += 1;
        self.fix_red_violation(node);
    }

    /// Restores the red-black invariants after `start_node` was linked red.
    ///
    /// Walks up while the current node and its parent are both red:
    ///
    /// 1. red uncle: parent and uncle turn black, grandparent red, continue at
    ///    the grandparent
    /// 2. black uncle, inner grandchild: rotate the parent outwards and continue
    ///    at the former parent, which is now an outer grandchild
    /// 3. black uncle, outer grandchild: rotate the grandparent towards the
    ///    uncle and swap grandparent and parent colors, which ends the walk
    fn fix_red_violation(&mut self, start_node: NodeIndex) {
        let mut curr_node = start_node;

        loop {
            let parent_idx = self.node(curr_node).parent;

            if parent_idx == NIL {
                self.set_color(curr_node, NodeColor::Black);
                return;
            }

            if !self.is_red(parent_idx) {
                return;
            }

            // a red parent is never the root
            let grandparent_idx = self.node(parent_idx).parent;
            let grandparent = self.node(grandparent_idx);

            let parent_is_right_child = grandparent.right == parent_idx;
            let uncle = if parent_is_right_child {
                grandparent.left
            } else {
                grandparent.right
            };

            if self.is_red(uncle) {
                trace!("insert fixup: recolor below {grandparent_idx:?}");

                self.set_color(parent_idx, NodeColor::Black);
                self.set_color(uncle, NodeColor::Black);
                self.set_color(grandparent_idx, NodeColor::Red);

                curr_node = grandparent_idx;
                continue;
            }

            let parent = self.node(parent_idx);
            if (parent_is_right_child && parent.left == curr_node)
                || (!parent_is_right_child && parent.right == curr_node)
            {
                trace!("insert fixup: inner rotation at {parent_idx:?}");

                if parent_is_right_child {
                    self.rotate_right(parent_idx);
                } else {
                    self.rotate_left(parent_idx);
                }

                curr_node = parent_idx;
                continue;
            }

            trace!("insert fixup: outer rotation at {grandparent_idx:?}");

            if parent_is_right_child {
                self.rotate_left(grandparent_idx);
            } else {
                self.rotate_right(grandparent_idx);
            }
            self.swap_colors(parent_idx, grandparent_idx);

            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::{Budget, Builder, Ironwood, NodeColor, TreeError};

    #[test]
    pub fn empty_tree_insertion() {
        let mut tree = Ironwood::<usize>::new();

        let root = tree.insert(5).unwrap();
        assert_eq!(tree.root(), Some(root));
        assert_eq!(tree.color(root), Some(NodeColor::Black));

        tree.insert(7).unwrap();
        tree.insert(9).unwrap();
        tree.insert(3).unwrap();

        assert_eq!(tree.len(), 4);
        assert_eq!(tree.find(&7), tree.get(tree.root().unwrap()));
        assert!(tree.validate().is_ok());
    }

    #[test]
    pub fn duplicate_insertion_is_rejected() {
        let mut tree = Ironwood::new();
        tree.insert(String::from("key")).unwrap();

        let err = tree.insert(String::from("key")).unwrap_err();
        assert_eq!(err.error(), TreeError::AlreadyExists);
        assert_eq!(err.into_value(), "key");
        assert_eq!(tree.len(), 1);
    }

    #[test]
    pub fn ascending_insertions_stay_balanced() {
        let mut tree = Ironwood::new();
        for key in 0..1024u32 {
            tree.insert(key).unwrap();
        }

        assert!(tree.validate().is_ok());
        assert!(tree.height() <= 20);
        assert_eq!(tree.iter().count(), 1024);
    }

    #[test]
    pub fn node_handles_follow_their_values() {
        let mut tree = Ironwood::new();
        let handles: Vec<_> = (0..64u32).map(|key| tree.insert(key).unwrap()).collect();

        for (key, handle) in handles.into_iter().enumerate() {
            assert_eq!(tree.get(handle), Some(&(key as u32)));
        }
    }

    #[test]
    pub fn detached_node_insertion() {
        let mut tree = Ironwood::new();

        let node = tree.new_node(4).unwrap();
        assert!(tree.is_node_clean(node));
        assert_eq!(tree.len(), 0);

        tree.insert_node(node).unwrap();
        assert!(!tree.is_node_clean(node));
        assert_eq!(tree.insert_node(node), Err(TreeError::InvalidNode));
        assert_eq!(tree.len(), 1);

        let twin = tree.new_node(4).unwrap();
        assert_eq!(tree.insert_node(twin), Err(TreeError::AlreadyExists));
        assert_eq!(tree.free_node(twin), Some(4));
        assert_eq!(tree.free_node(node), None);
        assert_eq!(tree.len(), 1);
    }

    #[test]
    pub fn out_of_memory_leaves_tree_unchanged() {
        let mut tree = Builder::<u64>::new()
            .allocator(Budget::new(512))
            .build()
            .unwrap();

        let mut inserted = 0;
        let rejected = loop {
            match tree.insert(inserted) {
                Ok(_) => inserted += 1,
                Err(err) => break err,
            }
        };

        assert_eq!(rejected.error(), TreeError::OutOfMemory);
        assert_eq!(rejected.into_value(), inserted);
        assert_eq!(tree.len(), inserted as usize);
        assert!(tree.validate().is_ok());

        tree.delete(&0).unwrap();
        assert!(tree.insert(inserted).is_ok());
    }
}
