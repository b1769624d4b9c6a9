use log::{debug, trace};

use crate::{
    Ironwood, Location, TreeError,
    allocator::NodeAllocator,
    compare::Comparator,
    node::{NIL, NodeColor, NodeIndex},
};

impl<T, C: Comparator<T>, A: NodeAllocator> Ironwood<T, C, A> {
    /// Removes the value equal to `key`, running the destructor on it.
    pub fn delete(&mut self, key: &T) -> Result<(), TreeError> {
        let target = match self.locate(key) {
            Location::Found(target) => target,
            Location::Vacant { .. } => {
                debug!("deletion target not found");
                return Err(TreeError::NotFound);
            }
        };

        self.unlink(target);
        self.release(target);

        Ok(())
    }
}

impl<T, C, A: NodeAllocator> Ironwood<T, C, A> {
    /// Detaches `target` from the tree and rebalances.
    ///
    /// A node with two children first trades places with its in-order
    /// predecessor, so the node leaving the tree always has at most one child
    /// and still holds its own value.
    pub(crate) fn unlink(&mut self, target: NodeIndex) {
        let left = self.node(target).left_child();
        if left != NIL && self.node(target).right_child() != NIL {
            let predecessor = self.rightmost(left);
            self.swap_with_predecessor(target, predecessor);
        }

        let removed = self.node(target);
        let parent = removed.parent;
        let removed_color = removed.color;
        let child = if removed.left != NIL {
            removed.left
        } else {
            removed.right
        };

        self.replace_child(parent, target, child);
        if child != NIL {
            self.node_mut(child).parent = parent;
        }

        let removed = self.node_mut(target);
        removed.parent = NIL;
        removed.left = NIL;
        removed.right = NIL;
        self.len -= 1;

        if removed_color == NodeColor::Red || self.is_red(child) {
            self.set_color(child, NodeColor::Black);
        } else {
            self.fix_double_black(parent, child);
        }
    }

    /// Exchanges the tree positions and colors of `node` and `predecessor`,
    /// the rightmost node of its left subtree. Values stay in their cells.
    fn swap_with_predecessor(&mut self, node: NodeIndex, predecessor: NodeIndex) {
        let node_parent = self.node(node).parent;
        let node_left = self.node(node).left;
        let node_right = self.node(node).right;
        let pred_parent = self.node(predecessor).parent;
        let pred_left = self.node(predecessor).left;

        self.replace_child(node_parent, node, predecessor);
        self.node_mut(predecessor).parent = node_parent;

        self.node_mut(predecessor).right = node_right;
        self.node_mut(node_right).parent = predecessor;

        if node_left == predecessor {
            self.node_mut(predecessor).left = node;
            self.node_mut(node).parent = predecessor;
        } else {
            self.node_mut(predecessor).left = node_left;
            self.node_mut(node_left).parent = predecessor;

            self.node_mut(pred_parent).right = node;
            self.node_mut(node).parent = pred_parent;
        }

        self.node_mut(node).left = pred_left;
        self.node_mut(node).right = NIL;
        if pred_left != NIL {
            self.node_mut(pred_left).parent = node;
        }

        self.swap_colors(node, predecessor);
    }

    /// Resolves the missing black on the path through `node`, a child of
    /// `parent` (or the sentinel standing in for an empty slot of `parent`).
    ///
    /// 1. red sibling: rotate it above the parent and swap their colors, which
    ///    leaves a black sibling under the same parent
    /// 2. black sibling with a red child: at most two rotations move the red
    ///    child into the sibling's far slot and lift the sibling above the
    ///    parent, ending the walk
    /// 3. black sibling with black children: paint the sibling red; a red
    ///    parent absorbs the deficit by turning black, a black parent carries
    ///    it one level up
    fn fix_double_black(&mut self, mut parent: NodeIndex, mut node: NodeIndex) {
        while parent != NIL {
            // the sibling is never the sentinel since the removed node was black
            let node_is_left = self.node(parent).left == node;
            let sibling = if node_is_left {
                self.node(parent).right
            } else {
                self.node(parent).left
            };

            if self.is_red(sibling) {
                trace!("delete fixup: red sibling {sibling:?}");

                if node_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }
                self.swap_colors(parent, sibling);

                continue;
            }

            let (near, far) = if node_is_left {
                (self.node(sibling).left, self.node(sibling).right)
            } else {
                (self.node(sibling).right, self.node(sibling).left)
            };

            if self.is_red(near) || self.is_red(far) {
                let (sibling, far) = if self.is_red(far) {
                    (sibling, far)
                } else {
                    trace!("delete fixup: red near nephew {near:?}");

                    if node_is_left {
                        self.rotate_right(sibling);
                    } else {
                        self.rotate_left(sibling);
                    }
                    self.swap_colors(sibling, near);

                    (near, sibling)
                };

                trace!("delete fixup: red far nephew {far:?}");

                if node_is_left {
                    self.rotate_left(parent);
                } else {
                    self.rotate_right(parent);
                }

                let parent_color = self.node(parent).color;
                self.set_color(sibling, parent_color);
                self.set_color(parent, NodeColor::Black);
                self.set_color(far, NodeColor::Black);

                return;
            }

            self.set_color(sibling, NodeColor::Red);

            if self.is_red(parent) {
                trace!("delete fixup: red parent {parent:?} absorbs");
                self.set_color(parent, NodeColor::Black);
                return;
            }

            trace!("delete fixup: deficit moves up to {parent:?}");
            node = parent;
            parent = self.node(node).parent;
        }
    }
}
